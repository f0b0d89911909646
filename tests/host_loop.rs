use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use wheel_rig::{
    mock::{MockBackend, RecordingVisuals},
    FixedStep, InputSnapshot, InputSource, PhysicsBackend, VehicleConfig, VehicleControllerInit,
    VehicleHost, VisualId, WheelRole,
};

fn host<I>(input: I, stepper: FixedStep) -> VehicleHost<MockBackend, I, RecordingVisuals>
where
    I: InputSource,
{
    let backend = MockBackend::new();
    let controller = VehicleControllerInit {
        config: VehicleConfig::default(),
        bindings: backend.bindings(),
    }
    .build()
    .unwrap();
    VehicleHost::new(controller, backend, input, RecordingVisuals::default(), stepper)
}

#[test]
fn one_control_update_per_physics_step() {
    let input = InputSnapshot::new(0.0, 1.0, false);
    let mut host = host(input, FixedStep::new(0.02, 8).unwrap());

    let mut fixed_steps = 0;
    for frame_sec in [0.016, 0.016, 0.033, 0.005, 0.1] {
        fixed_steps += host.frame(frame_sec).fixed_steps;
    }

    assert_eq!(fixed_steps, host.backend.steps);
    assert!(fixed_steps > 0);
}

#[test]
fn frames_without_a_step_still_sync_visuals() {
    let mut host = host(InputSnapshot::default(), FixedStep::new(0.02, 8).unwrap());

    let report = host.frame(0.001);
    assert_eq!(report.fixed_steps, 0);
    assert!(report.control.is_none());
    assert_eq!(host.visuals.writes, 4);
    assert_eq!(host.backend.steps, 0);
}

#[test]
fn visuals_mirror_backend_poses() {
    let mut host = host(InputSnapshot::default(), FixedStep::new(0.02, 8).unwrap());
    let pose = Isometry3::from_parts(
        Translation3::new(1.0, 0.4, 2.0),
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.3),
    );
    host.backend.wheel_mut(WheelRole::RearRight).world_pose = pose;

    host.frame(0.0);
    host.frame(0.0);

    let visual = VisualId(WheelRole::RearRight.index() as u32);
    assert_eq!(host.visuals.poses[&visual], pose);
    assert_eq!(host.visuals.poses.len(), 4);
}

#[test]
fn pose_sync_leaves_the_backend_untouched() {
    let backend = MockBackend::new();
    let controller = VehicleControllerInit {
        config: VehicleConfig::default(),
        bindings: backend.bindings(),
    }
    .build()
    .unwrap();
    let before = backend.clone();
    let mut visuals = RecordingVisuals::default();

    for _ in 0..3 {
        controller.sync_visuals(&backend, &mut visuals);
    }

    assert_eq!(backend.wheels, before.wheels);
    assert_eq!(visuals.writes, 12);
}

#[test]
fn throttle_through_the_host_spins_the_driven_wheels() {
    let mut host = host(
        || InputSnapshot::new(0.0, 1.0, false),
        FixedStep::new(0.02, 8).unwrap(),
    );

    for _ in 0..10 {
        host.frame(0.02);
    }

    let front = host.backend.rpm(MockBackend::id(WheelRole::FrontLeft));
    let rear = host.backend.rpm(MockBackend::id(WheelRole::RearLeft));
    assert!(front > 0.0);
    assert_eq!(rear, 0.0);
    assert!(host.controller.state().estimated_speed > 0.0);
}

#[test]
fn braking_through_the_host_stops_the_wheels() {
    let mut braking = false;
    let mut host = host(
        move || {
            let input = InputSnapshot::new(0.0, if braking { 0.0 } else { 1.0 }, braking);
            braking = true;
            input
        },
        FixedStep::new(0.02, 8).unwrap(),
    );

    host.frame(0.11);
    assert!(host.backend.rpm(MockBackend::id(WheelRole::FrontLeft)) > 0.0);

    for _ in 0..20 {
        host.frame(0.02);
    }
    assert_eq!(host.backend.rpm(MockBackend::id(WheelRole::FrontLeft)), 0.0);
}
