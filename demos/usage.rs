use anyhow::Result;
use clap::Parser;
use rand::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wheel_rig::{
    mock::{MockBackend, RecordingVisuals},
    FixedStep, InputSnapshot, VehicleConfig, VehicleControllerInit, VehicleHost,
};

#[derive(Parser)]
struct Opts {
    /// TOML file overriding the default vehicle config.
    #[clap(long)]
    pub config: Option<PathBuf>,
    #[clap(long, default_value = "600")]
    pub frames: usize,
    /// Render rate; physics always runs at 50 Hz.
    #[clap(long, default_value = "60")]
    pub fps: f64,
    #[clap(long, default_value = "42")]
    pub seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Opts {
        config,
        frames,
        fps,
        seed,
    } = Opts::parse();

    let config = match config {
        Some(path) => VehicleConfig::load(path)?,
        None => VehicleConfig::default(),
    };

    // Spawn a car on the mock backend
    let backend = MockBackend::new();
    let controller = VehicleControllerInit {
        config,
        bindings: backend.bindings(),
    }
    .build()?;

    // A driver that holds the throttle, weaves, and taps the brakes
    let mut rng = StdRng::seed_from_u64(seed);
    let mut frame = 0usize;
    let driver = move || {
        frame += 1;
        let horizontal = (frame as f64 / 90.0).sin() + rng.gen_range(-0.1..0.1);
        let braking = frame % 300 > 270;
        InputSnapshot::new(horizontal, 1.0, braking)
    };

    let stepper = FixedStep::new(0.02, 8)?;
    let visuals = RecordingVisuals::default();
    let mut host = VehicleHost::new(controller, backend, driver, visuals, stepper);

    let frame_sec = 1.0 / fps;
    for index in 0..frames {
        let report = host.frame(frame_sec);

        if index % 60 == 0 {
            if let Some(state) = report.control {
                println!(
                    "frame {:4}: speed {:7.2} torque {:7.1} steer {:6.2} brake {:?}",
                    index,
                    state.estimated_speed,
                    state.motor_torque,
                    state.steer_angle,
                    state.brake.state
                );
            }
        }
    }

    println!(
        "{} physics steps, {} visual writes",
        host.backend.steps, host.visuals.writes
    );

    Ok(())
}
