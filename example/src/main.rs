use std::{thread, time::Instant};

use clap::Parser;
use robot::Robot;
use swerve_teleop::config::ITERATION_PERIOD;
use tracing_subscriber::EnvFilter;

mod gamepad;
mod robot;
mod scheduler;
mod subsystems {
    pub mod drivetrain;
}

/// Drive a simulated swerve around a scripted lap and log what it is told to do.
#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    /// Ticks each scripted phase is held for
    #[clap(long, default_value_t = 25)]
    phase_ticks: u32,
    /// Sleep between ticks to run at the real loop rate
    #[clap(long)]
    realtime: bool,
}

fn main() -> swerve_teleop::Result {
    let opts = Opts::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut robot = Robot::new(opts.phase_ticks)?;
    let start = Instant::now();
    for _ in 0..robot.total_ticks() {
        let tick_start = Instant::now();
        robot.periodic()?;
        if opts.realtime {
            thread::sleep(ITERATION_PERIOD.saturating_sub(tick_start.elapsed()));
        }
    }

    tracing::info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        final_speed = robot.final_speed(),
        "lap complete"
    );
    Ok(())
}
