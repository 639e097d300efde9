//! HeadsUp - Mission runner for Tello-class drones
//!
//! Loads a mission file, connects to the vehicle (or the simulator with
//! `--dry-run`) and flies the `[[steps]]` in order. Ctrl-C stops the mission
//! before the next step and lands the vehicle.

use clap::Parser;
use headsup_nav::config::AppConfig;
use headsup_nav::devices::create_device;
use headsup_nav::events::{EventSink, FileSink, FlightEvent, LogSink};
use headsup_nav::mission::MissionRunner;
use headsup_nav::navigation::FlightController;
use headsup_nav::{CommandSink, Error, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mission configuration file
    #[arg(short, long, default_value = "headsup.toml")]
    config: String,

    /// Override the vehicle type (tello, mock)
    #[arg(short, long)]
    device: Option<String>,

    /// Override the log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Fly the mission against the simulator
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let args = Args::parse();
    let config = AppConfig::load(&args.config);

    // Command line wins over the config file
    let level = args
        .log_level
        .clone()
        .or_else(|| config.as_ref().ok().map(|c| c.logging.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    log::info!("HeadsUp v{} starting...", env!("CARGO_PKG_VERSION"));
    log::info!("Using config: {}", args.config);

    if let Err(e) = config.and_then(|config| run(args, config)) {
        log::error!("Mission aborted: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args, mut config: AppConfig) -> Result<()> {
    if let Some(device) = args.device {
        config.vehicle.device_type = device;
    }
    if args.dry_run {
        config.vehicle.device_type = "mock".to_string();
    }
    // Overrides can change which limits apply
    config.validate()?;

    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        log::warn!("Received interrupt, stopping after the current step");
        flag.store(true, Ordering::SeqCst);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let events: Box<dyn EventSink> = match &config.logging.file {
        Some(path) => Box::new(FileSink::append(path)?.with_logging()),
        None => Box::new(LogSink),
    };

    let vehicle = create_device(&config.vehicle)?;
    let mut drone = FlightController::new(vehicle, config.controller_config(), events)
        .inspect_err(|_| {
            log::error!("Failed to connect to {}", config.vehicle.address);
            log::error!("You may need to join the vehicle's WiFi network first");
        })?;

    drone.record(FlightEvent::MissionStarted {
        name: config.mission.name.clone(),
        vehicle: config.vehicle.device_type.clone(),
        floor: config.mission.floor_cm,
        ceiling: config.mission.ceiling_cm,
    });
    if let Ok(temp) = drone.sink_mut().read_temperature() {
        log::info!("Vehicle temperature: {:.1}°C", temp);
    }

    let runner = MissionRunner::with_cancel_flag(cancel, config.motion.abort_on_low_battery);
    let result = runner.run(&mut drone, &config.steps);

    if result.is_err() && drone.is_flying() {
        log::warn!("Landing after aborted mission");
        if let Err(e) = drone.land() {
            log::error!("Emergency landing failed: {}", e);
        }
    }
    drone.disconnect()?;

    let report = result?;
    log::info!(
        "Mission '{}' completed: {} steps, final position ({}, {})",
        config.mission.name,
        report.completed_steps,
        report.final_pose.x,
        report.final_pose.y
    );
    Ok(())
}
