//! Smart dumbbell device.
//!
//! Registers with the collector, then waits for commands on the TCP socket.
//! Every accepted `use` runs one simulated workout.
//!
//! Usage:
//!   dumbbell-device --collector-url http://localhost:5000 --listen 0.0.0.0:12345

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use dumbbell_core::config::{ConfigError, ConfigLoader, SystemConfig};
use dumbbell_core::control::CommandServer;
use dumbbell_core::device::{DeviceIdentity, TelemetrySink};
use dumbbell_core::error::DeviceResult;
use dumbbell_core::transport::CollectorClient;
use dumbbell_core::workout::WorkoutCoordinator;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dumbbell-device", version, about = "Simulated smart dumbbell")]
struct Cli {
    /// Configuration file; replaces the default search path
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Address:port for the command socket
    #[arg(long)]
    listen: Option<String>,

    /// Base URL of the collector service
    #[arg(long)]
    collector_url: Option<String>,

    #[arg(long)]
    exercise: Option<String>,

    /// Workout weight in kg
    #[arg(long)]
    weight: Option<f64>,

    #[arg(long)]
    reps_per_set: Option<u32>,

    #[arg(long)]
    total_sets: Option<u32>,

    /// Seconds per rep
    #[arg(long)]
    rep_duration: Option<f64>,

    /// Seconds of rest between sets
    #[arg(long)]
    rest: Option<f64>,

    /// Skip the startup registration
    #[arg(long)]
    no_register: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,

    /// Write the effective configuration to this file and exit
    #[arg(long)]
    export_config: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut SystemConfig) {
        if let Some(listen) = &self.listen {
            config.network.listen_address = listen.clone();
        }
        if let Some(url) = &self.collector_url {
            config.network.collector_url = url.clone();
        }
        if let Some(exercise) = &self.exercise {
            config.workout.exercise = exercise.clone();
        }
        if let Some(weight) = self.weight {
            config.workout.weight = weight;
        }
        if let Some(reps) = self.reps_per_set {
            config.workout.reps_per_set = reps;
        }
        if let Some(sets) = self.total_sets {
            config.workout.total_sets = sets;
        }
        if let Some(secs) = self.rep_duration {
            config.workout.rep_duration = secs;
        }
        if let Some(secs) = self.rest {
            config.workout.rest_between_sets = secs;
        }
        if self.no_register {
            config.network.register_on_startup = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn load_config(cli: &Cli) -> DeviceResult<SystemConfig> {
    let loader = match &cli.config {
        Some(path) if !path.exists() => {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }
        Some(path) => ConfigLoader::with_paths(vec![path.clone()]),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load_system_config()?;
    cli.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(config: SystemConfig) -> DeviceResult<()> {
    let summary = config.get_summary();
    info!(
        device = %summary.device_id,
        exercise = %summary.exercise,
        sets = summary.total_sets,
        reps_per_set = summary.reps_per_set,
        collector = %summary.collector_url,
        "starting device"
    );

    let collector = Arc::new(CollectorClient::new(&config.network)?);
    if config.network.register_on_startup {
        let identity = DeviceIdentity::from_config(&config)?;
        let outcome = collector.register(&identity).await;
        if outcome.is_delivered() {
            info!(
                id = %identity.id,
                addr = %identity.addr,
                port = identity.port,
                "registered with collector"
            );
        } else {
            warn!(%outcome, "registration not delivered");
        }
    }

    let coordinator = Arc::new(WorkoutCoordinator::new(config.workout.clone(), collector));
    let server = CommandServer::bind(&config.network, coordinator.clone()).await?;

    let shutdown = CancellationToken::new();
    let server_task = tokio::spawn(server.run(shutdown.clone()));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("interrupt received, shutting down"),
        Err(e) => warn!(error = %e, "cannot listen for interrupt, shutting down"),
    }

    shutdown.cancel();
    coordinator.shutdown().await;
    match server_task.await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "command server task failed");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    };

    if let Some(path) = &cli.export_config {
        if let Err(e) = ConfigLoader::export_config(&config, path) {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
        println!("wrote configuration to {}", path.display());
        return;
    }

    init_logging(&config.logging.level);

    if let Err(e) = run(config).await {
        error!(error = %e, fatal = e.is_fatal(), "device stopped");
        process::exit(1);
    }
}
