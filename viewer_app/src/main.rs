//! Traffic simulation viewer
//!
//! Connects to a running simulation service, mirrors its entities into a 3D
//! scene and renders it until interrupted.

use std::path::Path;

use clap::Parser;
use sim_viewer::config::{Config, ViewerConfig};
use sim_viewer::driver::{run_viewer, Viewer, ViewerError};
use sim_viewer::foundation::logging;
use sim_viewer::net::HttpSimulationClient;
use sim_viewer::render::HeadlessBackend;

const DEFAULT_CONFIG_PATH: &str = "resources/config/viewer.toml";

/// Real-time 3D viewer for a remote traffic simulation
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Configuration file (.toml or .ron)
    #[arg(short, long)]
    config: Option<String>,

    /// Simulation service base URL, overriding the configuration
    #[arg(long)]
    service_url: Option<String>,

    /// Log level, overriding the configuration (RUST_LOG still wins)
    #[arg(long)]
    log_level: Option<String>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u64>,
}

fn load_config(cli: &Cli) -> Result<ViewerConfig, ViewerError> {
    let mut config = match cli.config.as_deref() {
        Some(path) => ViewerConfig::load_from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => ViewerConfig::load_from_file(DEFAULT_CONFIG_PATH)?,
        None => ViewerConfig::default(),
    };
    if let Some(url) = &cli.service_url {
        config.service.base_url.clone_from(url);
    }
    if let Some(level) = &cli.log_level {
        config.engine.log_level.clone_from(level);
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ViewerError> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init_with_level(&config.engine.log_level);

    log::info!("Connecting to simulation at {}", config.service.base_url);
    let service = HttpSimulationClient::new(config.service.clone());
    let backend = HeadlessBackend::new(config.render.display_width, config.render.display_height);
    let viewer = Viewer::new(config, service, backend)?;

    tokio::select! {
        result = run_viewer(viewer, cli.frames) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            log::info!("Interrupted, shutting down");
        }
    }
    Ok(())
}
