// SPDX-License-Identifier: MIT

//! catctld — rigctld-compatible TCP daemon fronting the CAT protocol core.
//!
//! # Usage
//!
//! ```bash
//! # Start against a K3 on /dev/ttyUSB0, default port 4532
//! catctld --serial-path /dev/ttyUSB0 --model elecraft-k3
//!
//! # Custom port and config file
//! catctld --config rig.toml --port 4533
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod commands;
mod config;
mod format;
mod levels;
mod server;
mod session;

use catcore::model::ModelId;
use catcore::{Controller, Session};
use config::DaemonConfig;
use server::RigctldServer;

/// catctld - rigctld-compatible CAT control daemon
#[derive(Parser, Debug)]
#[command(name = "catctld")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Serial device path, e.g. /dev/ttyUSB0
    #[arg(long)]
    serial_path: Option<String>,

    /// Baud rate override
    #[arg(long)]
    baud: Option<u32>,

    /// CI-V address override (Icom models only)
    #[arg(long)]
    civ_address: Option<u8>,

    /// Radio model
    #[arg(long, value_enum)]
    model: Option<ModelIdArg>,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TCP bind address
    #[arg(short, long)]
    bind: Option<IpAddr>,

    /// TCP port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Round-trip timeout in milliseconds
    #[arg(long)]
    read_timeout_ms: Option<u64>,

    /// State cache TTL in milliseconds
    #[arg(long)]
    cache_ttl_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ModelIdArg {
    Ic7100,
    Ic705,
    Ic7600,
    Ic9700,
    Ic9100,
    Ic706,
    Ic746,
    ElecraftK2,
    ElecraftK3,
    ElecraftK4,
}

impl From<ModelIdArg> for ModelId {
    fn from(value: ModelIdArg) -> Self {
        match value {
            ModelIdArg::Ic7100 => ModelId::Ic7100,
            ModelIdArg::Ic705 => ModelId::Ic705,
            ModelIdArg::Ic7600 => ModelId::Ic7600,
            ModelIdArg::Ic9700 => ModelId::Ic9700,
            ModelIdArg::Ic9100 => ModelId::Ic9100,
            ModelIdArg::Ic706 => ModelId::Ic706,
            ModelIdArg::Ic746 => ModelId::Ic746,
            ModelIdArg::ElecraftK2 => ModelId::ElecraftK2,
            ModelIdArg::ElecraftK3 => ModelId::ElecraftK3,
            ModelIdArg::ElecraftK4 => ModelId::ElecraftK4,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = args.log_level.clone().unwrap_or_else(|| "info".to_string());
    let level = match log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let file_config = match &args.config {
        Some(path) => {
            info!(?path, "loading config file");
            DaemonConfig::from_file(path)?
        }
        None => DaemonConfig {
            serial_path: args.serial_path.clone().unwrap_or_default(),
            baud: None,
            civ_address: None,
            model: ModelId::ElecraftK3,
            read_timeout_ms: 500,
            cache_ttl_ms: 500,
            bind_address: "127.0.0.1".parse().unwrap(),
            port: 4532,
            log_level: log_level.clone(),
        },
    };

    let config = file_config.merge_cli_overrides(
        args.serial_path,
        args.baud,
        args.civ_address,
        args.model.map(ModelId::from),
        args.read_timeout_ms,
        args.cache_ttl_ms,
        args.bind,
        args.port,
        args.log_level,
    );
    config.validate()?;

    info!(
        serial_path = %config.serial_path,
        model = ?config.model,
        bind = %config.bind_address,
        port = config.port,
        "catctld starting"
    );

    let rig_config = config.rig_config();
    let baud = rig_config
        .baud
        .unwrap_or_else(|| catcore::model::traits_for(config.model).default_baud);
    let echoes_commands = catcore::model::traits_for(config.model).echoes_commands;
    let session = Session::connect(&rig_config.serial_path, baud, echoes_commands).await?;
    let controller = Arc::new(Controller::new(session, config.model, rig_config));

    let bind_addr = std::net::SocketAddr::new(config.bind_address, config.port);
    let server = Arc::new(RigctldServer::new(bind_addr, controller));
    let shutdown = server.shutdown_handle();

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown signal received, stopping catctld...");
        shutdown.notify_waiters();
    });

    server.run().await?;

    info!("catctld stopped");
    Ok(())
}
