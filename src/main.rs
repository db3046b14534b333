use std::path::PathBuf;

use actix_web::{HttpServer, web};
use clap::Parser;
use color_eyre::Result;
use procmon::api::{AppState, build_app};
use procmon::config::{Config, load_config, load_config_from_path};
use procmon::logging;

#[derive(Parser)]
#[command(
    name = "procmon",
    about = "HTTP service to list, terminate and summarize local processes"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Log output: plain, json
    #[arg(long)]
    log_format: Option<String>,

    /// Maximum log level: error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// How long to wait for a terminated process to exit (0 waits forever)
    #[arg(long)]
    terminate_timeout_ms: Option<u64>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    logging::init_tracing(&config.logging)?;

    let state = web::Data::new(AppState::from_config(&config));
    let server_config = config.server.clone();
    let addr = (server_config.bind.clone(), server_config.port);

    tracing::info!(
        bind = %server_config.bind,
        port = server_config.port,
        prefix = %server_config.api_prefix,
        "starting procmon"
    );

    let mut server = HttpServer::new(move || build_app(state.clone(), server_config.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    server.bind(addr)?.run().await?;

    tracing::info!("procmon stopped");
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(ref bind) = cli.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(ref format) = cli.log_format {
        config.logging.format = format.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(timeout) = cli.terminate_timeout_ms {
        config.terminate.timeout_ms = timeout;
    }

    config
}
