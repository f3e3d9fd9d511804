mod cli;
mod config;
mod errors;
mod util;

use clap::Parser;
use cli::AppCli;
use config::AppConfig;
use rtsp_server::{RtspDescribeServer, config::RtspServerConfig};
use sap_formats::engine::{SapEngineConfig, SapEvent};
use sap_server::SapServer;
use time::macros::format_description;
use tokio::{signal, sync::mpsc};
use tracing::{Dispatch, Level};
use tracing_subscriber::{self, EnvFilter, fmt::time::LocalTime};
use util::parse_log_level;

fn setup_tracing(level: Level) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_timer(LocalTime::new(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        )))
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_names(true)
        .with_target(true)
        .with_env_filter(
            EnvFilter::try_from_env("LOG_LEVEL")
                .unwrap_or_else(|_| EnvFilter::new(level.to_string())),
        )
        .finish();
    if tracing::dispatcher::set_global_default(Dispatch::new(subscriber)).is_err() {
        eprintln!("tracing subscriber was already installed");
    }
}

fn log_directory_event(event: &SapEvent) {
    match event {
        SapEvent::New { hash, origin, .. } => {
            tracing::info!("session {:#06x}@{} appeared", hash, origin);
        }
        SapEvent::Updated { hash, origin, .. } => {
            tracing::info!("session {:#06x}@{} updated", hash, origin);
        }
        SapEvent::Deleted { hash, origin, .. } => {
            tracing::info!("session {:#06x}@{} deleted", hash, origin);
        }
        SapEvent::Timeout { hash, origin } => {
            tracing::info!("session {:#06x}@{} timed out", hash, origin);
        }
        SapEvent::AnnouncementRequest { .. } => {}
    }
}

#[tokio::main]
async fn main() {
    let cli_args = AppCli::parse();
    let mut app_config = match AppConfig::new(
        cli_args
            .config
            .as_ref()
            .and_then(|path| path.to_str().map(str::to_owned)),
    ) {
        Ok(app_config) => app_config,
        Err(err) => {
            eprintln!("loading config failed: {}", err);
            std::process::exit(1);
        }
    };
    app_config.apply(&cli_args);
    if let Err(err) = app_config.validate() {
        eprintln!("invalid config: {}", err);
        std::process::exit(1);
    }

    let level = parse_log_level(&app_config.logger.level).unwrap_or(Level::INFO);
    setup_tracing(level);
    tracing::debug!("running with config: {:?}", app_config);

    if app_config.sap_server.enable {
        let sap_config = match app_config.sap_config() {
            Ok(sap_config) => sap_config,
            Err(err) => {
                tracing::error!("invalid sap config: {}", err);
                std::process::exit(1);
            }
        };
        let (event_sender, mut event_receiver) = mpsc::unbounded_channel();
        match SapServer::start(sap_config, SapEngineConfig::default(), event_sender).await {
            Ok(mut sap_server) => {
                tokio::spawn(async move {
                    if let Err(err) = sap_server.run().await {
                        tracing::error!("sap server exited with error: {}", err);
                    }
                });
                tokio::spawn(async move {
                    while let Some(event) = event_receiver.recv().await {
                        log_directory_event(&event);
                    }
                });
            }
            Err(err) => {
                tracing::error!("starting sap server failed: {}", err);
                std::process::exit(1);
            }
        }
    }

    if app_config.rtsp_server.enable {
        let rtsp_config = RtspServerConfig {
            address: app_config.rtsp_server.address,
            port: app_config.rtsp_server.port,
            http_enabled: false,
        };
        match RtspDescribeServer::start(rtsp_config).await {
            Ok(rtsp_server) => {
                tokio::spawn(async move {
                    if let Err(err) = rtsp_server.run().await {
                        tracing::error!("describe server exited with error: {}", err);
                    }
                });
            }
            Err(err) => {
                tracing::error!("starting describe server failed: {}", err);
                std::process::exit(1);
            }
        }
    }

    let _ = signal::ctrl_c().await;
    tracing::info!("shutting down");
}
