//! `taskcomments` server entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the database.
//! - Serve the HTTP API until Ctrl+C or SIGTERM.

mod config;

use clap::Parser;
use config::{Args, ServerConfig};
use log::{error, info, warn};
use std::process::ExitCode;
use taskcomments_core::db::open_db;
use taskcomments_core::init_logging;
use taskcomments_http::{router, AppState};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Args::parse().resolve();
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=server status=error error={err}");
            eprintln!("taskcomments: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), String> {
    init_logging(&config.logging)?;

    let conn = open_db(&config.db_path).map_err(|err| {
        format!(
            "failed to open database `{}`: {err}",
            config.db_path.display()
        )
    })?;
    let app = router(AppState::new(conn));

    let listener = TcpListener::bind(config.bind.as_str())
        .await
        .map_err(|err| format!("failed to bind `{}`: {err}", config.bind))?;
    match listener.local_addr() {
        Ok(addr) => info!("event=server_listen module=server status=ok addr={addr}"),
        Err(err) => warn!("event=server_listen module=server status=unknown_addr error={err}"),
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| format!("server error: {err}"))?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("event=signal_install module=server status=error signal=ctrl_c error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("event=signal_install module=server status=error signal=sigterm error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("event=server_shutdown module=server status=ok signal=ctrl_c"),
        () = terminate => info!("event=server_shutdown module=server status=ok signal=sigterm"),
    }
}
