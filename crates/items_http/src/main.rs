//! Items service entry point.
//!
//! # Environment Variables
//!
//! - `ITEMS_DB_PATH`: SQLite file (default: `<temp>/items.sqlite3`)
//! - `ITEMS_BIND_ADDR`: listen address (default: `127.0.0.1:8000`)
//! - `ITEMS_LOG_LEVEL`: `trace|debug|info|warn|error`
//! - `ITEMS_LOG_DIR`: absolute directory for rolling log files
//! - `ITEMS_CSV_DELIMITER`: single ASCII upload delimiter (default: `,`)
//! - `ITEMS_MAX_UPLOAD_BYTES`: request body cap (default: 10 MiB)

use items_core::{init_logging, ItemStore};
use items_http::{build_router, AppState, ServerConfig};
use log::{error, info};
use std::process::ExitCode;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("items-server: configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("items-server: logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    let store = match ItemStore::open(&config.db_path) {
        Ok(store) => store,
        Err(err) => {
            error!(
                "event=server_start module=http status=error error_code=store_open_failed error={}",
                err
            );
            return ExitCode::FAILURE;
        }
    };

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(
                "event=server_start module=http status=error error_code=bind_failed addr={} error={}",
                config.bind_addr, err
            );
            return ExitCode::FAILURE;
        }
    };

    info!(
        "event=server_start module=http status=ok addr={} db_path={}",
        config.bind_addr,
        config.db_path.display()
    );

    let state = AppState::new(store, config.import_options(), config.max_upload_bytes);
    let served = axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    match served {
        Ok(()) => {
            info!("event=server_stop module=http status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(
                "event=server_stop module=http status=error error={}",
                err
            );
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(
            "event=server_stop module=http status=error error_code=signal_failed error={}",
            err
        );
        std::future::pending::<()>().await;
    }
}
