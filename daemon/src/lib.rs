#![deny(clippy::missing_inline_in_public_items)]

//----------------------------------------------------------------------------------------- std lib
use std::net::SocketAddr;
//--------------------------------------------------------------------------------- other libraries
use log::{error, info, warn};
use surrealdb::engine::local::Db;
//--------------------------------------------------------------------------------- AURCA libraries
use aurca_core::{
    config::{DatabaseSettings, Settings},
    logger::{init_logger, init_tracing},
};
use aurca_storage::db::{Store, init_database};

pub mod errors;
pub mod routes;
pub mod services;
pub mod termination;
#[cfg(test)]
pub mod test_utils;

use crate::services::records::RecordService;

/// Open the configured database.
///
/// The daemon keeps serving when there is no database, or when it can't be opened:
/// record operations then fail with a server error and `/test` reports it.
#[inline]
pub async fn connect_store(settings: &DatabaseSettings) -> Store<Db> {
    let info = settings.store_info();

    let Some(location) = &info.location else {
        warn!("No database configured, record operations are unavailable");
        return Store::disconnected(info);
    };

    match init_database(location, &info.namespace, &info.name).await {
        Ok(db) => {
            info!(
                "Connected to database {}/{} at {location}",
                info.namespace, info.name
            );
            Store::connected(db, info)
        }
        Err(e) => {
            error!("Failed to open database at {location}: {e}");
            Store::disconnected(info)
        }
    }
}

/// Run the daemon
///
/// also initializes the logger, tracing, and database, then serves the HTTP API until
/// a shutdown signal is received.
///
/// # Errors
///
/// If the server cannot bind its address, or the shutdown handler can't be installed.
#[inline]
pub async fn start_daemon(settings: Settings) -> anyhow::Result<()> {
    init_logger(settings.server.log_level);
    tracing::subscriber::set_global_default(init_tracing())?;

    let store = connect_store(&settings.database).await;
    let service = RecordService::new(store);

    let (_terminator, mut interrupt) = termination::create_termination()?;

    let addr: SocketAddr = settings.server.socket_addr();
    let (addr, server) = warp::serve(routes::filters(service)).try_bind_with_graceful_shutdown(
        addr,
        async move {
            match interrupt.wait().await {
                Ok(interrupted) => info!("Stopping the server: {interrupted:?}"),
                Err(e) => warn!("Shutdown signal channel closed: {e}"),
            }
        },
    )?;

    info!("Listening on http://{addr}");
    server.await;
    info!("Server stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_connect_store_without_path() {
        let store = connect_store(&DatabaseSettings::default()).await;

        assert!(!store.is_connected());
        assert_eq!(store.info().namespace, "aurca");
        assert_eq!(store.info().name, "sound");
    }

    #[tokio::test]
    async fn test_connect_store_in_memory() {
        let settings = DatabaseSettings {
            path: Some("memory".into()),
            ..DatabaseSettings::default()
        };

        let store = connect_store(&settings).await;

        assert!(store.is_connected());
        let service = RecordService::new(store);
        assert_eq!(
            service.diagnostics().await.connection_status,
            "Connected".to_string()
        );
    }

    #[tokio::test]
    async fn test_connect_store_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let settings = DatabaseSettings {
            path: Some(dir.path().join("db").to_string_lossy().into_owned()),
            ..DatabaseSettings::default()
        };

        let store = connect_store(&settings).await;

        assert!(store.is_connected());
    }
}
