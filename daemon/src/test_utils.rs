//! utilitites used for testing
//!
//! NOTE: most of the stuff related to setting up database state is in the `aurca_storage` crate
//! behind the `test_utils` feature flag.

use std::sync::OnceLock;

use aurca_core::logger::{init_logger, init_tracing};
use aurca_storage::{
    db::{Store, StoreInfo},
    test_utils::{init_test_database, test_store_info},
};
use surrealdb::engine::local::Db;

use crate::services::records::RecordService;

static INIT: OnceLock<()> = OnceLock::new();

pub fn init() {
    INIT.get_or_init(|| {
        init_logger(log::LevelFilter::Debug);
        if let Err(e) = tracing::subscriber::set_global_default(init_tracing()) {
            panic!("Error setting global default tracing subscriber: {e:?}")
        }
    });
}

/// A service over a fresh in-memory database.
pub async fn connected_service() -> anyhow::Result<RecordService<Db>> {
    let db = init_test_database().await?;
    Ok(RecordService::new(Store::connected(db, test_store_info())))
}

/// A service whose store has no database configured.
pub fn disconnected_service() -> RecordService<Db> {
    RecordService::new(Store::disconnected(StoreInfo {
        location: None,
        ..test_store_info()
    }))
}
