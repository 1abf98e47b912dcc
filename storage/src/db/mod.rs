pub mod crud;
pub mod health;
pub mod queries;
pub mod schemas;

use std::{fmt, path::PathBuf, sync::Arc};

use log::info;
use surrealdb::{
    Connection, Surreal,
    engine::local::{Db, Mem, SurrealKv},
};
use tracing::instrument;

use crate::errors::{Error, StorageResult};

/// Value of `database.path` that selects the in-memory engine.
pub const MEMORY: &str = "memory";

/// Where the embedded database keeps its data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    Path(PathBuf),
}

impl DatabaseLocation {
    /// Interpret a configured `database.path`: `"memory"` (any case) or a directory.
    #[must_use]
    pub fn from_setting(path: &str) -> Self {
        if path.trim().eq_ignore_ascii_case(MEMORY) {
            Self::Memory
        } else {
            Self::Path(PathBuf::from(path))
        }
    }
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str(MEMORY),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Connect the embedded engine, select the namespace and database, and register the tables.
///
/// # Errors
///
/// Fails if the engine cannot be started (e.g. the directory is not writable) or the tables
/// cannot be defined.
#[instrument]
pub async fn init_database(
    location: &DatabaseLocation,
    namespace: &str,
    database: &str,
) -> StorageResult<Surreal<Db>> {
    let db = match location {
        DatabaseLocation::Memory => Surreal::new::<Mem>(()).await?,
        DatabaseLocation::Path(path) => Surreal::new::<SurrealKv>(path.clone()).await?,
    };
    db.use_ns(namespace).use_db(database).await?;
    register_tables(&db).await?;
    info!("Connected to the {namespace}/{database} database at {location}");
    Ok(db)
}

/// Define every table and its indexes, skipping the ones that already exist.
///
/// # Errors
///
/// Fails if any of the definitions is rejected by the database.
pub async fn register_tables<C: Connection>(db: &Surreal<C>) -> StorageResult<()> {
    db.query(queries::define_tables()).await?.check()?;
    Ok(())
}

/// Where a [`Store`] is (or would be) connected to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreInfo {
    /// `None` when no database is configured.
    pub location: Option<DatabaseLocation>,
    pub namespace: String,
    pub name: String,
}

/// Shared handle to the document store.
///
/// A store may be *disconnected*, when no database was configured or the connection failed at
/// startup. Every operation on a disconnected store fails with [`Error::Unavailable`].
pub struct Store<C: Connection> {
    db: Option<Arc<Surreal<C>>>,
    info: StoreInfo,
}

impl<C: Connection> Store<C> {
    #[must_use]
    pub fn connected(db: Surreal<C>, info: StoreInfo) -> Self {
        Self {
            db: Some(Arc::new(db)),
            info,
        }
    }

    #[must_use]
    pub const fn disconnected(info: StoreInfo) -> Self {
        Self { db: None, info }
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.db.is_some()
    }

    /// The live connection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unavailable`] if the store is disconnected.
    pub fn connection(&self) -> StorageResult<&Surreal<C>> {
        self.db.as_deref().ok_or(Error::Unavailable)
    }

    #[must_use]
    pub const fn info(&self) -> &StoreInfo {
        &self.info
    }
}

impl<C: Connection> Clone for Store<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            info: self.info.clone(),
        }
    }
}

impl<C: Connection> fmt::Debug for Store<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("connected", &self.is_connected())
            .field("info", &self.info)
            .finish()
    }
}
