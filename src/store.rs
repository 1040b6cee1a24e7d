//! The in-memory registry of known databases.

use crate::database::VuforiaDatabase;
use anyhow::bail;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// All databases the service knows about, behind a single lock.
///
/// The lock is held only for the duration of a validation pass or a handler
/// body; nothing holds it across an await on I/O.
#[derive(Debug, Default)]
pub struct Registry {
    databases: RwLock<Vec<VuforiaDatabase>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a database, enforcing unique names and server access keys.
    pub async fn add_database(&self, database: VuforiaDatabase) -> anyhow::Result<()> {
        let mut databases = self.databases.write().await;
        if databases
            .iter()
            .any(|d| d.database_name == database.database_name)
        {
            bail!("database name {:?} is already registered", database.database_name);
        }
        if databases
            .iter()
            .any(|d| d.server_access_key == database.server_access_key)
        {
            bail!(
                "server access key {:?} is already registered",
                database.server_access_key
            );
        }
        tracing::info!(database_name = %database.database_name, "Registered database");
        databases.push(database);
        Ok(())
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Vec<VuforiaDatabase>> {
        self.databases.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Vec<VuforiaDatabase>> {
        self.databases.write().await
    }
}
