//! Spawns and tracks table actors.
//!
//! Grounded on the teacher's `table/manager.rs` `TableManager` (an
//! `Arc<RwLock<HashMap<TableId, TableHandle>>>` registry plus a
//! `load_existing_tables` bootstrap query) trimmed of the wallet/bot/
//! invite-token fields and the `tables` SQL table load — spec §6's
//! abstract persisted layout has no `tables` table; tables are an
//! in-memory, operator-configured concept here, not rows to restore.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::adapters::persistence::PersistenceAdapter;
use crate::game::rng::OsRngSecure;
use crate::table::actor::{TableActor, TableHandle};
use crate::table::config::TableConfig;

#[derive(Debug, Clone)]
pub struct TableMetadata {
    pub id: String,
    pub name: String,
    pub num_seats: usize,
    pub small_blind: i64,
    pub big_blind: i64,
}

pub struct TableManager {
    persistence: Arc<dyn PersistenceAdapter>,
    tables: Arc<RwLock<HashMap<String, (TableMetadata, TableHandle)>>>,
}

impl TableManager {
    pub fn new(persistence: Arc<dyn PersistenceAdapter>) -> Self {
        Self {
            persistence,
            tables: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn spawn_table(&self, table_id: String, config: TableConfig) -> TableHandle {
        let metadata = TableMetadata {
            id: table_id.clone(),
            name: config.name.clone(),
            num_seats: config.num_seats,
            small_blind: config.small_blind,
            big_blind: config.big_blind,
        };
        let (actor, handle) = TableActor::new(
            table_id.clone(),
            config,
            Box::new(OsRngSecure),
            Arc::clone(&self.persistence),
        );
        tokio::spawn(actor.run());

        self.tables.write().await.insert(table_id, (metadata, handle.clone()));
        handle
    }

    pub async fn get_table(&self, table_id: &str) -> Option<TableHandle> {
        self.tables.read().await.get(table_id).map(|(_, h)| h.clone())
    }

    pub async fn list_tables(&self) -> Vec<TableMetadata> {
        self.tables.read().await.values().map(|(m, _)| m.clone()).collect()
    }

    pub async fn close_table(&self, table_id: &str) {
        if let Some((_, handle)) = self.tables.write().await.remove(table_id) {
            handle.close().await;
        }
    }
}
