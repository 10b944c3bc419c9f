use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::core::sync::handle_mutex_poison;
use crate::platform::catalog::{CatalogStore, MediaRecord, SaveOutcome};

#[derive(Default)]
struct CatalogState {
    records: HashMap<String, MediaRecord>,
    insertion_order: Vec<String>,
    failing_names: HashSet<String>,
}

/// In-memory [`CatalogStore`] keyed by `file_unique_id`
#[derive(Default)]
pub struct MemoryCatalog {
    state: Mutex<CatalogState>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every save of a record with this file name fail
    pub fn fail_on(&self, file_name: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.failing_names.insert(file_name.into());
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored records in insertion order
    pub fn records(&self) -> Vec<MediaRecord> {
        self.state
            .lock()
            .map(|state| {
                state
                    .insertion_order
                    .iter()
                    .filter_map(|key| state.records.get(key).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn save(&self, record: MediaRecord) -> SaveOutcome {
        let mut state = match handle_mutex_poison(self.state.lock(), |reason| reason) {
            Ok(state) => state,
            Err(reason) => return SaveOutcome::Failed { reason },
        };

        if state.failing_names.contains(&record.file_name) {
            return SaveOutcome::Failed {
                reason: format!("write rejected for '{}'", record.file_name),
            };
        }
        if state.records.contains_key(&record.file_unique_id) {
            return SaveOutcome::Duplicate;
        }

        let key = record.file_unique_id.clone();
        state.insertion_order.push(key.clone());
        state.records.insert(key, record);
        SaveOutcome::Saved
    }
}
