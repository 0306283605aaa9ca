//! Local food log

use chrono::Utc;
use std::sync::Arc;

use crate::models::{FoodEntry, FoodEntryDraft, FoodEntryUpdate};
use crate::storage::{keys, LocalStore, StoreResult};

/// Meals recorded on this device, newest first, under the `foodEntries` key
#[derive(Debug, Clone)]
pub struct FoodLog {
    store: Arc<LocalStore>,
}

impl FoodLog {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub fn entries(&self) -> StoreResult<Vec<FoodEntry>> {
        Ok(self.store.get(keys::FOOD_ENTRIES)?.unwrap_or_default())
    }

    /// Entries addressed to one family member
    pub fn entries_for_target(&self, target_id: &str) -> StoreResult<Vec<FoodEntry>> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.target_id.as_deref() == Some(target_id))
            .collect())
    }

    pub fn add(&self, draft: FoodEntryDraft) -> StoreResult<FoodEntry> {
        let id = format!("food_{}", uuid::Uuid::new_v4().simple());
        let entry = draft.into_entry(id, Utc::now().to_rfc3339());

        let mut entries = self.entries()?;
        entries.insert(0, entry.clone());
        self.save(&entries)?;
        Ok(entry)
    }

    /// Merge `changes` into the entry; `None` when the id is unknown
    pub fn update(&self, id: &str, changes: &FoodEntryUpdate) -> StoreResult<Option<FoodEntry>> {
        let mut entries = self.entries()?;
        let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        changes.apply_to(entry);
        let updated = entry.clone();
        self.save(&entries)?;
        Ok(Some(updated))
    }

    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(&entries)?;
        Ok(true)
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.store.remove(keys::FOOD_ENTRIES)
    }

    fn save(&self, entries: &[FoodEntry]) -> StoreResult<()> {
        self.store.set(keys::FOOD_ENTRIES, entries)
    }
}
