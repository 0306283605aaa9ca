//! Local notification cache

use chrono::Utc;
use std::sync::Arc;

use crate::models::{Notification, NotificationDraft, NotificationStatus};
use crate::storage::{keys, LocalStore, StoreResult};

/// Ids of notices created on this device start with this prefix
pub const LOCAL_ID_PREFIX: &str = "n_";

/// Newest-first notification list kept under the `notifications` key
#[derive(Debug, Clone)]
pub struct NotificationCache {
    store: Arc<LocalStore>,
}

impl NotificationCache {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    /// All cached notifications, newest first
    pub fn all(&self) -> StoreResult<Vec<Notification>> {
        let mut items: Vec<Notification> = self
            .store
            .get(keys::NOTIFICATIONS)?
            .unwrap_or_default();

        // Records written before `status` existed only carry `read`
        let mut migrated = 0;
        for n in items.iter_mut().filter(|n| n.status.is_none()) {
            n.status = Some(n.effective_status());
            n.read = None;
            migrated += 1;
        }
        if migrated > 0 {
            tracing::debug!(migrated, "Migrated legacy notification records");
            self.save(&items)?;
        }
        Ok(items)
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<Notification>> {
        Ok(self
            .all()?
            .into_iter()
            .find(|n| n.id.as_deref() == Some(id)))
    }

    /// Add a notification at the front with a fresh id, unread, stamped now
    pub fn create(&self, draft: NotificationDraft) -> StoreResult<Notification> {
        let id = format!("{LOCAL_ID_PREFIX}{}", uuid::Uuid::new_v4().simple());
        let notification = draft.into_notification(id, Utc::now());

        let mut items = self.all()?;
        items.insert(0, notification.clone());
        self.save(&items)?;
        Ok(notification)
    }

    /// Set the status of one notification; returns false when the id is unknown
    pub fn update_status(&self, id: &str, status: NotificationStatus) -> StoreResult<bool> {
        let mut items = self.all()?;
        let Some(n) = items.iter_mut().find(|n| n.id.as_deref() == Some(id)) else {
            return Ok(false);
        };
        n.status = Some(status);
        n.read = None;
        self.save(&items)?;
        Ok(true)
    }

    pub fn mark_read(&self, id: &str) -> StoreResult<bool> {
        self.update_status(id, NotificationStatus::Read)
    }

    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        self.retain(|n| n.id.as_deref() != Some(id))
            .map(|removed| removed > 0)
    }

    /// Drop every notification addressed to `recipient_id`
    pub fn remove_for_recipient(&self, recipient_id: &str) -> StoreResult<usize> {
        self.retain(|n| n.recipient_id.as_deref() != Some(recipient_id))
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.store.remove(keys::NOTIFICATIONS)
    }

    pub fn unread_count(&self) -> StoreResult<usize> {
        Ok(super::unread_count(&self.all()?))
    }

    /// Mirror a server fetch. Server records replace the previous mirror;
    /// notices created on this device are kept. Returns the local count kept.
    pub fn merge_remote(&self, mut remote: Vec<Notification>) -> StoreResult<usize> {
        remote.retain(|n| !is_local(n));
        let local: Vec<Notification> = self.all()?.into_iter().filter(is_local).collect();
        let kept = local.len();

        remote.extend(local);
        super::sort_newest_first(&mut remote);
        self.save(&remote)?;
        Ok(kept)
    }

    fn retain(&self, keep: impl Fn(&Notification) -> bool) -> StoreResult<usize> {
        let mut items = self.all()?;
        let before = items.len();
        items.retain(|n| keep(n));
        let removed = before - items.len();
        if removed > 0 {
            self.save(&items)?;
        }
        Ok(removed)
    }

    fn save(&self, items: &[Notification]) -> StoreResult<()> {
        self.store.set(keys::NOTIFICATIONS, items)
    }
}

fn is_local(n: &Notification) -> bool {
    n.id
        .as_deref()
        .is_some_and(|id| id.starts_with(LOCAL_ID_PREFIX))
}
