//! Carer payment requests

use chrono::Utc;
use std::sync::Arc;

use crate::models::{PaymentRequest, PaymentRequestDraft, PaymentRequestStatus, PaymentRequestUpdate};
use crate::storage::{keys, LocalStore, StoreResult};

/// Payment requests raised by carers, newest first, under the `payments` key
#[derive(Debug, Clone)]
pub struct PaymentRequests {
    store: Arc<LocalStore>,
}

impl PaymentRequests {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub fn all(&self) -> StoreResult<Vec<PaymentRequest>> {
        Ok(self.store.get(keys::PAYMENT_REQUESTS)?.unwrap_or_default())
    }

    /// Requests addressed to one family member
    pub fn for_payer(&self, payer_id: &str) -> StoreResult<Vec<PaymentRequest>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|p| p.payer_id.as_deref() == Some(payer_id))
            .collect())
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<PaymentRequest>> {
        Ok(self.all()?.into_iter().find(|p| p.id == id))
    }

    /// Record a new pending request at the front
    pub fn create_request(&self, draft: PaymentRequestDraft) -> StoreResult<PaymentRequest> {
        let id = format!("pay_{}", uuid::Uuid::new_v4().simple());
        let request = draft.into_request(id, Utc::now().to_rfc3339());

        let mut requests = self.all()?;
        requests.insert(0, request.clone());
        self.save(&requests)?;
        Ok(request)
    }

    /// Settle a request; `None` when the id is unknown
    pub fn mark_paid(
        &self,
        id: &str,
        receipt_url: Option<String>,
        payer: Option<String>,
        payer_id: Option<String>,
    ) -> StoreResult<Option<PaymentRequest>> {
        self.modify(id, |request| {
            request.status = PaymentRequestStatus::Paid;
            request.receipt_url = receipt_url;
            request.payer = payer;
            if payer_id.is_some() {
                request.payer_id = payer_id;
            }
        })
    }

    pub fn update(
        &self,
        id: &str,
        changes: &PaymentRequestUpdate,
    ) -> StoreResult<Option<PaymentRequest>> {
        self.modify(id, |request| changes.apply_to(request))
    }

    pub fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut requests = self.all()?;
        let before = requests.len();
        requests.retain(|p| p.id != id);
        if requests.len() == before {
            return Ok(false);
        }
        self.save(&requests)?;
        Ok(true)
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.store.remove(keys::PAYMENT_REQUESTS)
    }

    fn modify(
        &self,
        id: &str,
        change: impl FnOnce(&mut PaymentRequest),
    ) -> StoreResult<Option<PaymentRequest>> {
        let mut requests = self.all()?;
        let Some(request) = requests.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        change(request);
        let updated = request.clone();
        self.save(&requests)?;
        Ok(Some(updated))
    }

    fn save(&self, requests: &[PaymentRequest]) -> StoreResult<()> {
        self.store.set(keys::PAYMENT_REQUESTS, requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::NotificationCache;
    use tempfile::TempDir;

    fn draft(payer: &str, period: &str) -> PaymentRequestDraft {
        PaymentRequestDraft {
            period: period.into(),
            concept: "Monthly care".into(),
            amount: "S/. 1,200.00".into(),
            requester: Some("Carer A".into()),
            requester_id: Some("2".into()),
            payer_id: Some(payer.into()),
        }
    }

    #[test]
    fn test_create_and_list_for_payer() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(LocalStore::open(dir.path()).unwrap());
        let requests = PaymentRequests::new(store.clone());

        let oct = requests.create_request(draft("1", "Oct, 2025")).unwrap();
        requests.create_request(draft("4", "Oct, 2025")).unwrap();
        let nov = requests.create_request(draft("1", "Nov, 2025")).unwrap();

        assert!(oct.id.starts_with("pay_"));
        assert_eq!(oct.status, PaymentRequestStatus::Pending);

        let reopened = PaymentRequests::new(Arc::new(LocalStore::open(dir.path()).unwrap()));
        let ids: Vec<_> = reopened
            .for_payer("1")
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![nov.id, oct.id]);
    }

    #[test]
    fn test_request_notifies_the_payer() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(LocalStore::open(dir.path()).unwrap());
        let requests = PaymentRequests::new(store.clone());
        let notifications = NotificationCache::new(store);

        let request = requests.create_request(draft("1", "Nov, 2025")).unwrap();
        notifications.create(request.notice()).unwrap();

        let inbox = notifications.all().unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].recipient_id.as_deref(), Some("1"));
        assert_eq!(inbox[0].title.as_deref(), Some("New payment request"));
    }

    #[test]
    fn test_mark_paid_update_and_delete() {
        let dir = TempDir::new().unwrap();
        let requests = PaymentRequests::new(Arc::new(LocalStore::open(dir.path()).unwrap()));
        let request = requests.create_request(draft("1", "Nov, 2025")).unwrap();

        let paid = requests
            .mark_paid(
                &request.id,
                Some("https://receipts.example/1".into()),
                Some("Ana".into()),
                None,
            )
            .unwrap()
            .unwrap();
        assert!(paid.is_paid());
        assert_eq!(paid.payer.as_deref(), Some("Ana"));
        assert_eq!(paid.payer_id.as_deref(), Some("1"));
        assert!(requests.mark_paid("missing", None, None, None).unwrap().is_none());

        let changes = PaymentRequestUpdate {
            amount: Some("S/. 900.00".into()),
            ..PaymentRequestUpdate::default()
        };
        let updated = requests.update(&request.id, &changes).unwrap().unwrap();
        assert_eq!(updated.amount, "S/. 900.00");
        assert_eq!(updated.status, PaymentRequestStatus::Paid);

        assert!(requests.delete(&request.id).unwrap());
        assert!(!requests.delete(&request.id).unwrap());
        requests.create_request(draft("1", "Dec, 2025")).unwrap();
        requests.clear().unwrap();
        assert!(requests.all().unwrap().is_empty());
    }
}
