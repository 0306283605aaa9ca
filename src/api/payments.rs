//! Payments service (receipts)

use super::client::{ApiClient, Service};
use super::error::ApiResult;
use crate::models::{Receipt, ReceiptRequest};

#[derive(Debug, Clone)]
pub struct PaymentsApi {
    client: ApiClient,
}

impl PaymentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Receipt>> {
        self.client.get(Service::Payments, "/receipts").await
    }

    pub async fn get(&self, receipt_id: i64) -> ApiResult<Receipt> {
        self.client
            .get(Service::Payments, &format!("/receipts/{receipt_id}"))
            .await
    }

    /// `GET /receipts/resident/{residentId}`
    pub async fn by_resident(&self, resident_id: i64) -> ApiResult<Vec<Receipt>> {
        self.client
            .get(Service::Payments, &format!("/receipts/resident/{resident_id}"))
            .await
    }

    pub async fn create(&self, request: &ReceiptRequest) -> ApiResult<Receipt> {
        self.client
            .post(Service::Payments, "/receipts", request)
            .await
    }

    pub async fn update(&self, receipt_id: i64, request: &ReceiptRequest) -> ApiResult<Receipt> {
        self.client
            .put(Service::Payments, &format!("/receipts/{receipt_id}"), request)
            .await
    }

    pub async fn delete(&self, receipt_id: i64) -> ApiResult<()> {
        self.client
            .delete(Service::Payments, &format!("/receipts/{receipt_id}"))
            .await
    }
}
