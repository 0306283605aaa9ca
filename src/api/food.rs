//! Food-log service

use super::client::{segment, ApiClient, Service};
use super::error::ApiResult;
use crate::models::{FoodEntry, FoodEntryDraft, FoodEntryUpdate};

#[derive(Debug, Clone)]
pub struct FoodApi {
    client: ApiClient,
}

impl FoodApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<FoodEntry>> {
        self.client.get(Service::Food, "/food-entries").await
    }

    pub async fn get(&self, id: &str) -> ApiResult<FoodEntry> {
        self.client
            .get(Service::Food, &format!("/food-entries/{}", segment(id)))
            .await
    }

    /// `GET /food-entries/resident/{residentId}`
    pub async fn by_resident(&self, resident_id: i64) -> ApiResult<Vec<FoodEntry>> {
        self.client
            .get(
                Service::Food,
                &format!("/food-entries/resident/{resident_id}"),
            )
            .await
    }

    pub async fn create(&self, draft: &FoodEntryDraft) -> ApiResult<FoodEntry> {
        self.client
            .post(Service::Food, "/food-entries", draft)
            .await
    }

    pub async fn update(&self, id: &str, changes: &FoodEntryUpdate) -> ApiResult<FoodEntry> {
        self.client
            .put(
                Service::Food,
                &format!("/food-entries/{}", segment(id)),
                changes,
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client
            .delete(Service::Food, &format!("/food-entries/{}", segment(id)))
            .await
    }
}
