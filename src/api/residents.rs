//! Residents service

use super::client::{ApiClient, Service};
use super::error::ApiResult;
use crate::models::{Resident, ResidentDetails, ResidentRequest};

#[derive(Debug, Clone)]
pub struct ResidentsApi {
    client: ApiClient,
}

impl ResidentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Resident>> {
        self.client.get(Service::Residents, "/residents").await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Resident> {
        self.client
            .get(Service::Residents, &format!("/residents/{id}"))
            .await
    }

    pub async fn details(&self, id: i64) -> ApiResult<ResidentDetails> {
        self.client
            .get(Service::Residents, &format!("/residents/{id}/details"))
            .await
    }

    pub async fn create(&self, request: &ResidentRequest) -> ApiResult<Resident> {
        self.client
            .post(Service::Residents, "/residents", request)
            .await
    }

    pub async fn update(&self, id: i64, request: &ResidentRequest) -> ApiResult<Resident> {
        self.client
            .put(Service::Residents, &format!("/residents/{id}"), request)
            .await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client
            .delete(Service::Residents, &format!("/residents/{id}"))
            .await
    }

    /// `GET /residents/searchByDni?dni=…`
    pub async fn search_by_dni(&self, dni: &str) -> ApiResult<Resident> {
        self.client
            .get_with_query(Service::Residents, "/residents/searchByDni", &[("dni", dni)])
            .await
    }
}
