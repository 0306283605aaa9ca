//! Users service: doctors, carers and family members

use super::client::{ApiClient, Service};
use super::error::ApiResult;
use crate::models::{Carer, CarerRequest, Doctor, DoctorRequest, FamilyMember, FamilyMemberRequest};

#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    // Doctors

    pub async fn list_doctors(&self) -> ApiResult<Vec<Doctor>> {
        self.client.get(Service::Users, "/doctors").await
    }

    pub async fn get_doctor(&self, id: i64) -> ApiResult<Doctor> {
        self.client
            .get(Service::Users, &format!("/doctors/{id}"))
            .await
    }

    pub async fn create_doctor(&self, request: &DoctorRequest) -> ApiResult<Doctor> {
        self.client.post(Service::Users, "/doctors", request).await
    }

    pub async fn update_doctor(&self, id: i64, request: &DoctorRequest) -> ApiResult<Doctor> {
        self.client
            .put(Service::Users, &format!("/doctors/{id}"), request)
            .await
    }

    pub async fn delete_doctor(&self, id: i64) -> ApiResult<()> {
        self.client
            .delete(Service::Users, &format!("/doctors/{id}"))
            .await
    }

    // Carers

    pub async fn list_carers(&self) -> ApiResult<Vec<Carer>> {
        self.client.get(Service::Users, "/carers").await
    }

    pub async fn get_carer(&self, id: i64) -> ApiResult<Carer> {
        self.client
            .get(Service::Users, &format!("/carers/{id}"))
            .await
    }

    pub async fn create_carer(&self, request: &CarerRequest) -> ApiResult<Carer> {
        self.client.post(Service::Users, "/carers", request).await
    }

    pub async fn update_carer(&self, id: i64, request: &CarerRequest) -> ApiResult<Carer> {
        self.client
            .put(Service::Users, &format!("/carers/{id}"), request)
            .await
    }

    pub async fn delete_carer(&self, id: i64) -> ApiResult<()> {
        self.client
            .delete(Service::Users, &format!("/carers/{id}"))
            .await
    }

    // Family members

    pub async fn list_family_members(&self) -> ApiResult<Vec<FamilyMember>> {
        self.client.get(Service::Users, "/family-members").await
    }

    pub async fn get_family_member(&self, id: i64) -> ApiResult<FamilyMember> {
        self.client
            .get(Service::Users, &format!("/family-members/{id}"))
            .await
    }

    pub async fn create_family_member(
        &self,
        request: &FamilyMemberRequest,
    ) -> ApiResult<FamilyMember> {
        self.client
            .post(Service::Users, "/family-members", request)
            .await
    }

    pub async fn update_family_member(
        &self,
        id: i64,
        request: &FamilyMemberRequest,
    ) -> ApiResult<FamilyMember> {
        self.client
            .put(Service::Users, &format!("/family-members/{id}"), request)
            .await
    }

    pub async fn delete_family_member(&self, id: i64) -> ApiResult<()> {
        self.client
            .delete(Service::Users, &format!("/family-members/{id}"))
            .await
    }
}
