//! Appointments service

use super::client::{ApiClient, Service};
use super::error::ApiResult;
use crate::models::{Appointment, AppointmentRequest};

#[derive(Debug, Clone)]
pub struct AppointmentsApi {
    client: ApiClient,
}

impl AppointmentsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Appointment>> {
        self.client.get(Service::Appointments, "/appointments").await
    }

    pub async fn get(&self, id: i64) -> ApiResult<Appointment> {
        self.client
            .get(Service::Appointments, &format!("/appointments/{id}"))
            .await
    }

    pub async fn create(&self, request: &AppointmentRequest) -> ApiResult<Appointment> {
        self.client
            .post(Service::Appointments, "/appointments", request)
            .await
    }

    pub async fn update(&self, id: i64, request: &AppointmentRequest) -> ApiResult<Appointment> {
        self.client
            .put(Service::Appointments, &format!("/appointments/{id}"), request)
            .await
    }

    /// Read the appointment, change only its status and write it back
    pub async fn set_status(&self, id: i64, status: &str) -> ApiResult<Appointment> {
        let current = self.get(id).await?;
        tracing::debug!(id, from = ?current.status, to = status, "Changing appointment status");
        self.update(id, &current.with_status(status)).await
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.client
            .delete(Service::Appointments, &format!("/appointments/{id}"))
            .await
    }

    pub async fn search_by_resident(&self, resident_id: i64) -> ApiResult<Vec<Appointment>> {
        self.client
            .get_with_query(
                Service::Appointments,
                "/appointments/searchByResidentId",
                &[("residentId", resident_id)],
            )
            .await
    }

    pub async fn search_by_doctor(&self, doctor_id: i64) -> ApiResult<Vec<Appointment>> {
        self.client
            .get_with_query(
                Service::Appointments,
                "/appointments/searchByDoctorId",
                &[("doctorId", doctor_id)],
            )
            .await
    }
}
