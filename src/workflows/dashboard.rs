//! Role dashboards
//!
//! Each dashboard issues its independent requests concurrently and renders
//! only once every branch has answered; the first failing branch fails the
//! whole view. The `build_*` functions do the shaping and take `today`
//! explicitly.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use super::WorkflowResult;
use crate::api::{health, ApiClient, ServiceHealth};
use crate::cache::unread_count;
use crate::models::{Appointment, Notification, Receipt, Resident};
use crate::storage::CurrentUser;

/// Appointments shown on the family dashboard
pub const UPCOMING_LIMIT: usize = 3;

fn is_cancelled(appointment: &Appointment) -> bool {
    appointment
        .status
        .as_deref()
        .is_some_and(|s| s.to_ascii_uppercase().starts_with("CANCEL"))
}

/// Chronological order; undated appointments last
fn sort_chronologically(appointments: &mut [Appointment]) {
    appointments.sort_by_key(|a| {
        (
            a.date().is_none(),
            a.date(),
            a.time.and_then(|t| t.to_naive()),
        )
    });
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyDashboard {
    pub upcoming_appointments: Vec<Appointment>,
    pub notification_count: usize,
    pub unread_notifications: usize,
    pub pending_payments: usize,
    pub pending_amount: f64,
}

pub fn build_family(
    appointments: Vec<Appointment>,
    notifications: &[Notification],
    receipts: &[Receipt],
    today: NaiveDate,
) -> FamilyDashboard {
    let mut upcoming: Vec<Appointment> = appointments
        .into_iter()
        .filter(|a| !is_cancelled(a) && a.date().is_some_and(|d| d >= today))
        .collect();
    sort_chronologically(&mut upcoming);
    upcoming.truncate(UPCOMING_LIMIT);

    let pending: Vec<&Receipt> = receipts.iter().filter(|r| !r.is_paid()).collect();

    FamilyDashboard {
        upcoming_appointments: upcoming,
        notification_count: notifications.len(),
        unread_notifications: unread_count(notifications),
        pending_payments: pending.len(),
        pending_amount: pending.iter().map(|r| r.balance()).sum(),
    }
}

/// Family dashboard, scoped to the linked resident when known
pub async fn family_dashboard(
    client: &ApiClient,
    user: &CurrentUser,
    today: NaiveDate,
) -> WorkflowResult<FamilyDashboard> {
    let appointments_api = client.appointments();
    let notifications_api = client.notifications();
    let payments_api = client.payments();
    let user_id = user.id.to_string();

    let appointments = async {
        match user.linked_resident_id {
            Some(id) => appointments_api.search_by_resident(id).await,
            None => appointments_api.list().await,
        }
    };
    let receipts = async {
        match user.linked_resident_id {
            Some(id) => payments_api.by_resident(id).await,
            None => payments_api.list().await,
        }
    };

    let (appointments, notifications, receipts) = tokio::try_join!(
        appointments,
        notifications_api.for_user(&user_id),
        receipts
    )?;

    tracing::debug!(
        appointments = appointments.len(),
        notifications = notifications.len(),
        receipts = receipts.len(),
        "Family dashboard loaded"
    );
    Ok(build_family(appointments, &notifications, &receipts, today))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSummary {
    pub resident_id: Option<i64>,
    pub name: String,
    pub dni: Option<String>,
    /// Most recent appointment on or before today
    pub last_check: Option<NaiveDate>,
    /// Earliest appointment after today
    pub next_appointment: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarerDashboard {
    pub patients: Vec<PatientSummary>,
    pub appointments_today: usize,
}

pub fn build_carer(
    residents: &[Resident],
    appointments: &[Appointment],
    today: NaiveDate,
) -> CarerDashboard {
    let mut by_resident: HashMap<i64, Vec<NaiveDate>> = HashMap::new();
    for appointment in appointments.iter().filter(|a| !is_cancelled(a)) {
        if let (Some(resident), Some(date)) = (appointment.resident_id, appointment.date()) {
            by_resident.entry(resident).or_default().push(date);
        }
    }

    let patients = residents
        .iter()
        .map(|r| {
            let dates = r.id.and_then(|id| by_resident.get(&id));
            let dates = dates.map(Vec::as_slice).unwrap_or_default();
            PatientSummary {
                resident_id: r.id,
                name: r.full_name(),
                dni: r.dni.clone(),
                last_check: dates.iter().filter(|d| **d <= today).max().copied(),
                next_appointment: dates.iter().filter(|d| **d > today).min().copied(),
            }
        })
        .collect();

    CarerDashboard {
        patients,
        appointments_today: appointments
            .iter()
            .filter(|a| !is_cancelled(a) && a.date() == Some(today))
            .count(),
    }
}

pub async fn carer_dashboard(client: &ApiClient, today: NaiveDate) -> WorkflowResult<CarerDashboard> {
    let residents_api = client.residents();
    let appointments_api = client.appointments();
    let (residents, appointments) =
        tokio::try_join!(residents_api.list(), appointments_api.list())?;

    tracing::debug!(
        residents = residents.len(),
        appointments = appointments.len(),
        "Carer dashboard loaded"
    );
    Ok(build_carer(&residents, &appointments, today))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDashboard {
    pub appointments: Vec<Appointment>,
    pub today: usize,
    pub upcoming: usize,
}

pub fn build_doctor(mut appointments: Vec<Appointment>, today: NaiveDate) -> DoctorDashboard {
    sort_chronologically(&mut appointments);
    let active = || appointments.iter().filter(|a| !is_cancelled(a));
    DoctorDashboard {
        today: active().filter(|a| a.date() == Some(today)).count(),
        upcoming: active()
            .filter(|a| a.date().is_some_and(|d| d > today))
            .count(),
        appointments,
    }
}

pub async fn doctor_dashboard(
    client: &ApiClient,
    doctor_id: i64,
    today: NaiveDate,
) -> WorkflowResult<DoctorDashboard> {
    let appointments = client.appointments().search_by_doctor(doctor_id).await?;
    Ok(build_doctor(appointments, today))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperDashboard {
    pub services: Vec<ServiceHealth>,
    pub healthy: usize,
    pub failed: usize,
}

pub fn build_developer(services: Vec<ServiceHealth>) -> DeveloperDashboard {
    let healthy = services.iter().filter(|s| s.is_ok()).count();
    DeveloperDashboard {
        failed: services.len() - healthy,
        healthy,
        services,
    }
}

/// Never fails; unreachable services are reported, not raised
pub async fn developer_dashboard(client: &ApiClient) -> DeveloperDashboard {
    build_developer(health::probe_all(client).await)
}
