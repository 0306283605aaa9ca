//! Resource Models
//!
//! Request and response types for every microservice the client talks to.
//! Field names follow the backend's camelCase JSON and nearly every field is
//! optional because the backend contracts are loosely enforced.

mod appointments;
mod food;
mod iam;
mod notifications;
mod payments;
mod residents;
mod users;

pub use appointments::{Appointment, AppointmentRequest, LocalTime};
pub use food::{FoodEntry, FoodEntryDraft, FoodEntryUpdate, MealType};
pub use iam::{AuthenticatedUser, IamRole, IamUser, SignInRequest, SignUpRequest};
pub use notifications::{Notification, NotificationDraft, NotificationKind, NotificationStatus};
pub use payments::{
    PaymentRequest, PaymentRequestDraft, PaymentRequestStatus, PaymentRequestUpdate, Receipt,
    ReceiptRequest,
};
pub use residents::{Resident, ResidentDetails, ResidentRequest};
pub use users::{Carer, CarerRequest, Doctor, DoctorRequest, FamilyMember, FamilyMemberRequest};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// A person's name split into parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl FullName {
    /// Split a single free-text name into first name and the remainder.
    ///
    /// `"Ana María López"` becomes first `Ana`, last `María López`.
    pub fn split(name: &str) -> Self {
        let name = name.trim();
        match name.split_once(char::is_whitespace) {
            Some((first, rest)) => Self {
                first_name: Some(first.to_string()),
                last_name: Some(rest.trim().to_string()),
            },
            None if name.is_empty() => Self::default(),
            None => Self {
                first_name: Some(name.to_string()),
                last_name: None,
            },
        }
    }

    /// Joined display form, empty parts skipped
    pub fn display(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Postal address
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.zip_code,
            &self.country,
        ]
        .iter()
        .all(|part| part.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

/// Phone and postal contact details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Parse the date part of a backend date or date-time string.
///
/// Accepts `2025-11-20`, `2025-11-20T10:00:00` and RFC 3339 values.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Treat blank strings as absent
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Backend ids arrive as numbers, locally generated ones as strings
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(text) => text,
        Id::Number(n) => n.to_string(),
    }))
}

pub(crate) fn string_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_or_number(deserializer)?.unwrap_or_default())
}
