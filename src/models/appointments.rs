//! Appointments service types

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Time of day as the appointments service models it.
///
/// Deserializes from either the object form (`{"hour": 9, "minute": 30}`) or
/// the string form (`"09:30:00"`); always serializes as the object form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LocalTimeRepr")]
pub struct LocalTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minute: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nano: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocalTimeRepr {
    Text(String),
    Parts {
        #[serde(default)]
        hour: Option<u32>,
        #[serde(default)]
        minute: Option<u32>,
        #[serde(default)]
        second: Option<u32>,
        #[serde(default)]
        nano: Option<u32>,
    },
}

impl From<LocalTimeRepr> for LocalTime {
    fn from(repr: LocalTimeRepr) -> Self {
        match repr {
            LocalTimeRepr::Text(text) => Self::parse(&text).unwrap_or_default(),
            LocalTimeRepr::Parts {
                hour,
                minute,
                second,
                nano,
            } => Self {
                hour,
                minute,
                second,
                nano,
            },
        }
    }
}

impl LocalTime {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self {
            hour: Some(hour),
            minute: Some(minute),
            second: Some(0),
            nano: Some(0),
        }
    }

    /// Parse `HH:mm` or `HH:mm:ss`
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let time = NaiveTime::parse_from_str(value, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
            .ok()?;
        Some(Self {
            hour: Some(time.hour()),
            minute: Some(time.minute()),
            second: Some(time.second()),
            nano: Some(0),
        })
    }

    pub fn to_naive(&self) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(
            self.hour?,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
        )
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}",
            self.hour.unwrap_or(0),
            self.minute.unwrap_or(0)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub resident_id: Option<i64>,
    #[serde(default)]
    pub doctor_id: Option<i64>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<LocalTime>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Appointment {
    /// Status a doctor sets when accepting a request
    pub const ACCEPTED: &'static str = "accepted";
    pub const REJECTED: &'static str = "rejected";

    pub fn date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(super::parse_date)
    }

    /// `HH:MM`, `00:00` when the backend sent no time
    pub fn time_label(&self) -> String {
        self.time.unwrap_or_default().to_string()
    }

    /// Same appointment as an update body, with a new status
    pub fn with_status(&self, status: &str) -> AppointmentRequest {
        AppointmentRequest {
            resident_id: self.resident_id,
            doctor_id: self.doctor_id,
            date: self.date.clone(),
            time: self.time,
            status: Some(status.to_string()),
        }
    }
}

/// Body for `POST /appointments` and `PUT /appointments/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<LocalTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_time_accepts_both_shapes() {
        let from_object: LocalTime = serde_json::from_str(r#"{"hour": 9, "minute": 5}"#).unwrap();
        assert_eq!(from_object.to_string(), "09:05");

        let from_text: LocalTime = serde_json::from_str(r#""14:30:00""#).unwrap();
        assert_eq!(from_text.hour, Some(14));
        assert_eq!(from_text.minute, Some(30));
    }

    #[test]
    fn test_local_time_serializes_as_object() {
        let json = serde_json::to_value(LocalTime::new(8, 0)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"hour": 8, "minute": 0, "second": 0, "nano": 0})
        );
    }

    #[test]
    fn test_time_label_defaults() {
        let appointment = Appointment::default();
        assert_eq!(appointment.time_label(), "00:00");
        assert!(appointment.date().is_none());
    }

    #[test]
    fn test_with_status_keeps_other_fields() {
        let appointment = Appointment {
            id: Some(4),
            resident_id: Some(5),
            doctor_id: Some(2),
            date: Some("2024-06-10".into()),
            time: Some(LocalTime::new(9, 30)),
            status: Some("SCHEDULED".into()),
        };
        let request = appointment.with_status(Appointment::REJECTED);
        assert_eq!(request.resident_id, Some(5));
        assert_eq!(request.time, Some(LocalTime::new(9, 30)));
        assert_eq!(request.status.as_deref(), Some("rejected"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(LocalTime::parse("25:99").is_none());
        assert!(LocalTime::parse("noon").is_none());
        assert_eq!(LocalTime::parse("07:45").map(|t| t.to_string()).as_deref(), Some("07:45"));
    }
}
