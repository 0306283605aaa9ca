//! Notification types
//!
//! One record shape serves both the notifications service and the local
//! notification cache: the service fills `message`/`userId`, locally created
//! notices fill `title`/`description`/`type`/`sender`/`recipientId`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    #[serde(alias = "UNREAD")]
    Unread,
    #[serde(alias = "READ")]
    Read,
    #[serde(alias = "ARCHIVED")]
    Archived,
    /// Any status this client does not know; treated as unread
    #[serde(other)]
    Other,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Unread => "unread",
            NotificationStatus::Read => "read",
            NotificationStatus::Archived => "archived",
            NotificationStatus::Other => "other",
        }
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unread" => Ok(NotificationStatus::Unread),
            "read" => Ok(NotificationStatus::Read),
            "archived" => Ok(NotificationStatus::Archived),
            other => Err(format!(
                "unknown notification status '{other}' (expected unread, read or archived)"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[serde(alias = "INFO")]
    Info,
    #[serde(alias = "WARNING")]
    Warning,
    #[serde(alias = "URGENT")]
    Urgent,
    #[serde(alias = "SUCCESS")]
    Success,
    #[serde(other)]
    Other,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Urgent => "urgent",
            NotificationKind::Success => "success",
            NotificationKind::Other => "other",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(NotificationKind::Info),
            "warning" => Ok(NotificationKind::Warning),
            "urgent" => Ok(NotificationKind::Urgent),
            "success" => Ok(NotificationKind::Success),
            other => Err(format!(
                "unknown notification type '{other}' (expected info, warning, urgent or success)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default, deserialize_with = "super::string_or_number")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NotificationKind>,
    #[serde(
        default,
        deserialize_with = "super::string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default)]
    pub status: Option<NotificationStatus>,
    /// Older cached records carried a boolean instead of `status`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Notification {
    /// Status, derived from the legacy `read` flag when absent
    pub fn effective_status(&self) -> NotificationStatus {
        match (self.status, self.read) {
            (Some(NotificationStatus::Other), _) => NotificationStatus::Unread,
            (Some(status), _) => status,
            (None, Some(true)) => NotificationStatus::Read,
            (None, _) => NotificationStatus::Unread,
        }
    }

    pub fn is_unread(&self) -> bool {
        self.effective_status() == NotificationStatus::Unread
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Best single-line summary: title, then message, then description
    pub fn headline(&self) -> &str {
        self.title
            .as_deref()
            .or(self.message.as_deref())
            .or(self.description.as_deref())
            .unwrap_or("")
    }

    pub(crate) fn matches_text(&self, needle_lower: &str) -> bool {
        [&self.title, &self.description, &self.message]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(needle_lower))
    }
}

/// Fields supplied when creating a notification; id, status and timestamp are assigned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<NotificationKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl NotificationDraft {
    pub fn into_notification(self, id: String, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id: Some(id),
            title: self.title,
            description: self.description,
            message: self.message,
            kind: self.kind,
            user_id: self.user_id,
            recipient_id: self.recipient_id,
            sender: self.sender,
            status: Some(NotificationStatus::Unread),
            read: None,
            created_at: Some(created_at.to_rfc3339()),
        }
    }
}
