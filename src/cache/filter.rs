//! Notification list filtering

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::{Notification, NotificationKind, NotificationStatus};

/// Which statuses a filter lets through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// Everything, archived included
    All,
    /// Everything except archived
    #[default]
    Active,
    Only(NotificationStatus),
}

impl StatusFilter {
    pub fn accepts(&self, status: NotificationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status != NotificationStatus::Archived,
            StatusFilter::Only(wanted) => status == *wanted,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            other => other.parse().map(StatusFilter::Only),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationFilter {
    pub status: StatusFilter,
    pub kind: Option<NotificationKind>,
    pub recipient: Option<String>,
    pub text: Option<String>,
}

impl NotificationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn kind(mut self, kind: NotificationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.text = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Whether one notification passes every criterion
    pub fn matches(&self, n: &Notification) -> bool {
        if !self.status.accepts(n.effective_status()) {
            return false;
        }
        if self.kind.is_some() && n.kind != self.kind {
            return false;
        }
        if let Some(recipient) = &self.recipient {
            let addressed = n.recipient_id.as_deref().or(n.user_id.as_deref());
            if addressed != Some(recipient.as_str()) {
                return false;
            }
        }
        match &self.text {
            Some(text) => n.matches_text(&text.trim().to_lowercase()),
            None => true,
        }
    }

    /// Matching notifications, newest first
    pub fn apply(&self, items: &[Notification]) -> Vec<Notification> {
        let mut matched: Vec<Notification> = items
            .iter()
            .filter(|n| self.matches(n))
            .cloned()
            .collect();
        super::sort_newest_first(&mut matched);
        matched
    }
}
