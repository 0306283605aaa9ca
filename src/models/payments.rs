//! Payments service types

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{NotificationDraft, NotificationKind};

/// A billing record. `status == Some(true)` means paid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    #[serde(default)]
    pub receipt_id: Option<i64>,
    #[serde(default)]
    pub issue_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub resident_id: Option<i64>,
    #[serde(default)]
    pub payment_id: Option<i64>,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub amount_paid: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl Receipt {
    pub fn is_paid(&self) -> bool {
        self.status.unwrap_or(false)
    }

    /// Outstanding amount, never negative
    pub fn balance(&self) -> f64 {
        (self.total_amount.unwrap_or(0.0) - self.amount_paid.unwrap_or(0.0)).max(0.0)
    }
}

/// Body for `POST /receipts` and `PUT /receipts/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<i64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentRequestStatus {
    Pending,
    Due,
    Paid,
    #[serde(other)]
    Other,
}

impl PaymentRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRequestStatus::Pending => "pending",
            PaymentRequestStatus::Due => "due",
            PaymentRequestStatus::Paid => "paid",
            PaymentRequestStatus::Other => "other",
        }
    }
}

impl fmt::Display for PaymentRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A carer's request for payment addressed to a family member.
///
/// Lives only in the local store; `amount` is display text such as
/// `S/. 1,200.00`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    #[serde(default, deserialize_with = "super::string_id")]
    pub id: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub concept: String,
    #[serde(default)]
    pub amount: String,
    pub status: PaymentRequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Display name of the requesting carer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_url: Option<String>,
}

impl PaymentRequest {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentRequestStatus::Paid
    }

    /// Notice sent to the family member asked to pay
    pub fn notice(&self) -> NotificationDraft {
        let requester = self.requester.as_deref().unwrap_or("Carer");
        NotificationDraft {
            title: Some("New payment request".to_string()),
            description: Some(format!(
                "{requester} requests {} for {} ({})",
                self.amount, self.concept, self.period
            )),
            kind: Some(NotificationKind::Info),
            sender: Some(requester.to_string()),
            recipient_id: self.payer_id.clone(),
            ..NotificationDraft::default()
        }
    }
}

/// Fields supplied by the carer; id, status and timestamp are assigned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestDraft {
    pub period: String,
    pub concept: String,
    pub amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requester_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payer_id: Option<String>,
}

impl PaymentRequestDraft {
    pub fn into_request(self, id: String, created_at: String) -> PaymentRequest {
        PaymentRequest {
            id,
            period: self.period,
            concept: self.concept,
            amount: self.amount,
            status: PaymentRequestStatus::Pending,
            created_at: Some(created_at),
            requester: self.requester,
            requester_id: self.requester_id,
            payer: None,
            payer_id: self.payer_id,
            receipt_url: None,
        }
    }
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentRequestStatus>,
}

impl PaymentRequestUpdate {
    pub fn apply_to(&self, request: &mut PaymentRequest) {
        if let Some(period) = &self.period {
            request.period = period.clone();
        }
        if let Some(concept) = &self.concept {
            request.concept = concept.clone();
        }
        if let Some(amount) = &self.amount {
            request.amount = amount.clone();
        }
        if let Some(status) = self.status {
            request.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_type_field_renamed() {
        let receipt: Receipt =
            serde_json::from_str(r#"{"receiptId": 1, "type": "MONTHLY", "status": false}"#)
                .unwrap();
        assert_eq!(receipt.kind.as_deref(), Some("MONTHLY"));
        assert!(!receipt.is_paid());
    }

    #[test]
    fn test_balance() {
        let receipt = Receipt {
            total_amount: Some(1200.0),
            amount_paid: Some(200.0),
            ..Receipt::default()
        };
        assert!((receipt.balance() - 1000.0).abs() < f64::EPSILON);

        let overpaid = Receipt {
            total_amount: Some(100.0),
            amount_paid: Some(150.0),
            ..Receipt::default()
        };
        assert_eq!(overpaid.balance(), 0.0);
    }

    #[test]
    fn test_payment_request_notice() {
        let request = PaymentRequestDraft {
            period: "Nov, 2025".into(),
            concept: "Monthly care".into(),
            amount: "S/. 1,200.00".into(),
            requester: Some("Carer A".into()),
            requester_id: Some("2".into()),
            payer_id: Some("1".into()),
        }
        .into_request("pay_1".into(), "2025-11-01T09:00:00Z".into());
        assert_eq!(request.status, PaymentRequestStatus::Pending);

        let notice = request.notice();
        assert_eq!(notice.recipient_id.as_deref(), Some("1"));
        assert_eq!(notice.sender.as_deref(), Some("Carer A"));
        assert_eq!(
            notice.description.as_deref(),
            Some("Carer A requests S/. 1,200.00 for Monthly care (Nov, 2025)")
        );
    }

    #[test]
    fn test_unknown_request_status_still_decodes() {
        let request: PaymentRequest =
            serde_json::from_str(r#"{"id": "pay_2", "status": "refunded"}"#).unwrap();
        assert_eq!(request.status, PaymentRequestStatus::Other);
        assert!(!request.is_paid());
    }
}
