//! Microservice health probe
//!
//! Hits one cheap endpoint per service concurrently and reports each outcome
//! independently; a failing service never hides the others.

use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;

use super::client::{ApiClient, Service};

/// Probe target for each service
const PROBES: [(&str, Service, &str); 8] = [
    ("IAM", Service::Iam, "/authentication/health"),
    ("Residents", Service::Residents, "/residents"),
    ("Payments", Service::Payments, "/receipts"),
    ("Users (family members)", Service::Users, "/family-members"),
    ("Users (doctors)", Service::Users, "/doctors"),
    ("Notifications", Service::Notifications, "/notifications"),
    ("Appointments", Service::Appointments, "/appointments"),
    ("Food", Service::Food, "/food-entries"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum HealthStatus {
    /// Responded with success; `items` is set when the body was a list
    Ok { items: Option<usize> },
    Failed { status: Option<u16>, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceHealth {
    pub name: &'static str,
    pub service: String,
    pub url: String,
    pub status: HealthStatus,
}

impl ServiceHealth {
    pub fn is_ok(&self) -> bool {
        matches!(self.status, HealthStatus::Ok { .. })
    }
}

/// Probe every service and collect all outcomes
pub async fn probe_all(client: &ApiClient) -> Vec<ServiceHealth> {
    let results = join_all(
        PROBES
            .iter()
            .map(|&(name, service, path)| probe(client, name, service, path)),
    )
    .await;

    let failed = results.iter().filter(|r| !r.is_ok()).count();
    tracing::info!(total = results.len(), failed, "Health probe finished");
    results
}

async fn probe(
    client: &ApiClient,
    name: &'static str,
    service: Service,
    path: &str,
) -> ServiceHealth {
    let status = match client.get::<Value>(service, path).await {
        Ok(Value::Array(items)) => HealthStatus::Ok {
            items: Some(items.len()),
        },
        Ok(_) => HealthStatus::Ok { items: None },
        Err(err) => HealthStatus::Failed {
            status: err.status,
            message: err.message,
        },
    };

    ServiceHealth {
        name,
        service: service.name().to_string(),
        url: client.url(service, path),
        status,
    }
}
