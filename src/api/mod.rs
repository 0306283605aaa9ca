//! Microservice API wrappers
//!
//! Thin typed proxies over the platform's REST services. Each wrapper builds
//! the URL, lets [`ApiClient`] attach the bearer token, maps the DTO and
//! normalizes failures into [`ApiError`].
//!
//! # Endpoints
//!
//! ## IAM
//! - `POST /authentication/sign-in`, `POST /authentication/sign-up`
//! - `GET /users`, `GET /roles`
//!
//! ## Residents
//! - `GET|POST /residents`, `GET|PUT|DELETE /residents/{id}`
//! - `GET /residents/{id}/details`, `GET /residents/searchByDni?dni=`
//!
//! ## Appointments
//! - `GET|POST /appointments`, `GET|PUT|DELETE /appointments/{id}`
//! - `GET /appointments/searchByResidentId`, `GET /appointments/searchByDoctorId`
//!
//! ## Payments
//! - `GET|POST /receipts`, `GET|PUT|DELETE /receipts/{id}`, `GET /receipts/resident/{id}`
//!
//! ## Notifications
//! - `GET|POST /notifications`, `GET /notifications/notifications/{userId}`
//! - `GET /notifications/search?status=`, `DELETE /notifications/{id}`
//! - `POST /notifications/{id}/mark-as-read|archive|unarchive`
//!
//! ## Food
//! - `GET|POST /food-entries`, `GET|PUT|DELETE /food-entries/{id}`, `GET /food-entries/resident/{id}`
//!
//! ## Users
//! - `/doctors`, `/carers`, `/family-members`, each with full CRUD
//!
//! # Example
//!
//! ```rust,no_run
//! use carehub::api::{ApiClient, StaticToken};
//! use carehub::config::ApiConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tokens = Arc::new(StaticToken(Some("token".into())));
//!     let client = ApiClient::new(&ApiConfig::default(), tokens)?;
//!
//!     for resident in client.residents().list().await? {
//!         println!("{}", resident.full_name());
//!     }
//!     Ok(())
//! }
//! ```

mod appointments;
mod client;
mod error;
mod food;
pub mod health;
mod iam;
mod notifications;
mod payments;
mod residents;
mod users;

pub use appointments::AppointmentsApi;
pub use client::{segment, ApiClient, Endpoints, Service, StaticToken, TokenSource};
pub use error::{ApiError, ApiResult};
pub use food::FoodApi;
pub use health::{HealthStatus, ServiceHealth};
pub use iam::IamApi;
pub use notifications::NotificationsApi;
pub use payments::PaymentsApi;
pub use residents::ResidentsApi;
pub use users::UsersApi;

impl ApiClient {
    pub fn iam(&self) -> IamApi {
        IamApi::new(self.clone())
    }

    pub fn residents(&self) -> ResidentsApi {
        ResidentsApi::new(self.clone())
    }

    pub fn appointments(&self) -> AppointmentsApi {
        AppointmentsApi::new(self.clone())
    }

    pub fn payments(&self) -> PaymentsApi {
        PaymentsApi::new(self.clone())
    }

    pub fn notifications(&self) -> NotificationsApi {
        NotificationsApi::new(self.clone())
    }

    pub fn food(&self) -> FoodApi {
        FoodApi::new(self.clone())
    }

    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }
}
