//! # Carehub
//!
//! Care-facility coordination client - a typed client for the platform's REST
//! microservices and the `carehub` command line built on it.
//!
//! ## Features
//!
//! - **Typed service wrappers**: residents, appointments, payments,
//!   notifications, food entries and users, behind one bearer-token client
//! - **Role-aware sessions**: family members, carers, doctors and developers
//!   each land on their own home and dashboard
//! - **Local caches**: notifications, the food log and resident profiles kept
//!   in a small JSON store next to the session
//! - **Client-side validation**: every form is checked before anything is sent
//!
//! ## Modules
//!
//! - [`api`]: HTTP client and per-service wrappers
//! - [`models`]: request and response bodies
//! - [`storage`]: local key-value store and the session kept in it
//! - [`cache`]: notification, food and resident-profile caches
//! - [`validation`]: field rules and form models
//! - [`routing`]: roles, routes and guards
//! - [`workflows`]: login, registration and dashboards
//! - [`output`]: table, JSON and CSV rendering
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use carehub::{workflows, ApiClient, Config, LocalStore, LoginForm, Session};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let store = Arc::new(LocalStore::open(config.storage.resolved_dir())?);
//!     let session = Session::new(store.clone());
//!     let client = ApiClient::new(&config.api, store)?;
//!
//!     let form = LoginForm {
//!         email: "ana@mail.com".into(),
//!         password: "secret1".into(),
//!     };
//!     let outcome = workflows::login(&client, &session, &form).await?;
//!     println!("Signed in as {} ({})", outcome.user.name, outcome.user.role);
//!
//!     let today = chrono::Local::now().date_naive();
//!     let dashboard = workflows::family_dashboard(&client, &outcome.user, today).await?;
//!     println!("{} upcoming appointments", dashboard.upcoming_appointments.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod logging;
pub mod models;
pub mod output;
pub mod routing;
pub mod storage;
pub mod validation;
pub mod workflows;

// Re-export top-level types for convenience
pub use api::{ApiClient, ApiError, ApiResult, HealthStatus, ServiceHealth, TokenSource};

pub use cache::{FoodLog, NotificationCache, NotificationFilter, ResidentProfiles, StatusFilter};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig, StorageConfig};

pub use routing::{home_for, Access, Role, Route};

pub use storage::{CurrentUser, LocalStore, Session, StoreError, StoreResult};

pub use validation::{LoginForm, RegisterForm, ValidationErrors};

pub use workflows::{WorkflowError, WorkflowResult};

pub use output::{OutputFormat, Tabular};
