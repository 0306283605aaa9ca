//! Multi-step flows behind the main screens
//!
//! - **login**: sign in, resolve the role, persist the session
//! - **registration**: IAM account plus the role's profile records
//! - **dashboard**: per-role fan-out of service calls joined into one view

mod dashboard;
mod login;
mod registration;

pub use dashboard::{
    build_carer, build_doctor, build_developer, build_family, carer_dashboard, developer_dashboard,
    doctor_dashboard, family_dashboard, CarerDashboard, DeveloperDashboard, DoctorDashboard,
    FamilyDashboard, PatientSummary, UPCOMING_LIMIT,
};
pub use login::{login, LoginOutcome};
pub use registration::{
    login_redirect, register, RegistrationFailure, RegistrationOutcome, RegistrationStep,
};

use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StoreError;
use crate::validation::ValidationErrors;

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// The form was rejected before anything was sent
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Local storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Sign-in response did not include a token")]
    MissingToken,

    #[error("Account {0} has no role this client supports")]
    UnknownRole(String),

    #[error("{0}")]
    Registration(Box<RegistrationFailure>),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
