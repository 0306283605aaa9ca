//! Registration flow
//!
//! Creating an account touches several services in sequence: the IAM account
//! first, then the role's profile records. A failure part-way leaves whatever
//! was already created in place; the error names the completed steps and the
//! account id so the orphan can be cleaned up by hand.

use serde::Serialize;
use std::fmt;

use super::{WorkflowError, WorkflowResult};
use crate::api::ApiClient;
use crate::cache::{ProfileSeed, ResidentProfiles};
use crate::models::{non_empty, SignUpRequest};
use crate::routing::{Role, LOGIN};
use crate::storage::Session;
use crate::validation::RegisterForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegistrationStep {
    SignUp,
    SignIn,
    CreateResident,
    LinkFamilyMember,
    CreateDoctor,
    CreateCarer,
    StoreProfile,
}

impl RegistrationStep {
    pub fn describe(&self) -> &'static str {
        match self {
            RegistrationStep::SignUp => "creating the account",
            RegistrationStep::SignIn => "signing in",
            RegistrationStep::CreateResident => "creating the resident",
            RegistrationStep::LinkFamilyMember => "linking the family member",
            RegistrationStep::CreateDoctor => "creating the doctor profile",
            RegistrationStep::CreateCarer => "creating the carer profile",
            RegistrationStep::StoreProfile => "saving the resident profile",
        }
    }
}

impl fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    pub user_id: Option<i64>,
    pub role: Role,
    pub completed: Vec<RegistrationStep>,
    pub resident_id: Option<i64>,
    /// Login page with the new account's email prefilled
    pub redirect: String,
}

/// A registration that stopped part-way
#[derive(Debug)]
pub struct RegistrationFailure {
    pub failed: RegistrationStep,
    pub completed: Vec<RegistrationStep>,
    /// IAM account left behind, if it was created
    pub orphaned_user_id: Option<i64>,
    pub source: WorkflowError,
}

impl fmt::Display for RegistrationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Registration failed while {}: {}", self.failed, self.source)?;
        if let Some(id) = self.orphaned_user_id {
            write!(f, " (account {id} was created and must be removed manually)")?;
        }
        Ok(())
    }
}

/// Redirect target after a successful registration
pub fn login_redirect(email: &str) -> String {
    format!(
        "{LOGIN}?registered=true&email={}",
        urlencoding::encode(email.trim())
    )
}

struct Progress {
    completed: Vec<RegistrationStep>,
    user_id: Option<i64>,
}

impl Progress {
    fn fail(&self, failed: RegistrationStep, source: impl Into<WorkflowError>) -> WorkflowError {
        WorkflowError::Registration(Box::new(RegistrationFailure {
            failed,
            completed: self.completed.clone(),
            orphaned_user_id: self.user_id,
            source: source.into(),
        }))
    }
}

/// Register a new user and the records their role needs.
///
/// The temporary session opened to create the records is always closed.
pub async fn register(
    client: &ApiClient,
    session: &Session,
    form: &RegisterForm,
) -> WorkflowResult<RegistrationOutcome> {
    let sign_up = form.sign_up_request()?;
    let role = form
        .role
        .ok_or_else(|| WorkflowError::UnknownRole(sign_up.username.clone()))?;

    let result = run(client, session, form, &sign_up, role).await;
    if let Err(e) = session.logout() {
        tracing::warn!(error = %e, "Failed to clear registration session");
    }

    match &result {
        Ok(outcome) => tracing::info!(
            user_id = ?outcome.user_id,
            role = %role,
            "Registration completed"
        ),
        Err(e) => tracing::warn!(error = %e, "Registration failed"),
    }
    result
}

async fn run(
    client: &ApiClient,
    session: &Session,
    form: &RegisterForm,
    sign_up: &SignUpRequest,
    role: Role,
) -> WorkflowResult<RegistrationOutcome> {
    let iam = client.iam();
    let users = client.users();
    let mut progress = Progress {
        completed: Vec::new(),
        user_id: None,
    };

    let account = iam
        .sign_up(sign_up)
        .await
        .map_err(|e| progress.fail(RegistrationStep::SignUp, e))?;
    progress.user_id = account.id;
    progress.completed.push(RegistrationStep::SignUp);

    let auth = iam
        .sign_in(&form.sign_in_request())
        .await
        .map_err(|e| progress.fail(RegistrationStep::SignIn, e))?;
    let token = auth
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| progress.fail(RegistrationStep::SignIn, WorkflowError::MissingToken))?;
    session
        .set_token(&token)
        .map_err(|e| progress.fail(RegistrationStep::SignIn, e))?;
    if progress.user_id.is_none() {
        progress.user_id = auth.id;
    }
    progress.completed.push(RegistrationStep::SignIn);

    let mut resident_id = None;
    match role {
        Role::FamilyMember => {
            let resident = client
                .residents()
                .create(&form.resident_request())
                .await
                .map_err(|e| progress.fail(RegistrationStep::CreateResident, e))?;
            resident_id = resident.id;
            progress.completed.push(RegistrationStep::CreateResident);

            let mut family_member_id = None;
            if let Some(id) = resident_id {
                let member = users
                    .create_family_member(&form.family_member_request(id))
                    .await
                    .map_err(|e| progress.fail(RegistrationStep::LinkFamilyMember, e))?;
                family_member_id = member.id;
                progress.completed.push(RegistrationStep::LinkFamilyMember);
            } else {
                tracing::warn!("Resident created without an id, family member not linked");
            }

            let seed = ProfileSeed {
                username: form.name.trim().to_string(),
                email: form.email.trim().to_string(),
                phone: non_empty(&form.phone),
                relationship: non_empty(&form.relationship),
                resident_name: form.resident_name.trim().to_string(),
                resident_age: form.resident_age(),
                birth_date: non_empty(&form.resident_birth_date),
                conditions: non_empty(&form.resident_condition),
                remote_resident_id: resident_id,
                remote_family_member_id: family_member_id,
            };
            ResidentProfiles::new(session.store().clone())
                .create_from_registration(seed)
                .map_err(|e| progress.fail(RegistrationStep::StoreProfile, e))?;
            progress.completed.push(RegistrationStep::StoreProfile);
        }
        Role::Doctor => {
            users
                .create_doctor(&form.doctor_request())
                .await
                .map_err(|e| progress.fail(RegistrationStep::CreateDoctor, e))?;
            progress.completed.push(RegistrationStep::CreateDoctor);
        }
        Role::Carer => {
            users
                .create_carer(&form.carer_request())
                .await
                .map_err(|e| progress.fail(RegistrationStep::CreateCarer, e))?;
            progress.completed.push(RegistrationStep::CreateCarer);
        }
        Role::Developer => {}
    }

    Ok(RegistrationOutcome {
        user_id: progress.user_id,
        role,
        completed: progress.completed,
        resident_id,
        redirect: login_redirect(&form.email),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_encodes_email() {
        assert_eq!(
            login_redirect(" ana+1@mail.com "),
            "/login?registered=true&email=ana%2B1%40mail.com"
        );
    }

    #[test]
    fn test_failure_message_names_orphan() {
        let failure = RegistrationFailure {
            failed: RegistrationStep::CreateResident,
            completed: vec![RegistrationStep::SignUp, RegistrationStep::SignIn],
            orphaned_user_id: Some(41),
            source: WorkflowError::MissingToken,
        };
        assert_eq!(
            failure.to_string(),
            "Registration failed while creating the resident: Sign-in response did not include a token (account 41 was created and must be removed manually)"
        );
    }
}
