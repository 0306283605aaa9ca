//! Sign-in flow

use serde::Serialize;

use super::{WorkflowError, WorkflowResult};
use crate::api::ApiClient;
use crate::cache::ResidentProfiles;
use crate::models::{AuthenticatedUser, SignInRequest};
use crate::routing::{home_for, Role};
use crate::storage::{CurrentUser, Session};
use crate::validation::LoginForm;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginOutcome {
    pub user: CurrentUser,
    /// Where the user lands
    pub home: String,
}

/// Sign in with the form's credentials and persist the session.
///
/// Any failure leaves the session empty.
pub async fn login(
    client: &ApiClient,
    session: &Session,
    form: &LoginForm,
) -> WorkflowResult<LoginOutcome> {
    let request = form.to_request()?;
    let result = sign_in(client, session, &request).await;
    if result.is_err() {
        if let Err(e) = session.logout() {
            tracing::warn!(error = %e, "Failed to clear session after failed login");
        }
    }
    result
}

async fn sign_in(
    client: &ApiClient,
    session: &Session,
    request: &SignInRequest,
) -> WorkflowResult<LoginOutcome> {
    let email = request.username.as_str();
    let auth = client.iam().sign_in(request).await?;
    let token = auth
        .token
        .clone()
        .filter(|t| !t.is_empty())
        .ok_or(WorkflowError::MissingToken)?;

    let role = match Role::from_names(&auth.roles) {
        Some(role) => role,
        None => {
            // The token is needed to list accounts
            session.set_token(&token)?;
            lookup_role(client, &auth).await?
        }
    };

    let mut user = CurrentUser {
        id: auth.id.unwrap_or_default(),
        email: email.to_string(),
        name: auth.username.clone().unwrap_or_else(|| email.to_string()),
        role,
        family_member_id: None,
        linked_resident_id: None,
    };
    if role == Role::FamilyMember {
        link_profile(session, &mut user);
    }

    session.login(&user, &token)?;
    Ok(LoginOutcome {
        home: home_for(role),
        user,
    })
}

async fn lookup_role(client: &ApiClient, auth: &AuthenticatedUser) -> WorkflowResult<Role> {
    let username = auth.username.clone().unwrap_or_default();
    let users = client.iam().users().await?;
    let account = users.into_iter().find(|u| match (u.id, auth.id) {
        (Some(a), Some(b)) => a == b,
        _ => u.username.is_some() && u.username == auth.username,
    });

    account
        .and_then(|u| Role::from_names(&u.roles))
        .ok_or(WorkflowError::UnknownRole(username))
}

/// Fill in the resident link recorded at registration on this device
fn link_profile(session: &Session, user: &mut CurrentUser) {
    let profiles = ResidentProfiles::new(session.store().clone());
    let profile = match profiles.all() {
        Ok(all) => all
            .into_iter()
            .find(|p| p.family_member.email.eq_ignore_ascii_case(&user.email)),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read resident profiles");
            None
        }
    };

    if let Some(profile) = profile {
        user.family_member_id = profile.family_member.remote_id;
        user.linked_resident_id = profile.resident.remote_id;
        if let Err(e) = profiles.set_current(&profile.resident.id) {
            tracing::warn!(error = %e, "Could not select resident profile");
        }
    }
}
