//! Signed-in user and bearer token

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::StoreResult;
use super::keys;
use super::local::LocalStore;
use crate::routing::Role;

/// The user shown in the header and used by the role guards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_member_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_resident_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<LocalStore>,
}

impl Session {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    pub fn login(&self, user: &CurrentUser, token: &str) -> StoreResult<()> {
        self.store.set(keys::AUTH_TOKEN, token)?;
        self.store.set(keys::CURRENT_USER, user)?;
        tracing::info!(user_id = user.id, role = %user.role, "Signed in");
        Ok(())
    }

    /// Drop the token, the user and the selected resident profile
    pub fn logout(&self) -> StoreResult<()> {
        self.store.remove_all(&[
            keys::AUTH_TOKEN,
            keys::CURRENT_USER,
            keys::CURRENT_RESIDENT_PROFILE,
        ])?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// The stored user; an unreadable record ends the session
    pub fn current_user(&self) -> Option<CurrentUser> {
        match self.store.get::<CurrentUser>(keys::CURRENT_USER) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable session");
                if let Err(e) = self.logout() {
                    tracing::warn!(error = %e, "Failed to clear session");
                }
                None
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get::<String>(keys::AUTH_TOKEN).ok().flatten()
    }

    /// Store a token without a user, as during the middle of registration
    pub fn set_token(&self, token: &str) -> StoreResult<()> {
        self.store.set(keys::AUTH_TOKEN, token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some_and(|t| !t.is_empty()) && self.current_user().is_some()
    }

    pub fn update_user(&self, user: &CurrentUser) -> StoreResult<()> {
        self.store.set(keys::CURRENT_USER, user)
    }
}
