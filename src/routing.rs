//! Role-based routing
//!
//! Every screen of the client lives under a role prefix. Guards decide where
//! a request for a path ends up given the current session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::storage::CurrentUser;

pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(rename = "familiar", alias = "family_member", alias = "family-member")]
    FamilyMember,
    #[serde(rename = "cuidador", alias = "carer")]
    Carer,
    Doctor,
    #[serde(alias = "admin")]
    Developer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::FamilyMember, Role::Carer, Role::Doctor, Role::Developer];

    /// Name used in routes and stored sessions
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::FamilyMember => "familiar",
            Role::Carer => "cuidador",
            Role::Doctor => "doctor",
            Role::Developer => "developer",
        }
    }

    /// Role name sent to IAM on sign-up
    pub fn iam_name(&self) -> &'static str {
        match self {
            Role::FamilyMember => "ROLE_FAMILY_MEMBER",
            Role::Carer => "ROLE_CARER",
            Role::Doctor => "ROLE_DOCTOR",
            Role::Developer => "ROLE_ADMIN",
        }
    }

    /// Lenient parse of any name the backend or the UI has used for a role
    pub fn parse(name: &str) -> Option<Role> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        let normalized = normalized.strip_prefix("role_").unwrap_or(&normalized);
        match normalized {
            "familiar" | "family" | "family_member" | "familymember" | "user" => {
                Some(Role::FamilyMember)
            }
            "cuidador" | "carer" | "caregiver" => Some(Role::Carer),
            "doctor" => Some(Role::Doctor),
            "developer" | "admin" | "administrator" => Some(Role::Developer),
            _ => None,
        }
    }

    /// First recognizable role in a list of IAM role names
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Option<Role> {
        names.iter().find_map(|n| Role::parse(n.as_ref()))
    }

    /// Path prefix of this role's section
    pub fn section(&self) -> String {
        format!("/{}", self.as_str())
    }

    /// Pages available in this role's section
    pub fn pages(&self) -> &'static [&'static str] {
        match self {
            Role::FamilyMember => &[
                "dashboard",
                "appointments",
                "notifications",
                "payments",
                "food",
                "resident-profile",
                "pages",
            ],
            Role::Carer => &[
                "dashboard",
                "patients",
                "citas",
                "payments",
                "notifications",
                "food",
            ],
            Role::Doctor => &["gestion-citas"],
            Role::Developer => &["dashboard", "analytics", "system", "users", "appointments"],
        }
    }

    /// Page served for the bare section path, e.g. `/developer`
    pub fn index_page(&self) -> Option<&'static str> {
        match self {
            Role::Developer => Some("dashboard"),
            _ => None,
        }
    }

    /// Roles a new account may sign up with
    pub fn can_sign_up(&self) -> bool {
        !matches!(self, Role::Developer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| {
            format!("Unknown role: {s}. Use familiar, cuidador, doctor or developer")
        })
    }
}

/// Landing page after login
pub fn home_for(role: Role) -> String {
    match role {
        Role::Doctor => "/doctor/gestion-citas".to_string(),
        other => format!("{}/dashboard", other.section()),
    }
}

/// A recognized location in the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Page { role: Role, page: &'static str },
}

impl Route {
    /// Match a path (query string ignored) against the route table
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split('?').next().unwrap_or(path);
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            return None;
        }
        if path == LOGIN {
            return Some(Route::Login);
        }
        if path == REGISTER {
            return Some(Route::Register);
        }

        let mut parts = path.trim_start_matches('/').splitn(2, '/');
        let prefix = parts.next()?;
        let role = Role::ALL.into_iter().find(|r| r.as_str() == prefix)?;
        let page = match parts.next() {
            Some(page) => *role.pages().iter().find(|p| **p == page)?,
            None => role.index_page()?,
        };
        Some(Route::Page { role, page })
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => LOGIN.to_string(),
            Route::Register => REGISTER.to_string(),
            Route::Page { role, page } => format!("{}/{}", role.section(), page),
        }
    }

    /// Role the route is restricted to, if any
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Page { role, .. } => Some(*role),
            _ => None,
        }
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    Redirect(String),
}

/// Only signed-in users pass
pub fn auth_guard(user: Option<&CurrentUser>) -> Access {
    match user {
        Some(_) => Access::Allow,
        None => Access::Redirect(LOGIN.to_string()),
    }
}

/// Only users with `required` pass; anybody else is sent to their own home
pub fn role_guard(user: Option<&CurrentUser>, required: Role) -> Access {
    match user {
        None => Access::Redirect(LOGIN.to_string()),
        Some(user) if user.role == required => Access::Allow,
        Some(user) => {
            tracing::debug!(role = %user.role, required = %required, "Role guard redirect");
            Access::Redirect(home_for(user.role))
        }
    }
}

/// Final destination of a navigation to `path`
pub fn resolve(path: &str, user: Option<&CurrentUser>) -> String {
    let bare = path.split('?').next().unwrap_or(path).trim_end_matches('/');
    if bare.is_empty() {
        return match user {
            Some(user) => home_for(user.role),
            None => LOGIN.to_string(),
        };
    }

    match Route::parse(path) {
        None => LOGIN.to_string(),
        Some(Route::Login | Route::Register) => path.to_string(),
        Some(route) => {
            let access = match route.required_role() {
                Some(role) => role_guard(user, role),
                None => auth_guard(user),
            };
            match access {
                Access::Allow => route.path(),
                Access::Redirect(to) => to,
            }
        }
    }
}
