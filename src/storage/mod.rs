//! Local storage
//!
//! - **local**: JSON-file key/value store, the on-disk stand-in for browser storage
//! - **session**: signed-in user and bearer token
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use carehub::storage::{LocalStore, Session};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(LocalStore::open("./data")?);
//!     let session = Session::new(store);
//!
//!     match session.current_user() {
//!         Some(user) => println!("Signed in as {} ({})", user.email, user.role),
//!         None => println!("Not signed in"),
//!     }
//!     Ok(())
//! }
//! ```

mod error;
mod local;
mod session;

pub use error::{StoreError, StoreResult};
pub use local::{LocalStore, STORE_FILE};
pub use session::{CurrentUser, Session};

/// Keys used in the local store
pub mod keys {
    pub const AUTH_TOKEN: &str = "authToken";
    pub const CURRENT_USER: &str = "currentUser";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const FOOD_ENTRIES: &str = "foodEntries";
    pub const PAYMENT_REQUESTS: &str = "payments";
    pub const RESIDENT_PROFILES: &str = "residentProfiles";
    pub const CURRENT_RESIDENT_PROFILE: &str = "currentResidentProfile";
}
