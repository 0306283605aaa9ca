//! Local caches
//!
//! Denormalized mirrors kept in the [`LocalStore`](crate::storage::LocalStore):
//! notifications, the food log, carer payment requests and resident profiles. Each cache re-reads its
//! key on every call, so several handles over one store never drift apart.

mod filter;
mod food;
mod notifications;
mod payments;
mod profiles;

pub use filter::{NotificationFilter, StatusFilter};
pub use food::FoodLog;
pub use notifications::{NotificationCache, LOCAL_ID_PREFIX};
pub use payments::PaymentRequests;
pub use profiles::{ProfileFamilyMember, ProfileResident, ProfileSeed, ResidentProfile, ResidentProfiles};

use std::cmp::Reverse;

use crate::models::Notification;

/// Number of unread notifications in `items`
pub fn unread_count(items: &[Notification]) -> usize {
    items.iter().filter(|n| n.is_unread()).count()
}

/// Newest first; undated notifications sink to the end
pub(crate) fn sort_newest_first(items: &mut [Notification]) {
    items.sort_by_key(|n| Reverse(n.created_at()));
}
