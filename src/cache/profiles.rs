//! Resident profiles created at registration
//!
//! A family member registers together with the resident they look after. The
//! pair is kept locally so the resident-profile screen can show it without a
//! round-trip, and one profile can be selected as the current one.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::storage::{keys, LocalStore, StoreResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResident {
    pub id: String,
    pub name: String,
    pub age: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_check: Option<String>,
    /// Backend resident id, once the resident exists server-side
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFamilyMember {
    pub id: String,
    pub username: String,
    pub email: String,
    pub resident_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub relationship: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResidentProfile {
    pub resident: ProfileResident,
    pub family_member: ProfileFamilyMember,
}

/// What the registration form knows about the pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileSeed {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub relationship: Option<String>,
    pub resident_name: String,
    pub resident_age: u32,
    pub birth_date: Option<String>,
    pub conditions: Option<String>,
    pub remote_resident_id: Option<i64>,
    pub remote_family_member_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ResidentProfiles {
    store: Arc<LocalStore>,
}

impl ResidentProfiles {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub fn all(&self) -> StoreResult<Vec<ResidentProfile>> {
        Ok(self
            .store
            .get(keys::RESIDENT_PROFILES)?
            .unwrap_or_default())
    }

    /// Store a new profile pair; returns the local resident id
    pub fn create_from_registration(&self, seed: ProfileSeed) -> StoreResult<String> {
        let resident_id = local_id();
        let resident = ProfileResident {
            id: resident_id.clone(),
            name: seed.resident_name,
            age: seed.resident_age,
            birth_date: seed.birth_date,
            conditions: seed.conditions,
            general_status: Some("Estable".to_string()),
            last_check: Some(Utc::now().date_naive().to_string()),
            remote_id: seed.remote_resident_id,
        };
        let family_member = ProfileFamilyMember {
            id: local_id(),
            username: seed.username,
            email: seed.email,
            resident_id: resident_id.clone(),
            phone: seed.phone,
            relationship: seed.relationship.unwrap_or_else(|| "Familiar".to_string()),
            remote_id: seed.remote_family_member_id,
        };

        let mut profiles = self.all()?;
        profiles.push(ResidentProfile {
            resident,
            family_member,
        });
        self.save(&profiles)?;
        tracing::debug!(resident_id = %resident_id, "Stored resident profile");
        Ok(resident_id)
    }

    /// Profile by local resident id
    pub fn get(&self, resident_id: &str) -> StoreResult<Option<ResidentProfile>> {
        Ok(self
            .all()?
            .into_iter()
            .find(|p| p.resident.id == resident_id))
    }

    /// Select the current profile; false when no such profile exists
    pub fn set_current(&self, resident_id: &str) -> StoreResult<bool> {
        if self.get(resident_id)?.is_none() {
            self.clear_current()?;
            return Ok(false);
        }
        self.store.set(keys::CURRENT_RESIDENT_PROFILE, resident_id)?;
        Ok(true)
    }

    pub fn current(&self) -> StoreResult<Option<ResidentProfile>> {
        match self.store.get::<String>(keys::CURRENT_RESIDENT_PROFILE)? {
            Some(id) => self.get(&id),
            None => Ok(None),
        }
    }

    pub fn clear_current(&self) -> StoreResult<()> {
        self.store.remove(keys::CURRENT_RESIDENT_PROFILE)
    }

    /// Replace the resident half of the matching profile
    pub fn update_resident(&self, resident: ProfileResident) -> StoreResult<bool> {
        let mut profiles = self.all()?;
        let Some(profile) = profiles.iter_mut().find(|p| p.resident.id == resident.id) else {
            return Ok(false);
        };
        profile.resident = resident;
        self.save(&profiles)?;
        Ok(true)
    }

    /// Replace the family-member half of the matching profile
    pub fn update_family_member(&self, family_member: ProfileFamilyMember) -> StoreResult<bool> {
        let mut profiles = self.all()?;
        let Some(profile) = profiles
            .iter_mut()
            .find(|p| p.family_member.id == family_member.id)
        else {
            return Ok(false);
        };
        profile.family_member = family_member;
        self.save(&profiles)?;
        Ok(true)
    }

    pub fn delete(&self, resident_id: &str) -> StoreResult<bool> {
        let mut profiles = self.all()?;
        let before = profiles.len();
        profiles.retain(|p| p.resident.id != resident_id);
        if profiles.len() == before {
            return Ok(false);
        }
        self.save(&profiles)?;
        Ok(true)
    }

    fn save(&self, profiles: &[ResidentProfile]) -> StoreResult<()> {
        self.store.set(keys::RESIDENT_PROFILES, profiles)
    }
}

fn local_id() -> String {
    format!("res_{}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_profiles(dir: &TempDir) -> ResidentProfiles {
        ResidentProfiles::new(Arc::new(LocalStore::open(dir.path()).unwrap()))
    }

    fn seed() -> ProfileSeed {
        ProfileSeed {
            username: "Lucia Perez".into(),
            email: "lucia@mail.com".into(),
            resident_name: "Rosa Perez".into(),
            resident_age: 82,
            remote_resident_id: Some(10),
            ..ProfileSeed::default()
        }
    }

    #[test]
    fn test_create_links_pair() {
        let dir = TempDir::new().unwrap();
        let profiles = open_profiles(&dir);

        let id = profiles.create_from_registration(seed()).unwrap();
        let profile = open_profiles(&dir).get(&id).unwrap().unwrap();

        assert_eq!(profile.resident.name, "Rosa Perez");
        assert_eq!(profile.resident.general_status.as_deref(), Some("Estable"));
        assert_eq!(profile.resident.remote_id, Some(10));
        assert_eq!(profile.family_member.resident_id, id);
        assert_eq!(profile.family_member.relationship, "Familiar");
        assert_ne!(profile.family_member.id, id);
    }

    #[test]
    fn test_current_selection() {
        let dir = TempDir::new().unwrap();
        let profiles = open_profiles(&dir);
        let id = profiles.create_from_registration(seed()).unwrap();

        assert!(profiles.current().unwrap().is_none());
        assert!(profiles.set_current(&id).unwrap());
        assert_eq!(profiles.current().unwrap().unwrap().resident.id, id);

        assert!(!profiles.set_current("res_missing").unwrap());
        assert!(profiles.current().unwrap().is_none());

        profiles.set_current(&id).unwrap();
        profiles.clear_current().unwrap();
        assert!(profiles.current().unwrap().is_none());
    }

    #[test]
    fn test_updates_reach_current() {
        let dir = TempDir::new().unwrap();
        let profiles = open_profiles(&dir);
        let id = profiles.create_from_registration(seed()).unwrap();
        profiles.set_current(&id).unwrap();

        let mut profile = profiles.get(&id).unwrap().unwrap();
        profile.resident.conditions = Some("Diabetes".into());
        profile.family_member.phone = Some("555-0101".into());
        assert!(profiles.update_resident(profile.resident.clone()).unwrap());
        assert!(profiles
            .update_family_member(profile.family_member.clone())
            .unwrap());

        let current = profiles.current().unwrap().unwrap();
        assert_eq!(current, profile);

        let mut stranger = profile.resident.clone();
        stranger.id = "res_other".into();
        assert!(!profiles.update_resident(stranger).unwrap());
    }

    #[test]
    fn test_delete() {
        let dir = TempDir::new().unwrap();
        let profiles = open_profiles(&dir);
        let keep = profiles.create_from_registration(seed()).unwrap();
        let removed = profiles.create_from_registration(seed()).unwrap();

        assert!(profiles.delete(&removed).unwrap());
        assert!(!profiles.delete(&removed).unwrap());
        let ids: Vec<_> = profiles.all().unwrap().into_iter().map(|p| p.resident.id).collect();
        assert_eq!(ids, vec![keep]);
    }
}
