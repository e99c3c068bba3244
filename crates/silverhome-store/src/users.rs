//! Operations on portal accounts.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use silverhome_shared::ids::new_id;
use silverhome_shared::types::Role;

use crate::document::Store;
use crate::error::{require_non_empty, Result, StoreError};
use crate::models::{HealthInfo, User};

/// Form payload for account registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub phone: String,
    pub email: Option<String>,
    pub room_number: Option<String>,
    /// For family accounts, the resident to link to.
    pub resident_id: Option<String>,
}

impl Store {
    /// Register a new account. Usernames are unique across the document.
    pub fn register_user(&self, new: NewUser) -> Result<User> {
        require_non_empty("username", &new.username)?;
        require_non_empty("password", &new.password)?;
        require_non_empty("name", &new.name)?;

        let mut doc = self.load();
        if doc.users.iter().any(|u| u.username == new.username) {
            return Err(StoreError::Conflict(format!(
                "username {} is already taken",
                new.username
            )));
        }
        if let Some(resident_id) = &new.resident_id {
            if doc.user(resident_id).is_none() {
                return Err(StoreError::NotFound(format!("user {resident_id}")));
            }
        }

        let user = User {
            id: new_id("user"),
            username: new.username,
            password: new.password,
            name: new.name,
            role: new.role,
            phone: new.phone,
            email: new.email,
            room_number: new.room_number,
            resident_id: new.resident_id,
            health: None,
            favorite_facilities: Vec::new(),
            joined_at: Utc::now(),
        };
        doc.users.push(user.clone());
        self.save(&mut doc)?;

        info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(user)
    }

    /// Remove an account outright. Admin only; admins cannot remove
    /// themselves.
    pub fn remove_user(&self, user_id: &str, actor_id: &str) -> Result<()> {
        if user_id == actor_id {
            return Err(StoreError::Validation(
                "cannot remove your own account".to_string(),
            ));
        }

        let mut doc = self.load();
        doc.require_admin(actor_id)?;

        let before = doc.users.len();
        doc.users.retain(|u| u.id != user_id);
        if doc.users.len() == before {
            return Err(StoreError::NotFound(format!("user {user_id}")));
        }
        self.save(&mut doc)?;

        info!(user_id, "user removed");
        Ok(())
    }

    /// Replace a resident's health details. Allowed for the resident
    /// themselves or an admin.
    pub fn update_health_info(
        &self,
        user_id: &str,
        actor_id: &str,
        health: HealthInfo,
    ) -> Result<User> {
        let mut doc = self.load();
        let actor = doc
            .user(actor_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {actor_id}")))?
            .clone();
        if actor.id != user_id && !actor.is_admin() {
            return Err(StoreError::Forbidden(format!(
                "user {actor_id} may not edit health details of {user_id}"
            )));
        }

        let user = doc
            .user_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))?;
        user.health = Some(health);
        let updated = user.clone();
        self.save(&mut doc)?;

        info!(user_id, "health details updated");
        Ok(updated)
    }

    /// Star or unstar a facility for the user. Returns the updated user.
    pub fn toggle_favorite_facility(&self, user_id: &str, facility_id: &str) -> Result<User> {
        let mut doc = self.load();
        if doc.facility(facility_id).is_none() {
            return Err(StoreError::NotFound(format!("facility {facility_id}")));
        }

        let user = doc
            .user_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))?;
        if let Some(pos) = user.favorite_facilities.iter().position(|f| f == facility_id) {
            user.favorite_facilities.remove(pos);
        } else {
            user.favorite_facilities.push(facility_id.to_string());
        }
        let updated = user.clone();
        self.save(&mut doc)?;

        info!(user_id, facility_id, "favorite facility toggled");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: "pw".to_string(),
            name: "Lee Soon-ja".to_string(),
            role: Role::Resident,
            phone: "010-3000-0001".to_string(),
            email: None,
            room_number: Some("305".to_string()),
            resident_id: None,
        }
    }

    #[test]
    fn duplicate_username_conflicts() {
        let store = Store::in_memory();
        store.register_user(sample("soonja")).unwrap();
        let err = store.register_user(sample("soonja")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        // seeded names are taken too
        let err = store.register_user(sample("resident")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn family_link_must_reference_an_existing_user() {
        let store = Store::in_memory();
        let mut new = sample("minji2");
        new.role = Role::Family;
        new.resident_id = Some("user-ghost".to_string());
        let err = store.register_user(new).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn remove_requires_admin_and_not_self() {
        let store = Store::in_memory();
        let user = store.register_user(sample("soonja")).unwrap();

        let err = store.remove_user(&user.id, "user-resident").unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));

        let err = store.remove_user("user-admin", "user-admin").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        store.remove_user(&user.id, "user-admin").unwrap();
        assert!(store.load().user(&user.id).is_none());
    }

    #[test]
    fn health_details_are_owner_or_admin_only() {
        let store = Store::in_memory();
        let health = HealthInfo {
            blood_type: Some("A".to_string()),
            conditions: vec!["hypertension".to_string()],
            ..HealthInfo::default()
        };

        let err = store
            .update_health_info("user-resident", "user-family", health.clone())
            .unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));

        let user = store
            .update_health_info("user-resident", "user-resident", health)
            .unwrap();
        assert_eq!(user.health.as_ref().unwrap().blood_type.as_deref(), Some("A"));
    }

    #[test]
    fn favorite_toggles_on_and_off() {
        let store = Store::in_memory();
        let user = store
            .toggle_favorite_facility("user-resident", "facility-fitness")
            .unwrap();
        assert_eq!(user.favorite_facilities, vec!["facility-fitness"]);

        let user = store
            .toggle_favorite_facility("user-resident", "facility-fitness")
            .unwrap();
        assert!(user.favorite_facilities.is_empty());

        let err = store
            .toggle_favorite_facility("user-resident", "facility-pool")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
