//! Operations on resident-family connections.

use chrono::Utc;
use tracing::info;

use silverhome_shared::ids::new_id;
use silverhome_shared::types::Role;

use crate::document::Store;
use crate::error::{Result, StoreError};
use crate::models::FamilyConnection;

impl Store {
    /// Link a family account to a resident. The linkage scopes which chat
    /// partners either side may see, and fills the family account's
    /// resident link if it was empty.
    pub fn connect_family_member(
        &self,
        resident_id: &str,
        family_id: &str,
        relation: &str,
    ) -> Result<FamilyConnection> {
        let mut doc = self.load();

        let resident = doc
            .user(resident_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {resident_id}")))?;
        if !resident.has_role(Role::Resident) {
            return Err(StoreError::Validation(format!(
                "user {resident_id} is not a resident"
            )));
        }
        let family = doc
            .user(family_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {family_id}")))?;
        if !family.has_role(Role::Family) {
            return Err(StoreError::Validation(format!(
                "user {family_id} is not a family account"
            )));
        }

        if doc
            .family_connections
            .iter()
            .any(|c| c.resident_id == resident_id && c.family_id == family_id)
        {
            return Err(StoreError::Conflict(format!(
                "{family_id} is already connected to {resident_id}"
            )));
        }

        let connection = FamilyConnection {
            id: new_id("conn"),
            resident_id: resident_id.to_string(),
            family_id: family_id.to_string(),
            relation: relation.to_string(),
            created_at: Utc::now(),
        };
        doc.family_connections.push(connection.clone());

        // keep the account-level link in step, in the same save
        if let Some(family) = doc.user_mut(family_id) {
            if family.resident_id.is_none() {
                family.resident_id = Some(resident_id.to_string());
            }
        }
        self.save(&mut doc)?;

        info!(resident_id, family_id, "family connection created");
        Ok(connection)
    }
}
