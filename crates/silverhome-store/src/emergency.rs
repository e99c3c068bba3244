//! Operations on emergency calls.

use chrono::Utc;
use tracing::{info, warn};

use silverhome_shared::ids::new_id;
use silverhome_shared::types::EmergencyStatus;

use crate::document::Store;
use crate::error::{require_non_empty, Result, StoreError};
use crate::models::EmergencyCall;

impl Store {
    /// Raise an emergency call on behalf of a resident.
    pub fn raise_emergency_call(
        &self,
        requester_id: &str,
        requester_name: &str,
        location: Option<&str>,
        message: Option<&str>,
    ) -> Result<EmergencyCall> {
        let mut doc = self.load();
        if doc.user(requester_id).is_none() {
            return Err(StoreError::NotFound(format!("user {requester_id}")));
        }

        let call = EmergencyCall {
            id: new_id("emg"),
            requester_id: requester_id.to_string(),
            requester_name: requester_name.to_string(),
            created_at: Utc::now(),
            location: location.map(str::to_string),
            message: message.map(str::to_string),
            status: EmergencyStatus::Unresolved,
            resolved_at: None,
            resolved_by: None,
            resolution: None,
        };
        doc.emergency_calls.push(call.clone());
        self.save(&mut doc)?;

        warn!(call_id = %call.id, requester_id, "emergency call raised");
        Ok(call)
    }

    /// Resolve an emergency call. The resolution text is required; a call
    /// can only be resolved once, and the first `resolved_at` is kept.
    pub fn resolve_emergency_call(
        &self,
        call_id: &str,
        resolver_id: &str,
        resolution: &str,
    ) -> Result<EmergencyCall> {
        require_non_empty("resolution", resolution)?;

        let mut doc = self.load();
        if doc.user(resolver_id).is_none() {
            return Err(StoreError::NotFound(format!("user {resolver_id}")));
        }

        let call = doc
            .emergency_calls
            .iter_mut()
            .find(|c| c.id == call_id)
            .ok_or_else(|| StoreError::NotFound(format!("emergency call {call_id}")))?;
        if call.is_resolved() {
            return Err(StoreError::InvalidState(format!(
                "emergency call {call_id} is already resolved"
            )));
        }

        call.status = EmergencyStatus::Resolved;
        call.resolved_at = Some(Utc::now());
        call.resolved_by = Some(resolver_id.to_string());
        call.resolution = Some(resolution.to_string());
        let updated = call.clone();
        self.save(&mut doc)?;

        info!(call_id, resolver_id, "emergency call resolved");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_and_resolve() {
        let store = Store::in_memory();
        let call = store
            .raise_emergency_call("user-resident", "Kim Young-soo", Some("Room 203"), None)
            .unwrap();
        assert_eq!(call.status, EmergencyStatus::Unresolved);
        assert!(!call.is_resolved());

        let resolved = store
            .resolve_emergency_call(&call.id, "user-admin", "Staff responded on site")
            .unwrap();
        assert_eq!(resolved.status, EmergencyStatus::Resolved);
        assert_eq!(resolved.resolved_by.as_deref(), Some("user-admin"));
        assert!(resolved.resolved_at.is_some());
        // untouched fields survive
        assert_eq!(resolved.location.as_deref(), Some("Room 203"));
    }

    #[test]
    fn empty_resolution_is_rejected() {
        let store = Store::in_memory();
        let call = store
            .raise_emergency_call("user-resident", "Kim Young-soo", None, None)
            .unwrap();
        let err = store
            .resolve_emergency_call(&call.id, "user-admin", "   ")
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn resolving_twice_preserves_the_first_resolution() {
        let store = Store::in_memory();
        let call = store
            .raise_emergency_call("user-resident", "Kim Young-soo", None, None)
            .unwrap();
        let first = store
            .resolve_emergency_call(&call.id, "user-admin", "done")
            .unwrap();

        let err = store
            .resolve_emergency_call(&call.id, "user-admin", "again")
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidState(_)));

        let doc = store.load();
        let persisted = doc.emergency_calls.iter().find(|c| c.id == call.id).unwrap();
        assert_eq!(persisted.resolved_at, first.resolved_at);
        assert_eq!(persisted.resolution.as_deref(), Some("done"));
    }

    #[test]
    fn unknown_call_is_not_found() {
        let store = Store::in_memory();
        let err = store
            .resolve_emergency_call("emg-missing", "user-admin", "done")
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
