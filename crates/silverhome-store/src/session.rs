//! Session/identity store.
//!
//! The current user lives in its own storage entry, written at login and
//! removed at logout. Reading the session never touches the portal
//! document; the session record is a point-in-time copy of the user taken
//! at login.

use tracing::{info, warn};

use silverhome_shared::constants::SESSION_ENTRY;

use crate::document::Store;
use crate::error::Result;
use crate::models::User;

impl Store {
    /// Attempt a login against the document's users.
    ///
    /// The secret is compared verbatim with the stored one (a documented
    /// design flaw of the portal, not a credential system). On success the
    /// resolved user is persisted as the session record and returned; on
    /// failure nothing is persisted and `None` is returned.
    pub fn login(&self, username: &str, secret: &str) -> Result<Option<User>> {
        let doc = self.load();
        let Some(user) = doc.users.iter().find(|u| u.username == username) else {
            return Ok(None);
        };
        if user.password != secret {
            return Ok(None);
        }

        let payload = serde_json::to_string(user)?;
        self.backend().write_entry(SESSION_ENTRY, &payload)?;
        info!(user_id = %user.id, role = %user.role, "session started");
        Ok(Some(user.clone()))
    }

    /// The persisted session record, if any. Does not consult the portal
    /// document; a corrupt session entry reads as logged out.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.backend().read_entry(SESSION_ENTRY).ok()??;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "session entry is corrupt, treating as logged out");
                None
            }
        }
    }

    /// End the session. Removing an absent session is not an error.
    pub fn logout(&self) -> Result<()> {
        self.backend().remove_entry(SESSION_ENTRY)?;
        info!("session ended");
        Ok(())
    }
}
