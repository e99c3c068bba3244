//! The portal document and its store.
//!
//! The entire portal state is one serialized [`AppData`] aggregate kept in
//! a single storage entry. Reads load the whole document; every mutation
//! rewrites the whole document. [`Store`] is a handle over a
//! [`StorageBackend`] and is injected into callers rather than living in a
//! global, so tests can substitute an in-memory backend.

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use silverhome_shared::constants::DATA_ENTRY;
use silverhome_shared::types::Role;

use crate::error::{Result, StoreError};
use crate::models::{
    Application, ChatMessage, ChatRoom, Conversation, EmergencyCall, Facility, FamilyConnection,
    Notice, Request, Reservation, Schedule, User,
};
use crate::storage::{FileStorage, MemoryStorage, StorageBackend};

/// The root aggregate. Every collection defaults to empty so older or
/// partial documents deserialize instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppData {
    /// Monotonic document version checked at save time.
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub requests: Vec<Request>,
    #[serde(default)]
    pub emergency_calls: Vec<EmergencyCall>,
    #[serde(default)]
    pub notices: Vec<Notice>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
    #[serde(default)]
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub reservations: Vec<Reservation>,
    #[serde(default)]
    pub chat_rooms: Vec<ChatRoom>,
    #[serde(default)]
    pub chat_messages: Vec<ChatMessage>,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    #[serde(default)]
    pub family_connections: Vec<FamilyConnection>,
    #[serde(default)]
    pub applications: Vec<Application>,
}

impl AppData {
    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    pub fn facility(&self, id: &str) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    pub fn facility_mut(&mut self, id: &str) -> Option<&mut Facility> {
        self.facilities.iter_mut().find(|f| f.id == id)
    }

    /// Look up the acting user and require the admin role.
    pub(crate) fn require_admin(&self, actor_id: &str) -> Result<&User> {
        let actor = self
            .user(actor_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {actor_id}")))?;
        if !actor.is_admin() {
            return Err(StoreError::Forbidden(format!(
                "user {actor_id} does not have the admin role"
            )));
        }
        Ok(actor)
    }
}

/// Only the version field, for the stale-snapshot check at save time.
#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    version: u64,
}

/// Handle to the persisted portal document.
pub struct Store {
    backend: Arc<dyn StorageBackend + Send + Sync>,
}

impl Store {
    /// Open the default on-disk store (see [`FileStorage::new`]).
    pub fn open() -> Result<Self> {
        Ok(Self::with_backend(Arc::new(FileStorage::new()?)))
    }

    /// Open an on-disk store at an explicit directory.
    pub fn open_at(dir: &Path) -> Result<Self> {
        Ok(Self::with_backend(Arc::new(FileStorage::open_at(dir)?)))
    }

    /// A store over an in-process map. State is lost on drop.
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryStorage::new()))
    }

    /// A store over any backend. This is the injection seam: hand the same
    /// backend to several components to share one document.
    pub fn with_backend(backend: Arc<dyn StorageBackend + Send + Sync>) -> Self {
        Self { backend }
    }

    pub(crate) fn backend(&self) -> &(dyn StorageBackend + Send + Sync) {
        self.backend.as_ref()
    }

    /// Load the current document snapshot.
    ///
    /// Consumers never crash on store access: an absent entry yields the
    /// seed document, and an unreadable or unparseable payload degrades to
    /// the seed document with a warning.
    pub fn load(&self) -> AppData {
        let raw = match self.backend.read_entry(DATA_ENTRY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return seed_document(),
            Err(e) => {
                warn!(error = %e, "failed to read portal document, falling back to seed");
                return seed_document();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(error = %e, "portal document is corrupt, falling back to seed");
                seed_document()
            }
        }
    }

    /// Persist the whole document, replacing prior content.
    ///
    /// Saves are compare-and-swap on the document version: if another
    /// writer persisted a newer version since this snapshot was loaded,
    /// the save fails with [`StoreError::Conflict`] and writes nothing.
    /// On success the snapshot's version is bumped in place so the caller
    /// can keep using it without a re-load.
    pub fn save(&self, doc: &mut AppData) -> Result<()> {
        if let Some(raw) = self.backend.read_entry(DATA_ENTRY)? {
            if let Ok(probe) = serde_json::from_str::<VersionProbe>(&raw) {
                if probe.version != doc.version {
                    return Err(StoreError::Conflict(format!(
                        "document snapshot is stale (snapshot version {}, persisted {})",
                        doc.version, probe.version
                    )));
                }
            }
            // An unparseable persisted payload is overwritten outright; it
            // would degrade to the seed on the next load anyway.
        }
        doc.version += 1;
        let payload = serde_json::to_string(doc)?;
        self.backend.write_entry(DATA_ENTRY, &payload)
    }
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid seed time")
}

/// The fixed document a fresh (or unreadable) store starts from: three
/// demo identities, their family linkage, two facilities, a pinned welcome
/// notice and one schedule entry.
pub fn seed_document() -> AppData {
    let now = Utc::now();

    let admin = User {
        id: "user-admin".to_string(),
        username: "admin".to_string(),
        password: "1234".to_string(),
        name: "Facility Manager".to_string(),
        role: Role::Admin,
        phone: "010-1000-0001".to_string(),
        email: Some("manager@silverhome.example".to_string()),
        room_number: None,
        resident_id: None,
        health: None,
        favorite_facilities: Vec::new(),
        joined_at: now,
    };
    let resident = User {
        id: "user-resident".to_string(),
        username: "resident".to_string(),
        password: "1234".to_string(),
        name: "Kim Young-soo".to_string(),
        role: Role::Resident,
        phone: "010-1000-0002".to_string(),
        email: None,
        room_number: Some("203".to_string()),
        resident_id: None,
        health: None,
        favorite_facilities: Vec::new(),
        joined_at: now,
    };
    let family = User {
        id: "user-family".to_string(),
        username: "family".to_string(),
        password: "1234".to_string(),
        name: "Kim Min-ji".to_string(),
        role: Role::Family,
        phone: "010-1000-0003".to_string(),
        email: None,
        room_number: None,
        resident_id: Some(resident.id.clone()),
        health: None,
        favorite_facilities: Vec::new(),
        joined_at: now,
    };

    let connection = FamilyConnection {
        id: "conn-demo".to_string(),
        resident_id: resident.id.clone(),
        family_id: family.id.clone(),
        relation: "daughter".to_string(),
        created_at: now,
    };

    let lounge = Facility {
        id: "facility-lounge".to_string(),
        name: "Community Lounge".to_string(),
        description: "Shared lounge for gatherings and family visits".to_string(),
        location: "1F, east wing".to_string(),
        capacity: 30,
        open_time: t(9, 0),
        close_time: t(21, 0),
        bookings: Vec::new(),
    };
    let fitness = Facility {
        id: "facility-fitness".to_string(),
        name: "Fitness Room".to_string(),
        description: "Light exercise equipment, staff on site".to_string(),
        location: "B1".to_string(),
        capacity: 10,
        open_time: t(6, 0),
        close_time: t(22, 0),
        bookings: Vec::new(),
    };

    let welcome = Notice {
        id: "notice-welcome".to_string(),
        title: "Welcome to SilverHome".to_string(),
        body: "Meal times, visiting hours and facility rules are posted on each floor."
            .to_string(),
        category: "general".to_string(),
        pinned: true,
        author_id: admin.id.clone(),
        author_name: admin.name.clone(),
        created_at: now,
        updated_at: now,
        attachments: Vec::new(),
    };

    let morning_exercise = Schedule {
        id: "schedule-morning-exercise".to_string(),
        title: "Morning stretching".to_string(),
        date: now.date_naive() + chrono::Days::new(1),
        start_time: t(7, 30),
        end_time: t(8, 0),
        location: "Fitness Room".to_string(),
        description: "Guided stretching, all residents welcome".to_string(),
        category: "exercise".to_string(),
    };

    AppData {
        version: 0,
        users: vec![admin, resident, family],
        facilities: vec![lounge, fitness],
        notices: vec![welcome],
        schedules: vec![morning_exercise],
        family_connections: vec![connection],
        ..AppData::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silverhome_shared::ids::new_id;

    #[test]
    fn fresh_store_loads_seed() {
        let store = Store::in_memory();
        let doc = store.load();
        assert_eq!(doc.users.len(), 3);
        assert!(doc.users.iter().any(|u| u.username == "resident"));
        assert_eq!(doc.facilities.len(), 2);
        assert_eq!(doc.version, 0);
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = Store::in_memory();
        let mut doc = store.load();
        doc.users[0].phone = "010-9999-0000".to_string();
        store.save(&mut doc).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn corrupt_payload_degrades_to_seed() {
        let store = Store::in_memory();
        store
            .backend()
            .write_entry(DATA_ENTRY, "{not json at all")
            .unwrap();

        let doc = store.load();
        assert_eq!(doc.users.len(), 3);
    }

    #[test]
    fn partial_document_gets_defaults() {
        let store = Store::in_memory();
        store
            .backend()
            .write_entry(DATA_ENTRY, "{\"users\":[]}")
            .unwrap();

        let doc = store.load();
        assert_eq!(doc.version, 0);
        assert!(doc.requests.is_empty());
        assert!(doc.conversations.is_empty());
    }

    #[test]
    fn stale_snapshot_save_conflicts() {
        let store = Store::in_memory();
        let mut first = store.load();
        let mut second = store.load();

        store.save(&mut first).unwrap();

        let err = store.save(&mut second).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // the losing snapshot did not clobber the winning write
        assert_eq!(store.load(), first);
    }

    #[test]
    fn sequential_saves_from_refreshed_snapshot_succeed() {
        let store = Store::in_memory();
        let mut doc = store.load();
        store.save(&mut doc).unwrap();
        // the saved snapshot stays current, no re-load needed
        doc.notices[0].pinned = false;
        store.save(&mut doc).unwrap();
        assert_eq!(store.load().version, 2);
    }

    #[test]
    fn require_admin_checks_role_and_existence() {
        let doc = seed_document();
        assert!(doc.require_admin("user-admin").is_ok());
        assert!(matches!(
            doc.require_admin("user-resident"),
            Err(StoreError::Forbidden(_))
        ));
        assert!(matches!(
            doc.require_admin(&new_id("user")),
            Err(StoreError::NotFound(_))
        ));
    }
}
