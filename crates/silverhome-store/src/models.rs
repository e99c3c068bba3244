//! Record structs persisted inside the portal document.
//!
//! Every struct derives `Serialize` and `Deserialize` with camelCase field
//! names so the JSON document keeps the layout the UI layer expects.
//! Timestamps serialize as ISO-8601 strings; calendar fields use plain
//! dates and times.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use silverhome_shared::types::{
    ApplicationStatus, EmergencyStatus, RequestCategory, RequestStatus, RequestUrgency,
    ReservationStatus, Role,
};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// Health details attached to a resident account. All fields optional;
/// older documents may carry none of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthInfo {
    pub blood_type: Option<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub emergency_contact: Option<String>,
    pub notes: Option<String>,
}

/// A portal account. The secret is compared verbatim at login; the store
/// is not a hardened credential vault and does not pretend to be one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub phone: String,
    pub email: Option<String>,
    /// Room number, set for resident accounts.
    pub room_number: Option<String>,
    /// For family accounts, the id of the linked resident.
    pub resident_id: Option<String>,
    pub health: Option<HealthInfo>,
    /// Facility ids the user has starred.
    #[serde(default)]
    pub favorite_facilities: Vec<String>,
    pub joined_at: DateTime<Utc>,
}

impl User {
    /// Exact role match; no hierarchy.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// ---------------------------------------------------------------------------
// Service request
// ---------------------------------------------------------------------------

/// Resident feedback left on a completed request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestFeedback {
    /// 1-5.
    pub rating: u8,
    pub comment: String,
    pub submitted_at: DateTime<Utc>,
}

/// A help/service ticket raised by a resident or family member.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub category: RequestCategory,
    pub title: String,
    pub description: String,
    pub location: String,
    /// Scheduling preference, if the requester has one.
    pub preferred_date: Option<NaiveDate>,
    pub urgency: RequestUrgency,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub assignee_id: Option<String>,
    pub assignee_name: Option<String>,
    pub feedback: Option<RequestFeedback>,
}

// ---------------------------------------------------------------------------
// Emergency call
// ---------------------------------------------------------------------------

/// An alert raised by a resident. Unresolved until `resolved_at` is set,
/// at which point `resolved_by` and `resolution` are required companions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyCall {
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub created_at: DateTime<Utc>,
    pub location: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub status: EmergencyStatus,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolved_by: Option<String>,
    pub resolution: Option<String>,
}

impl EmergencyCall {
    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NoticeAttachment {
    pub name: String,
    pub url: String,
}

/// An admin-authored announcement. Pinned notices sort before unpinned,
/// then newest-first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub title: String,
    pub body: String,
    pub category: String,
    pub pinned: bool,
    pub author_id: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<NoticeAttachment>,
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// A calendar event (exercise class, clinic visit, outing).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub description: String,
    pub category: String,
}

// ---------------------------------------------------------------------------
// Facility & reservation
// ---------------------------------------------------------------------------

/// Denormalized slot summary embedded in a facility, kept consistent with
/// the owning reservation in the same document save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FacilityBooking {
    pub reservation_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: ReservationStatus,
}

/// A reservable shared space.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub capacity: u32,
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    #[serde(default)]
    pub bookings: Vec<FacilityBooking>,
}

/// A first-class reservation record referencing its facility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub facility_id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub purpose: String,
    pub attendees: u32,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl Reservation {
    /// Half-open interval overlap test: `[start, end)` intersects this
    /// reservation's slot.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.end_time && end > self.start_time
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A group chat room. `last_message`/`last_message_time` mirror the newest
/// message in the `chat_messages` collection for this room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub last_message: Option<String>,
    pub last_message_time: Option<DateTime<Utc>>,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub room_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Direct conversations
// ---------------------------------------------------------------------------

/// A message inside a two-party conversation thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub id: String,
    pub sender_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A two-party thread with messages embedded in the record itself.
/// `last_message_time` equals the timestamp of the last element of
/// `messages`, or `None` for an empty thread.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    pub created_at: DateTime<Utc>,
    pub last_message_time: Option<DateTime<Utc>>,
}

impl Conversation {
    /// Whether this thread is between exactly the two given users,
    /// in either order.
    pub fn is_between(&self, a: &str, b: &str) -> bool {
        self.participants.len() == 2
            && self.participants.iter().any(|p| p == a)
            && self.participants.iter().any(|p| p == b)
    }
}

// ---------------------------------------------------------------------------
// Family connection
// ---------------------------------------------------------------------------

/// Resident-to-family linkage, used to scope which chat partners a family
/// or resident account may see.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FamilyConnection {
    pub id: String,
    pub resident_id: String,
    pub family_id: String,
    pub relation: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Admission application
// ---------------------------------------------------------------------------

/// A submitted admission application, separate from service requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    pub applicant_name: String,
    pub applicant_phone: String,
    pub applicant_email: Option<String>,
    pub desired_move_in: Option<NaiveDate>,
    pub notes: String,
    pub status: ApplicationStatus,
    pub submitted_at: DateTime<Utc>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
}
