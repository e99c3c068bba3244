//! Read-time derivations over a loaded document snapshot.
//!
//! Everything here is a pure function: no storage access, no side
//! effects, identical inputs give identical outputs. The UI calls these
//! against the snapshot it already holds instead of re-deriving ad hoc.

use chrono::{NaiveDate, NaiveTime};

use silverhome_shared::types::{ApplicationStatus, RequestStatus, ReservationStatus, Role};

use crate::models::{
    Application, ChatMessage, Conversation, ConversationMessage, EmergencyCall, FamilyConnection,
    Notice, Request, Reservation, Schedule, User,
};

/// Records with a lifecycle status.
pub trait Lifecycle {
    type Status: Copy + PartialEq;
    fn status(&self) -> Self::Status;
}

impl Lifecycle for Request {
    type Status = RequestStatus;
    fn status(&self) -> RequestStatus {
        self.status
    }
}

impl Lifecycle for Reservation {
    type Status = ReservationStatus;
    fn status(&self) -> ReservationStatus {
        self.status
    }
}

impl Lifecycle for Application {
    type Status = ApplicationStatus;
    fn status(&self) -> ApplicationStatus {
        self.status
    }
}

/// Records owned by the user who raised them.
pub trait OwnedBy {
    fn owner_id(&self) -> &str;
}

impl OwnedBy for Request {
    fn owner_id(&self) -> &str {
        &self.requester_id
    }
}

impl OwnedBy for Reservation {
    fn owner_id(&self) -> &str {
        &self.requester_id
    }
}

impl OwnedBy for EmergencyCall {
    fn owner_id(&self) -> &str {
        &self.requester_id
    }
}

/// All records in the given status, in collection order.
pub fn with_status<T: Lifecycle>(items: &[T], status: T::Status) -> Vec<&T> {
    items.iter().filter(|i| i.status() == status).collect()
}

/// How many records are in the given status.
pub fn count_with_status<T: Lifecycle>(items: &[T], status: T::Status) -> usize {
    items.iter().filter(|i| i.status() == status).count()
}

/// All records raised by the given user, in collection order.
pub fn for_user<'a, T: OwnedBy>(items: &'a [T], user_id: &str) -> Vec<&'a T> {
    items.iter().filter(|i| i.owner_id() == user_id).collect()
}

/// Notices in display order: pinned first, then newest-first.
pub fn notices_for_display(notices: &[Notice]) -> Vec<&Notice> {
    let mut sorted: Vec<&Notice> = notices.iter().collect();
    sorted.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    sorted
}

/// Schedules on or after `today`, soonest first.
pub fn upcoming_schedules(schedules: &[Schedule], today: NaiveDate) -> Vec<&Schedule> {
    let mut upcoming: Vec<&Schedule> = schedules.iter().filter(|s| s.date >= today).collect();
    upcoming.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.start_time.cmp(&b.start_time)));
    upcoming
}

/// Blocking reservations (pending or approved) on the facility and date
/// whose `[start, end)` slot intersects the given interval. Used both to
/// validate new reservations and to render busy slots.
pub fn overlapping_reservations<'a>(
    reservations: &'a [Reservation],
    facility_id: &str,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
) -> Vec<&'a Reservation> {
    reservations
        .iter()
        .filter(|r| {
            r.facility_id == facility_id
                && r.date == date
                && r.status.blocks_slot()
                && r.overlaps(start, end)
        })
        .collect()
}

/// Messages of one room, ascending by timestamp. The sort is stable, so
/// same-timestamp messages keep their append order.
pub fn messages_for_room<'a>(messages: &'a [ChatMessage], room_id: &str) -> Vec<&'a ChatMessage> {
    let mut room: Vec<&ChatMessage> = messages.iter().filter(|m| m.room_id == room_id).collect();
    room.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    room
}

/// A conversation's embedded messages, ascending by timestamp.
pub fn messages_for_conversation(conversation: &Conversation) -> Vec<&ConversationMessage> {
    let mut messages: Vec<&ConversationMessage> = conversation.messages.iter().collect();
    messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
    messages
}

/// The users the given account may chat with.
///
/// Admins see everyone; residents see their connected family members plus
/// staff; family members see their connected residents plus staff.
pub fn chat_partners_for<'a>(
    user: &User,
    users: &'a [User],
    connections: &[FamilyConnection],
) -> Vec<&'a User> {
    users
        .iter()
        .filter(|candidate| candidate.id != user.id)
        .filter(|candidate| match user.role {
            Role::Admin => true,
            Role::Resident => {
                candidate.has_role(Role::Admin)
                    || connections
                        .iter()
                        .any(|c| c.resident_id == user.id && c.family_id == candidate.id)
            }
            Role::Family => {
                candidate.has_role(Role::Admin)
                    || connections
                        .iter()
                        .any(|c| c.family_id == user.id && c.resident_id == candidate.id)
            }
        })
        .collect()
}

/// Emergency calls still waiting on staff, oldest first.
pub fn unresolved_calls(calls: &[EmergencyCall]) -> Vec<&EmergencyCall> {
    let mut open: Vec<&EmergencyCall> = calls.iter().filter(|c| !c.is_resolved()).collect();
    open.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    open
}

/// Applications awaiting review, oldest first.
pub fn pending_applications(applications: &[Application]) -> Vec<&Application> {
    let mut pending: Vec<&Application> = applications
        .iter()
        .filter(|a| a.status == ApplicationStatus::Pending)
        .collect();
    pending.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
    pending
}
