//! Operations on facility reservations.
//!
//! The slot invariant: two reservations for the same facility and date
//! whose status still blocks the slot (pending or approved) never have
//! intersecting `[start, end)` intervals. Creation and approval both
//! enforce it against the current snapshot. Each reservation is mirrored
//! by a booking summary embedded in its facility, updated in the same
//! document save.

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use silverhome_shared::ids::new_id;
use silverhome_shared::types::ReservationStatus;

use crate::document::{AppData, Store};
use crate::error::{require_non_empty, Result, StoreError};
use crate::models::{FacilityBooking, Reservation};
use crate::query::overlapping_reservations;

/// Form payload for a new reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    pub facility_id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub purpose: String,
    pub attendees: u32,
}

impl Store {
    /// Request a facility slot. The reservation starts pending and already
    /// occupies its slot for the overlap check.
    pub fn create_reservation(&self, new: NewReservation) -> Result<Reservation> {
        require_non_empty("reservation purpose", &new.purpose)?;
        if new.end_time <= new.start_time {
            return Err(StoreError::Validation(
                "reservation end time must be after start time".to_string(),
            ));
        }

        let mut doc = self.load();
        if doc.user(&new.requester_id).is_none() {
            return Err(StoreError::NotFound(format!("user {}", new.requester_id)));
        }
        let facility = doc
            .facility(&new.facility_id)
            .ok_or_else(|| StoreError::NotFound(format!("facility {}", new.facility_id)))?;

        if new.start_time < facility.open_time || new.end_time > facility.close_time {
            return Err(StoreError::Validation(format!(
                "{} is open {}-{}",
                facility.name, facility.open_time, facility.close_time
            )));
        }
        if new.attendees > facility.capacity {
            return Err(StoreError::Validation(format!(
                "{} holds at most {} people",
                facility.name, facility.capacity
            )));
        }

        ensure_slot_free(&doc, &new.facility_id, new.date, new.start_time, new.end_time, None)?;

        let reservation = Reservation {
            id: new_id("rsv"),
            facility_id: new.facility_id,
            requester_id: new.requester_id,
            requester_name: new.requester_name,
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            purpose: new.purpose,
            attendees: new.attendees,
            status: ReservationStatus::Pending,
            created_at: Utc::now(),
            reviewed_by: None,
            reviewed_at: None,
        };

        if let Some(facility) = doc.facility_mut(&reservation.facility_id) {
            facility.bookings.push(FacilityBooking {
                reservation_id: reservation.id.clone(),
                date: reservation.date,
                start_time: reservation.start_time,
                end_time: reservation.end_time,
                status: reservation.status,
            });
        }
        doc.reservations.push(reservation.clone());
        self.save(&mut doc)?;

        info!(
            reservation_id = %reservation.id,
            facility_id = %reservation.facility_id,
            date = %reservation.date,
            "reservation created"
        );
        Ok(reservation)
    }

    /// Soft-cancel a reservation. Allowed for the owner or an admin.
    pub fn cancel_reservation(&self, reservation_id: &str, actor_id: &str) -> Result<Reservation> {
        let mut doc = self.load();
        let actor = doc
            .user(actor_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {actor_id}")))?
            .clone();

        let reservation = doc
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation_id)
            .ok_or_else(|| StoreError::NotFound(format!("reservation {reservation_id}")))?;
        if reservation.requester_id != actor.id && !actor.is_admin() {
            return Err(StoreError::Forbidden(format!(
                "user {actor_id} may not cancel reservation {reservation_id}"
            )));
        }
        if !reservation.status.blocks_slot() {
            return Err(StoreError::InvalidState(format!(
                "reservation {reservation_id} is already {:?}",
                reservation.status
            )));
        }

        reservation.status = ReservationStatus::Cancelled;
        let updated = reservation.clone();
        sync_booking(&mut doc, &updated);
        self.save(&mut doc)?;

        info!(reservation_id, "reservation cancelled");
        Ok(updated)
    }

    /// Approve a pending reservation. Admin only. The slot is re-checked
    /// against every other blocking reservation before committing.
    pub fn approve_reservation(&self, reservation_id: &str, actor_id: &str) -> Result<Reservation> {
        self.review_reservation(reservation_id, actor_id, ReservationStatus::Approved)
    }

    /// Reject a pending reservation. Admin only.
    pub fn reject_reservation(&self, reservation_id: &str, actor_id: &str) -> Result<Reservation> {
        self.review_reservation(reservation_id, actor_id, ReservationStatus::Rejected)
    }

    fn review_reservation(
        &self,
        reservation_id: &str,
        actor_id: &str,
        verdict: ReservationStatus,
    ) -> Result<Reservation> {
        let mut doc = self.load();
        doc.require_admin(actor_id)?;

        let reservation = doc
            .reservations
            .iter()
            .find(|r| r.id == reservation_id)
            .ok_or_else(|| StoreError::NotFound(format!("reservation {reservation_id}")))?
            .clone();
        if reservation.status != ReservationStatus::Pending {
            return Err(StoreError::InvalidState(format!(
                "reservation {reservation_id} is already {:?}",
                reservation.status
            )));
        }

        if verdict == ReservationStatus::Approved {
            ensure_slot_free(
                &doc,
                &reservation.facility_id,
                reservation.date,
                reservation.start_time,
                reservation.end_time,
                Some(reservation_id),
            )?;
        }

        let record = doc
            .reservations
            .iter_mut()
            .find(|r| r.id == reservation_id)
            .expect("reservation found above");
        record.status = verdict;
        record.reviewed_by = Some(actor_id.to_string());
        record.reviewed_at = Some(Utc::now());
        let updated = record.clone();
        sync_booking(&mut doc, &updated);
        self.save(&mut doc)?;

        info!(reservation_id, status = ?verdict, "reservation reviewed");
        Ok(updated)
    }
}

/// Fail with `Conflict` if any blocking reservation (other than
/// `exclude`) occupies part of the requested slot.
fn ensure_slot_free(
    doc: &AppData,
    facility_id: &str,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    exclude: Option<&str>,
) -> Result<()> {
    let clash = overlapping_reservations(&doc.reservations, facility_id, date, start, end)
        .into_iter()
        .find(|r| exclude != Some(r.id.as_str()));
    if let Some(existing) = clash {
        return Err(StoreError::Conflict(format!(
            "facility {facility_id} is already reserved {}-{} on {date}",
            existing.start_time, existing.end_time
        )));
    }
    Ok(())
}

/// Mirror a reservation's status into its facility's booking summary.
fn sync_booking(doc: &mut AppData, reservation: &Reservation) {
    if let Some(facility) = doc.facility_mut(&reservation.facility_id) {
        if let Some(booking) = facility
            .bookings
            .iter_mut()
            .find(|b| b.reservation_id == reservation.id)
        {
            booking.status = reservation.status;
        }
    }
}
