//! Operations on calendar schedules.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::info;

use silverhome_shared::ids::new_id;

use crate::document::Store;
use crate::error::{require_non_empty, Result, StoreError};
use crate::models::Schedule;

/// Form payload for a calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSchedule {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub description: String,
    pub category: String,
}

impl Store {
    /// Add a calendar event. Admin only.
    pub fn create_schedule(&self, actor_id: &str, new: NewSchedule) -> Result<Schedule> {
        require_non_empty("schedule title", &new.title)?;
        if new.end_time <= new.start_time {
            return Err(StoreError::Validation(
                "schedule end time must be after start time".to_string(),
            ));
        }

        let mut doc = self.load();
        doc.require_admin(actor_id)?;

        let schedule = Schedule {
            id: new_id("schedule"),
            title: new.title,
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            location: new.location,
            description: new.description,
            category: new.category,
        };
        doc.schedules.push(schedule.clone());
        self.save(&mut doc)?;

        info!(schedule_id = %schedule.id, date = %schedule.date, "schedule created");
        Ok(schedule)
    }

    /// Replace an event's details. Admin only.
    pub fn update_schedule(
        &self,
        schedule_id: &str,
        actor_id: &str,
        new: NewSchedule,
    ) -> Result<Schedule> {
        require_non_empty("schedule title", &new.title)?;
        if new.end_time <= new.start_time {
            return Err(StoreError::Validation(
                "schedule end time must be after start time".to_string(),
            ));
        }

        let mut doc = self.load();
        doc.require_admin(actor_id)?;

        let schedule = doc
            .schedules
            .iter_mut()
            .find(|s| s.id == schedule_id)
            .ok_or_else(|| StoreError::NotFound(format!("schedule {schedule_id}")))?;
        schedule.title = new.title;
        schedule.date = new.date;
        schedule.start_time = new.start_time;
        schedule.end_time = new.end_time;
        schedule.location = new.location;
        schedule.description = new.description;
        schedule.category = new.category;
        let updated = schedule.clone();
        self.save(&mut doc)?;

        info!(schedule_id, "schedule updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewSchedule {
        NewSchedule {
            title: "Singing class".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 12).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            location: "Community Lounge".to_string(),
            description: "Weekly singing class".to_string(),
            category: "culture".to_string(),
        }
    }

    #[test]
    fn create_and_update() {
        let store = Store::in_memory();
        let schedule = store.create_schedule("user-admin", sample()).unwrap();

        let mut edit = sample();
        edit.location = "Fitness Room".to_string();
        let updated = store
            .update_schedule(&schedule.id, "user-admin", edit)
            .unwrap();
        assert_eq!(updated.location, "Fitness Room");
    }

    #[test]
    fn inverted_times_are_rejected() {
        let store = Store::in_memory();
        let mut new = sample();
        new.end_time = new.start_time;
        let err = store.create_schedule("user-admin", new).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn non_admin_cannot_create() {
        let store = Store::in_memory();
        let err = store.create_schedule("user-family", sample()).unwrap_err();
        assert!(matches!(err, StoreError::Forbidden(_)));
    }
}
