//! Operations on service requests.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use silverhome_shared::constants::{RATING_MAX, RATING_MIN};
use silverhome_shared::ids::new_id;
use silverhome_shared::types::{RequestCategory, RequestStatus, RequestUrgency};

use crate::document::Store;
use crate::error::{require_non_empty, Result, StoreError};
use crate::models::{Request, RequestFeedback};

/// Form payload for a new service request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRequest {
    pub requester_id: String,
    pub requester_name: String,
    pub category: RequestCategory,
    pub title: String,
    pub description: String,
    pub location: String,
    pub preferred_date: Option<NaiveDate>,
    pub urgency: RequestUrgency,
}

impl Store {
    /// Create a pending service request.
    pub fn create_request(&self, new: NewRequest) -> Result<Request> {
        require_non_empty("request title", &new.title)?;
        require_non_empty("request description", &new.description)?;
        require_non_empty("request location", &new.location)?;

        let mut doc = self.load();
        if doc.user(&new.requester_id).is_none() {
            return Err(StoreError::NotFound(format!("user {}", new.requester_id)));
        }

        let now = Utc::now();
        let request = Request {
            id: new_id("req"),
            requester_id: new.requester_id,
            requester_name: new.requester_name,
            category: new.category,
            title: new.title,
            description: new.description,
            location: new.location,
            preferred_date: new.preferred_date,
            urgency: new.urgency,
            status: RequestStatus::Pending,
            created_at: now,
            updated_at: now,
            assignee_id: None,
            assignee_name: None,
            feedback: None,
        };
        doc.requests.push(request.clone());
        self.save(&mut doc)?;

        info!(request_id = %request.id, category = ?request.category, "service request created");
        Ok(request)
    }

    /// Move a pending request to in-progress. Admin only.
    pub fn start_request(&self, request_id: &str, actor_id: &str) -> Result<Request> {
        self.transition_request(request_id, actor_id, RequestStatus::InProgress)
    }

    /// Mark an in-progress request completed. Admin only.
    pub fn complete_request(&self, request_id: &str, actor_id: &str) -> Result<Request> {
        self.transition_request(request_id, actor_id, RequestStatus::Completed)
    }

    /// Cancel a request. Allowed for the requester or an admin; completed
    /// and cancelled requests stay as they are.
    pub fn cancel_request(&self, request_id: &str, actor_id: &str) -> Result<Request> {
        let mut doc = self.load();
        let actor = doc
            .user(actor_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {actor_id}")))?
            .clone();

        let request = doc
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| StoreError::NotFound(format!("request {request_id}")))?;

        if request.requester_id != actor.id && !actor.is_admin() {
            return Err(StoreError::Forbidden(format!(
                "user {actor_id} may not cancel request {request_id}"
            )));
        }
        if !request.status.can_become(RequestStatus::Cancelled) {
            return Err(StoreError::InvalidState(format!(
                "request {request_id} cannot be cancelled from {:?}",
                request.status
            )));
        }

        request.status = RequestStatus::Cancelled;
        request.updated_at = Utc::now();
        let updated = request.clone();
        self.save(&mut doc)?;

        info!(request_id, "service request cancelled");
        Ok(updated)
    }

    /// Assign a request to a staff member. Admin only.
    pub fn assign_request(
        &self,
        request_id: &str,
        actor_id: &str,
        assignee_id: &str,
    ) -> Result<Request> {
        let mut doc = self.load();
        doc.require_admin(actor_id)?;
        let assignee = doc
            .user(assignee_id)
            .ok_or_else(|| StoreError::NotFound(format!("user {assignee_id}")))?
            .clone();

        let request = doc
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| StoreError::NotFound(format!("request {request_id}")))?;
        if request.status.is_terminal() {
            return Err(StoreError::InvalidState(format!(
                "request {request_id} is already {:?}",
                request.status
            )));
        }

        request.assignee_id = Some(assignee.id.clone());
        request.assignee_name = Some(assignee.name.clone());
        request.updated_at = Utc::now();
        let updated = request.clone();
        self.save(&mut doc)?;

        info!(request_id, assignee_id, "service request assigned");
        Ok(updated)
    }

    /// Leave feedback on a completed request. Requester only.
    pub fn submit_request_feedback(
        &self,
        request_id: &str,
        actor_id: &str,
        rating: u8,
        comment: &str,
    ) -> Result<Request> {
        if !(RATING_MIN..=RATING_MAX).contains(&rating) {
            return Err(StoreError::Validation(format!(
                "rating must be between {RATING_MIN} and {RATING_MAX}"
            )));
        }

        let mut doc = self.load();
        if doc.user(actor_id).is_none() {
            return Err(StoreError::NotFound(format!("user {actor_id}")));
        }

        let request = doc
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| StoreError::NotFound(format!("request {request_id}")))?;
        if request.requester_id != actor_id {
            return Err(StoreError::Forbidden(format!(
                "only the requester may leave feedback on request {request_id}"
            )));
        }
        if request.status != RequestStatus::Completed {
            return Err(StoreError::InvalidState(format!(
                "request {request_id} is not completed"
            )));
        }

        request.feedback = Some(RequestFeedback {
            rating,
            comment: comment.to_string(),
            submitted_at: Utc::now(),
        });
        request.updated_at = Utc::now();
        let updated = request.clone();
        self.save(&mut doc)?;

        info!(request_id, rating, "request feedback submitted");
        Ok(updated)
    }

    fn transition_request(
        &self,
        request_id: &str,
        actor_id: &str,
        next: RequestStatus,
    ) -> Result<Request> {
        let mut doc = self.load();
        doc.require_admin(actor_id)?;

        let request = doc
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| StoreError::NotFound(format!("request {request_id}")))?;
        if !request.status.can_become(next) {
            return Err(StoreError::InvalidState(format!(
                "request {request_id} cannot move from {:?} to {:?}",
                request.status, next
            )));
        }

        request.status = next;
        request.updated_at = Utc::now();
        let updated = request.clone();
        self.save(&mut doc)?;

        info!(request_id, status = ?next, "service request transitioned");
        Ok(updated)
    }
}
