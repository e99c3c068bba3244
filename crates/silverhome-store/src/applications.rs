//! Operations on admission applications.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use silverhome_shared::ids::new_id;
use silverhome_shared::types::ApplicationStatus;

use crate::document::Store;
use crate::error::{require_non_empty, Result, StoreError};
use crate::models::Application;

/// Form payload for an admission application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewApplication {
    pub applicant_name: String,
    pub applicant_phone: String,
    pub applicant_email: Option<String>,
    pub desired_move_in: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

impl Store {
    /// Submit an admission application. Applicants are not portal users
    /// yet, so there is no foreign-key check here.
    pub fn submit_application(&self, new: NewApplication) -> Result<Application> {
        require_non_empty("applicant name", &new.applicant_name)?;
        require_non_empty("applicant phone", &new.applicant_phone)?;

        let mut doc = self.load();
        let application = Application {
            id: new_id("app"),
            applicant_name: new.applicant_name,
            applicant_phone: new.applicant_phone,
            applicant_email: new.applicant_email,
            desired_move_in: new.desired_move_in,
            notes: new.notes,
            status: ApplicationStatus::Pending,
            submitted_at: Utc::now(),
            reviewed_by: None,
            reviewed_at: None,
            review_notes: None,
        };
        doc.applications.push(application.clone());
        self.save(&mut doc)?;

        info!(application_id = %application.id, "admission application submitted");
        Ok(application)
    }

    /// Approve a pending application. Admin only.
    pub fn approve_application(
        &self,
        application_id: &str,
        reviewer_id: &str,
        notes: Option<&str>,
    ) -> Result<Application> {
        self.review_application(application_id, reviewer_id, ApplicationStatus::Approved, notes)
    }

    /// Reject a pending application. Admin only.
    pub fn reject_application(
        &self,
        application_id: &str,
        reviewer_id: &str,
        notes: Option<&str>,
    ) -> Result<Application> {
        self.review_application(application_id, reviewer_id, ApplicationStatus::Rejected, notes)
    }

    fn review_application(
        &self,
        application_id: &str,
        reviewer_id: &str,
        verdict: ApplicationStatus,
        notes: Option<&str>,
    ) -> Result<Application> {
        let mut doc = self.load();
        doc.require_admin(reviewer_id)?;

        let application = doc
            .applications
            .iter_mut()
            .find(|a| a.id == application_id)
            .ok_or_else(|| StoreError::NotFound(format!("application {application_id}")))?;
        if application.status != ApplicationStatus::Pending {
            return Err(StoreError::InvalidState(format!(
                "application {application_id} is already {:?}",
                application.status
            )));
        }

        application.status = verdict;
        application.reviewed_by = Some(reviewer_id.to_string());
        application.reviewed_at = Some(Utc::now());
        application.review_notes = notes.map(str::to_string);
        let updated = application.clone();
        self.save(&mut doc)?;

        info!(application_id, status = ?verdict, "application reviewed");
        Ok(updated)
    }
}
