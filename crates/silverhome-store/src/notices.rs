//! Operations on notices.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use silverhome_shared::ids::new_id;

use crate::document::Store;
use crate::error::{require_non_empty, Result, StoreError};
use crate::models::{Notice, NoticeAttachment};

/// Form payload for a new notice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotice {
    pub title: String,
    pub body: String,
    pub category: String,
    pub pinned: bool,
    #[serde(default)]
    pub attachments: Vec<NoticeAttachment>,
}

impl Store {
    /// Publish a notice. Admin only.
    pub fn post_notice(&self, actor_id: &str, new: NewNotice) -> Result<Notice> {
        require_non_empty("notice title", &new.title)?;
        require_non_empty("notice body", &new.body)?;

        let mut doc = self.load();
        let author = doc.require_admin(actor_id)?.clone();

        let now = Utc::now();
        let notice = Notice {
            id: new_id("notice"),
            title: new.title,
            body: new.body,
            category: new.category,
            pinned: new.pinned,
            author_id: author.id,
            author_name: author.name,
            created_at: now,
            updated_at: now,
            attachments: new.attachments,
        };
        doc.notices.push(notice.clone());
        self.save(&mut doc)?;

        info!(notice_id = %notice.id, pinned = notice.pinned, "notice posted");
        Ok(notice)
    }

    /// Edit a notice's text and category. Admin only.
    pub fn update_notice(
        &self,
        notice_id: &str,
        actor_id: &str,
        title: &str,
        body: &str,
        category: &str,
    ) -> Result<Notice> {
        require_non_empty("notice title", title)?;
        require_non_empty("notice body", body)?;

        let mut doc = self.load();
        doc.require_admin(actor_id)?;

        let notice = doc
            .notices
            .iter_mut()
            .find(|n| n.id == notice_id)
            .ok_or_else(|| StoreError::NotFound(format!("notice {notice_id}")))?;
        notice.title = title.to_string();
        notice.body = body.to_string();
        notice.category = category.to_string();
        notice.updated_at = Utc::now();
        let updated = notice.clone();
        self.save(&mut doc)?;

        info!(notice_id, "notice updated");
        Ok(updated)
    }

    /// Pin or unpin a notice. Admin only.
    pub fn set_notice_pinned(
        &self,
        notice_id: &str,
        actor_id: &str,
        pinned: bool,
    ) -> Result<Notice> {
        let mut doc = self.load();
        doc.require_admin(actor_id)?;

        let notice = doc
            .notices
            .iter_mut()
            .find(|n| n.id == notice_id)
            .ok_or_else(|| StoreError::NotFound(format!("notice {notice_id}")))?;
        notice.pinned = pinned;
        notice.updated_at = Utc::now();
        let updated = notice.clone();
        self.save(&mut doc)?;

        info!(notice_id, pinned, "notice pin toggled");
        Ok(updated)
    }

    /// Remove a notice outright. Admin only. Notices are one of the few
    /// collections with hard deletes.
    pub fn delete_notice(&self, notice_id: &str, actor_id: &str) -> Result<()> {
        let mut doc = self.load();
        doc.require_admin(actor_id)?;

        let before = doc.notices.len();
        doc.notices.retain(|n| n.id != notice_id);
        if doc.notices.len() == before {
            return Err(StoreError::NotFound(format!("notice {notice_id}")));
        }
        self.save(&mut doc)?;

        info!(notice_id, "notice deleted");
        Ok(())
    }
}
