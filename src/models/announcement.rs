use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: Uuid,
    pub day_id: Uuid,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementFields {
    pub title: String,
    pub message: String,
}

/// Announcement row joined with the date of the day that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AnnouncementWithDate {
    pub id: Uuid,
    pub day_id: Uuid,
    pub title: String,
    pub message: String,
    pub notice_date: NaiveDate,
}

/// An announcement as edited in the form, not necessarily persisted.
///
/// `id` is set when the draft was loaded from an existing row (edit flow).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementDraft {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

impl AnnouncementDraft {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            message: message.into(),
        }
    }

    /// A draft is blank when its title or its message is empty after trimming.
    /// Blank drafts are never written by a save.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() || self.message.trim().is_empty()
    }
}

impl From<Announcement> for AnnouncementDraft {
    fn from(a: Announcement) -> Self {
        Self {
            id: Some(a.id),
            title: a.title,
            message: a.message,
        }
    }
}
