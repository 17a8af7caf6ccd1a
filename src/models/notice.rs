use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    announcement::{Announcement, AnnouncementDraft},
    day::{Day, DayFields},
};

/// Body for PUT /notices: one day header plus the announcement drafts
/// currently held by the form.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveNoticeRequest {
    pub date: NaiveDate,
    pub day_name: String,
    pub day_order: String,
    pub day_count: i32,
    #[serde(default)]
    pub announcements: Vec<AnnouncementDraft>,
}

impl SaveNoticeRequest {
    pub fn day_fields(&self) -> DayFields {
        DayFields {
            notice_date: self.date,
            day_name: self.day_name.clone(),
            day_order: self.day_order.clone(),
            day_count: self.day_count,
        }
    }
}

/// Outcome of a successful save.
#[derive(Debug, Clone, Serialize)]
pub struct SavedNotice {
    pub day: Day,
    /// True when the day row did not exist before this save.
    pub created: bool,
    /// Rows written by this save, in draft order.
    pub announcements: Vec<Announcement>,
    /// Blank drafts skipped.
    pub dropped: usize,
    /// Previously stored rows deleted because their draft was blanked.
    pub pruned: usize,
}

/// A stored day with its announcements, ready to be edited and saved again.
#[derive(Debug, Clone, Serialize)]
pub struct EditableNotice {
    pub day: Day,
    pub announcements: Vec<AnnouncementDraft>,
}

/// Values the form starts from.
#[derive(Debug, Clone, Serialize)]
pub struct NoticeDefaults {
    pub date: NaiveDate,
    pub day_name: String,
    pub day_count: i32,
    pub day_orders: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub access_code: String,
}
