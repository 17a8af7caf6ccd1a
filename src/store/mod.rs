pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    announcement::{Announcement, AnnouncementFields, AnnouncementWithDate},
    day::{Day, DayFields},
};

pub use memory::MemoryStore;
pub use postgres::PgNoticeStore;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("{0} not found")]
    NotFound(String),
    /// The store holds data its own invariants should have ruled out,
    /// e.g. two day rows for one date.
    #[error("store integrity error: {0}")]
    Integrity(String),
    #[error("store query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => StoreError::NotFound("row".into()),
            sqlx::Error::Database(db)
                if db.is_unique_violation()
                    || db.is_foreign_key_violation()
                    || db.is_check_violation() =>
            {
                StoreError::ConstraintViolation(db.message().to_string())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => StoreError::Unavailable(e.to_string()),
            _ => StoreError::Query(e.to_string()),
        }
    }
}

/// Persistence operations the notice board needs.
///
/// Implementations must enforce one day row per `notice_date` and refuse to
/// delete a day that still owns announcements.
#[async_trait]
pub trait NoticeStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Zero or one day for `date`. More than one stored row is an
    /// [`StoreError::Integrity`] error.
    async fn find_day_by_date(&self, date: NaiveDate) -> Result<Option<Day>, StoreError>;

    /// Day with the most recent `notice_date`, if any.
    async fn latest_day(&self) -> Result<Option<Day>, StoreError>;

    async fn insert_day(&self, fields: &DayFields) -> Result<Day, StoreError>;

    /// Overwrites name, order and count. The id and date never change.
    async fn update_day(&self, id: Uuid, fields: &DayFields) -> Result<Day, StoreError>;

    async fn insert_announcement(
        &self,
        day_id: Uuid,
        fields: &AnnouncementFields,
    ) -> Result<Announcement, StoreError>;

    /// Overwrites title and message of announcement `id` owned by `day_id`.
    /// A row that exists under another day is [`StoreError::NotFound`].
    async fn update_announcement(
        &self,
        day_id: Uuid,
        id: Uuid,
        fields: &AnnouncementFields,
    ) -> Result<Announcement, StoreError>;

    async fn delete_announcement(&self, id: Uuid) -> Result<(), StoreError>;

    /// Like [`NoticeStore::delete_announcement`], restricted to rows owned by
    /// `day_id`.
    async fn delete_day_announcement(&self, day_id: Uuid, id: Uuid) -> Result<(), StoreError>;

    async fn list_announcements_by_day(&self, day_id: Uuid)
        -> Result<Vec<Announcement>, StoreError>;

    /// Returns the number of rows removed.
    async fn delete_announcements_by_day_id(&self, day_id: Uuid) -> Result<u64, StoreError>;

    async fn delete_day(&self, id: Uuid) -> Result<(), StoreError>;

    /// Delete a day's announcements, then the day itself.
    ///
    /// The default runs the two steps back to back; backends with
    /// transactions override it so a failure leaves both tables untouched.
    async fn delete_day_cascade(&self, id: Uuid) -> Result<u64, StoreError> {
        let removed = self.delete_announcements_by_day_id(id).await?;
        self.delete_day(id).await?;
        Ok(removed)
    }

    /// Days ordered by `notice_date`, most recent first.
    async fn list_days(&self, date: Option<NaiveDate>) -> Result<Vec<Day>, StoreError>;

    async fn list_announcements_with_day(&self) -> Result<Vec<AnnouncementWithDate>, StoreError>;
}
