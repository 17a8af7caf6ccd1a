use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    models::{announcement::AnnouncementWithDate, day::Day},
    store::{NoticeStore, StoreError},
};

/// Pass-through browse and delete operations for past notices.
pub struct AdminService;

impl AdminService {
    pub async fn list_days(
        store: &dyn NoticeStore,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Day>, StoreError> {
        store.list_days(date).await
    }

    /// Announcements with their day's date, newest date first. The date filter
    /// is applied after the join.
    pub async fn list_announcements(
        store: &dyn NoticeStore,
        date: Option<NaiveDate>,
    ) -> Result<Vec<AnnouncementWithDate>, StoreError> {
        let rows = store.list_announcements_with_day().await?;
        Ok(match date {
            Some(date) => rows.into_iter().filter(|a| a.notice_date == date).collect(),
            None => rows,
        })
    }

    pub async fn delete_announcement(store: &dyn NoticeStore, id: Uuid) -> Result<(), StoreError> {
        store.delete_announcement(id).await?;
        tracing::info!("Deleted announcement {}", id);
        Ok(())
    }

    /// Delete a day after its announcements. Returns how many announcements
    /// went with it.
    pub async fn delete_day(store: &dyn NoticeStore, id: Uuid) -> Result<u64, StoreError> {
        let removed = store.delete_day_cascade(id).await?;
        tracing::info!("Deleted day {} and {} announcement(s)", id, removed);
        Ok(removed)
    }
}
