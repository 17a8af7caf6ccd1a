use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::{NoticeStore, StoreError};
use crate::models::{
    announcement::{Announcement, AnnouncementFields, AnnouncementWithDate},
    day::{Day, DayFields},
};

#[derive(Debug, Default)]
struct Tables {
    days: Vec<Day>,
    announcements: Vec<Announcement>,
}

/// In-process store with the same constraints as the PostgreSQL schema:
/// unique `notice_date`, and `announcements.day_id` must reference an
/// existing day (so a day cannot be deleted while it owns announcements).
///
/// Every operation is recorded by name, and a failure can be armed for the
/// next call of a given operation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, StoreError>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call to `op` fail with `error`.
    pub fn fail_on(&self, op: &'static str, error: StoreError) {
        lock(&self.failures).insert(op, error);
    }

    /// Names of the operations called so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Insert a day row as-is, skipping the unique date check.
    pub fn seed_day(&self, day: Day) {
        lock(&self.tables).days.push(day);
    }

    pub fn days(&self) -> Vec<Day> {
        lock(&self.tables).days.clone()
    }

    pub fn announcements(&self) -> Vec<Announcement> {
        lock(&self.tables).announcements.clone()
    }

    fn enter(&self, op: &'static str) -> Result<(), StoreError> {
        lock(&self.calls).push(op);
        match lock(&self.failures).remove(op) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl NoticeStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.enter("ping")
    }

    async fn find_day_by_date(&self, date: NaiveDate) -> Result<Option<Day>, StoreError> {
        self.enter("find_day_by_date")?;
        let tables = lock(&self.tables);
        let mut matches = tables.days.iter().filter(|d| d.notice_date == date);
        let first = matches.next().cloned();
        if matches.next().is_some() {
            return Err(StoreError::Integrity(format!(
                "more than one day row for {date}"
            )));
        }
        Ok(first)
    }

    async fn latest_day(&self) -> Result<Option<Day>, StoreError> {
        self.enter("latest_day")?;
        let tables = lock(&self.tables);
        Ok(tables.days.iter().max_by_key(|d| d.notice_date).cloned())
    }

    async fn insert_day(&self, fields: &DayFields) -> Result<Day, StoreError> {
        self.enter("insert_day")?;
        let mut tables = lock(&self.tables);
        if tables.days.iter().any(|d| d.notice_date == fields.notice_date) {
            return Err(StoreError::ConstraintViolation(format!(
                "duplicate notice_date {}",
                fields.notice_date
            )));
        }
        let now = Utc::now();
        let day = Day {
            id: Uuid::new_v4(),
            notice_date: fields.notice_date,
            day_name: fields.day_name.clone(),
            day_order: fields.day_order.clone(),
            day_count: fields.day_count,
            created_at: now,
            updated_at: now,
        };
        tables.days.push(day.clone());
        Ok(day)
    }

    async fn update_day(&self, id: Uuid, fields: &DayFields) -> Result<Day, StoreError> {
        self.enter("update_day")?;
        let mut tables = lock(&self.tables);
        let day = tables
            .days
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("day {id}")))?;
        day.day_name = fields.day_name.clone();
        day.day_order = fields.day_order.clone();
        day.day_count = fields.day_count;
        day.updated_at = Utc::now();
        Ok(day.clone())
    }

    async fn insert_announcement(
        &self,
        day_id: Uuid,
        fields: &AnnouncementFields,
    ) -> Result<Announcement, StoreError> {
        self.enter("insert_announcement")?;
        let mut tables = lock(&self.tables);
        if !tables.days.iter().any(|d| d.id == day_id) {
            return Err(StoreError::ConstraintViolation(format!(
                "announcement references missing day {day_id}"
            )));
        }
        let now = Utc::now();
        let announcement = Announcement {
            id: Uuid::new_v4(),
            day_id,
            title: fields.title.clone(),
            message: fields.message.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.announcements.push(announcement.clone());
        Ok(announcement)
    }

    async fn update_announcement(
        &self,
        day_id: Uuid,
        id: Uuid,
        fields: &AnnouncementFields,
    ) -> Result<Announcement, StoreError> {
        self.enter("update_announcement")?;
        let mut tables = lock(&self.tables);
        let announcement = tables
            .announcements
            .iter_mut()
            .find(|a| a.id == id && a.day_id == day_id)
            .ok_or_else(|| StoreError::NotFound(format!("announcement {id}")))?;
        announcement.title = fields.title.clone();
        announcement.message = fields.message.clone();
        announcement.updated_at = Utc::now();
        Ok(announcement.clone())
    }

    async fn delete_announcement(&self, id: Uuid) -> Result<(), StoreError> {
        self.enter("delete_announcement")?;
        let mut tables = lock(&self.tables);
        let before = tables.announcements.len();
        tables.announcements.retain(|a| a.id != id);
        if tables.announcements.len() == before {
            return Err(StoreError::NotFound(format!("announcement {id}")));
        }
        Ok(())
    }

    async fn delete_day_announcement(&self, day_id: Uuid, id: Uuid) -> Result<(), StoreError> {
        self.enter("delete_day_announcement")?;
        let mut tables = lock(&self.tables);
        let before = tables.announcements.len();
        tables
            .announcements
            .retain(|a| !(a.id == id && a.day_id == day_id));
        if tables.announcements.len() == before {
            return Err(StoreError::NotFound(format!(
                "announcement {id} of day {day_id}"
            )));
        }
        Ok(())
    }

    async fn list_announcements_by_day(
        &self,
        day_id: Uuid,
    ) -> Result<Vec<Announcement>, StoreError> {
        self.enter("list_announcements_by_day")?;
        let tables = lock(&self.tables);
        Ok(tables
            .announcements
            .iter()
            .filter(|a| a.day_id == day_id)
            .cloned()
            .collect())
    }

    async fn delete_announcements_by_day_id(&self, day_id: Uuid) -> Result<u64, StoreError> {
        self.enter("delete_announcements_by_day_id")?;
        let mut tables = lock(&self.tables);
        let before = tables.announcements.len();
        tables.announcements.retain(|a| a.day_id != day_id);
        Ok((before - tables.announcements.len()) as u64)
    }

    async fn delete_day(&self, id: Uuid) -> Result<(), StoreError> {
        self.enter("delete_day")?;
        let mut tables = lock(&self.tables);
        if tables.announcements.iter().any(|a| a.day_id == id) {
            return Err(StoreError::ConstraintViolation(format!(
                "day {id} still has announcements"
            )));
        }
        let before = tables.days.len();
        tables.days.retain(|d| d.id != id);
        if tables.days.len() == before {
            return Err(StoreError::NotFound(format!("day {id}")));
        }
        Ok(())
    }

    async fn delete_day_cascade(&self, id: Uuid) -> Result<u64, StoreError> {
        // Both steps run under a single lock so a missing day leaves the
        // announcements table untouched.
        self.enter("delete_announcements_by_day_id")?;
        self.enter("delete_day")?;
        let mut tables = lock(&self.tables);
        if !tables.days.iter().any(|d| d.id == id) {
            return Err(StoreError::NotFound(format!("day {id}")));
        }
        let before = tables.announcements.len();
        tables.announcements.retain(|a| a.day_id != id);
        let removed = (before - tables.announcements.len()) as u64;
        tables.days.retain(|d| d.id != id);
        Ok(removed)
    }

    async fn list_days(&self, date: Option<NaiveDate>) -> Result<Vec<Day>, StoreError> {
        self.enter("list_days")?;
        let tables = lock(&self.tables);
        let mut days: Vec<Day> = tables
            .days
            .iter()
            .filter(|d| date.map_or(true, |date| d.notice_date == date))
            .cloned()
            .collect();
        days.sort_by(|a, b| b.notice_date.cmp(&a.notice_date));
        Ok(days)
    }

    async fn list_announcements_with_day(
        &self,
    ) -> Result<Vec<AnnouncementWithDate>, StoreError> {
        self.enter("list_announcements_with_day")?;
        let tables = lock(&self.tables);
        let dates: HashMap<Uuid, NaiveDate> =
            tables.days.iter().map(|d| (d.id, d.notice_date)).collect();
        let mut rows: Vec<AnnouncementWithDate> = tables
            .announcements
            .iter()
            .filter_map(|a| {
                dates.get(&a.day_id).map(|notice_date| AnnouncementWithDate {
                    id: a.id,
                    day_id: a.day_id,
                    title: a.title.clone(),
                    message: a.message.clone(),
                    notice_date: *notice_date,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.notice_date.cmp(&a.notice_date));
        Ok(rows)
    }
}
