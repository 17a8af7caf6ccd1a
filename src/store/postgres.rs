use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::{NoticeStore, StoreError};
use crate::models::{
    announcement::{Announcement, AnnouncementFields, AnnouncementWithDate},
    day::{Day, DayFields},
};

const DAY_COLUMNS: &str =
    r#"id, notice_date, day_name, day_order, day_count, created_at, updated_at"#;
const ANNOUNCEMENT_COLUMNS: &str = r#"id, day_id, title, message, created_at, updated_at"#;

#[derive(Debug, Clone)]
pub struct PgNoticeStore {
    pool: PgPool,
}

impl PgNoticeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoticeStore for PgNoticeStore {
    fn backend_tag(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query(r#"SELECT 1"#).execute(&self.pool).await?;
        Ok(())
    }

    async fn find_day_by_date(&self, date: NaiveDate) -> Result<Option<Day>, StoreError> {
        // LIMIT 2 is enough to tell "one" from "more than one".
        let mut rows = sqlx::query_as::<_, Day>(&format!(
            r#"SELECT {DAY_COLUMNS}
               FROM notice_board_days
               WHERE notice_date = $1
               LIMIT 2"#
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        if rows.len() > 1 {
            return Err(StoreError::Integrity(format!(
                "more than one day row for {date}"
            )));
        }
        Ok(rows.pop())
    }

    async fn latest_day(&self) -> Result<Option<Day>, StoreError> {
        let day = sqlx::query_as::<_, Day>(&format!(
            r#"SELECT {DAY_COLUMNS}
               FROM notice_board_days
               ORDER BY notice_date DESC
               LIMIT 1"#
        ))
        .fetch_optional(&self.pool)
        .await?;
        Ok(day)
    }

    async fn insert_day(&self, fields: &DayFields) -> Result<Day, StoreError> {
        let day = sqlx::query_as::<_, Day>(&format!(
            r#"INSERT INTO notice_board_days (notice_date, day_name, day_order, day_count)
               VALUES ($1, $2, $3, $4)
               RETURNING {DAY_COLUMNS}"#
        ))
        .bind(fields.notice_date)
        .bind(&fields.day_name)
        .bind(&fields.day_order)
        .bind(fields.day_count)
        .fetch_one(&self.pool)
        .await?;
        Ok(day)
    }

    async fn update_day(&self, id: Uuid, fields: &DayFields) -> Result<Day, StoreError> {
        sqlx::query_as::<_, Day>(&format!(
            r#"UPDATE notice_board_days
               SET day_name = $1,
                   day_order = $2,
                   day_count = $3,
                   updated_at = NOW()
               WHERE id = $4
               RETURNING {DAY_COLUMNS}"#
        ))
        .bind(&fields.day_name)
        .bind(&fields.day_order)
        .bind(fields.day_count)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("day {id}")))
    }

    async fn insert_announcement(
        &self,
        day_id: Uuid,
        fields: &AnnouncementFields,
    ) -> Result<Announcement, StoreError> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            r#"INSERT INTO announcements (day_id, title, message)
               VALUES ($1, $2, $3)
               RETURNING {ANNOUNCEMENT_COLUMNS}"#
        ))
        .bind(day_id)
        .bind(&fields.title)
        .bind(&fields.message)
        .fetch_one(&self.pool)
        .await?;
        Ok(announcement)
    }

    async fn update_announcement(
        &self,
        day_id: Uuid,
        id: Uuid,
        fields: &AnnouncementFields,
    ) -> Result<Announcement, StoreError> {
        sqlx::query_as::<_, Announcement>(&format!(
            r#"UPDATE announcements
               SET title = $1,
                   message = $2,
                   updated_at = NOW()
               WHERE id = $3 AND day_id = $4
               RETURNING {ANNOUNCEMENT_COLUMNS}"#
        ))
        .bind(&fields.title)
        .bind(&fields.message)
        .bind(id)
        .bind(day_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("announcement {id} of day {day_id}")))
    }

    async fn delete_announcement(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM announcements WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("announcement {id}")));
        }
        Ok(())
    }

    async fn delete_day_announcement(&self, day_id: Uuid, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM announcements WHERE id = $1 AND day_id = $2"#)
            .bind(id)
            .bind(day_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
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
        let rows = sqlx::query_as::<_, Announcement>(&format!(
            r#"SELECT {ANNOUNCEMENT_COLUMNS}
               FROM announcements
               WHERE day_id = $1
               ORDER BY created_at"#
        ))
        .bind(day_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete_announcements_by_day_id(&self, day_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query(r#"DELETE FROM announcements WHERE day_id = $1"#)
            .bind(day_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_day(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM notice_board_days WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("day {id}")));
        }
        Ok(())
    }

    async fn delete_day_cascade(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(r#"DELETE FROM announcements WHERE day_id = $1"#)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query(r#"DELETE FROM notice_board_days WHERE id = $1"#)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            // Dropping `tx` rolls the announcement delete back.
            return Err(StoreError::NotFound(format!("day {id}")));
        }

        tx.commit().await?;
        Ok(removed)
    }

    async fn list_days(&self, date: Option<NaiveDate>) -> Result<Vec<Day>, StoreError> {
        let days = sqlx::query_as::<_, Day>(&format!(
            r#"SELECT {DAY_COLUMNS}
               FROM notice_board_days
               WHERE $1::DATE IS NULL OR notice_date = $1
               ORDER BY notice_date DESC"#
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(days)
    }

    async fn list_announcements_with_day(
        &self,
    ) -> Result<Vec<AnnouncementWithDate>, StoreError> {
        let rows = sqlx::query_as::<_, AnnouncementWithDate>(
            r#"SELECT a.id, a.day_id, a.title, a.message, d.notice_date
               FROM announcements a
               INNER JOIN notice_board_days d ON d.id = a.day_id
               ORDER BY d.notice_date DESC, a.created_at"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
