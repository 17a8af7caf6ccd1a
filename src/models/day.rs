use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Academic cycle labels offered for a day.
pub const DAY_ORDERS: &[&str] = &["I", "II", "III", "IV", "V", "VI"];

/// Placeholder stored when no day order was picked.
pub const DAY_ORDER_UNSET: &str = "-";

/// One calendar date's notice-board header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Day {
    pub id: Uuid,
    pub notice_date: NaiveDate,
    pub day_name: String,
    pub day_order: String,
    pub day_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Writable columns of a day row. `notice_date` is the natural key.
#[derive(Debug, Clone, PartialEq)]
pub struct DayFields {
    pub notice_date: NaiveDate,
    pub day_name: String,
    pub day_order: String,
    pub day_count: i32,
}

/// Query params for GET /days.
#[derive(Debug, Default, Deserialize)]
pub struct DayFilter {
    pub date: Option<NaiveDate>,
}
