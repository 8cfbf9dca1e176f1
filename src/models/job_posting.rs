use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row of `job_listings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct JobPosting {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub post_date: NaiveDate,
    pub organisation: String,
    pub job_details: Option<String>,
    pub vacancies: Option<i32>,
    pub location: Option<String>,
    pub qualification: Option<String>,
    pub last_date: NaiveDate,
    pub salary: Option<String>,
    pub picture: Option<String>,
    pub more_details: Option<String>,
    pub notification_link: Option<String>,
    pub apply_link: Option<String>,
}
