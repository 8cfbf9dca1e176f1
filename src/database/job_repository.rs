use async_trait::async_trait;
use sqlx::PgPool;

use crate::dto::job_dto::{CreatedJob, JobPayload, PageRequest};
use crate::error::Result;
use crate::listing::sort::SortDirection;
use crate::models::job_posting::JobPosting;

const JOB_COLUMNS: &str = "id, created_at, post_date, organisation, job_details, vacancies, \
    location, qualification, last_date, salary, picture, more_details, notification_link, apply_link";

/// Persistence for `job_listings`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn ping(&self) -> Result<()>;

    async fn list(&self) -> Result<Vec<JobPosting>>;

    /// One sorted page plus the total row count.
    async fn list_page(&self, request: PageRequest) -> Result<(Vec<JobPosting>, i64)>;

    async fn find(&self, id: i64) -> Result<Option<JobPosting>>;

    async fn insert(&self, payload: &JobPayload, picture: Option<String>) -> Result<CreatedJob>;

    /// Overwrites every field; `picture` only when `Some`. `None` if the row is gone.
    async fn update(
        &self,
        id: i64,
        payload: &JobPayload,
        picture: Option<String>,
    ) -> Result<Option<JobPosting>>;

    /// `false` when no row matched.
    async fn delete(&self, id: i64) -> Result<bool>;
}

#[derive(Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobRepository {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<JobPosting>> {
        let query = format!("SELECT {} FROM job_listings", JOB_COLUMNS);
        let jobs = sqlx::query_as::<_, JobPosting>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    async fn list_page(&self, request: PageRequest) -> Result<(Vec<JobPosting>, i64)> {
        // Missing values sort first when ascending, last when descending.
        let nulls = match request.direction {
            SortDirection::Asc => "NULLS FIRST",
            SortDirection::Desc => "NULLS LAST",
        };
        let items_query = format!(
            "SELECT {}
             FROM job_listings
             ORDER BY {} {} {}, id ASC
             LIMIT $1 OFFSET $2",
            JOB_COLUMNS,
            request.sort.column(),
            request.direction.sql(),
            nulls
        );

        let items = sqlx::query_as::<_, JobPosting>(&items_query)
            .bind(request.per_page)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_listings")
            .fetch_one(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn find(&self, id: i64) -> Result<Option<JobPosting>> {
        let query = format!("SELECT {} FROM job_listings WHERE id = $1", JOB_COLUMNS);
        let job = sqlx::query_as::<_, JobPosting>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn insert(&self, payload: &JobPayload, picture: Option<String>) -> Result<CreatedJob> {
        let (id, created_at) = sqlx::query_as::<_, (i64, chrono::DateTime<chrono::Utc>)>(
            r#"
            INSERT INTO job_listings (
                post_date, organisation, job_details, qualification, last_date,
                vacancies, location, salary, picture, more_details,
                notification_link, apply_link
            ) VALUES (
                $1,$2,$3,$4,$5,
                $6,$7,$8,$9,$10,
                $11,$12
            )
            RETURNING id, created_at
            "#,
        )
        .bind(payload.post_date)
        .bind(&payload.organisation)
        .bind(&payload.job_details)
        .bind(&payload.qualification)
        .bind(payload.last_date)
        .bind(payload.vacancies)
        .bind(&payload.location)
        .bind(&payload.salary)
        .bind(picture)
        .bind(&payload.more_details)
        .bind(&payload.notification_link)
        .bind(&payload.apply_link)
        .fetch_one(&self.pool)
        .await?;

        Ok(CreatedJob { id, created_at })
    }

    async fn update(
        &self,
        id: i64,
        payload: &JobPayload,
        picture: Option<String>,
    ) -> Result<Option<JobPosting>> {
        let query = format!(
            r#"
            UPDATE job_listings
            SET
                post_date = $2,
                organisation = $3,
                job_details = $4,
                qualification = $5,
                last_date = $6,
                vacancies = $7,
                location = $8,
                salary = $9,
                picture = COALESCE($10, picture),
                more_details = $11,
                notification_link = $12,
                apply_link = $13
            WHERE id = $1
            RETURNING {}
            "#,
            JOB_COLUMNS
        );

        let job = sqlx::query_as::<_, JobPosting>(&query)
            .bind(id)
            .bind(payload.post_date)
            .bind(&payload.organisation)
            .bind(&payload.job_details)
            .bind(&payload.qualification)
            .bind(payload.last_date)
            .bind(payload.vacancies)
            .bind(&payload.location)
            .bind(&payload.salary)
            .bind(picture)
            .bind(&payload.more_details)
            .bind(&payload.notification_link)
            .bind(&payload.apply_link)
            .fetch_optional(&self.pool)
            .await?;

        Ok(job)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let res = sqlx::query("DELETE FROM job_listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(res.rows_affected() > 0)
    }
}
