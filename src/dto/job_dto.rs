use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{Error, Result};
use crate::listing::sort::{SortDirection, SortKey};
use crate::models::job_posting::JobPosting;

/// Text fields of a create/update submission. Every field is written as
/// submitted on update, so an absent optional clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct JobPayload {
    #[validate(required(message = "post_date is required"))]
    pub post_date: Option<NaiveDate>,
    #[validate(required(message = "organisation is required"), length(min = 1))]
    pub organisation: Option<String>,
    pub job_details: Option<String>,
    #[validate(range(min = 0, message = "vacancies cannot be negative"))]
    pub vacancies: Option<i32>,
    pub location: Option<String>,
    pub qualification: Option<String>,
    #[validate(required(message = "last_date is required"))]
    pub last_date: Option<NaiveDate>,
    pub salary: Option<String>,
    pub more_details: Option<String>,
    #[validate(url(message = "notification_link must be a URL"))]
    pub notification_link: Option<String>,
    #[validate(url(message = "apply_link must be a URL"))]
    pub apply_link: Option<String>,
}

impl JobPayload {
    /// Applies one multipart text field. Blank values count as absent and
    /// unknown names are ignored.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<()> {
        let value = normalize(raw);
        match name {
            "post_date" => self.post_date = value.as_deref().map(|v| parse_date(name, v)).transpose()?,
            "organisation" => self.organisation = value,
            "job_details" => self.job_details = value,
            "vacancies" => {
                self.vacancies = value
                    .as_deref()
                    .map(|v| {
                        v.parse::<i32>().map_err(|_| {
                            Error::BadRequest("vacancies must be a whole number".to_string())
                        })
                    })
                    .transpose()?
            }
            "location" => self.location = value,
            "qualification" => self.qualification = value,
            "last_date" => self.last_date = value.as_deref().map(|v| parse_date(name, v)).transpose()?,
            "salary" => self.salary = value,
            "more_details" => self.more_details = value,
            "notification_link" => self.notification_link = value,
            "apply_link" => self.apply_link = value,
            other => tracing::debug!(field = other, "ignoring unknown job form field"),
        }
        Ok(())
    }

    /// Form fields for submitting this payload, omitting absent values.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        let mut push = |name: &'static str, value: Option<String>| {
            if let Some(value) = value {
                fields.push((name, value));
            }
        };
        push("post_date", self.post_date.map(|d| d.to_string()));
        push("organisation", self.organisation.clone());
        push("job_details", self.job_details.clone());
        push("vacancies", self.vacancies.map(|v| v.to_string()));
        push("location", self.location.clone());
        push("qualification", self.qualification.clone());
        push("last_date", self.last_date.map(|d| d.to_string()));
        push("salary", self.salary.clone());
        push("more_details", self.more_details.clone());
        push("notification_link", self.notification_link.clone());
        push("apply_link", self.apply_link.clone());
        fields
    }
}

impl From<&JobPosting> for JobPayload {
    fn from(job: &JobPosting) -> Self {
        Self {
            post_date: Some(job.post_date),
            organisation: Some(job.organisation.clone()),
            job_details: job.job_details.clone(),
            vacancies: job.vacancies,
            location: job.location.clone(),
            qualification: job.qualification.clone(),
            last_date: Some(job.last_date),
            salary: job.salary.clone(),
            more_details: job.more_details.clone(),
            notification_link: job.notification_link.clone(),
            apply_link: job.apply_link.clone(),
        }
    }
}

fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp, which is what an edit
/// form echoes back after loading a record.
fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| Error::BadRequest(format!("{} must be a date (YYYY-MM-DD)", field)))
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatedJob {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Multipart body of create/update, for the API docs.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct JobForm {
    #[schema(value_type = String, format = Date)]
    post_date: String,
    organisation: String,
    job_details: Option<String>,
    vacancies: Option<i32>,
    location: Option<String>,
    qualification: Option<String>,
    #[schema(value_type = String, format = Date)]
    last_date: String,
    salary: Option<String>,
    more_details: Option<String>,
    notification_link: Option<String>,
    apply_link: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    picture: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, IntoParams)]
#[serde(default)]
#[into_params(parameter_in = Query)]
pub struct JobListQuery {
    /// created_at, post_date, last_date or vacancies
    pub sort: Option<String>,
    /// asc or desc
    pub order: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Parsed form of [`JobListQuery`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub sort: SortKey,
    pub direction: SortDirection,
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Saturates, so a page past the end yields an empty result.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl JobListQuery {
    /// Without paging parameters the endpoint returns the plain array.
    pub fn is_paged(&self) -> bool {
        self.sort.is_some() || self.order.is_some() || self.page.is_some() || self.per_page.is_some()
    }

    pub fn page_request(&self) -> Result<PageRequest> {
        let sort = match &self.sort {
            Some(raw) => raw.parse::<SortKey>().map_err(Error::BadRequest)?,
            None => SortKey::CreatedAt,
        };
        let direction = match (&self.order, &self.sort) {
            (Some(raw), _) => raw.parse::<SortDirection>().map_err(Error::BadRequest)?,
            (None, Some(_)) => SortDirection::Asc,
            (None, None) => SortDirection::Desc,
        };
        Ok(PageRequest {
            sort,
            direction,
            page: self.page.unwrap_or(1).max(1),
            per_page: self.per_page.unwrap_or(20).clamp(1, 100),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobListPage {
    pub items: Vec<JobPosting>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl JobListPage {
    pub fn new(items: Vec<JobPosting>, total: i64, request: &PageRequest) -> Self {
        let total_pages = (total + request.per_page - 1) / request.per_page;
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            total_pages,
        }
    }
}
