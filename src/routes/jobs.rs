use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use validator::Validate;

use crate::{
    dto::job_dto::{CreatedJob, JobForm, JobListPage, JobListQuery, JobPayload, MessageResponse},
    error::{Error, Result},
    models::job_posting::JobPosting,
    services::storage_service::ImageUpload,
    AppState,
};

/// Multipart field carrying the optional image.
pub const PICTURE_FIELD: &str = "picture";

#[utoipa::path(
    get,
    path = "/api/jobs",
    params(JobListQuery),
    responses(
        (status = 200, description = "All jobs, or one sorted page when paging parameters are given", body = [JobPosting]),
        (status = 400, description = "Unknown sort key or order")
    )
)]
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<Response> {
    if query.is_paged() {
        let request = query.page_request()?;
        let page: JobListPage = state.job_service.list_page(request).await?;
        return Ok(Json(page).into_response());
    }
    let jobs = state.job_service.list().await?;
    Ok(Json(jobs).into_response())
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = JobPosting),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    Ok(Json(job))
}

#[utoipa::path(
    post,
    path = "/api/jobs",
    request_body(content = JobForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Job created", body = CreatedJob),
        (status = 400, description = "Invalid form"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 413, description = "Picture too large")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (payload, picture) = read_job_form(multipart, state.upload_limit).await?;
    payload.validate()?;
    let created = state.job_service.create(payload, picture).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    request_body(content = JobForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Job updated", body = JobPosting),
        (status = 400, description = "Invalid form"),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Job not found"),
        (status = 413, description = "Picture too large")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (payload, picture) = read_job_form(multipart, state.upload_limit).await?;
    payload.validate()?;
    let job = state.job_service.update(id, payload, picture).await?;
    Ok(Json(job))
}

#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid admin token"),
        (status = 404, description = "Job not found")
    ),
    security(("bearer" = []))
)]
#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(id).await?;
    Ok(Json(MessageResponse {
        message: "Job deleted successfully".to_string(),
    }))
}

/// Collects text fields into a [`JobPayload`] and buffers the picture.
/// An empty file part counts as no picture.
async fn read_job_form(
    mut multipart: Multipart,
    upload_limit: usize,
) -> Result<(JobPayload, Option<ImageUpload>)> {
    let mut payload = JobPayload::default();
    let mut picture = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == PICTURE_FIELD {
            let file_name = field.file_name().unwrap_or("picture").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            if bytes.len() > upload_limit {
                return Err(Error::PayloadTooLarge(format!(
                    "picture exceeds the {} byte limit",
                    upload_limit
                )));
            }
            if !bytes.is_empty() {
                picture = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            continue;
        }

        let value = field.text().await?;
        payload.set_field(&name, &value)?;
    }

    Ok((payload, picture))
}
