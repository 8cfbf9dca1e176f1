pub mod auth;
pub mod health;
pub mod jobs;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    dto::{
        auth_dto::{LoginRequest, LoginResponse},
        job_dto::{CreatedJob, JobForm, JobListPage, MessageResponse},
    },
    middleware::auth::require_admin,
    models::job_posting::JobPosting,
    AppState,
};

/// Room for the text fields that travel alongside the picture.
const FORM_FIELDS_ALLOWANCE: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        jobs::list_jobs,
        jobs::get_job,
        jobs::create_job,
        jobs::update_job,
        jobs::delete_job,
        auth::login,
    ),
    components(schemas(
        JobPosting,
        CreatedJob,
        JobListPage,
        JobForm,
        MessageResponse,
        LoginRequest,
        LoginResponse,
    )),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// All endpoints. Mutations sit behind [`require_admin`] unless
/// `admin_auth_required` is off.
pub fn router(state: AppState, admin_auth_required: bool) -> Router {
    let public_api = Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(openapi_json))
        .route("/api/auth/login", post(auth::login))
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/:id", get(jobs::get_job));

    let mut admin_api = Router::new()
        .route("/api/jobs", post(jobs::create_job))
        .route(
            "/api/jobs/:id",
            axum::routing::put(jobs::update_job).delete(jobs::delete_job),
        );
    if admin_auth_required {
        admin_api = admin_api.layer(axum::middleware::from_fn_with_state(
            state.auth_service.clone(),
            require_admin,
        ));
    } else {
        tracing::warn!("admin authentication disabled, job mutations are open to any client");
    }

    let body_limit = state.upload_limit.saturating_add(FORM_FIELDS_ALLOWANCE);
    public_api
        .merge(admin_api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
}
