use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    dto::auth_dto::{LoginRequest, LoginResponse},
    error::Result,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Admin token issued", body = LoginResponse),
        (status = 401, description = "Invalid username or password")
    )
)]
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let issued = state.auth_service.login(&payload.username, &payload.password)?;
    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_at: issued.expires_at,
    }))
}
