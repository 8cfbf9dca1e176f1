use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderName, HeaderValue, Method,
};
use tower_http::cors::{Any, CorsLayer};

use crate::error::{Error, Result};

/// A `*` in `Access-Control-Allow-Headers` never covers `Authorization`,
/// so the admin token header is listed by name.
const ALLOWED_HEADERS: [HeaderName; 2] = [AUTHORIZATION, CONTENT_TYPE];

const ALLOWED_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS)
        .allow_origin(Any)
}

/// Restricts browsers to the board's own frontend origin.
pub fn single_origin_cors(origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin.trim_end_matches('/'))
        .map_err(|e| Error::Config(format!("Invalid CORS_ALLOWED_ORIGIN {}: {}", origin, e)))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(ALLOWED_HEADERS))
}

pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer> {
    match allowed_origin {
        Some(origin) => single_origin_cors(origin),
        None => Ok(permissive_cors()),
    }
}
