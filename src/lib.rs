pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::job_repository::PgJobRepository;
use crate::services::{
    auth_service::AuthService, job_service::JobService, storage_service::S3Storage,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub job_service: JobService,
    pub auth_service: AuthService,
    /// Largest accepted picture, in bytes.
    pub upload_limit: usize,
}

impl AppState {
    pub fn new(pool: PgPool, config: &Config) -> Self {
        let store = Arc::new(PgJobRepository::new(pool));
        let storage = Arc::new(S3Storage::from_config(&config.s3));
        let auth_service = AuthService::new(
            config.admin_username.clone(),
            config.admin_password_hash.clone(),
            config.jwt_secret.clone(),
            chrono::Duration::hours(config.jwt_ttl_hours),
        );

        Self::from_parts(
            JobService::new(store, storage),
            auth_service,
            config.max_upload_bytes,
        )
    }

    pub fn from_parts(job_service: JobService, auth_service: AuthService, upload_limit: usize) -> Self {
        Self {
            job_service,
            auth_service,
            upload_limit,
        }
    }
}
