use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 40 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub s3: StorageConfig,
    pub cors_allowed_origin: Option<String>,
    pub max_upload_bytes: usize,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub admin_username: String,
    pub admin_password_hash: String,
    pub admin_auth_required: bool,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Custom endpoint for S3-compatible providers (MinIO and friends).
    pub endpoint: Option<String>,
    /// Base URL objects are served from, e.g. a CDN in front of the bucket.
    pub public_base_url: Option<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            s3: StorageConfig {
                bucket: get_env("S3_BUCKET_NAME")?,
                region: get_env("AWS_REGION")?,
                access_key_id: get_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: get_env("AWS_SECRET_ACCESS_KEY")?,
                endpoint: get_env_opt("S3_ENDPOINT"),
                public_base_url: get_env_opt("S3_PUBLIC_BASE_URL"),
            },
            cors_allowed_origin: get_env_opt("CORS_ALLOWED_ORIGIN"),
            max_upload_bytes: get_env_parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_ttl_hours: get_env_parse_or("JWT_TTL_HOURS", 12)?,
            admin_username: get_env("ADMIN_USERNAME")?,
            admin_password_hash: get_env("ADMIN_PASSWORD_HASH")?,
            admin_auth_required: get_env_parse_or("ADMIN_AUTH_REQUIRED", true)?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_values_fall_back_to_defaults() {
        env::remove_var("JOB_BOARD_TEST_UNSET");
        let value: usize = get_env_parse_or("JOB_BOARD_TEST_UNSET", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn invalid_values_are_config_errors() {
        env::set_var("JOB_BOARD_TEST_BAD_BOOL", "sometimes");
        let err = get_env_parse_or::<bool>("JOB_BOARD_TEST_BAD_BOOL", true).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("JOB_BOARD_TEST_BAD_BOOL")));
    }

    #[test]
    fn blank_values_count_as_missing() {
        env::set_var("JOB_BOARD_TEST_BLANK", "   ");
        assert!(get_env_opt("JOB_BOARD_TEST_BLANK").is_none());
    }
}
