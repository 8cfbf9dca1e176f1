pub mod auth_service;
pub mod job_service;
pub mod storage_service;
