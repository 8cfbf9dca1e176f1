pub mod job_repository;
pub mod pool;
