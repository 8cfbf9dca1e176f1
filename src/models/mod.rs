pub mod job_posting;
