#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;

use job_board_backend::{
    database::job_repository::JobStore,
    dto::job_dto::{CreatedJob, JobPayload, PageRequest},
    error::{Error, Result},
    listing::{sort_jobs, SortState},
    models::job_posting::JobPosting,
    routes,
    services::{
        auth_service::AuthService,
        job_service::JobService,
        storage_service::{object_key, public_url, ImageUpload, ObjectStorage},
    },
    utils::crypto::hash_password,
    AppState,
};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "password123";
pub const CDN_BASE: &str = "https://cdn.test";
pub const BOUNDARY: &str = "X-JOB-BOARD-BOUNDARY";

#[derive(Default)]
pub struct MemoryJobStore {
    rows: Mutex<Vec<JobPosting>>,
    next_id: Mutex<i64>,
}

impl MemoryJobStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

fn required<T: Clone>(value: &Option<T>, name: &str) -> Result<T> {
    value
        .clone()
        .ok_or_else(|| Error::Internal(format!("null value in column \"{}\"", name)))
}

fn row(
    id: i64,
    created_at: chrono::DateTime<Utc>,
    payload: &JobPayload,
    picture: Option<String>,
) -> Result<JobPosting> {
    Ok(JobPosting {
        id,
        created_at,
        post_date: required(&payload.post_date, "post_date")?,
        organisation: required(&payload.organisation, "organisation")?,
        job_details: payload.job_details.clone(),
        vacancies: payload.vacancies,
        location: payload.location.clone(),
        qualification: payload.qualification.clone(),
        last_date: required(&payload.last_date, "last_date")?,
        salary: payload.salary.clone(),
        picture,
        more_details: payload.more_details.clone(),
        notification_link: payload.notification_link.clone(),
        apply_link: payload.apply_link.clone(),
    })
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<JobPosting>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn list_page(&self, request: PageRequest) -> Result<(Vec<JobPosting>, i64)> {
        let mut rows = self.rows.lock().unwrap().clone();
        sort_jobs(&mut rows, &SortState::new(request.sort, request.direction));
        let total = rows.len() as i64;
        let items = rows
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.per_page as usize)
            .collect();
        Ok((items, total))
    }

    async fn find(&self, id: i64) -> Result<Option<JobPosting>> {
        Ok(self.rows.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn insert(&self, payload: &JobPayload, picture: Option<String>) -> Result<CreatedJob> {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let job = row(id, Utc::now(), payload, picture)?;
        let created = CreatedJob {
            id,
            created_at: job.created_at,
        };
        self.rows.lock().unwrap().push(job);
        Ok(created)
    }

    async fn update(
        &self,
        id: i64,
        payload: &JobPayload,
        picture: Option<String>,
    ) -> Result<Option<JobPosting>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(existing) = rows.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        let picture = picture.or_else(|| existing.picture.clone());
        *existing = row(id, existing.created_at, payload, picture)?;
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|j| j.id != id);
        Ok(rows.len() < before)
    }
}

/// Records uploads and answers with CDN URLs; can be switched to fail.
#[derive(Default)]
pub struct FakeStorage {
    pub uploads: Mutex<Vec<String>>,
    pub failing: AtomicBool,
}

impl FakeStorage {
    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Storage("bucket unreachable".into()));
        }
        let key = object_key(folder, &image.file_name, Utc::now());
        let url = public_url(CDN_BASE, &key)?;
        self.uploads.lock().unwrap().push(url.clone());
        Ok(url)
    }
}

pub fn auth_service() -> AuthService {
    static HASH: OnceLock<String> = OnceLock::new();
    let hash = HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).expect("hash admin password"));
    AuthService::new(
        ADMIN_USERNAME.into(),
        hash.clone(),
        "test_secret_key".into(),
        chrono::Duration::hours(1),
    )
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryJobStore>,
    pub storage: Arc<FakeStorage>,
}

pub fn setup_app(admin_auth_required: bool, upload_limit: usize) -> TestApp {
    let store = Arc::new(MemoryJobStore::default());
    let storage = Arc::new(FakeStorage::default());
    let state = AppState::from_parts(
        JobService::new(store.clone(), storage.clone()),
        auth_service(),
        upload_limit,
    );
    TestApp {
        router: routes::router(state, admin_auth_required),
        store,
        storage,
    }
}

/// `multipart/form-data` body with text fields and an optional
/// `(file_name, content_type, bytes)` picture.
pub fn multipart_body(fields: &[(&str, &str)], picture: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = picture {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"picture\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, file_name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}
