use std::sync::Arc;

use crate::database::job_repository::JobStore;
use crate::dto::job_dto::{CreatedJob, JobListPage, JobPayload, PageRequest};
use crate::error::{Error, Result};
use crate::models::job_posting::JobPosting;
use crate::services::storage_service::{ImageUpload, ObjectStorage};

/// Storage folder for job pictures.
pub const PICTURE_FOLDER: &str = "job_pictures";

#[derive(Clone)]
pub struct JobService {
    store: Arc<dyn JobStore>,
    storage: Arc<dyn ObjectStorage>,
}

impl JobService {
    pub fn new(store: Arc<dyn JobStore>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { store, storage }
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    pub async fn list(&self) -> Result<Vec<JobPosting>> {
        self.store.list().await
    }

    pub async fn list_page(&self, request: PageRequest) -> Result<JobListPage> {
        let (items, total) = self.store.list_page(request).await?;
        Ok(JobListPage::new(items, total, &request))
    }

    pub async fn get(&self, id: i64) -> Result<JobPosting> {
        self.store.find(id).await?.ok_or_else(not_found)
    }

    /// Uploads the picture (if any) before inserting. A failed insert after a
    /// successful upload leaves the object in the bucket.
    pub async fn create(&self, payload: JobPayload, picture: Option<ImageUpload>) -> Result<CreatedJob> {
        let picture_url = self.upload_picture(picture).await?;
        let created = self
            .store
            .insert(&payload, picture_url.clone())
            .await
            .inspect_err(|e| log_orphan(picture_url.as_deref(), e))?;

        tracing::info!(job_id = created.id, "job created");
        Ok(created)
    }

    /// Replaces every field. The stored picture is kept unless a new one is sent.
    pub async fn update(
        &self,
        id: i64,
        payload: JobPayload,
        picture: Option<ImageUpload>,
    ) -> Result<JobPosting> {
        self.get(id).await?;

        let picture_url = self.upload_picture(picture).await?;
        let updated = self
            .store
            .update(id, &payload, picture_url.clone())
            .await
            .inspect_err(|e| log_orphan(picture_url.as_deref(), e))?
            .ok_or_else(not_found)?;

        tracing::info!(job_id = id, "job updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(not_found());
        }
        tracing::info!(job_id = id, "job deleted");
        Ok(())
    }

    async fn upload_picture(&self, picture: Option<ImageUpload>) -> Result<Option<String>> {
        match picture {
            Some(image) => self.storage.upload(image, PICTURE_FOLDER).await.map(Some),
            None => Ok(None),
        }
    }
}

fn not_found() -> Error {
    Error::NotFound("Job not found".to_string())
}

fn log_orphan(picture_url: Option<&str>, err: &Error) {
    if let Some(url) = picture_url {
        tracing::warn!(picture = url, error = %err, "job write failed after picture upload");
    }
}
