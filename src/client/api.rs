use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::ClientError;
use crate::dto::auth_dto::{LoginRequest, LoginResponse};
use crate::dto::job_dto::{CreatedJob, JobPayload, MessageResponse};
use crate::models::job_posting::JobPosting;
use crate::routes::jobs::PICTURE_FIELD;
use crate::services::storage_service::ImageUpload;

/// Typed access to the job board REST API.
#[derive(Clone)]
pub struct JobsClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl JobsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Sends `Authorization: Bearer <token>` on every following request.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp = self.http.post(self.url("/api/auth/login")).json(&body).send().await?;
        decode(resp).await
    }

    pub async fn list_jobs(&self) -> Result<Vec<JobPosting>, ClientError> {
        let resp = self.http.get(self.url("/api/jobs")).send().await?;
        decode(resp).await
    }

    pub async fn get_job(&self, id: i64) -> Result<JobPosting, ClientError> {
        let resp = self.http.get(self.url(&format!("/api/jobs/{}", id))).send().await?;
        decode(resp).await
    }

    pub async fn create_job(
        &self,
        payload: &JobPayload,
        picture: Option<ImageUpload>,
    ) -> Result<CreatedJob, ClientError> {
        let form = job_form(payload, picture)?;
        let resp = self
            .authorized(self.http.post(self.url("/api/jobs")))
            .multipart(form)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn update_job(
        &self,
        id: i64,
        payload: &JobPayload,
        picture: Option<ImageUpload>,
    ) -> Result<JobPosting, ClientError> {
        let form = job_form(payload, picture)?;
        let resp = self
            .authorized(self.http.put(self.url(&format!("/api/jobs/{}", id))))
            .multipart(form)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn delete_job(&self, id: i64) -> Result<MessageResponse, ClientError> {
        let resp = self
            .authorized(self.http.delete(self.url(&format!("/api/jobs/{}", id))))
            .send()
            .await?;
        decode(resp).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn job_form(payload: &JobPayload, picture: Option<ImageUpload>) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for (name, value) in payload.form_fields() {
        form = form.text(name, value);
    }
    if let Some(image) = picture {
        let mut part = Part::bytes(image.bytes.to_vec()).file_name(image.file_name);
        if let Some(content_type) = image.content_type {
            part = part.mime_str(&content_type)?;
        }
        form = form.part(PICTURE_FIELD, part);
    }
    Ok(form)
}

/// Maps non-2xx responses to [`ClientError::Api`] using the `error` or
/// `message` field of the JSON body when present.
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|body| {
            body.get("error")
                .or_else(|| body.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or(text);
    tracing::debug!(status = status.as_u16(), %message, "job board API error");
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = JobsClient::with_http(Client::new(), "http://localhost:5000/");
        assert_eq!(client.url("/api/jobs"), "http://localhost:5000/api/jobs");
    }

    #[test]
    fn token_is_optional() {
        let mut client = JobsClient::with_http(Client::new(), "http://localhost:5000");
        assert_eq!(client.token(), None);
        client.set_token(Some("abc".into()));
        assert_eq!(client.token(), Some("abc"));
    }
}
