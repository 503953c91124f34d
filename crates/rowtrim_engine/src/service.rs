use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::Serialize;
use url::Url;

use crate::{FailureKind, FilePayload, ProcessResult, ServiceError};

/// Error bodies are quoted in messages up to this many characters.
const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    /// `None` leaves the transport default in place.
    pub connect_timeout: Option<Duration>,
    /// `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
    pub max_archive_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            connect_timeout: None,
            request_timeout: None,
            max_archive_bytes: 512 * 1024 * 1024,
        }
    }
}

/// The four calls offered by the remote processing service.
#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    /// Registers a new job; returns the job id exactly as the service sent it.
    async fn upload(&self, files: &[FilePayload]) -> Result<String, ServiceError>;

    async fn process(&self, job_id: &str, rows_to_delete: u32)
        -> Result<ProcessResult, ServiceError>;

    /// Fetches the result archive named by a process locator.
    async fn download(&self, locator: &str) -> Result<Vec<u8>, ServiceError>;

    /// Deletes server-side data for a job; returns the acknowledgement text.
    async fn remove(&self, job_id: &str) -> Result<String, ServiceError>;
}

#[derive(Debug, Serialize)]
struct ProcessRequest<'a> {
    job_id: &'a str,
    num_rows_to_delete: u32,
}

#[derive(Debug, Serialize)]
struct DownloadRequest<'a> {
    file_url: &'a str,
}

#[derive(Debug, Clone)]
pub struct ReqwestJobService {
    settings: ServiceSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestJobService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", settings.base_url),
            ));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }

    /// Joins percent-encoded path segments onto the base url.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceError::new(FailureKind::InvalidUrl, "base url has no path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl JobService for ReqwestJobService {
    async fn upload(&self, files: &[FilePayload]) -> Result<String, ServiceError> {
        let url = self.endpoint(&["upload"])?;
        let form = files.iter().fold(Form::new(), |form, file| {
            form.part(
                "files",
                Part::bytes(file.bytes.clone()).file_name(file.name.clone()),
            )
        });
        engine_debug!("POST {} with {} files", url, files.len());

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;
        let job_id = response.text().await.map_err(map_reqwest_error)?;
        if job_id.is_empty() {
            return Err(ServiceError::new(
                FailureKind::InvalidResponse,
                "upload response carried no job id",
            ));
        }
        Ok(job_id)
    }

    async fn process(
        &self,
        job_id: &str,
        rows_to_delete: u32,
    ) -> Result<ProcessResult, ServiceError> {
        let url = self.endpoint(&["process"])?;
        engine_debug!("POST {} job_id={} rows={}", url, job_id, rows_to_delete);

        let response = self
            .client
            .post(url)
            .json(&ProcessRequest {
                job_id,
                num_rows_to_delete: rows_to_delete,
            })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;
        let result: ProcessResult = response.json().await.map_err(map_reqwest_error)?;
        if result.zip_file_name.is_empty() {
            return Err(ServiceError::new(
                FailureKind::InvalidResponse,
                "process response carried no archive locator",
            ));
        }
        Ok(result)
    }

    async fn download(&self, locator: &str) -> Result<Vec<u8>, ServiceError> {
        let url = self.endpoint(&["download"])?;
        engine_debug!("POST {} file_url={}", url, locator);

        let response = self
            .client
            .post(url)
            .json(&DownloadRequest { file_url: locator })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        let max_bytes = self.settings.max_archive_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(ServiceError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "archive too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(ServiceError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "archive too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }

    async fn remove(&self, job_id: &str) -> Result<String, ServiceError> {
        let url = self.endpoint(&["remove", job_id])?;
        engine_info!("DELETE {}", url);

        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;
        response.text().await.map_err(map_reqwest_error)
    }
}

/// Turns any non-2xx response into an `HttpStatus` error quoting the body.
async fn ensure_success(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
    let message = if preview.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {preview}")
    };
    Err(ServiceError::new(
        FailureKind::HttpStatus(status.as_u16()),
        message,
    ))
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ServiceError::new(FailureKind::InvalidResponse, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
