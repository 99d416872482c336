use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, StatusCode,
};
use shared::{
    error::{ApiError, ProtocolError},
    protocol::UploadResponse,
};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::{config::UploadEndpoint, selection::SelectedFile};

/// Message shown for every failed submission; the cause only goes to the log.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to upload files";

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("network failure: {0}")]
    NetworkFailure(#[source] reqwest::Error),
    #[error(
        "server responded with status {status}: {}",
        detail.as_deref().unwrap_or("no error detail")
    )]
    ServerFailure {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] ProtocolError),
    #[error("failed to build upload part for '{name}': {source}")]
    InvalidPart {
        name: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to read selected file '{name}': {source}")]
    UnreadableFile {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl SubmissionError {
    pub fn category(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => "network",
            Self::ServerFailure { .. } => "server",
            Self::MalformedResponse(_) => "malformed_response",
            Self::InvalidPart { .. } => "request_build",
            Self::UnreadableFile { .. } => "unreadable_file",
        }
    }
}

#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn upload(&self, files: &[SelectedFile]) -> Result<UploadResponse, SubmissionError>;
}

/// Sends the selection as one multipart `POST` to the configured endpoint.
pub struct HttpUploadTransport {
    http: Client,
    upload_url: Url,
    field_name: String,
}

impl HttpUploadTransport {
    pub fn new(endpoint: &UploadEndpoint) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: &UploadEndpoint) -> Self {
        Self {
            http,
            upload_url: endpoint.upload_url().clone(),
            field_name: endpoint.field_name().to_string(),
        }
    }

    async fn build_form(&self, files: &[SelectedFile]) -> Result<Form, SubmissionError> {
        let mut form = Form::new();
        for file in files {
            let bytes = file
                .read_bytes()
                .await
                .map_err(|source| SubmissionError::UnreadableFile {
                    name: file.name().to_string(),
                    source,
                })?;
            let mime = mime_guess::from_path(file.name()).first_or_octet_stream();
            debug!(
                file = file.name(),
                size_bytes = bytes.len(),
                mime = %mime,
                "upload: adding part"
            );
            let part = file_part(file.name(), bytes, mime.essence_str())?;
            form = form.part(self.field_name.clone(), part);
        }
        Ok(form)
    }
}

fn file_part(name: &str, bytes: Vec<u8>, content_type: &str) -> Result<Part, SubmissionError> {
    Part::bytes(bytes)
        .file_name(name.to_string())
        .mime_str(content_type)
        .map_err(|source| SubmissionError::InvalidPart {
            name: name.to_string(),
            source,
        })
}

#[async_trait]
impl UploadTransport for HttpUploadTransport {
    async fn upload(&self, files: &[SelectedFile]) -> Result<UploadResponse, SubmissionError> {
        let form = self.build_form(files).await?;
        info!(
            url = %self.upload_url,
            file_count = files.len(),
            "upload: sending files"
        );

        let response = self
            .http
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(SubmissionError::NetworkFailure)?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(SubmissionError::NetworkFailure)?;

        if !status.is_success() {
            let detail = ApiError::from_body(&body).map(|api_error| api_error.error);
            return Err(SubmissionError::ServerFailure { status, detail });
        }

        let parsed = UploadResponse::from_json_slice(&body)?;
        debug!(
            items = parsed.items.len(),
            has_message = parsed.message.is_some(),
            "upload: response decoded"
        );
        Ok(parsed)
    }
}

#[cfg(test)]
#[path = "tests/submission_tests.rs"]
mod tests;
