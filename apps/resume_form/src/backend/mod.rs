//! Backend seam. Every request to the resume service goes through
//! `ResumeBackend`; `HttpBackend` is the production implementation.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::models::analysis::AnalysisResult;
use crate::models::response::{EnhanceResponse, ErrorPayload};
use crate::models::resume::{EnhanceRequest, ResumePayload};

pub mod http;

pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Transport(String),

    #[error("status {status}: {payload}")]
    Server { status: u16, payload: ErrorPayload },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}

/// A file picked by the user, held in memory for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name);
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "doc" => "application/msword",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// What `/analyze` reads the resume from.
#[derive(Debug, Clone)]
pub enum AnalyzeSource {
    File(Upload),
    Text(String),
}

#[async_trait]
pub trait ResumeBackend: Send + Sync {
    /// POST /generate. Returns the document bytes.
    async fn generate(&self, payload: &ResumePayload) -> Result<Bytes, BackendError>;

    /// POST /enhance
    async fn enhance(&self, request: &EnhanceRequest) -> Result<EnhanceResponse, BackendError>;

    /// POST /analyze
    async fn analyze(&self, source: AnalyzeSource) -> Result<AnalysisResult, BackendError>;

    /// POST /analyze_resume. Returns the review text.
    async fn review(&self, upload: Upload) -> Result<String, BackendError>;

    /// GET /
    async fn health(&self) -> Result<String, BackendError>;
}
