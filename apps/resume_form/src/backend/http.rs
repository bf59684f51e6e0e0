use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use tracing::{debug, warn};

use super::{AnalyzeSource, BackendError, ResumeBackend, Upload};
use crate::config::Config;
use crate::models::analysis::{parse_analysis, AnalysisResult};
use crate::models::response::{EnhanceResponse, ErrorPayload, HealthResponse, ReviewResponse};
use crate::models::resume::{EnhanceRequest, ResumePayload};

/// `ResumeBackend` over HTTP. Every call is a single attempt; the caller
/// decides what to show the user on failure.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, &config.api_base))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and turns any non-2xx status into `BackendError::Server`.
    /// Error bodies that are not JSON become the placeholder payload.
    async fn execute(&self, path: &str, request: RequestBuilder) -> Result<Bytes, BackendError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let payload = ErrorPayload::parse(&body);
            warn!(path, status = status.as_u16(), %payload, "Backend returned an error response");
            return Err(BackendError::Server {
                status: status.as_u16(),
                payload,
            });
        }

        let body = response.bytes().await?;
        debug!(path, bytes = body.len(), "Backend call succeeded");
        Ok(body)
    }

    async fn post_form(&self, path: &str, form: Form) -> Result<Bytes, BackendError> {
        let request = self.client.post(self.url(path)).multipart(form);
        self.execute(path, request).await
    }
}

fn file_part(upload: Upload) -> Result<Part, BackendError> {
    Ok(Part::bytes(upload.bytes.to_vec())
        .file_name(upload.file_name)
        .mime_str(upload.content_type)?)
}

#[async_trait]
impl ResumeBackend for HttpBackend {
    async fn generate(&self, payload: &ResumePayload) -> Result<Bytes, BackendError> {
        let profile = &payload.profile;
        let form = Form::new()
            .text("name", profile.name.clone())
            .text("email", profile.email.clone())
            .text("phone", profile.phone.clone())
            .text("location", profile.location.clone())
            .text("summary", profile.summary.clone())
            .text("skills", profile.skills.clone())
            .text("education_json", payload.education_json()?)
            .text("experience_json", payload.experience_json()?);

        self.post_form("/generate", form).await
    }

    async fn enhance(&self, request: &EnhanceRequest) -> Result<EnhanceResponse, BackendError> {
        let form = Form::new()
            .text("text", request.text.clone())
            .text("purpose", request.purpose.as_str());

        let body = self.post_form("/enhance", form).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn analyze(&self, source: AnalyzeSource) -> Result<AnalysisResult, BackendError> {
        let form = match source {
            AnalyzeSource::File(upload) => Form::new().part("file", file_part(upload)?),
            AnalyzeSource::Text(text) => Form::new().text("text", text),
        };

        let body = self.post_form("/analyze", form).await?;
        Ok(parse_analysis(&body)?)
    }

    async fn review(&self, upload: Upload) -> Result<String, BackendError> {
        let form = Form::new().part("file", file_part(upload)?);

        let body = self.post_form("/analyze_resume", form).await?;
        let review: ReviewResponse = serde_json::from_slice(&body)?;

        match (review.analysis, review.error) {
            (_, Some(error)) => Err(BackendError::Server {
                status: 200,
                payload: ErrorPayload(serde_json::json!({ "error": error })),
            }),
            (Some(analysis), None) => Ok(analysis),
            (None, None) => Err(BackendError::Decode(
                "review response carried neither analysis nor error".to_string(),
            )),
        }
    }

    async fn health(&self) -> Result<String, BackendError> {
        let body = self.execute("/", self.client.get(self.url("/"))).await?;
        let health: HealthResponse = serde_json::from_slice(&body)?;
        Ok(health.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use tokio::net::TcpListener;

    async fn spawn_backend(app: Router) -> HttpBackend {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        let client = Client::builder().no_proxy().build().expect("client");
        HttpBackend::with_client(client, &format!("http://{addr}"))
    }

    #[tokio::test]
    async fn test_health_reads_message() {
        let app = Router::new().route(
            "/",
            get(|| async { Json(json!({ "message": "AI Resume Builder is running" })) }),
        );
        let backend = spawn_backend(app).await;

        assert_eq!(
            backend.health().await.unwrap(),
            "AI Resume Builder is running"
        );
    }

    #[tokio::test]
    async fn test_review_error_with_ok_status_is_a_server_error() {
        let app = Router::new().route(
            "/analyze_resume",
            post(|| async { Json(json!({ "error": "No text found in resume." })) }),
        );
        let backend = spawn_backend(app).await;

        let err = backend
            .review(Upload::new("scan.pdf", b"%PDF".to_vec()))
            .await
            .unwrap_err();
        match err {
            BackendError::Server { status, payload } => {
                assert_eq!(status, 200);
                assert_eq!(payload.message().as_deref(), Some("No text found in resume."));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_review_returns_analysis_text() {
        let app = Router::new().route(
            "/analyze_resume",
            post(|| async { Json(json!({ "analysis": "Strengths: ..." })) }),
        );
        let backend = spawn_backend(app).await;

        let text = backend
            .review(Upload::new("cv.pdf", b"%PDF".to_vec()))
            .await
            .unwrap();
        assert_eq!(text, "Strengths: ...");
    }

    #[tokio::test]
    async fn test_enhance_sends_text_and_purpose() {
        let app = Router::new().route(
            "/enhance",
            post(|mut multipart: axum::extract::Multipart| async move {
                let mut seen = serde_json::Map::new();
                while let Some(field) = multipart.next_field().await.unwrap() {
                    let name = field.name().unwrap_or_default().to_string();
                    seen.insert(name, Value::String(field.text().await.unwrap()));
                }
                let improved = format!(
                    "{}:{}",
                    seen["purpose"].as_str().unwrap(),
                    seen["text"].as_str().unwrap()
                );
                Json(json!({ "original": seen["text"], "improved": improved }))
            }),
        );
        let backend = spawn_backend(app).await;

        let response = backend
            .enhance(&EnhanceRequest {
                text: "Led migrations".to_string(),
                purpose: crate::models::resume::Purpose::General,
            })
            .await
            .unwrap();
        assert_eq!(response.improved.as_deref(), Some("general:Led migrations"));
    }

    #[tokio::test]
    async fn test_success_with_malformed_json_is_a_decode_error() {
        let app = Router::new().route("/enhance", post(|| async { "plain text" }));
        let backend = spawn_backend(app).await;

        let err = backend
            .enhance(&EnhanceRequest {
                text: "x".to_string(),
                purpose: crate::models::resume::Purpose::Resume,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Json(_)), "unexpected error: {err}");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let backend = HttpBackend::with_client(Client::new(), "http://localhost:8000/");
        assert_eq!(backend.url("/generate"), "http://localhost:8000/generate");
    }

    #[test]
    fn test_new_uses_configured_base() {
        let config = Config {
            api_base: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(backend.url("/"), "http://127.0.0.1:9/");
    }
}
