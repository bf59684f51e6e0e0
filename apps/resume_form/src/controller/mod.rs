//! Form sync controller. Runs one user action at a time against the backend
//! and writes the outcome back into the shared form.
//!
//! The form lock is only held to read or write field values, never across a
//! backend call. Two actions started together therefore race freely and the
//! later completion wins for any field both touch.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::backend::{AnalyzeSource, ResumeBackend, Upload};
use crate::config::SummaryPolicy;
use crate::errors::{SyncError, ValidationError};
use crate::form::{FieldId, FormState};
use crate::models::resume::{EnhanceRequest, Purpose};
use crate::sync;

pub mod surface;

pub use surface::{DirectorySurface, Download, Surface};

pub type SharedForm = Arc<Mutex<FormState>>;

/// Shown in a field while its enhancement is in flight.
pub const PROCESSING_PLACEHOLDER: &str = "⏳ Processing...";
pub const STATUS_ANALYZING: &str = "Analyzing...";
pub const STATUS_REVIEWING: &str = "Reviewing...";
pub const STATUS_COMPLETED: &str = "✅ completed";

#[derive(Clone)]
pub struct FormSyncController {
    form: SharedForm,
    backend: Arc<dyn ResumeBackend>,
    surface: Arc<dyn Surface>,
    summary_policy: SummaryPolicy,
}

impl FormSyncController {
    pub fn new(
        form: SharedForm,
        backend: Arc<dyn ResumeBackend>,
        surface: Arc<dyn Surface>,
        summary_policy: SummaryPolicy,
    ) -> Self {
        Self {
            form,
            backend,
            surface,
            summary_policy,
        }
    }

    pub fn form(&self) -> &SharedForm {
        &self.form
    }

    /// Snapshot of the current form.
    pub async fn snapshot(&self) -> FormState {
        self.form.lock().await.clone()
    }

    /// Alerts the user and logs. Validation problems are the user's to fix,
    /// so they are not logged as errors.
    fn report(&self, action: &str, err: SyncError) -> SyncError {
        if err.is_validation() {
            warn!(action, error = %err, "Rejected before sending");
        } else {
            error!(action, error = %err, "Operation failed");
        }
        self.surface.alert(&err.alert_message(action));
        err
    }

    async fn set_status(&self, status: impl Into<String>) {
        self.form.lock().await.status = status.into();
    }

    /// Generates the resume document and hands it to the surface.
    /// Returns the file name the document was offered under.
    pub async fn generate(&self) -> Result<String, SyncError> {
        const ACTION: &str = "Resume generation";

        let collected = {
            let form = self.form.lock().await;
            sync::collect_payload(&form)
        };
        let payload = collected.map_err(|e| self.report(ACTION, e.into()))?;

        info!(
            education = payload.education.len(),
            experience = payload.experience.len(),
            "Generating resume"
        );

        let document = self
            .backend
            .generate(&payload)
            .await
            .map_err(|e| self.report(ACTION, e.into()))?;

        let download = Download {
            file_name: payload.download_filename(),
            bytes: document,
        };
        let file_name = download.file_name.clone();
        self.surface
            .save(download)
            .await
            .map_err(|e| self.report(ACTION, SyncError::Save(e.to_string())))?;

        info!(%file_name, "Resume generated");
        Ok(file_name)
    }

    /// Sends one field through the backend's enhancer. The field shows
    /// `PROCESSING_PLACEHOLDER` while in flight and gets its old value back
    /// on any failure. A field already being enhanced is rejected without a
    /// request. Returns the field's final value.
    pub async fn enhance(&self, field: FieldId) -> Result<String, SyncError> {
        const ACTION: &str = "Enhancement";

        let prepared = {
            let mut form = self.form.lock().await;
            let original = form.field(field).to_string();
            if original == PROCESSING_PLACEHOLDER {
                Err(ValidationError::InFlight(field))
            } else {
                sync::enhance_request(&form, field).map(|request| {
                    form.set_field(field, PROCESSING_PLACEHOLDER);
                    (request, original)
                })
            }
        };
        let (request, original) = prepared.map_err(|e| self.report(ACTION, e.into()))?;

        info!(%field, purpose = request.purpose.as_str(), "Enhancing field");
        let result = self.backend.enhance(&request).await;

        let mut form = self.form.lock().await;
        match result {
            Ok(response) => {
                let value = sync::apply_enhancement(&original, response);
                form.set_field(field, value.clone());
                Ok(value)
            }
            Err(e) => {
                form.set_field(field, original);
                drop(form);
                Err(self.report(ACTION, e.into()))
            }
        }
    }

    /// Uploads a resume file and fills the form from the parsed result.
    pub async fn analyze(&self, file: Option<Upload>) -> Result<(), SyncError> {
        let Some(upload) = file else {
            return Err(self.report("Resume analysis", ValidationError::MissingFile.into()));
        };
        info!(file = %upload.file_name, bytes = upload.bytes.len(), "Analyzing resume file");
        self.run_analysis(AnalyzeSource::File(upload)).await
    }

    /// Like `analyze`, but from pasted resume text.
    pub async fn analyze_text(&self, text: &str) -> Result<(), SyncError> {
        if text.trim().is_empty() {
            let err = ValidationError::EmptyInput("resume text".to_string());
            return Err(self.report("Resume analysis", err.into()));
        }
        info!(chars = text.len(), "Analyzing resume text");
        self.run_analysis(AnalyzeSource::Text(text.to_string())).await
    }

    async fn run_analysis(&self, source: AnalyzeSource) -> Result<(), SyncError> {
        self.set_status(STATUS_ANALYZING).await;

        let mut result = match self.backend.analyze(source).await {
            Ok(result) => result,
            Err(e) => {
                let err = SyncError::from(e);
                error!(error = %err, "Resume analysis failed");
                self.set_status(format!("❌ {}", err.status_message())).await;
                return Err(err);
            }
        };

        if self.summary_policy == SummaryPolicy::Enhance && !result.summary.trim().is_empty() {
            let request = EnhanceRequest {
                text: result.summary.trim().to_string(),
                purpose: Purpose::Resume,
            };
            match self.backend.enhance(&request).await {
                Ok(response) => {
                    result.summary = sync::apply_enhancement(&result.summary, response);
                }
                Err(e) => {
                    warn!(error = %e, "Summary enhancement failed; keeping parsed summary");
                }
            }
        }

        let mut form = self.form.lock().await;
        let current = std::mem::take(&mut *form);
        *form = sync::apply_analysis(current, result);
        form.status = STATUS_COMPLETED.to_string();

        info!(
            education = form.education.len(),
            experience = form.experience.len(),
            "Form filled from analysis"
        );
        Ok(())
    }

    /// Asks the backend for a career review of a resume file and puts the
    /// text into the review area.
    pub async fn review(&self, file: Option<Upload>) -> Result<String, SyncError> {
        let Some(upload) = file else {
            return Err(self.report("Resume review", ValidationError::MissingFile.into()));
        };
        self.set_status(STATUS_REVIEWING).await;

        match self.backend.review(upload).await {
            Ok(text) => {
                let mut form = self.form.lock().await;
                form.review = text.clone();
                form.status = STATUS_COMPLETED.to_string();
                Ok(text)
            }
            Err(e) => {
                let err = SyncError::from(e);
                error!(error = %err, "Resume review failed");
                self.set_status(format!("❌ {}", err.status_message())).await;
                Err(err)
            }
        }
    }
}
