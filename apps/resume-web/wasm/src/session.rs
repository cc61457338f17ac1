//! Stateful resume enhancement session
//!
//! Provides the session-based API that holds workflow state in Rust,
//! minimizing JavaScript state management. JS hands over file bytes and
//! form values; everything else (validation, stage gating, single-flight
//! request discipline, selection, export) happens here.
//!
//! Intake logic lives in `*_internal` methods with plain Rust types so it
//! is testable without a JS runtime; the `#[wasm_bindgen]` wrappers only
//! convert to and from `JsValue`.

use std::cell::RefCell;

use resume_core::error::{ApiError, WorkflowError};
use resume_core::export::{export_filename, media_type};
use resume_core::types::{ResumeDocument, ResumeFormat, Stage};
use resume_core::validation::validate;
use resume_core::workflow::{Operation, RequestTicket, Workflow};
use wasm_bindgen::prelude::*;

use crate::api::ApiClient;
use crate::{download, format_bytes, parse_format, preview};

/// A document that passed validation but has not been uploaded yet.
struct PendingDocument {
    filename: String,
    content: String,
    format: ResumeFormat,
}

/// Mutable session state. Kept behind a RefCell so async methods can take
/// `&self`; borrows are never held across an await.
struct SessionState {
    workflow: Workflow,
    upload_format: ResumeFormat,
    pending: Option<PendingDocument>,
    job_description: String,
    last_error: Option<String>,
}

/// File info returned to JS after a successful validation.
#[derive(Debug, serde::Serialize)]
struct ValidatedInfo {
    filename: String,
    size_bytes: usize,
    size_display: String,
    format: ResumeFormat,
}

/// Stateful session driving the four-stage enhancement workflow.
#[wasm_bindgen]
pub struct ResumeSession {
    api: ApiClient,
    state: RefCell<SessionState>,
}

#[wasm_bindgen]
impl ResumeSession {
    /// Create a session. An empty or absent `api_base` targets the
    /// same origin.
    #[wasm_bindgen(constructor)]
    pub fn new(api_base: Option<String>) -> Self {
        Self {
            api: ApiClient::new(api_base.as_deref().unwrap_or("")),
            state: RefCell::new(SessionState {
                workflow: Workflow::new(),
                upload_format: ResumeFormat::Html,
                pending: None,
                job_description: String::new(),
                last_error: None,
            }),
        }
    }

    /// Active workflow stage: "login", "upload", "analyze", or
    /// "enhance_export".
    #[wasm_bindgen(getter)]
    pub fn stage(&self) -> String {
        self.state.borrow().workflow.stage().as_str().to_string()
    }

    /// Switch the accepted upload format ("html" or "latex"). Discards any
    /// validated-but-unsent document.
    #[wasm_bindgen(js_name = setUploadFormat)]
    pub fn set_upload_format(&self, format: &str) -> Result<(), JsValue> {
        self.set_upload_format_internal(format)
            .map_err(|e| JsValue::from_str(&e))
    }

    // ------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------

    pub async fn login(&self, email: &str, password: &str) -> Result<(), JsValue> {
        let ticket = self.begin(Operation::Login)?;
        match self.api.login(email, password).await {
            Ok(()) => {
                let mut state = self.state.borrow_mut();
                state.workflow.complete_login(ticket);
                state.last_error = None;
                Ok(())
            }
            Err(err) => Err(self.record_failure(ticket, err)),
        }
    }

    /// Register a new account. A successful registration also authenticates.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<(), JsValue> {
        let ticket = self.begin(Operation::Login)?;
        match self.api.register(email, password, username).await {
            Ok(()) => {
                let mut state = self.state.borrow_mut();
                state.workflow.complete_login(ticket);
                state.last_error = None;
                Ok(())
            }
            Err(err) => Err(self.record_failure(ticket, err)),
        }
    }

    // ------------------------------------------------------------------
    // Document intake
    // ------------------------------------------------------------------

    /// Validate a locally selected file against the active upload format.
    ///
    /// On acceptance the decoded text is held for upload and file info is
    /// returned for display. On rejection the previous pending document and
    /// error are cleared first, so re-selecting always starts clean.
    #[wasm_bindgen(js_name = validateDocument)]
    pub fn validate_document(&self, filename: &str, bytes: &[u8]) -> Result<JsValue, JsValue> {
        let info = self
            .validate_document_internal(filename, bytes)
            .map_err(|e| JsValue::from_str(&e))?;
        serde_wasm_bindgen::to_value(&info).map_err(to_js)
    }

    /// Render the pending document into the element with the given id, in a
    /// sandboxed context. Has no effect on validation or workflow state.
    #[wasm_bindgen(js_name = renderPreview)]
    pub fn render_preview(&self, container_id: &str) -> Result<(), JsValue> {
        let state = self.state.borrow();
        let pending = state
            .pending
            .as_ref()
            .ok_or_else(|| JsValue::from_str("No validated document to preview"))?;
        preview::render_into(container_id, &pending.content, pending.format)
    }

    /// Remove a previously rendered preview (e.g. after a rejection).
    #[wasm_bindgen(js_name = clearPreview)]
    pub fn clear_preview(&self, container_id: &str) -> Result<(), JsValue> {
        preview::clear(container_id)
    }

    /// Upload the pending validated document. On success the workflow moves
    /// to the analyze stage and the service-assigned id is returned.
    pub async fn upload(&self) -> Result<String, JsValue> {
        let (ticket, content, format, filename) = {
            let mut state = self.state.borrow_mut();
            let pending = state
                .pending
                .as_ref()
                .ok_or_else(|| JsValue::from_str("Select and validate a resume file first"))?;
            let content = pending.content.clone();
            let format = pending.format;
            let filename = pending.filename.clone();
            let ticket = state.workflow.begin(Operation::Upload).map_err(to_js)?;
            (ticket, content, format, filename)
        };

        match self.api.upload_resume(format, &content).await {
            Ok(id) => {
                let mut state = self.state.borrow_mut();
                let applied = state.workflow.complete_upload(
                    ticket,
                    ResumeDocument {
                        id: id.clone(),
                        content,
                        format,
                    },
                );
                if applied {
                    state.pending = None;
                    state.last_error = None;
                    web_sys::console::log_1(
                        &format!("Uploaded {} as resume {}", filename, id).into(),
                    );
                }
                Ok(id)
            }
            Err(err) => Err(self.record_failure(ticket, err)),
        }
    }

    // ------------------------------------------------------------------
    // Analysis
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = setJobDescription)]
    pub fn set_job_description(&self, text: &str) {
        self.state.borrow_mut().job_description = text.to_string();
    }

    /// Compare the uploaded resume against the current job description.
    /// Returns the analysis result; replaces any previous result and resets
    /// the skill selection.
    pub async fn analyze(&self) -> Result<JsValue, JsValue> {
        let (ticket, resume_id, job) = {
            let mut state = self.state.borrow_mut();
            let job = state.job_description.trim().to_string();
            if job.is_empty() {
                return Err(JsValue::from_str(
                    &WorkflowError::EmptyJobDescription.to_string(),
                ));
            }
            let resume_id = state
                .workflow
                .resume()
                .map(|r| r.id.clone())
                .ok_or_else(|| JsValue::from_str("No resume uploaded"))?;
            let ticket = state.workflow.begin(Operation::Analyze).map_err(to_js)?;
            (ticket, resume_id, job)
        };

        match self.api.analyze(&resume_id, &job).await {
            Ok(result) => {
                let value = serde_wasm_bindgen::to_value(&result).map_err(to_js)?;
                let mut state = self.state.borrow_mut();
                // Stale responses are discarded by the ticket check.
                if state.workflow.complete_analysis(ticket, result) {
                    state.last_error = None;
                }
                Ok(value)
            }
            Err(err) => Err(self.record_failure(ticket, err)),
        }
    }

    /// Check or uncheck a missing skill for enhancement.
    #[wasm_bindgen(js_name = toggleSkill)]
    pub fn toggle_skill(&self, skill: &str, checked: bool) {
        self.state.borrow_mut().workflow.toggle_skill(skill, checked);
    }

    /// Whether the enhance trigger should be enabled.
    #[wasm_bindgen(js_name = canEnhance)]
    pub fn can_enhance(&self) -> bool {
        self.state.borrow().workflow.can_enhance()
    }

    // ------------------------------------------------------------------
    // Enhancement & export
    // ------------------------------------------------------------------

    /// Request an enhanced rewrite covering the selected skills. Returns
    /// `{enhanced_content, changes_made}`; a failure preserves both the
    /// selection and any previously produced result.
    pub async fn enhance(&self) -> Result<JsValue, JsValue> {
        let (ticket, resume_id, skills) = {
            let mut state = self.state.borrow_mut();
            let resume_id = state
                .workflow
                .resume()
                .map(|r| r.id.clone())
                .ok_or_else(|| JsValue::from_str("No resume uploaded"))?;
            let ticket = state.workflow.begin(Operation::Enhance).map_err(to_js)?;
            let skills = state.workflow.selection().selected().to_vec();
            (ticket, resume_id, skills)
        };

        match self.api.enhance(&resume_id, &skills).await {
            Ok(result) => {
                let value = serde_wasm_bindgen::to_value(&result).map_err(to_js)?;
                let mut state = self.state.borrow_mut();
                if state.workflow.complete_enhance(ticket, result) {
                    state.last_error = None;
                }
                Ok(value)
            }
            Err(err) => Err(self.record_failure(ticket, err)),
        }
    }

    /// Download the enhanced resume under its canonical filename, with the
    /// media type of the source document's format family. Repeatable.
    #[wasm_bindgen(js_name = exportResume)]
    pub fn export_resume(&self) -> Result<(), JsValue> {
        let state = self.state.borrow();
        let enhanced = state
            .workflow
            .enhanced()
            .ok_or_else(|| JsValue::from_str("No enhanced resume to export"))?;
        let format = state
            .workflow
            .resume()
            .map(|r| r.format)
            .ok_or_else(|| JsValue::from_str("No resume uploaded"))?;

        download::trigger_download(
            export_filename(format),
            media_type(format),
            &enhanced.enhanced_content,
        )
    }

    // ------------------------------------------------------------------
    // State accessors for the UI
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = resumeId)]
    pub fn resume_id(&self) -> Option<String> {
        self.state.borrow().workflow.resume().map(|r| r.id.clone())
    }

    /// Raw match score in [0, 100], if an analysis exists.
    #[wasm_bindgen(js_name = matchPercentage)]
    pub fn match_percentage(&self) -> Option<f64> {
        self.state
            .borrow()
            .workflow
            .analysis()
            .map(|a| a.match_percentage)
    }

    /// Rounded integer match score for display.
    #[wasm_bindgen(js_name = matchPercentageDisplay)]
    pub fn match_percentage_display(&self) -> Option<u32> {
        self.match_percentage().map(|p| p.round() as u32)
    }

    #[wasm_bindgen(js_name = matchedSkills)]
    pub fn matched_skills(&self) -> Vec<String> {
        self.state
            .borrow()
            .workflow
            .analysis()
            .map(|a| a.matched_skills.clone())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = missingSkills)]
    pub fn missing_skills(&self) -> Vec<String> {
        self.state
            .borrow()
            .workflow
            .analysis()
            .map(|a| a.missing_skills.clone())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = selectedSkills)]
    pub fn selected_skills(&self) -> Vec<String> {
        self.state
            .borrow()
            .workflow
            .selection()
            .selected()
            .to_vec()
    }

    #[wasm_bindgen(js_name = changesMade)]
    pub fn changes_made(&self) -> Vec<String> {
        self.state
            .borrow()
            .workflow
            .enhanced()
            .map(|e| e.changes_made.clone())
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = enhancedContent)]
    pub fn enhanced_content(&self) -> Option<String> {
        self.state
            .borrow()
            .workflow
            .enhanced()
            .map(|e| e.enhanced_content.clone())
    }

    /// Whether any remote request is currently in flight.
    #[wasm_bindgen(js_name = isBusy)]
    pub fn is_busy(&self) -> bool {
        self.state.borrow().workflow.is_busy()
    }

    /// Current stage-local error message, if any.
    #[wasm_bindgen(js_name = lastError)]
    pub fn last_error(&self) -> Option<String> {
        self.state.borrow().last_error.clone()
    }

    /// Dismiss the current error message.
    #[wasm_bindgen(js_name = dismissError)]
    pub fn dismiss_error(&self) {
        self.state.borrow_mut().last_error = None;
    }
}

// JsValue-free internals (testable natively)
impl ResumeSession {
    fn set_upload_format_internal(&self, format: &str) -> Result<(), String> {
        let format = parse_format(format)?;
        let mut state = self.state.borrow_mut();
        state.upload_format = format;
        state.pending = None;
        Ok(())
    }

    fn validate_document_internal(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<ValidatedInfo, String> {
        let mut state = self.state.borrow_mut();
        state.pending = None;
        state.last_error = None;

        if state.workflow.stage() != Stage::Upload {
            return Err(WorkflowError::WrongStage(state.workflow.stage()).to_string());
        }

        let format = state.upload_format;
        match validate(filename, bytes, format) {
            Ok(content) => {
                state.pending = Some(PendingDocument {
                    filename: filename.to_string(),
                    content,
                    format,
                });
                Ok(ValidatedInfo {
                    filename: filename.to_string(),
                    size_bytes: bytes.len(),
                    size_display: format_bytes(bytes.len()),
                    format,
                })
            }
            Err(reason) => {
                let message = reason.to_string();
                state.last_error = Some(message.clone());
                Err(message)
            }
        }
    }

    fn begin(&self, op: Operation) -> Result<RequestTicket, JsValue> {
        self.state.borrow_mut().workflow.begin(op).map_err(to_js)
    }

    /// Release the ticket, record the error for the active stage, and log it.
    fn record_failure(&self, ticket: RequestTicket, err: ApiError) -> JsValue {
        let mut state = self.state.borrow_mut();
        state.workflow.fail(ticket);
        let message = err.to_string();
        state.last_error = Some(message.clone());
        web_sys::console::error_1(&JsValue::from_str(&message));
        JsValue::from_str(&message)
    }
}

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resume_core::error::RejectionReason;

    // The async and DOM paths only run under a JS runtime; these tests cover
    // the session-local intake behavior through the JsValue-free internals.
    // The workflow semantics themselves are tested in resume-core.

    fn session_at_upload() -> ResumeSession {
        let session = ResumeSession::new(None);
        {
            let mut state = session.state.borrow_mut();
            let ticket = state.workflow.begin(Operation::Login).unwrap();
            state.workflow.complete_login(ticket);
        }
        session
    }

    #[test]
    fn validate_document_refused_before_login() {
        let session = ResumeSession::new(None);
        let result = session.validate_document_internal("resume.html", b"<!DOCTYPE html>");
        assert!(result.is_err());
        assert!(session.state.borrow().pending.is_none());
    }

    #[test]
    fn validate_document_stores_pending_on_success() {
        let session = session_at_upload();
        let info = session
            .validate_document_internal("resume.html", b"<!DOCTYPE html><html></html>")
            .unwrap();
        assert_eq!(info.filename, "resume.html");
        assert_eq!(info.size_bytes, 28);
        assert!(session.state.borrow().pending.is_some());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn validate_document_records_error_on_rejection() {
        let session = session_at_upload();
        let err = session
            .validate_document_internal("resume.docx", b"whatever")
            .unwrap_err();
        assert_eq!(err, RejectionReason::WrongFormat.to_string());
        assert_eq!(session.last_error().unwrap(), err);
        assert!(session.state.borrow().pending.is_none());
    }

    #[test]
    fn reselect_clears_previous_error_and_pending() {
        let session = session_at_upload();
        session
            .validate_document_internal("resume.docx", b"whatever")
            .unwrap_err();
        assert!(session.last_error().is_some());

        session
            .validate_document_internal("resume.html", b"<!DOCTYPE html><html></html>")
            .unwrap();
        assert!(session.last_error().is_none());
    }

    #[test]
    fn switching_format_discards_pending_document() {
        let session = session_at_upload();
        session
            .validate_document_internal("resume.html", b"<!DOCTYPE html><html></html>")
            .unwrap();

        session.set_upload_format_internal("latex").unwrap();
        assert!(session.state.borrow().pending.is_none());

        // LaTeX file now passes; HTML no longer matches the extension check.
        session
            .validate_document_internal("resume.tex", b"\\documentclass{article}")
            .unwrap();
        session
            .validate_document_internal("resume.html", b"<!DOCTYPE html><html></html>")
            .unwrap_err();
    }

    #[test]
    fn unknown_format_string_is_rejected() {
        let session = ResumeSession::new(None);
        assert!(session.set_upload_format_internal("docx").is_err());
    }

    #[test]
    fn stage_and_gating_reflect_workflow() {
        let session = ResumeSession::new(None);
        assert_eq!(session.stage(), "login");
        assert!(!session.can_enhance());
        assert!(!session.is_busy());
        assert!(session.match_percentage().is_none());
        assert!(session.matched_skills().is_empty());
    }

    #[test]
    fn job_description_is_stored_verbatim() {
        let session = ResumeSession::new(None);
        session.set_job_description("Requires Python, Kubernetes");
        assert_eq!(
            session.state.borrow().job_description,
            "Requires Python, Kubernetes"
        );
    }
}
