//! Data model and wire types for the remote analysis service
//!
//! Field names match the service contract exactly; request bodies are
//! serialized from these types, never assembled by hand.

use serde::{Deserialize, Serialize};

/// Format family of an uploaded resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeFormat {
    Html,
    Latex,
}

impl ResumeFormat {
    /// Filename extension a selected file must carry.
    pub fn extension(&self) -> &'static str {
        match self {
            ResumeFormat::Html => ".html",
            ResumeFormat::Latex => ".tex",
        }
    }
}

/// One discrete phase of the workflow. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Login,
    Upload,
    Analyze,
    EnhanceExport,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Login => "login",
            Stage::Upload => "upload",
            Stage::Analyze => "analyze",
            Stage::EnhanceExport => "enhance_export",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resume accepted by the service.
///
/// Immutable once created; a new upload produces a new instance with a fresh
/// service-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub id: String,
    pub content: String,
    pub format: ResumeFormat,
}

/// Result of comparing a resume against a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysisResult {
    /// Match score in [0, 100].
    pub match_percentage: f64,
    /// Skills the resume already covers, in service order.
    pub matched_skills: Vec<String>,
    /// Skills the job wants that the resume lacks, in service order.
    pub missing_skills: Vec<String>,
}

/// A rewritten resume returned by the enhance operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedResume {
    pub enhanced_content: String,
    pub changes_made: Vec<String>,
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub username: &'a str,
}

/// Upload body. The service expects exactly one content field, keyed by the
/// resume format.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum UploadRequest<'a> {
    Html { html_content: &'a str },
    Latex { latex_content: &'a str },
}

impl<'a> UploadRequest<'a> {
    pub fn new(format: ResumeFormat, content: &'a str) -> Self {
        match format {
            ResumeFormat::Html => UploadRequest::Html {
                html_content: content,
            },
            ResumeFormat::Latex => UploadRequest::Latex {
                latex_content: content,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub resume_id: &'a str,
    pub job_description: &'a str,
}

#[derive(Debug, Serialize)]
pub struct EnhanceRequest<'a> {
    pub resume_id: &'a str,
    pub selected_skills: &'a [String],
}

/// Failure body shape shared by every endpoint.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}
