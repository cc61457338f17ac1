//! Resume enhancement workflow core
//!
//! This crate holds the client-side logic of the resume enhancement tool:
//! document validation, the staged workflow state machine, skill selection,
//! export naming, and the wire types of the remote analysis service.
//!
//! Everything here is pure Rust with no browser dependencies, so it is
//! testable natively. The WASM crate in `apps/resume-web/wasm` wraps this
//! logic for JavaScript and handles fetch, preview rendering, and downloads.

pub mod error;
pub mod export;
pub mod selection;
pub mod types;
pub mod validation;
pub mod workflow;

pub use error::{ApiError, RejectionReason, WorkflowError};
pub use export::{export_filename, media_type};
pub use selection::SkillSelection;
pub use types::{
    EnhancedResume, JobAnalysisResult, ResumeDocument, ResumeFormat, Stage, UploadRequest,
};
pub use validation::{validate, MAX_DOCUMENT_BYTES};
pub use workflow::{Operation, RequestTicket, Workflow};
