//! Export artifact naming
//!
//! The downloadable artifact carries a fixed, predictable filename and a
//! media type matching the resume's format family. The browser-side Blob
//! construction lives in the WASM crate; this half is pure so it tests
//! natively.

use crate::types::ResumeFormat;

/// Canonical download filename for an enhanced resume.
pub fn export_filename(format: ResumeFormat) -> &'static str {
    match format {
        ResumeFormat::Html => "enhanced_resume.html",
        ResumeFormat::Latex => "enhanced_resume.tex",
    }
}

/// Media type for the downloadable artifact.
pub fn media_type(format: ResumeFormat) -> &'static str {
    match format {
        ResumeFormat::Html => "text/html",
        ResumeFormat::Latex => "application/x-tex",
    }
}
