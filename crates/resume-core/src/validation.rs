//! Resume document validation
//!
//! Runs the local acceptance checks a selected file must pass before any
//! byte leaves the browser. Checks run in a fixed order and short-circuit
//! on the first failure.

use crate::error::RejectionReason;
use crate::types::ResumeFormat;

/// Maximum accepted payload size (16 MiB).
pub const MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

/// Character budget for the monospaced LaTeX preview snippet.
pub const PREVIEW_SNIPPET_CHARS: usize = 200;

/// Validate a locally selected file against the active upload format.
///
/// Order: extension, size, text decode, HTML shape (HTML mode only).
/// Returns the decoded text on success; the caller feeds that text to the
/// preview renderer and, on confirmation, to the upload call.
pub fn validate(
    filename: &str,
    bytes: &[u8],
    format: ResumeFormat,
) -> Result<String, RejectionReason> {
    if !filename.ends_with(format.extension()) {
        return Err(RejectionReason::WrongFormat);
    }

    if bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(RejectionReason::TooLarge);
    }

    let text = std::str::from_utf8(bytes).map_err(|_| RejectionReason::ReadError)?;

    if format == ResumeFormat::Html && !looks_like_html(text) {
        return Err(RejectionReason::MalformedContent);
    }

    Ok(text.to_string())
}

/// Case-sensitive HTML shape check: a doctype declaration or an opening
/// `<html` tag must be present somewhere in the text.
fn looks_like_html(text: &str) -> bool {
    text.contains("<!DOCTYPE") || text.contains("<html")
}

/// Truncated snippet for non-markup previews. Cuts on a character boundary
/// so a multi-byte code point is never split.
pub fn preview_snippet(content: &str) -> &str {
    match content.char_indices().nth(PREVIEW_SNIPPET_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}
