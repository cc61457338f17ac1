//! WASM bindings for the resume enhancement client
//!
//! This module provides a stateful, session-based API for the four-stage
//! enhancement workflow. All state is held in Rust, minimizing JavaScript
//! complexity.
//!
//! ## Architecture
//!
//! - Workflow state, validation, and selection live in `resume-core`
//! - Remote calls, preview rendering, and downloads live here
//! - JavaScript only handles DOM events and file I/O
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { ResumeSession } from './pkg/resume_wasm.js';
//!
//! await init();
//!
//! const session = new ResumeSession("");
//! await session.login(email, password);
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! session.validateDocument(file.name, bytes);
//! session.renderPreview("preview-container");
//! await session.upload();
//!
//! session.setJobDescription(textarea.value);
//! await session.analyze();
//! session.toggleSkill("Kubernetes", true);
//! await session.enhance();
//! session.exportResume();
//! ```

pub mod api;
pub mod download;
pub mod preview;
pub mod session;

use resume_core::types::ResumeFormat;
use wasm_bindgen::prelude::*;

// Re-export main types for JavaScript
pub use session::ResumeSession;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Quick validation check for a selected file, without touching session
/// state. Useful for enabling the upload button as soon as a file is picked.
#[wasm_bindgen]
pub fn quick_validate(filename: &str, bytes: &[u8], format: &str) -> Result<(), JsValue> {
    let format = parse_format(format).map_err(|e| JsValue::from_str(&e))?;
    resume_core::validate(filename, bytes, format)
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse a JS-facing format string. String error so it stays testable
/// without a JS runtime.
pub(crate) fn parse_format(format: &str) -> Result<ResumeFormat, String> {
    match format {
        "html" => Ok(ResumeFormat::Html),
        "latex" => Ok(ResumeFormat::Latex),
        other => Err(format!(
            "Unknown resume format '{}' (expected \"html\" or \"latex\")",
            other
        )),
    }
}

/// Format bytes as human-readable string
#[wasm_bindgen]
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
