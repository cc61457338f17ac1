//! Sandboxed document preview
//!
//! Renders validated content for user confirmation before it is submitted.
//! HTML goes into an iframe with an empty `sandbox` attribute, so embedded
//! scripts never execute and the frame gets no same-origin access back to
//! the host page. LaTeX source is shown as a truncated monospaced snippet
//! instead of structural rendering. Preview never affects validation
//! outcome or session state.

use resume_core::types::ResumeFormat;
use resume_core::validation::preview_snippet;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlIFrameElement;

/// Render `content` into the element with id `container_id`, replacing any
/// previous preview.
pub fn render_into(container_id: &str, content: &str, format: ResumeFormat) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let container = document.get_element_by_id(container_id).ok_or_else(|| {
        JsValue::from_str(&format!("No element with id '{}'", container_id))
    })?;

    container.set_inner_html("");

    match format {
        ResumeFormat::Html => {
            let iframe: HtmlIFrameElement = document.create_element("iframe")?.dyn_into()?;
            // Empty sandbox: no scripts, no same-origin access.
            iframe.set_attribute("sandbox", "")?;
            iframe.set_attribute("title", "Resume Preview")?;
            iframe.set_srcdoc(content);
            container.append_child(&iframe)?;
        }
        ResumeFormat::Latex => {
            let pre = document.create_element("pre")?;
            pre.set_text_content(Some(preview_snippet(content)));
            container.append_child(&pre)?;
        }
    }

    Ok(())
}

/// Clear a previously rendered preview.
pub fn clear(container_id: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;
    if let Some(container) = document.get_element_by_id(container_id) {
        container.set_inner_html("");
    }
    Ok(())
}
