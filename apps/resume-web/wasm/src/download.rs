//! Download artifact generation
//!
//! Builds a Blob with the artifact's media type and triggers the browser
//! download through a synthetic anchor click. Repeatable; touches no
//! session state.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Offer `content` to the user as a file download.
pub fn trigger_download(filename: &str, media_type: &str, content: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(content));

    let options = BlobPropertyBag::new();
    options.set_type(media_type);

    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    Url::revoke_object_url(&url)?;
    Ok(())
}
