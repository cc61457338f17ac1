//! Fetch client for the remote analysis service
//!
//! Every endpoint speaks JSON over POST. Any non-2xx status is treated as a
//! uniform service failure regardless of the specific code; the body's
//! `error` field is surfaced verbatim when present, with a generic fallback
//! otherwise. A request that never reaches the service is a transport
//! failure with a retry-eligible message.

use resume_core::error::ApiError;
use resume_core::types::{
    AnalyzeRequest, EnhanceRequest, EnhancedResume, ErrorBody, JobAnalysisResult, LoginRequest,
    RegisterRequest, ResumeFormat, UploadRequest, UploadResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// Fallback shown when a failure body carries no usable `error` field.
const GENERIC_SERVICE_ERROR: &str = "The service reported an error. Please try again.";

/// JSON client for the resume enhancement service.
pub struct ApiClient {
    base: String,
}

impl ApiClient {
    /// Create a client. An empty base means same-origin relative URLs.
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.post_json::<_, serde_json::Value>("/api/login", &LoginRequest { email, password })
            .await
            .map(|_| ())
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<(), ApiError> {
        self.post_json::<_, serde_json::Value>(
            "/api/register",
            &RegisterRequest {
                email,
                password,
                username,
            },
        )
        .await
        .map(|_| ())
    }

    /// Upload validated resume content. Returns the service-assigned id.
    pub async fn upload_resume(
        &self,
        format: ResumeFormat,
        content: &str,
    ) -> Result<String, ApiError> {
        let body = UploadRequest::new(format, content);
        let response: UploadResponse = self.post_json("/api/resume/upload", &body).await?;
        Ok(response.id)
    }

    pub async fn analyze(
        &self,
        resume_id: &str,
        job_description: &str,
    ) -> Result<JobAnalysisResult, ApiError> {
        self.post_json(
            "/api/resume/analyze",
            &AnalyzeRequest {
                resume_id,
                job_description,
            },
        )
        .await
    }

    pub async fn enhance(
        &self,
        resume_id: &str,
        selected_skills: &[String],
    ) -> Result<EnhancedResume, ApiError> {
        self.post_json(
            "/api/resume/enhance",
            &EnhanceRequest {
                resume_id,
                selected_skills,
            },
        )
        .await
    }

    /// POST a JSON body and parse a JSON response.
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base, path);
        let body_str = serde_json::to_string(body).map_err(transport)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_body(&JsValue::from_str(&body_str));

        let request = Request::new_with_str_and_init(&url, &opts).map_err(transport_js)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(transport_js)?;

        let window = web_sys::window().ok_or_else(|| ApiError::Transport("No window".into()))?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport_js)?;
        let response: Response = response
            .dyn_into()
            .map_err(|_| ApiError::Transport("Unexpected fetch result".into()))?;

        let text = JsFuture::from(response.text().map_err(transport_js)?)
            .await
            .map_err(transport_js)?
            .as_string()
            .unwrap_or_default();

        if !response.ok() {
            return Err(ApiError::Service(service_error_message(&text)));
        }

        serde_json::from_str(&text)
            .map_err(|e| ApiError::Service(format!("Malformed service response: {}", e)))
    }
}

/// Extract the human-readable `error` field from a failure body, falling
/// back to a generic, retry-eligible message.
pub(crate) fn service_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|msg| !msg.is_empty())
        .unwrap_or_else(|| GENERIC_SERVICE_ERROR.to_string())
}

fn transport<E: std::fmt::Display>(err: E) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn transport_js(value: JsValue) -> ApiError {
    let message = value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| "Request failed".to_string());
    ApiError::Transport(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_uses_body_message() {
        let msg = service_error_message(r#"{"error":"service unavailable"}"#);
        assert_eq!(msg, "service unavailable");
    }

    #[test]
    fn service_error_falls_back_on_missing_field() {
        assert_eq!(service_error_message("{}"), GENERIC_SERVICE_ERROR);
    }

    #[test]
    fn service_error_falls_back_on_non_json_body() {
        assert_eq!(
            service_error_message("<html>502 Bad Gateway</html>"),
            GENERIC_SERVICE_ERROR
        );
    }

    #[test]
    fn service_error_falls_back_on_empty_message() {
        assert_eq!(service_error_message(r#"{"error":""}"#), GENERIC_SERVICE_ERROR);
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new("https://api.example.com/");
        assert_eq!(client.base, "https://api.example.com");

        let client = ApiClient::new("");
        assert_eq!(client.base, "");
    }
}
