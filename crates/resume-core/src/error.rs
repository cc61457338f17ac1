use crate::types::Stage;
use thiserror::Error;

/// Why a locally selected document was rejected before transmission.
///
/// These never leave the browser; the user recovers by selecting a
/// different file.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    #[error("File extension does not match the expected resume format")]
    WrongFormat,

    #[error("File exceeds the 16 MiB size limit")]
    TooLarge,

    #[error("Content does not look like an HTML document")]
    MalformedContent,

    #[error("Could not read the file as text")]
    ReadError,
}

/// Failure reaching, or reported by, the remote analysis service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a service response (network down, DNS,
    /// CORS, fetch rejection). Always retry-eligible.
    #[error("Network error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status. Carries the service's
    /// `error` message when one was present in the body.
    #[error("{0}")]
    Service(String),
}

/// A workflow operation invoked out of turn.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Operation not available in the {0} stage")]
    WrongStage(Stage),

    #[error("A request for this operation is already in flight")]
    RequestInFlight,

    #[error("Select at least one missing skill before enhancing")]
    NothingSelected,

    #[error("Job description must not be empty")]
    EmptyJobDescription,
}
