use thiserror::Error;

/// Transport-level failures talking to the work-management API.
///
/// "Board not found" is deliberately absent: it is a normal result value
/// (`Ok(None)` from lookup), not a failure mode.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("work-management transport failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("work-management API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("work-management API returned errors: {0}")]
    Api(String),
    #[error("work-management API response was malformed: {0}")]
    MalformedResponse(String),
}
