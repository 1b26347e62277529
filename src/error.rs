use thiserror::Error;

/// Error taxonomy. Each variant tracks whether it is fatal to the
/// whole run, fails only the current scenario, or is handled internally.
#[derive(Error, Debug, Clone)]
pub enum PlanError {
    #[error("input error: {0}")]
    InputError(String),

    #[error("authentication failed")]
    AuthFailure,

    #[error("request forbidden")]
    Forbidden,

    #[error("rate limited after retries")]
    RateLimited,

    #[error("no route found for cluster call")]
    NoRouteFound { result_code: i64, message: String },

    #[error("provider error {result_code}: {message}")]
    ProviderError { result_code: i64, message: String },

    #[error("malformed response: missing summary and sections")]
    MalformedResponse,

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("cancelled")]
    Cancelled,
}

impl PlanError {
    /// Fatal errors abort the whole run (surfaced to the CLI, non-zero exit).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PlanError::InputError(_) | PlanError::AuthFailure | PlanError::Forbidden
        )
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
