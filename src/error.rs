use thiserror::Error;

/// Errors that can occur while sourcing candidates or generating plans
#[derive(Error, Debug)]
pub enum PlannerError {
    /// An upstream API answered with a non-success status
    #[error("Upstream returned {status}: {message}")]
    UpstreamUnavailable { status: u16, message: String },

    /// Failed to send a request or read its body
    #[error("Request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Provider output could not be read as the expected JSON
    #[error("Failed to parse response: {0}")]
    ParseFailure(String),

    /// Every category fetch failed or came back empty
    #[error("No meal candidates could be found, please try again")]
    EmptyResultSet,

    /// Category key is not part of the provider table
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    /// No API key configured for the generative provider
    #[error("OpenAI API key not found. Set MEALPLAN__PROVIDER__API_KEY or OPENAI_API_KEY")]
    MissingApiKey,

    /// Caller passed input that cannot be sent upstream
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl PlannerError {
    /// Whether the error came from an upstream API rather than local parsing
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PlannerError::UpstreamUnavailable { .. } | PlannerError::RequestError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_verbatim() {
        let err = PlannerError::UpstreamUnavailable {
            status: 429,
            message: "Rate limit reached".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream returned 429: Rate limit reached");
        assert!(err.is_upstream());
    }

    #[test]
    fn test_parse_failure_is_not_upstream() {
        let err = PlannerError::ParseFailure("expected value".to_string());
        assert!(!err.is_upstream());
        assert!(!PlannerError::EmptyResultSet.is_upstream());
    }
}
