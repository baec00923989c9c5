use thiserror::Error;

/// All errors that can occur when talking to the video generation API.
#[derive(Error, Debug)]
pub enum SoraError {
    /// No API key was supplied and none was found in the environment.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// Submission answered with a status other than 200 or 201.
    /// `body` is the raw response text, never parsed.
    #[error("API error (status {status_code}): {body}")]
    Api { status_code: u16, body: String },

    /// The base URL or HTTP client could not be set up.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// The task identifier cannot name a single `/videos/{id}` resource.
    #[error("invalid task id: {0:?}")]
    InvalidTaskId(String),

    /// The request could not be sent (connect, DNS, timeout).
    #[error("send request: {0}")]
    Http(#[from] reqwest::Error),

    /// The response arrived but its body could not be read.
    #[error("read response: {0}")]
    Read(#[source] reqwest::Error),

    /// The response body was not the JSON shape the provider documents.
    #[error("parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A well-formed response carrying a populated `error` record (submission only).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        kind: Option<String>,
    },
}

impl SoraError {
    /// HTTP status code, when the failure came from a non-success response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SoraError::Api { status_code, .. } => Some(*status_code),
            SoraError::Http(e) | SoraError::Read(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// `true` when the failure happened in the HTTP layer rather than in the reply.
    ///
    /// The provider may still have acted on the request: a submission that
    /// timed out while reading the body can already have created a task.
    pub fn is_transport(&self) -> bool {
        matches!(self, SoraError::Http(_) | SoraError::Read(_))
    }
}

/// A convenience alias for `Result<T, SoraError>`.
pub type Result<T> = std::result::Result<T, SoraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display_carries_status_and_body() {
        let err = SoraError::Api {
            status_code: 500,
            body: "<html>boom</html>".into(),
        };
        assert_eq!(err.to_string(), "API error (status 500): <html>boom</html>");
        assert_eq!(err.status_code(), Some(500));
        assert!(!err.is_transport());
    }

    #[test]
    fn provider_error_display_uses_message() {
        let err = SoraError::Provider {
            message: "prompt rejected".into(),
            kind: Some("invalid_request_error".into()),
        };
        assert_eq!(err.to_string(), "provider error: prompt rejected");
        assert_eq!(err.status_code(), None);
    }

    #[test]
    fn config_and_task_id_errors_are_not_transport() {
        let err = SoraError::Config {
            message: "relative URL without a base".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration: relative URL without a base"
        );
        assert!(!err.is_transport());

        let err = SoraError::InvalidTaskId("..".into());
        assert_eq!(err.to_string(), "invalid task id: \"..\"");
        assert!(!err.is_transport());
    }

    #[test]
    fn parse_error_converts_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SoraError = serde_err.into();
        assert!(matches!(err, SoraError::Parse(_)));
        assert!(err.to_string().starts_with("parse response: "));
    }
}
