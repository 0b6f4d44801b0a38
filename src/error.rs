use serde_json::Value;
use thiserror::Error;

/// Failure reported by a [`crate::completion::CompletionClient`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompletionError {
    /// The endpoint answered, but with an error status.
    #[error("completion service responded with status {status}")]
    Service { status: u16, data: Value },

    /// The request never produced a service response: connect failure,
    /// timeout, undecodable body.
    #[error("{0}")]
    Transport(String),
}

/// Error response captured from the completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub status: u16,
    pub data: Value,
}

/// Error surfaced by [`crate::classifier::Classifier::classify`] for every
/// failure of the completion call.
#[derive(Debug, Clone, PartialEq, Error)]
#[error(
    "error while communicating with the completion service: {} - {body}",
    .code.map_or_else(|| "none".to_string(), |code| code.to_string())
)]
pub struct ServiceError {
    pub code: Option<u16>,
    pub response: Option<ServiceResponse>,
    pub body: Value,
}

impl ServiceError {
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            response: None,
            body: Value::String(message.into()),
        }
    }
}

impl From<CompletionError> for ServiceError {
    fn from(error: CompletionError) -> Self {
        match error {
            CompletionError::Service { status, data } => Self {
                code: Some(status),
                body: data.clone(),
                response: Some(ServiceResponse { status, data }),
            },
            CompletionError::Transport(message) => Self::from_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_failure_keeps_status_and_payload() {
        let error = ServiceError::from(CompletionError::Service {
            status: 429,
            data: json!({"message": "rate limited"}),
        });

        assert_eq!(error.code, Some(429));
        assert_eq!(error.body, json!({"message": "rate limited"}));
        let response = error.response.expect("structured response");
        assert_eq!(response.status, 429);
        assert_eq!(response.data, json!({"message": "rate limited"}));
    }

    #[test]
    fn transport_failure_has_only_a_message() {
        let error = ServiceError::from(CompletionError::Transport("ECONNRESET".into()));

        assert_eq!(error.code, None);
        assert!(error.response.is_none());
        assert_eq!(error.body, json!("ECONNRESET"));
    }

    #[test]
    fn display_includes_code_and_body() {
        let error = ServiceError::from(CompletionError::Service {
            status: 500,
            data: json!("boom"),
        });
        assert_eq!(
            error.to_string(),
            "error while communicating with the completion service: 500 - \"boom\""
        );

        let error = ServiceError::from_message("ECONNRESET");
        assert_eq!(
            error.to_string(),
            "error while communicating with the completion service: none - \"ECONNRESET\""
        );
    }
}
