use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Connection to server failed")]
    Network(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Network(_) => "NETWORK_ERROR",
            AppError::Api { .. } => "API_ERROR",
            AppError::Decode(_) => "DECODE_ERROR",
            AppError::Io(_) => "IO_ERROR",
        }
    }

    /// Message suitable for showing directly in the interface.
    ///
    /// Connectivity failures collapse to one generic line; structured API
    /// errors are surfaced verbatim.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) => "Connection to server failed".to_string(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Decode(_) => "Server returned an unexpected response".to_string(),
            AppError::Io(_) => "A local I/O error occurred".to_string(),
        }
    }

    pub fn log(&self) {
        match self {
            AppError::Api { status, message } => {
                error!(code = self.code(), status, message = %message, "Request failed");
            }
            AppError::Network(e) => {
                error!(code = self.code(), error = ?e, "Request failed");
            }
            AppError::Decode(e) => {
                error!(code = self.code(), error = ?e, "Response decode failed");
            }
            AppError::Io(e) => {
                error!(code = self.code(), error = ?e, "I/O failure");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_surface_their_payload_message() {
        let err = AppError::Api {
            status: 403,
            message: "Only societies can create events".to_string(),
        };
        assert_eq!(err.user_message(), "Only societies can create events");
        assert_eq!(err.code(), "API_ERROR");
    }

    #[test]
    fn decode_errors_use_a_generic_message() {
        let err = AppError::from(serde_json::from_str::<i32>("not json").unwrap_err());
        assert_eq!(err.user_message(), "Server returned an unexpected response");
    }
}
