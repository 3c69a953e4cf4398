// Error types for the formgate request boundary

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request body already consumed")]
    BodyConsumed,

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable Entity: {0}")]
    UnprocessableEntity(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Deserialization(_) => 400,
            Error::PayloadTooLarge(_) => 413,
            Error::Validation(_) | Error::UnprocessableEntity(_) => 422,
            Error::Io(_) | Error::BodyConsumed | Error::Serialization(_) | Error::Internal(_) => {
                500
            }
        }
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Deserialization("x".into()).status_code(), 400);
        assert_eq!(Error::PayloadTooLarge("x".into()).status_code(), 413);
        assert_eq!(Error::Validation("x".into()).status_code(), 422);
        assert_eq!(Error::BodyConsumed.status_code(), 500);
    }

    #[test]
    fn test_bad_request_means_undecodable_body() {
        let client: Vec<u16> = [
            Error::Deserialization("x".into()),
            Error::PayloadTooLarge("x".into()),
            Error::Validation("x".into()),
            Error::UnprocessableEntity("x".into()),
        ]
        .iter()
        .map(Error::status_code)
        .collect();
        assert_eq!(client, [400, 413, 422, 422]);
        assert_eq!(Error::Serialization("x".into()).status_code(), 500);
    }

    #[test]
    fn test_error_classes() {
        assert!(Error::Validation("name".into()).is_client_error());
        assert!(!Error::Validation("name".into()).is_server_error());
        assert!(Error::Internal("boom".into()).is_server_error());
    }

    #[test]
    fn test_io_conversion() {
        let err: Error = std::io::Error::other("reset by peer").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "IO error: reset by peer");
    }
}
