//! Common error types shared by the ledger crates

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parsing error: {0}")]
    ParseError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommonError {
    pub fn http_status_code(&self) -> u16 {
        match self {
            CommonError::InvalidInput(_) => 400,
            CommonError::ParseError(_) => 400,
            CommonError::NotFound(_) => 404,
            CommonError::InvalidTransition(_) => 409,
            _ => 500,
        }
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        CommonError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_codes() {
        assert_eq!(CommonError::NotFound("test".to_string()).http_status_code(), 404);
        assert_eq!(CommonError::InvalidInput("test".to_string()).http_status_code(), 400);
        assert_eq!(CommonError::InvalidTransition("test".to_string()).http_status_code(), 409);
        assert_eq!(CommonError::Internal("test".to_string()).http_status_code(), 500);
    }
}
