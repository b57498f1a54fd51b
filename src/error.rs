use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt::Display};

pub type CommentResult<T> = Result<T, CommentError>;

/// Category of a failed comment operation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connection, timeout or body transfer failure
    Network,
    /// Missing or rejected credentials (HTTP 401/403)
    Authorization,
    /// Input rejected locally or by the server (HTTP 4xx)
    Validation,
    /// Response body didn't match the expected shape
    Decode,
    /// Server side failure, or a response contradicting the request
    Server,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommentError {
    kind: ErrorKind,
    message: String,
    status: Option<u16>,
}

impl CommentError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Error for a non-success HTTP response.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match StatusCode::from_u16(status) {
            Ok(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => ErrorKind::Authorization,
            Ok(s) if s.is_client_error() => ErrorKind::Validation,
            _ => ErrorKind::Server,
        };
        Self {
            kind,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(self) -> String {
        self.message
    }
}

impl Display for CommentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{:?} error ({status}): {}", self.kind, self.message),
            None => write!(f, "{:?} error: {}", self.kind, self.message),
        }
    }
}

impl Error for CommentError {}

impl From<reqwest::Error> for CommentError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::new(ErrorKind::Decode, value.to_string())
        } else if let Some(status) = value.status() {
            Self::from_status(status.as_u16(), value.to_string())
        } else if value.is_builder() {
            Self::new(ErrorKind::Validation, value.to_string())
        } else {
            Self::new(ErrorKind::Network, value.to_string())
        }
    }
}

impl From<url::ParseError> for CommentError {
    fn from(value: url::ParseError) -> Self {
        Self::new(ErrorKind::Validation, value.to_string())
    }
}

impl From<serde_json::Error> for CommentError {
    fn from(value: serde_json::Error) -> Self {
        Self::new(ErrorKind::Decode, value.to_string())
    }
}
