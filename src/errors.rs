use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthErrorCode;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Auth error: {message}")]
    Auth {
        code: AuthErrorCode,
        message: String,
    },

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Subscription error: {0}")]
    SubscriptionError(String),

    #[error("Env error: {0}")]
    EnvError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Error,
    Success,
}

/// User-facing status message with a type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    #[serde(rename = "type")]
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }
}

impl AppError {
    pub fn auth(code: AuthErrorCode, message: impl Into<String>) -> Self {
        AppError::Auth {
            code,
            message: message.into(),
        }
    }

    /// Every failure surfaces as a visible status message. Classified
    /// provider codes map to the fixed message set; unclassified ones fall
    /// back to the raw provider message.
    pub fn to_status(&self) -> Status {
        match self {
            AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::AlreadyExists(msg)
            | AppError::NotFound(msg)
            | AppError::SubscriptionError(msg) => Status::error(msg.clone()),
            AppError::Auth { code, message } => match code.user_message() {
                Some(fixed) => Status::error(fixed),
                None => Status::error(message.clone()),
            },
            AppError::JwtError(msg)
            | AppError::Serialization(msg)
            | AppError::Deserialization(msg)
            | AppError::StoreError(msg)
            | AppError::EnvError(msg) => Status::error(msg.clone()),
        }
    }
}
