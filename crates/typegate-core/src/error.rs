//! Shared error type across typegate crates.

use serde::Serialize;
use thiserror::Error;

/// Caller-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing, blank or malformed argument / configuration value.
    InvalidArgument,
    /// A pattern source failed to compile.
    PatternCompilation,
    /// Mutation attempted on a frozen policy.
    PolicyFrozen,
    /// `freeze` called on a policy that is already frozen.
    AlreadyFrozen,
    /// Type name rejected by the policy.
    TypeNotAllowed,
    /// Internal error (I/O and the like).
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and JSON output.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::PatternCompilation => "PATTERN_COMPILATION",
            ErrorCode::PolicyFrozen => "POLICY_FROZEN",
            ErrorCode::AlreadyFrozen => "ALREADY_FROZEN",
            ErrorCode::TypeNotAllowed => "TYPE_NOT_ALLOWED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TypeGateError>;

/// Unified error type used by core and policy.
#[derive(Debug, Error)]
pub enum TypeGateError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("invalid pattern `{pattern}`: {reason}")]
    PatternCompilation { pattern: String, reason: String },
    #[error("policy is frozen")]
    PolicyFrozen,
    #[error("policy is already frozen")]
    AlreadyFrozen,
    /// Carries the rejected type name; `Display` is the bare name.
    #[error("{0}")]
    TypeNotAllowed(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl TypeGateError {
    /// Map the error to a stable caller-facing code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TypeGateError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            TypeGateError::PatternCompilation { .. } => ErrorCode::PatternCompilation,
            TypeGateError::PolicyFrozen => ErrorCode::PolicyFrozen,
            TypeGateError::AlreadyFrozen => ErrorCode::AlreadyFrozen,
            TypeGateError::TypeNotAllowed(_) => ErrorCode::TypeNotAllowed,
            TypeGateError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Rejected type name, for `TypeNotAllowed` errors.
    pub fn rejected_type(&self) -> Option<&str> {
        match self {
            TypeGateError::TypeNotAllowed(name) => Some(name),
            _ => None,
        }
    }
}
