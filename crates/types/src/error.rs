// Path: crates/types/src/error.rs
//! Core error types for the PageVault engine.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors related to the state backend.
#[derive(Error, Debug)]
pub enum StateError {
    /// The requested key was not found in the state.
    #[error("Key not found in state")]
    KeyNotFound,
    /// State validation failed.
    #[error("Validation failed: {0}")]
    Validation(String),
    /// Applying a state change batch failed.
    #[error("Apply failed: {0}")]
    Apply(String),
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// The provided value was invalid.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// An error occurred during state deserialization.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::KeyNotFound => "STATE_KEY_NOT_FOUND",
            Self::Validation(_) => "STATE_VALIDATION_FAILED",
            Self::Apply(_) => "STATE_APPLY_FAILED",
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::InvalidValue(_) => "STATE_INVALID_VALUE",
            Self::Decode(_) => "STATE_DECODE_ERROR",
        }
    }
}

/// Errors related to swapping the active logic build.
#[derive(Debug, Error)]
pub enum UpgradeError {
    /// The proposed logic build was rejected before activation.
    #[error("Invalid upgrade: {0}")]
    InvalidUpgrade(String),
    /// The proposed build is already the active one.
    #[error("Logic version {0} is already active")]
    AlreadyActive(String),
    /// The proposed build addresses state through a different layout.
    #[error("State schema mismatch. Expected {expected}, got {got}")]
    SchemaMismatch {
        /// The schema recorded in the active manifest.
        expected: String,
        /// The schema declared by the proposed build.
        got: String,
    },
}

impl ErrorCode for UpgradeError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidUpgrade(_) => "UPGRADE_INVALID",
            Self::AlreadyActive(_) => "UPGRADE_ALREADY_ACTIVE",
            Self::SchemaMismatch { .. } => "UPGRADE_SCHEMA_MISMATCH",
        }
    }
}

/// Errors returned from calls against the page store.
///
/// The host returns a failing logic call's `CallError` to the caller
/// verbatim. Wrapping or rephrasing it would make the same failure look
/// different depending on which layer surfaced it.
#[derive(Error, Debug)]
pub enum CallError {
    /// The caller is not the registered privileged writer.
    #[error("Caller is not the privileged writer")]
    Unauthorized,
    /// An argument failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// The named page does not exist.
    #[error("Page not found: {0}")]
    NotFound(String),
    /// An index or offset fell outside the registry bounds.
    #[error("Index out of range. Index {index}, length {len}")]
    OutOfRange {
        /// The rejected index or offset.
        index: u64,
        /// The registry length at the time of the call.
        len: u64,
    },
    /// An error originating from the state backend.
    #[error("State error: {0}")]
    State(#[from] StateError),
}

impl ErrorCode for CallError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "CALL_UNAUTHORIZED",
            Self::InvalidArgument(_) => "CALL_INVALID_ARGUMENT",
            Self::NotFound(_) => "CALL_NOT_FOUND",
            Self::OutOfRange { .. } => "CALL_OUT_OF_RANGE",
            Self::State(_) => "CALL_STATE_ERROR",
        }
    }
}

impl From<UpgradeError> for CallError {
    fn from(e: UpgradeError) -> Self {
        CallError::InvalidArgument(format!("Upgrade error: {}", e))
    }
}
