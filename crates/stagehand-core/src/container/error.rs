//! # Stagehand Container Errors
//!
//! Defines [`ContainerError`], raised when a binding cannot be created or
//! resolved.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContainerError {
    #[error("No service bound for key '{key}'")]
    NotBound { key: &'static str },

    #[error("A service is already bound for key '{key}'")]
    AlreadyBound { key: &'static str },

    #[error("Service bound for key '{key}' is not a '{expected}'")]
    TypeMismatch {
        key: &'static str,
        expected: &'static str,
    },

    #[error("Attempted to operate on a poisoned container binding table")]
    Poisoned,
}
