// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for protocol registration and dispatch.

use std::error::Error as StdError;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors raised by registries and protocol factories.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Invalid registration or construction argument.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// An operation is already served and the collision strategy is `Throw`.
    #[error(
        "cannot register protocol '{protocol}' for operation '{operation}': \
         already served by '{existing}'"
    )]
    Collision {
        protocol: &'static str,
        operation: &'static str,
        existing: &'static str,
    },

    /// No protocol is registered for the operation and the missing strategy is `Throw`.
    #[error("no protocol registered for operation '{operation}'")]
    NotFound { operation: &'static str },

    /// A registered factory produced no instance.
    #[error("factory for protocol '{protocol}' returned no instance for operation '{operation}'")]
    FactoryReturnedNone {
        protocol: &'static str,
        operation: &'static str,
    },

    /// A protocol was asked to run an operation it was not resolved for.
    #[error("protocol '{protocol}' cannot execute operation '{operation}'")]
    Mismatch {
        protocol: &'static str,
        operation: &'static str,
    },

    /// The protocol itself failed while executing.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Failure reported by a protocol's own logic.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ProtocolError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ProtocolError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_names_both_sides() {
        let err = DispatchError::Collision {
            protocol: "NewProtocol",
            operation: "SharedOperation",
            existing: "OldProtocol",
        };
        let msg = err.to_string();
        assert!(msg.contains("NewProtocol"));
        assert!(msg.contains("SharedOperation"));
        assert!(msg.contains("OldProtocol"));
    }

    #[test]
    fn protocol_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = ProtocolError::with_source("save failed", io);
        assert_eq!(err.message(), "save failed");
        assert_eq!(err.source().map(|s| s.to_string()), Some("disk gone".into()));

        let wrapped: DispatchError = err.into();
        assert_eq!(wrapped.to_string(), "save failed");
    }
}
