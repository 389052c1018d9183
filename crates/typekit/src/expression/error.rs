// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::tree::ExpressionKind;
use crate::types::ResolveError;

/// Errors raised while building, reconstructing or evaluating expressions.
#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    /// A described type has no counterpart in the type universe.
    #[error("cannot resolve type '{descriptor}' while reconstructing expression")]
    UnresolvedType { descriptor: String },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Structurally invalid tree.
    #[error("invalid expression: {0}")]
    Invalid(String),

    /// Node kind that needs a host binding to evaluate.
    #[error("{kind} nodes cannot be evaluated without a host binding")]
    Unsupported { kind: ExpressionKind },

    /// Runtime failure while evaluating a compiled lambda.
    #[error("evaluation failed: {0}")]
    Evaluation(String),
}
