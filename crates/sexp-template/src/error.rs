/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template parsing and compilation.
//!
//! Evaluation errors are not listed here: failures raised by the
//! injected [`ExprEvaluator`](crate::evaluator::ExprEvaluator) reach the
//! caller as the evaluator's own error type, untouched.

use thiserror::Error;

/// Errors that can occur while turning template text into a [`Template`](crate::Template).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// Malformed template text, or a template with the wrong shape.
    #[error("Parse error at offset {offset}: {message}")]
    ParseError { message: String, offset: usize },

    /// Parenthesized groups nest deeper than the parser allows.
    #[error("Nesting too deep (max {max_depth}) at offset {offset}")]
    NestingTooDeep { max_depth: usize, offset: usize },
}

impl TemplateError {
    pub(crate) fn parse(message: impl Into<String>, offset: usize) -> Self {
        TemplateError::ParseError {
            message: message.into(),
            offset,
        }
    }

    /// Byte offset into the template source where the error was detected.
    pub fn offset(&self) -> usize {
        match self {
            TemplateError::ParseError { offset, .. }
            | TemplateError::NestingTooDeep { offset, .. } => *offset,
        }
    }
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
