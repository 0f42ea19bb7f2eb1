//! Centralised error hierarchy for **deslang**.
//!
//! Compile-time diagnostics (scanner, parser) become [`LoxError`] values and
//! are handed to a [`Reporter`] as they are found, so one pass can surface
//! several of them.  Evaluation failures are [`RuntimeError`]s and abort the
//! current invocation.  I/O failures never turn into language errors.
//!
//! The module **does not** print diagnostics itself.

use thiserror::Error;

use log::info;

use crate::value::ValueKind;

/// Compile-time diagnostic from the scanner or the parser.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error.  Lexer complaints carry no location hint.
    #[error("[line {line}] Error : {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error; `location` is `at end` or `at '<lexeme>'`.
    #[error("[line {line}] Error {location}: {message}")]
    Parse {
        message: String,
        location: String,
        line: usize,
    },
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<L: Into<String>, S: Into<String>>(line: usize, location: L, msg: S) -> Self {
        let message: String = msg.into();
        let location: String = location.into();

        info!(
            "Creating Parse error: line={}, location={}, msg={}",
            line, location, message
        );

        LoxError::Parse {
            message,
            location,
            line,
        }
    }

    /// Source line the diagnostic points at.
    pub fn line(&self) -> usize {
        match self {
            LoxError::Lex { line, .. } | LoxError::Parse { line, .. } => *line,
        }
    }
}

/// Failures raised while evaluating a program.  `Display` is the bare
/// message written to the output sink.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),

    #[error("Invalid operation. Mismatched types {left} and {right}.")]
    MismatchedTypes { left: ValueKind, right: ValueKind },

    #[error("Invalid operation. Operator '{operator}' does not apply to {kind} operands.")]
    InvalidOperands { operator: String, kind: ValueKind },

    #[error("Invalid operation. Operator '{operator}' does not apply to a {kind} operand.")]
    InvalidOperand { operator: String, kind: ValueKind },
}

/// Sink for compile-time diagnostics.  The scanner and parser keep going
/// after reporting; the caller decides whether the pass failed.
pub trait Reporter {
    fn report(&mut self, error: LoxError);
}

impl Reporter for Vec<LoxError> {
    fn report(&mut self, error: LoxError) {
        self.push(error);
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;
