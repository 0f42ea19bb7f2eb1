//! One interpreter session: a scanner, a parser, an evaluator holding the
//! global frame, and the output sink every invocation writes to.
//!
//! A file runner calls [`Session::run`] once; a REPL calls it once per
//! line on the same session so declared variables stay visible.
//!
//! ```rust
//! use deslang::session::{Outcome, Session};
//!
//! let mut session = Session::new(Vec::new());
//!
//! assert_eq!(session.run(&b"var x = 40;"[..])?, Outcome::Completed);
//! assert_eq!(session.run(&b"print x + 2;"[..])?, Outcome::Completed);
//!
//! assert_eq!(session.into_output(), b"42\n");
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Read, Write};

use log::{debug, info};

use crate::error::LoxError;
use crate::interpreter::{InterpretError, Interpreter};
use crate::parser::Parser;
use crate::scanner::Scanner;

/// How an invocation ended.  Language errors have already been written to
/// the sink when this is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Lexical or syntax errors were reported; nothing was executed.
    CompileError,
    /// A runtime error stopped execution part way.
    RuntimeError,
}

pub struct Session<W: Write> {
    scanner: Scanner,
    parser: Parser,
    interpreter: Interpreter,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(out: W) -> Self {
        info!("Session started");

        Self {
            scanner: Scanner::new(),
            parser: Parser::new(),
            interpreter: Interpreter::new(),
            out,
        }
    }

    /// Scan, parse and execute one unit of source.
    ///
    /// Only I/O failures (reading `src`, writing the sink) are returned as
    /// errors; everything the language reports goes to the sink.
    pub fn run<R: Read>(&mut self, src: R) -> io::Result<Outcome> {
        let mut diagnostics: Vec<LoxError> = Vec::new();

        let tokens = self.scanner.scan_tokens(src, &mut diagnostics)?;

        if !diagnostics.is_empty() {
            debug!("Skipping parse: {} lexical errors", diagnostics.len());
            return self.fail_compile(&diagnostics);
        }

        let statements = self.parser.parse(tokens, &mut diagnostics);

        if !diagnostics.is_empty() {
            debug!("Skipping execution: {} syntax errors", diagnostics.len());
            return self.fail_compile(&diagnostics);
        }

        match self.interpreter.interpret(&statements, &mut self.out) {
            Ok(()) => Ok(Outcome::Completed),

            Err(InterpretError::Runtime(e)) => {
                debug!("Runtime error: {}", e);
                writeln!(self.out, "{}", e)?;
                Ok(Outcome::RuntimeError)
            }

            Err(InterpretError::Io(e)) => Err(e),
        }
    }

    fn fail_compile(&mut self, diagnostics: &[LoxError]) -> io::Result<Outcome> {
        for error in diagnostics {
            writeln!(self.out, "{}", error)?;
        }

        Ok(Outcome::CompileError)
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
