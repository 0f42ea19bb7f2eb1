//! Module `scanner` implements the one‑pass lexer for deslang.
//!
//! It transforms a byte source into a sequence of [`Token`]s, skipping
//! whitespace and comments, and emitting exactly one `EOF` token at the end.
//!
//! # Public API
//!
//! - `Scanner::new() -> Scanner`
//!   Create a reusable lexer.  A session keeps one for its whole lifetime.
//!
//! - `Scanner::scan_tokens(src, reporter) -> io::Result<Vec<Token>>`
//!   Reset the internal buffers, read `src` to the end, and tokenize it.
//!   Lexical errors go to the [`Reporter`] and scanning continues; only a
//!   failing read aborts the call.
//!
//! - `impl Iterator for Scanner`
//!   Yields `Result<Token, LoxError>` over the currently loaded buffer
//!   (see [`Scanner::load`]).
//!
//! # Token Recognition (`scan_token`)
//!
//! - Single‑character tokens: `(`, `)`, `{`, `}`, `,`, `-`, `+`, `;`, `*`.
//! - One‑or‑two‑character operators: `!`, `!=`, `=`, `==`, `<`, `<=`, `>`, `>=`.
//! - `/` or a `//` comment running to the end of the line.
//! - String literals: `"` … `"`, multi‑line allowed.
//! - Numeric literals: digits, optionally `.` and more digits.
//! - Identifiers/keywords: an ASCII letter then letters/digits, resolved
//!   through the perfect‑hash `KEYWORDS` map.
//! - Anything else is an "Unexpected character" error.
//!
//! # Example
//!
//! ```rust
//! use deslang::error::LoxError;
//! use deslang::scanner::Scanner;
//!
//! let mut errors: Vec<LoxError> = Vec::new();
//! let tokens = Scanner::new().scan_tokens(&b"print 123; // example"[..], &mut errors)?;
//!
//! assert_eq!(tokens.len(), 4);
//! assert!(errors.is_empty());
//! # Ok::<(), std::io::Error>(())
//! ```

use crate::error::{LoxError, Reporter, Result};
use crate::token::{Token, TokenType};
use log::{debug, info};
use memchr::memchr;
use phf::phf_map;
use std::io::{self, Read};
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"for"    => TokenType::FOR,
    b"fun"    => TokenType::FUN,
    b"if"     => TokenType::IF,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

/// A single pass **scanner / lexer** that converts raw bytes into a
/// sequence of [`Token`]s.
#[derive(Debug, Default)]
pub struct Scanner {
    src: Vec<u8>,               // source of the current invocation
    start: usize,               // index of the *first* byte of the current lexeme
    curr: usize,                // index *one past* the last byte examined
    line: usize,                // 1‑based line counter (\n increments)
    pending: Option<TokenType>, // recognised token kind waiting to be emitted
}

impl Scanner {
    /// Create a new, empty lexer.
    #[inline]
    pub fn new() -> Self {
        info!("Scanner created");

        Self {
            line: 1,
            ..Self::default()
        }
    }

    /// Read `src` to the end and tokenize it.  The returned sequence always
    /// ends with `EOF`; bad lexemes are reported and left out.
    pub fn scan_tokens<R: Read>(
        &mut self,
        src: R,
        reporter: &mut dyn Reporter,
    ) -> io::Result<Vec<Token>> {
        self.load(src)?;

        let mut tokens: Vec<Token> = Vec::new();
        let mut errors: usize = 0;

        while let Some(item) = self.next() {
            match item {
                Ok(token) => tokens.push(token),

                Err(e) => {
                    errors += 1;
                    reporter.report(e);
                }
            }
        }

        info!(
            "Scanned {} tokens ({} lexical errors) over {} lines",
            tokens.len(),
            errors,
            self.line
        );

        Ok(tokens)
    }

    /// Reset all per‑invocation state and buffer the whole of `src`.
    /// `read_to_end` retries on `Interrupted`; any other failure is returned.
    pub fn load<R: Read>(&mut self, mut src: R) -> io::Result<()> {
        self.src.clear();
        self.start = 0;
        self.curr = 0;
        self.line = 1;
        self.pending = None;

        let bytes: usize = src.read_to_end(&mut self.src)?;

        debug!("Scanner loaded {} bytes", bytes);

        Ok(())
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Return the length of the input buffer.
    #[inline(always)]
    fn len(&self) -> usize {
        self.src.len()
    }

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.len()
    }

    /// Advance one byte and return it.  *Panics* if called at EOF – higher‑level
    /// code always guards with [`is_at_end`].
    #[inline(always)]
    fn advance(&mut self) -> u8 {
        let b = self.src[self.curr];
        self.curr += 1;
        b
    }

    /// Peek at the current byte without consuming it.  Returns `0` if past EOF
    /// to avoid branching at call‑site.
    #[inline(always)]
    fn peek(&self) -> u8 {
        if self.is_at_end() {
            0
        } else {
            self.src[self.curr]
        }
    }

    /// Conditionally consume a byte **iff** it matches `expected`.
    #[inline(always)]
    fn match_byte(&mut self, expected: u8) -> bool {
        if !self.is_at_end() && self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Current lexeme as text.  Non‑UTF‑8 bytes are replaced, never rejected.
    fn lexeme(&self, from: usize, to: usize) -> String {
        String::from_utf8_lossy(&self.src[from..to]).into_owned()
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces an
    /// actual token the kind is stored in `self.pending`.  Whitespace and
    /// comments are skipped by returning `Ok(())` with `pending = None`.
    fn scan_token(&mut self) -> Result<()> {
        let b = self.advance();

        match b {
            // ── single‑character punctuators ──────────────────────────────
            b'(' => self.pending = Some(TokenType::LEFT_PAREN),
            b')' => self.pending = Some(TokenType::RIGHT_PAREN),
            b'{' => self.pending = Some(TokenType::LEFT_BRACE),
            b'}' => self.pending = Some(TokenType::RIGHT_BRACE),
            b',' => self.pending = Some(TokenType::COMMA),
            b'-' => self.pending = Some(TokenType::MINUS),
            b'+' => self.pending = Some(TokenType::PLUS),
            b';' => self.pending = Some(TokenType::SEMICOLON),
            b'*' => self.pending = Some(TokenType::STAR),

            // ── one‑or‑two‑character operators ────────────────────────────
            b'!' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::BANG_EQUAL
                } else {
                    TokenType::BANG
                };

                self.pending = Some(tt);
            }

            b'=' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::EQUAL_EQUAL
                } else {
                    TokenType::EQUAL
                };

                self.pending = Some(tt);
            }

            b'<' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::LESS_EQUAL
                } else {
                    TokenType::LESS
                };

                self.pending = Some(tt);
            }

            b'>' => {
                let tt = if self.match_byte(b'=') {
                    TokenType::GREATER_EQUAL
                } else {
                    TokenType::GREATER
                };

                self.pending = Some(tt);
            }

            // ── whitespace / newline ─────────────────────────────────────
            b' ' | b'\r' | b'\t' => {
                return Ok(());
            }

            b'\n' => {
                self.line += 1;

                return Ok(());
            }

            // ── comments (// … until newline) ────────────────────────────
            b'/' => {
                if self.match_byte(b'/') {
                    // The newline itself is left for the main loop so the
                    // line counter still sees it.
                    if let Some(pos) = memchr(b'\n', &self.src[self.curr..]) {
                        self.curr += pos;
                    } else {
                        self.curr = self.len();
                    }

                    return Ok(());
                }

                self.pending = Some(TokenType::SLASH);
            }

            b'"' => {
                return self.parse_string();
            }

            b'0'..=b'9' => {
                self.parse_number();
            }

            b'a'..=b'z' | b'A'..=b'Z' => {
                self.parse_identifier();
            }

            _ => {
                debug!("Unexpected byte 0x{:02x} on line {}", b, self.line);

                return Err(LoxError::lex(self.line, "Unexpected character"));
            }
        }

        Ok(())
    }

    /// Parse a double‑quoted string literal.
    ///
    /// * `self.start` still points to the opening `"`.
    /// * When we return, `self.curr` points **past** the closing `"`.
    fn parse_string(&mut self) -> Result<()> {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.advance() == b'\n' {
                self.line += 1;
            }
        }

        if self.is_at_end() {
            return Err(LoxError::lex(self.line, "Unterminated string"));
        }

        self.advance(); // consume closing quote

        let s: String = self.lexeme(self.start + 1, self.curr - 1);

        self.pending = Some(TokenType::STRING(s));

        Ok(())
    }

    /// Parse a numeric literal (`123`, `3.14`, `3.`).
    fn parse_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.match_byte(b'.') {
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let s: String = self.lexeme(self.start, self.curr);
        let n: f64 = s.parse::<f64>().unwrap_or(0.0); // only digits and one '.'
        self.pending = Some(TokenType::NUMBER(n));
    }

    /// Parse an identifier and decide if it is a **keyword** or a generic
    /// `IDENTIFIER` token.
    fn parse_identifier(&mut self) {
        while self.peek().is_ascii_alphanumeric() {
            self.advance();
        }

        let slice: &[u8] = &self.src[self.start..self.curr];

        let tt: TokenType = KEYWORDS
            .get(slice)
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER);

        self.pending = Some(tt);
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl Iterator for Scanner {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        // Loop until we either emit a token, hit EOF, or see an error.
        while self.curr <= self.len() {
            // 1. EOF guard – emit exactly one EOF then terminate.
            if self.curr == self.len() {
                self.curr += 1;
                return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
            }

            // 2. Reset per‑token state.
            self.start = self.curr;
            self.pending = None;

            // 3. Attempt to scan a token.
            if let Err(e) = self.scan_token() {
                return Some(Err(e));
            }

            // 4. If a real token was recognised, build and return it.
            if let Some(tt) = self.pending.take() {
                let lex: String = self.lexeme(self.start, self.curr);
                debug!("Scanned token ({:?}) on line {}", tt, self.line);

                return Some(Ok(Token::new(tt, lex, self.line)));
            }
            // Otherwise it was whitespace / comment → continue loop.
        }

        None // already yielded EOF
    }
}

impl FusedIterator for Scanner {}
