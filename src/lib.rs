//! Lexer and parser for the seabow programming language.
//!
//! Source text is scanned into [`Token`]s, then parsed by a
//! recursive-descent, precedence-climbing [`Parser`] into a tree of
//! [`Node`]s. Errors are values: the lexer emits `Bad` tokens and the
//! parser returns a `Bad` node carrying a [`Diagnostic`].
//!
//! # Quick start
//!
//! ```
//! use seabow_syntax::{format, parse, tokenize};
//!
//! let tokens = tokenize("1 + 2 * 3");
//! assert!(tokens.last().is_some_and(|t| t.text == "<EOF>"));
//!
//! let root = parse(&tokens);
//! assert_eq!(format(&root), "(+ 1 (* 2 3))\n");
//! ```
//!
//! ## Errors as values
//!
//! ```
//! use seabow_syntax::parse_str;
//!
//! let err = parse_str("(1 + 2").unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "SyntaxError: Expected ')' but was '<EOF>' at line 1, column 7"
//! );
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod diagnostic;
pub mod formatter;
pub mod lexer;
pub mod parser;
pub mod token;

use std::path::{Path, PathBuf};

pub use ast::{Literal, Node, NodeKind};
pub use diagnostic::{Diagnostic, SYNTAX_ERROR};
pub use formatter::{format, format_expr};
pub use lexer::{LexErrorKind, Lexer, tokenize};
pub use parser::{
    MAX_NESTING_DEPTH, ParseErrorKind, ParseOptions, Parser, StatementMode, parse,
};
pub use token::{Span, Token, TokenKind, ValueType};

/// Unified error type for the one-step entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A source file could not be read.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The source failed to lex or parse.
    #[error("{0}")]
    Syntax(#[from] Diagnostic),
}

/// Tokenize and parse a source string in one step.
pub fn parse_str(input: &str) -> Result<Node, Error> {
    Ok(parse(&tokenize(input)).into_result()?)
}

/// Read, tokenize and parse a source file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Node, Error> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&source)
}
