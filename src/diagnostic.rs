use crate::token::Span;

/// Name carried by every error surfaced by the lexer and parser.
pub const SYNTAX_ERROR: &str = "SyntaxError";

/// A named error with a message and an optional source position.
///
/// A diagnostic built without a position sits at (0, 0) until
/// [`Diagnostic::set_position`] places it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name}: {message} at line {line}, column {column}")]
pub struct Diagnostic {
    pub name: String,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            line: 0,
            column: 0,
        }
    }

    #[must_use]
    pub fn at(name: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        let mut diagnostic = Self::new(name, message);
        diagnostic.set_position(span);
        diagnostic
    }

    /// A `SyntaxError` at the given position.
    #[must_use]
    pub fn syntax(message: impl Into<String>, span: Span) -> Self {
        Self::at(SYNTAX_ERROR, message, span)
    }

    pub const fn set_position(&mut self, span: Span) {
        self.line = span.line;
        self.column = span.column;
    }

    #[must_use]
    pub const fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }
}
