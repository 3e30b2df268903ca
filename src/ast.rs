use crate::diagnostic::Diagnostic;
use crate::token::{Span, Token, TokenKind, ValueType};

/// One node of the syntax tree with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// The closed set of node variants. Every child is exclusively owned
/// by its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Block of statements in source order.
    Compound { statements: Vec<Node> },
    /// A syntax error; never nested inside another node.
    Bad { error: Diagnostic },
    Literal { value: Literal },
    /// Explicit grouping `( ... )`.
    Parenthesized { inner: Box<Node> },
    /// Explicit conversion `<type>( ... )`.
    Convert { target: ValueType, inner: Box<Node> },
    Unary {
        operator: TokenKind,
        operand: Box<Node>,
    },
    /// Infix operation. `right` is absent for postfix `++` / `--`.
    Binary {
        operator: TokenKind,
        left: Box<Node>,
        right: Option<Box<Node>>,
    },
    Return { expression: Box<Node> },
    Break,
    Continue,
}

/// Placeholder for a literal runtime value. Numeric literals keep
/// their cleaned-up lexeme (separators stripped, no base prefix or
/// modifier); turning them into runtime values is left to later stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Integer(String),
    LongInteger(String),
    Decimal(String),
    LongDecimal(String),
    Hexadecimal(String),
    Octal(String),
    Binary(String),
    Char(String),
    String(String),
    Boolean(bool),
    Null,
}

impl Literal {
    /// The literal carried by `token`, if its kind is a literal kind.
    #[must_use]
    pub fn from_token(token: &Token) -> Option<Self> {
        let text = token.text.clone();
        let literal = match token.kind {
            TokenKind::Integer => Self::Integer(text),
            TokenKind::LongInteger => Self::LongInteger(text),
            TokenKind::Decimal => Self::Decimal(text),
            TokenKind::LongDecimal => Self::LongDecimal(text),
            TokenKind::Hexadecimal => Self::Hexadecimal(text),
            TokenKind::Octal => Self::Octal(text),
            TokenKind::Binary => Self::Binary(text),
            TokenKind::Char => Self::Char(text),
            TokenKind::String => Self::String(text),
            TokenKind::Boolean => Self::Boolean(text == "true"),
            TokenKind::Null => Self::Null,
            _ => return None,
        };
        Some(literal)
    }
}

impl Node {
    #[must_use]
    pub const fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// A block. The first `Bad` statement, if any, is returned instead.
    #[must_use]
    pub fn compound(span: Span, mut statements: Vec<Self>) -> Self {
        if let Some(index) = statements.iter().position(Self::is_bad) {
            return statements.swap_remove(index);
        }
        Self::new(NodeKind::Compound { statements }, span)
    }

    /// An error node positioned at its diagnostic.
    #[must_use]
    pub const fn bad(error: Diagnostic) -> Self {
        let span = error.span();
        Self::new(NodeKind::Bad { error }, span)
    }

    #[must_use]
    pub const fn literal(span: Span, value: Literal) -> Self {
        Self::new(NodeKind::Literal { value }, span)
    }

    #[must_use]
    pub fn parenthesized(span: Span, inner: Self) -> Self {
        if inner.is_bad() {
            return inner;
        }
        Self::new(
            NodeKind::Parenthesized {
                inner: Box::new(inner),
            },
            span,
        )
    }

    #[must_use]
    pub fn convert(span: Span, target: ValueType, inner: Self) -> Self {
        if inner.is_bad() {
            return inner;
        }
        Self::new(
            NodeKind::Convert {
                target,
                inner: Box::new(inner),
            },
            span,
        )
    }

    #[must_use]
    pub fn unary(span: Span, operator: TokenKind, operand: Self) -> Self {
        if operand.is_bad() {
            return operand;
        }
        Self::new(
            NodeKind::Unary {
                operator,
                operand: Box::new(operand),
            },
            span,
        )
    }

    #[must_use]
    pub fn binary(span: Span, operator: TokenKind, left: Self, right: Option<Self>) -> Self {
        if left.is_bad() {
            return left;
        }
        match right {
            Some(right) if right.is_bad() => right,
            right => Self::new(
                NodeKind::Binary {
                    operator,
                    left: Box::new(left),
                    right: right.map(Box::new),
                },
                span,
            ),
        }
    }

    #[must_use]
    pub fn ret(span: Span, expression: Self) -> Self {
        if expression.is_bad() {
            return expression;
        }
        Self::new(
            NodeKind::Return {
                expression: Box::new(expression),
            },
            span,
        )
    }

    #[must_use]
    pub const fn break_loop(span: Span) -> Self {
        Self::new(NodeKind::Break, span)
    }

    #[must_use]
    pub const fn continue_loop(span: Span) -> Self {
        Self::new(NodeKind::Continue, span)
    }

    #[must_use]
    pub const fn line(&self) -> usize {
        self.span.line
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.span.column
    }

    #[must_use]
    pub const fn is_bad(&self) -> bool {
        matches!(self.kind, NodeKind::Bad { .. })
    }

    #[must_use]
    pub const fn error(&self) -> Option<&Diagnostic> {
        match &self.kind {
            NodeKind::Bad { error } => Some(error),
            _ => None,
        }
    }

    /// Statements of a `Compound` node.
    #[must_use]
    pub fn statements(&self) -> Option<&[Self]> {
        match &self.kind {
            NodeKind::Compound { statements } => Some(statements),
            _ => None,
        }
    }

    /// Short lowercase name of the variant.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self.kind {
            NodeKind::Compound { .. } => "compound",
            NodeKind::Bad { .. } => "bad",
            NodeKind::Literal { .. } => "literal",
            NodeKind::Parenthesized { .. } => "parenthesized",
            NodeKind::Convert { .. } => "convert",
            NodeKind::Unary { .. } => "unary",
            NodeKind::Binary { .. } => "binary",
            NodeKind::Return { .. } => "return",
            NodeKind::Break => "break",
            NodeKind::Continue => "continue",
        }
    }

    /// Split a parse result into the tree or the diagnostic it failed with.
    ///
    /// # Errors
    ///
    /// Returns the carried `Diagnostic` when the node is `Bad`.
    pub fn into_result(self) -> Result<Self, Diagnostic> {
        match self.kind {
            NodeKind::Bad { error } => Err(error),
            kind => Ok(Self::new(kind, self.span)),
        }
    }
}
