use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::ast::{Literal, Node, NodeKind};
use crate::diagnostic::Diagnostic;
use crate::token::{POSTFIX_PRECEDENCE, QUESTION_PRECEDENCE, Span, Token, TokenKind, ValueType};

/// Classifies a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A specific token was required, something else was consumed.
    Expected { expected: String, found: String },
    /// Two statements without a line break or `;` between them.
    MissingSeparator,
    /// Token that cannot start an expression.
    IncorrectStatement,
    /// `?` prefix operator, whose grammar is not settled.
    UnsupportedQuestionOperator,
    /// A `Bad` token reached expression position.
    Lexical(String),
    /// Brackets, blocks or prefix operators nested past [`MAX_NESTING_DEPTH`].
    TooDeeplyNested,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected { expected, found } => {
                write!(f, "Expected '{expected}' but was '{found}'")
            }
            Self::MissingSeparator => {
                write!(f, "Need new line or semi-colon between two statements")
            }
            Self::IncorrectStatement => write!(f, "Incorrect statement found"),
            Self::UnsupportedQuestionOperator => {
                write!(f, "Question operator is not supported yet")
            }
            Self::Lexical(message) => f.write_str(message),
            Self::TooDeeplyNested => {
                write!(f, "Nesting exceeds {MAX_NESTING_DEPTH} levels")
            }
        }
    }
}

impl ParseErrorKind {
    /// A `SyntaxError` diagnostic for this error at `span`.
    #[must_use]
    pub fn at(&self, span: Span) -> Diagnostic {
        Diagnostic::syntax(self.to_string(), span)
    }
}

type ParseResult<T> = Result<T, Diagnostic>;

/// Deepest nesting of parentheses, blocks, conversions and prefix
/// operators the parser descends into.
pub const MAX_NESTING_DEPTH: usize = 128;

/// How a statement is parsed: whether a separator must follow it and
/// which controller keywords it may start with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatementMode {
    pub require_separator: bool,
    /// `break` / `continue`
    pub allow_loop_control: bool,
    /// `return <expr>`
    pub allow_function_control: bool,
}

impl StatementMode {
    /// Nested expression position: no separator, no controllers.
    pub const EXPRESSION: Self = Self {
        require_separator: false,
        allow_loop_control: false,
        allow_function_control: false,
    };

    #[must_use]
    pub const fn with_separator(self) -> Self {
        Self {
            require_separator: true,
            ..self
        }
    }
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accept `break` / `continue` as statements.
    pub allow_loop_control: bool,
    /// Accept `return <expr>` as a statement.
    pub allow_function_control: bool,
}

impl ParseOptions {
    #[must_use]
    pub const fn loop_control(mut self, allow: bool) -> Self {
        self.allow_loop_control = allow;
        self
    }

    #[must_use]
    pub const fn function_control(mut self, allow: bool) -> Self {
        self.allow_function_control = allow;
        self
    }

    /// Mode of top-level statements, which always need a separator.
    #[must_use]
    pub const fn statement_mode(self) -> StatementMode {
        StatementMode {
            require_separator: true,
            allow_loop_control: self.allow_loop_control,
            allow_function_control: self.allow_function_control,
        }
    }
}

/// Parse a token stream into a syntax tree.
///
/// Returns a `Compound` root on success, or the `Bad` node of the
/// first syntax error.
#[must_use]
pub fn parse(tokens: &[Token]) -> Node {
    Parser::new(tokens.to_vec()).parse()
}

/// Recursive-descent parser over a materialized token list.
#[derive(Debug, Clone)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    imports: HashMap<String, Node>,
    options: ParseOptions,
}

/// Make sure the list ends with exactly one reachable `Eof`.
fn terminated(mut tokens: Vec<Token>) -> Vec<Token> {
    if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
        let span = tokens.last().map_or(Span::new(1, 1), |t| t.span);
        tokens.push(Token::new(TokenKind::Eof, TokenKind::Eof.as_str(), span));
    }
    tokens
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_imports(tokens, HashMap::new())
    }

    /// A parser that takes ownership of an existing imports table, e.g.
    /// one handed down by the parser of an importing module.
    #[must_use]
    pub fn with_imports(tokens: Vec<Token>, imports: HashMap<String, Node>) -> Self {
        Self {
            tokens: terminated(tokens),
            pos: 0,
            depth: 0,
            imports,
            options: ParseOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Point the parser at another token list. The imports table is kept.
    pub fn reuse(&mut self, tokens: Vec<Token>) {
        self.tokens = terminated(tokens);
        self.pos = 0;
        self.depth = 0;
    }

    #[must_use]
    pub const fn imports(&self) -> &HashMap<String, Node> {
        &self.imports
    }

    #[must_use]
    pub fn import(&self, name: &str) -> Option<&Node> {
        self.imports.get(name)
    }

    /// Record the root of an already-parsed module. Only `Compound`
    /// roots are accepted; returns whether `root` was stored.
    pub fn register_import(&mut self, name: impl Into<String>, root: Node) -> bool {
        if !matches!(root.kind, NodeKind::Compound { .. }) {
            return false;
        }
        let name = name.into();
        debug!(module = %name, "registered import");
        self.imports.insert(name, root);
        true
    }

    #[must_use]
    pub fn into_imports(self) -> HashMap<String, Node> {
        self.imports
    }

    /// Parse every top-level statement into one root `Compound` at (0, 0).
    /// Parsing stops at the first syntax error, whose `Bad` node is
    /// returned as the root instead.
    pub fn parse(&mut self) -> Node {
        match self.parse_program() {
            Ok(root) => root,
            Err(error) => {
                debug!(
                    line = error.line,
                    column = error.column,
                    "syntax error: {}",
                    error.message
                );
                Node::bad(error)
            }
        }
    }

    fn parse_program(&mut self) -> ParseResult<Node> {
        self.depth = 0;
        let mode = self.options.statement_mode();
        let mut statements = Vec::new();
        while let Some(statement) = self.parse_statement(mode)? {
            statements.push(statement);
        }
        Ok(Node::compound(Span::new(0, 0), statements))
    }

    // -- Cursor --

    /// Token at the cursor plus `offset`, clamped to the final `Eof`.
    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    fn get(&self) -> &Token {
        self.peek_at(0)
    }

    fn skip_new_lines(&mut self) {
        while self.get().kind == TokenKind::NewLine {
            self.pos += 1;
        }
    }

    /// Consume the current token, then any line breaks after it.
    fn advance(&mut self) -> Token {
        let token = self.get().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        self.skip_new_lines();
        token
    }

    /// Whether the cursor skipped a line break to reach its token.
    fn after_line_break(&self) -> bool {
        self.pos
            .checked_sub(1)
            .and_then(|index| self.tokens.get(index))
            .is_some_and(|t| t.kind == TokenKind::NewLine)
    }

    /// Consume one token and require it to be `kind`.
    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token> {
        let token = self.advance();
        if token.kind == kind {
            return Ok(token);
        }
        Err(ParseErrorKind::Expected {
            expected: expected.to_string(),
            found: token.text.clone(),
        }
        .at(token.span))
    }

    /// Run `parse` one nesting level deeper, failing at `span` once the
    /// limit is reached.
    fn nested<T>(
        &mut self,
        span: Span,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseErrorKind::TooDeeplyNested.at(span));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // -- Statements --

    /// Parse one statement, or `None` once only line breaks and the end
    /// of input remain.
    fn parse_statement(&mut self, mode: StatementMode) -> ParseResult<Option<Node>> {
        self.skip_new_lines();
        let current = self.get().clone();
        if current.kind == TokenKind::Eof {
            return Ok(None);
        }
        if current.kind == TokenKind::LBrace {
            return self
                .nested(current.span, |parser| parser.parse_compound(mode))
                .map(Some);
        }

        let target = match current.kind {
            TokenKind::Word => ValueType::from_keyword(&current.text),
            _ => None,
        };
        let mut node = match target {
            Some(target) if self.peek_at(1).kind == TokenKind::LParen => {
                Some(self.parse_convert_expression(target)?)
            }
            Some(_) => self.parse_declaration(mode)?,
            None => None,
        };
        if node.is_none() {
            node = self.parse_controller(mode)?;
        }
        let node = match node {
            Some(node) => node,
            None => self.parse_binary_unary_expression(0)?,
        };

        if mode.require_separator {
            let Token { kind, span, .. } = *self.get();
            match kind {
                TokenKind::Semicolon => {
                    self.advance();
                }
                TokenKind::Eof => {}
                _ if self.after_line_break() => {}
                _ => return Err(ParseErrorKind::MissingSeparator.at(span)),
            }
        }

        trace!(
            line = node.line(),
            column = node.column(),
            "parsed {} statement",
            node.name()
        );
        Ok(Some(node))
    }

    /// A statement in a nested position, where running out of input is
    /// an error.
    fn parse_nested(&mut self, mode: StatementMode) -> ParseResult<Node> {
        match self.parse_statement(mode)? {
            Some(node) => Ok(node),
            None => Err(ParseErrorKind::IncorrectStatement.at(self.get().span)),
        }
    }

    fn parse_compound(&mut self, mode: StatementMode) -> ParseResult<Node> {
        let open = self.advance();
        let inner = mode.with_separator();
        let mut statements = Vec::new();

        while !matches!(self.get().kind, TokenKind::RBrace | TokenKind::Eof) {
            let Some(statement) = self.parse_statement(inner)? else {
                break;
            };
            statements.push(statement);
        }

        self.expect(TokenKind::RBrace, "}")?;
        Ok(Node::compound(open.span, statements))
    }

    /// `<type>(<expr>)`, positioned at the type keyword.
    fn parse_convert_expression(&mut self, target: ValueType) -> ParseResult<Node> {
        let keyword = self.advance();
        self.expect(TokenKind::LParen, "(")?;
        let inner = self.nested(keyword.span, |parser| {
            parser.parse_nested(StatementMode::EXPRESSION)
        })?;
        self.expect(TokenKind::RParen, ")")?;
        Ok(Node::convert(keyword.span, target, inner))
    }

    /// Declarations are not part of the grammar yet. Yields nothing so
    /// the statement falls through to controller and expression parsing.
    #[allow(
        clippy::unnecessary_wraps,
        clippy::unused_self,
        clippy::needless_pass_by_ref_mut
    )]
    fn parse_declaration(&mut self, _mode: StatementMode) -> ParseResult<Option<Node>> {
        trace!("declaration parsing is not available");
        Ok(None)
    }

    /// `break` / `continue` / `return <expr>`, when `mode` permits them.
    fn parse_controller(&mut self, mode: StatementMode) -> ParseResult<Option<Node>> {
        let current = self.get().clone();

        if mode.allow_loop_control && current.kind == TokenKind::Controller {
            let node = match current.text.as_str() {
                "break" => Node::break_loop(current.span),
                "continue" => Node::continue_loop(current.span),
                _ => return Ok(None),
            };
            self.advance();
            return Ok(Some(node));
        }

        if mode.allow_function_control
            && current.kind == TokenKind::Word
            && current.text == "return"
        {
            self.advance();
            let expression = self.parse_nested(StatementMode::EXPRESSION)?;
            return Ok(Some(Node::ret(current.span, expression)));
        }

        Ok(None)
    }

    // -- Expressions --

    /// Precedence climbing. Only operators binding tighter than
    /// `min_precedence` are folded into the result.
    fn parse_binary_unary_expression(&mut self, min_precedence: u8) -> ParseResult<Node> {
        let current = self.get().clone();
        let unary = current.kind.unary_precedence();

        let mut left = if unary != 0 && unary >= min_precedence {
            if unary == QUESTION_PRECEDENCE {
                match self.parse_question_operator()? {
                    Some(node) => node,
                    None => {
                        self.advance();
                        return Err(ParseErrorKind::UnsupportedQuestionOperator.at(current.span));
                    }
                }
            } else {
                self.advance();
                let operand = self.nested(current.span, |parser| {
                    parser.parse_binary_unary_expression(unary)
                })?;
                Node::unary(current.span, current.kind, operand)
            }
        } else {
            self.parse_primary_expression()?
        };

        loop {
            let operator = self.get().clone();
            let precedence = operator.kind.binary_precedence();
            if precedence == 0 || precedence <= min_precedence {
                break;
            }
            self.advance();

            if precedence == POSTFIX_PRECEDENCE {
                return Ok(Node::binary(operator.span, operator.kind, left, None));
            }

            let right = self.parse_binary_unary_expression(precedence)?;
            left = Node::binary(operator.span, operator.kind, left, Some(right));
        }

        Ok(left)
    }

    fn parse_primary_expression(&mut self) -> ParseResult<Node> {
        let current = self.advance();
        match current.kind {
            TokenKind::LParen => {
                let inner = self.nested(current.span, |parser| {
                    parser.parse_nested(StatementMode::EXPRESSION)
                })?;
                self.expect(TokenKind::RParen, ")")?;
                Ok(Node::parenthesized(current.span, inner))
            }
            TokenKind::Bad => Err(ParseErrorKind::Lexical(current.text).at(current.span)),
            _ => Literal::from_token(&current)
                .map(|value| Node::literal(current.span, value))
                .ok_or_else(|| ParseErrorKind::IncorrectStatement.at(current.span)),
        }
    }

    /// The `?` prefix operator. Its grammar is not settled, so nothing
    /// is produced and the caller reports it.
    #[allow(
        clippy::unnecessary_wraps,
        clippy::unused_self,
        clippy::needless_pass_by_ref_mut
    )]
    fn parse_question_operator(&mut self) -> ParseResult<Option<Node>> {
        trace!("question operator parsing is not available");
        Ok(None)
    }
}
