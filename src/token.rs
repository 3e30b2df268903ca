use std::fmt;

/// Source location for error reporting. Lines and columns are 1-based,
/// columns count Unicode code points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// End of the source buffer.
    Eof,
    /// Line break, used as a statement separator.
    NewLine,
    /// Malformed input; the token text holds the message.
    Bad,

    /// Identifier or non-reserved word.
    Word,
    Char,
    String,
    Integer,
    LongInteger,
    Decimal,
    LongDecimal,
    Hexadecimal,
    Octal,
    Binary,
    /// `true` or `false`.
    Boolean,
    /// `break` or `continue`.
    Controller,

    Null,
    In,
    Is,
    As,
    /// `!in`
    NotIn,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Colon,
    Dot,
    Question,
    Dollar,
    At,
    Hash,

    Eq,
    EqEq,
    Not,
    NotEq,
    Plus,
    PlusEq,
    PlusPlus,
    Minus,
    MinusEq,
    MinusMinus,
    Star,
    StarEq,
    Slash,
    SlashEq,
    Percent,
    PercentEq,
    Less,
    LessEq,
    LShift,
    LShiftEq,
    Greater,
    GreaterEq,
    RShift,
    RShiftEq,
    Tilde,
    Caret,
    CaretEq,
    Amp,
    AmpEq,
    AmpAmp,
    Pipe,
    PipeEq,
    PipePipe,
}

/// Binding power of postfix `++` / `--`.
pub const POSTFIX_PRECEDENCE: u8 = 17;

/// Binding power of the `?` prefix operator.
pub const QUESTION_PRECEDENCE: u8 = 2;

impl TokenKind {
    /// Precedence of this kind used as a prefix operator, or 0 when it
    /// cannot start a unary expression.
    #[must_use]
    pub const fn unary_precedence(self) -> u8 {
        match self {
            Self::Dollar => 18,
            Self::PlusPlus | Self::MinusMinus => 16,
            Self::Not | Self::Tilde | Self::Plus | Self::Minus => 15,
            Self::Question => QUESTION_PRECEDENCE,
            _ => 0,
        }
    }

    /// Precedence of this kind used as an infix (or postfix) operator,
    /// or 0 when it is not one. Higher binds tighter.
    #[must_use]
    pub const fn binary_precedence(self) -> u8 {
        match self {
            Self::PlusPlus | Self::MinusMinus => POSTFIX_PRECEDENCE,
            Self::Star | Self::Slash | Self::Percent => 13,
            Self::Plus | Self::Minus => 12,
            Self::LShift | Self::RShift => 11,
            Self::In | Self::NotIn | Self::Is => 10,
            Self::Less | Self::LessEq | Self::Greater | Self::GreaterEq => 9,
            Self::EqEq | Self::NotEq => 8,
            Self::Amp => 7,
            Self::Caret => 6,
            Self::Pipe => 5,
            Self::AmpAmp => 4,
            Self::PipePipe => 3,
            Self::Eq
            | Self::PlusEq
            | Self::MinusEq
            | Self::StarEq
            | Self::SlashEq
            | Self::PercentEq
            | Self::LShiftEq
            | Self::RShiftEq
            | Self::CaretEq
            | Self::PipeEq
            | Self::AmpEq => 1,
            _ => 0,
        }
    }

    /// Whether the kind is a literal value produced by the lexer.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::Char
                | Self::String
                | Self::Integer
                | Self::LongInteger
                | Self::Decimal
                | Self::LongDecimal
                | Self::Hexadecimal
                | Self::Octal
                | Self::Binary
                | Self::Boolean
                | Self::Null
        )
    }

    /// Source spelling of punctuation and operators, or a descriptive
    /// name for the other kinds.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eof => "<EOF>",
            Self::NewLine => "<NL>",
            Self::Bad => "<bad>",
            Self::Word => "word",
            Self::Char => "char",
            Self::String => "string",
            Self::Integer => "integer",
            Self::LongInteger => "long integer",
            Self::Decimal => "decimal",
            Self::LongDecimal => "long decimal",
            Self::Hexadecimal => "hexadecimal",
            Self::Octal => "octal",
            Self::Binary => "binary",
            Self::Boolean => "boolean",
            Self::Controller => "controller",
            Self::Null => "null",
            Self::In => "in",
            Self::Is => "is",
            Self::As => "as",
            Self::NotIn => "!in",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::Semicolon => ";",
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Dot => ".",
            Self::Question => "?",
            Self::Dollar => "$",
            Self::At => "@",
            Self::Hash => "#",
            Self::Eq => "=",
            Self::EqEq => "==",
            Self::Not => "!",
            Self::NotEq => "!=",
            Self::Plus => "+",
            Self::PlusEq => "+=",
            Self::PlusPlus => "++",
            Self::Minus => "-",
            Self::MinusEq => "-=",
            Self::MinusMinus => "--",
            Self::Star => "*",
            Self::StarEq => "*=",
            Self::Slash => "/",
            Self::SlashEq => "/=",
            Self::Percent => "%",
            Self::PercentEq => "%=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::LShift => "<<",
            Self::LShiftEq => "<<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::RShift => ">>",
            Self::RShiftEq => ">>=",
            Self::Tilde => "~",
            Self::Caret => "^",
            Self::CaretEq => "^=",
            Self::Amp => "&",
            Self::AmpEq => "&=",
            Self::AmpAmp => "&&",
            Self::Pipe => "|",
            Self::PipeEq => "|=",
            Self::PipePipe => "||",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    #[must_use]
    pub const fn line(&self) -> usize {
        self.span.line
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.span.column
    }
}

/// Runtime value types that have a reserved keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// `void`
    Null,
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Int128,
    UInt128,
    Float,
    Double,
    LDouble,
    Bool,
    Char,
    String,
    List,
    Dict,
    Any,
    Type,
    Error,
}

impl ValueType {
    /// Map a reserved type word to its value type. Unrecognized words
    /// return `None`.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        let vt = match word {
            "void" => Self::Null,
            "byte" => Self::Byte,
            "ubyte" => Self::UByte,
            "short" => Self::Short,
            "ushort" => Self::UShort,
            "int" => Self::Int,
            "uint" => Self::UInt,
            "long" => Self::Long,
            "ulong" => Self::ULong,
            "int128" => Self::Int128,
            "uint128" => Self::UInt128,
            "float" => Self::Float,
            "double" => Self::Double,
            "ldouble" => Self::LDouble,
            "bool" => Self::Bool,
            "char" => Self::Char,
            "string" => Self::String,
            "list" => Self::List,
            "dict" => Self::Dict,
            "any" => Self::Any,
            "type" => Self::Type,
            "error" => Self::Error,
            _ => return None,
        };
        Some(vt)
    }

    /// The reserved word spelling this type.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Null => "void",
            Self::Byte => "byte",
            Self::UByte => "ubyte",
            Self::Short => "short",
            Self::UShort => "ushort",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Long => "long",
            Self::ULong => "ulong",
            Self::Int128 => "int128",
            Self::UInt128 => "uint128",
            Self::Float => "float",
            Self::Double => "double",
            Self::LDouble => "ldouble",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::String => "string",
            Self::List => "list",
            Self::Dict => "dict",
            Self::Any => "any",
            Self::Type => "type",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.keyword())
    }
}
