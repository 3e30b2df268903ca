use std::fmt;

use tracing::{debug, trace};

use crate::token::{Span, Token, TokenKind};

/// Classifies a lexer error. The rendered message becomes the text of
/// the `Bad` token reporting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Byte sequence that cannot start any token.
    UnexpectedCharacter(char),
    /// String literal without closing `"`.
    UnterminatedString,
    /// Character literal without closing `'`.
    UnterminatedCharacter,
    /// `e`/`E` inside a hexadecimal, octal or binary literal.
    RadixExponent,
    /// `.` inside a hexadecimal, octal or binary literal.
    RadixFraction,
    /// Base prefix (`0x`, `0o`, `0b`) without digits.
    RadixMissingDigits,
    /// Second `e` in one literal.
    RepeatedExponent,
    /// `e` not followed by a sign.
    ExponentMissingSign,
    /// `e+`/`e-` not followed by a digit.
    ExponentMissingDigits,
    /// Second `.` in one literal.
    RepeatedDot,
    /// `.` not followed by a digit.
    FractionMissingDigits,
    /// `L` modifier on a decimal literal.
    LongDecimal,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter(ch) => {
                write!(f, "Unexpected character '{ch}'")
            }
            Self::UnterminatedString => write!(f, "Unterminated string"),
            Self::UnterminatedCharacter => write!(f, "Unterminated character"),
            Self::RadixExponent => write!(
                f,
                "Hexadecimal, octal or binary number can not be exponential number"
            ),
            Self::RadixFraction => write!(
                f,
                "Hexadecimal, octal or binary number can not be decimal number"
            ),
            Self::RadixMissingDigits => write!(
                f,
                "Hexadecimal, octal or binary number must have at least 1 digit"
            ),
            Self::RepeatedExponent => {
                write!(f, "Exponential number can not have more than one 'e'")
            }
            Self::ExponentMissingSign => {
                write!(f, "Exponential number must have '+' or '-' after 'e'")
            }
            Self::ExponentMissingDigits => write!(
                f,
                "Exponential number must have at least 1 digit after 'e+' or 'e-'"
            ),
            Self::RepeatedDot => {
                write!(f, "Decimal number can not have more than one '.'")
            }
            Self::FractionMissingDigits => {
                write!(f, "Decimal number must have at least 1 digit after '.'")
            }
            Self::LongDecimal => {
                write!(f, "Decimal number can not have modifier 'L'")
            }
        }
    }
}

/// Scanning mode of a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberMode {
    Integer,
    Octal,
    Hexadecimal,
    Binary,
    Float,
    LongInteger,
    LongFloat,
}

impl NumberMode {
    const fn allows_fraction(self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }

    const fn token_kind(self) -> TokenKind {
        match self {
            Self::Integer => TokenKind::Integer,
            Self::Octal => TokenKind::Octal,
            Self::Hexadecimal => TokenKind::Hexadecimal,
            Self::Binary => TokenKind::Binary,
            Self::Float => TokenKind::Decimal,
            Self::LongInteger => TokenKind::LongInteger,
            Self::LongFloat => TokenKind::LongDecimal,
        }
    }
}

/// Number of bytes in the UTF-8 sequence introduced by `lead`.
const fn utf8_width(lead: u8) -> u8 {
    if lead & 0x80 == 0 {
        1
    } else if lead >> 5 == 0b110 {
        2
    } else if lead >> 4 == 0b1110 {
        3
    } else if lead >> 3 == 0b1_1110 {
        4
    } else {
        1
    }
}

/// Tokenize a source string into a sequence of tokens ending with
/// exactly one `Eof` token. Malformed input shows up as `Bad` tokens.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

/// Stateful scanner producing one token per [`Lexer::next_token`] call.
#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<u8>,
    pos: usize,
    line: usize,
    col: usize,
    /// Bytes left in the code point under the cursor.
    pending: u8,
}

impl Lexer {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let mut lexer = Self {
            input: Vec::new(),
            pos: 0,
            line: 1,
            col: 1,
            pending: 1,
        };
        lexer.reuse(source);
        lexer
    }

    /// Reset the scanner onto another buffer, back at (1, 1).
    pub fn reuse(&mut self, source: impl Into<String>) {
        self.input = source.into().into_bytes();
        self.pos = 0;
        self.line = 1;
        self.col = 1;
        self.pending = self.width_under_cursor();
    }

    /// Current cursor position.
    #[must_use]
    pub const fn position(&self) -> Span {
        Span::new(self.line, self.col)
    }

    /// Drain the rest of the buffer. The result ends with one `Eof`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Produce the next token. Never fails: malformed input yields a
    /// `Bad` token and scanning resumes after it on the next call.
    pub fn next_token(&mut self) -> Token {
        let token = self.scan();
        if token.kind == TokenKind::Bad {
            debug!(
                line = token.span.line,
                column = token.span.column,
                "bad token: {}",
                token.text
            );
        } else {
            trace!(
                kind = ?token.kind,
                line = token.span.line,
                column = token.span.column,
                "token {:?}",
                token.text
            );
        }
        token
    }

    #[allow(clippy::too_many_lines)]
    fn scan(&mut self) -> Token {
        loop {
            self.skip_spaces();
            let Some(ch) = self.peek() else {
                return Token::new(TokenKind::Eof, TokenKind::Eof.as_str(), self.position());
            };

            if ch == b'/' {
                match self.peek_at(1) {
                    Some(b'/' | b'*') => {
                        if self.skip_comment() {
                            return Token::new(
                                TokenKind::NewLine,
                                TokenKind::NewLine.as_str(),
                                self.position(),
                            );
                        }
                        continue;
                    }
                    Some(b'=') => return self.advance_with(TokenKind::SlashEq, 2),
                    _ => return self.advance_with(TokenKind::Slash, 1),
                }
            }

            return match ch {
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.read_word(),
                b'0'..=b'9' => self.read_number(),
                b'"' => self.read_string(),
                b'\'' => self.read_char(),
                b'\n' => {
                    let span = self.position();
                    self.advance();
                    Token::new(TokenKind::NewLine, TokenKind::NewLine.as_str(), span)
                }
                b'(' => self.advance_with(TokenKind::LParen, 1),
                b')' => self.advance_with(TokenKind::RParen, 1),
                b'{' => self.advance_with(TokenKind::LBrace, 1),
                b'}' => self.advance_with(TokenKind::RBrace, 1),
                b'[' => self.advance_with(TokenKind::LBracket, 1),
                b']' => self.advance_with(TokenKind::RBracket, 1),
                b';' => self.advance_with(TokenKind::Semicolon, 1),
                b',' => self.advance_with(TokenKind::Comma, 1),
                b':' => self.advance_with(TokenKind::Colon, 1),
                b'.' => self.advance_with(TokenKind::Dot, 1),
                b'?' => self.advance_with(TokenKind::Question, 1),
                b'$' => self.advance_with(TokenKind::Dollar, 1),
                b'@' => self.advance_with(TokenKind::At, 1),
                b'#' => self.advance_with(TokenKind::Hash, 1),
                b'~' => self.advance_with(TokenKind::Tilde, 1),
                b'+' => self.operator(
                    TokenKind::Plus,
                    &[(b'+', TokenKind::PlusPlus), (b'=', TokenKind::PlusEq)],
                ),
                b'-' => self.operator(
                    TokenKind::Minus,
                    &[(b'-', TokenKind::MinusMinus), (b'=', TokenKind::MinusEq)],
                ),
                b'*' => self.operator(TokenKind::Star, &[(b'=', TokenKind::StarEq)]),
                b'%' => self.operator(TokenKind::Percent, &[(b'=', TokenKind::PercentEq)]),
                b'=' => self.operator(TokenKind::Eq, &[(b'=', TokenKind::EqEq)]),
                b'^' => self.operator(TokenKind::Caret, &[(b'=', TokenKind::CaretEq)]),
                b'&' => self.operator(
                    TokenKind::Amp,
                    &[(b'&', TokenKind::AmpAmp), (b'=', TokenKind::AmpEq)],
                ),
                b'|' => self.operator(
                    TokenKind::Pipe,
                    &[(b'|', TokenKind::PipePipe), (b'=', TokenKind::PipeEq)],
                ),
                b'!' => {
                    if self.peek_at(1) == Some(b'i') && self.peek_at(2) == Some(b'n') {
                        self.advance_with(TokenKind::NotIn, 3)
                    } else {
                        self.operator(TokenKind::Not, &[(b'=', TokenKind::NotEq)])
                    }
                }
                b'<' => self.shift_operator(
                    b'<',
                    TokenKind::Less,
                    TokenKind::LessEq,
                    TokenKind::LShift,
                    TokenKind::LShiftEq,
                ),
                b'>' => self.shift_operator(
                    b'>',
                    TokenKind::Greater,
                    TokenKind::GreaterEq,
                    TokenKind::RShift,
                    TokenKind::RShiftEq,
                ),
                _ => self.unexpected_character(),
            };
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    fn width_under_cursor(&self) -> u8 {
        self.peek().map_or(1, utf8_width)
    }

    /// Move one byte forward. Columns advance once per code point and
    /// reset on every line break.
    fn advance(&mut self) {
        let Some(byte) = self.peek() else {
            return;
        };
        self.pos += 1;

        if byte == b'\n' {
            self.line += 1;
            self.col = 1;
            self.pending = self.width_under_cursor();
            return;
        }

        self.pending = self.pending.saturating_sub(1);
        if self.pending == 0 {
            self.col += 1;
            self.pending = self.width_under_cursor();
        }
    }

    fn advance_with(&mut self, kind: TokenKind, size: usize) -> Token {
        let span = self.position();
        for _ in 0..size {
            self.advance();
        }
        Token::new(kind, kind.as_str(), span)
    }

    /// One- or two-character operator: `single`, or one of `pairs`
    /// when the next byte matches.
    fn operator(&mut self, single: TokenKind, pairs: &[(u8, TokenKind)]) -> Token {
        let next = self.peek_at(1);
        match pairs.iter().find(|(byte, _)| Some(*byte) == next) {
            Some(&(_, kind)) => self.advance_with(kind, 2),
            None => self.advance_with(single, 1),
        }
    }

    fn shift_operator(
        &mut self,
        ch: u8,
        single: TokenKind,
        single_eq: TokenKind,
        shift: TokenKind,
        shift_eq: TokenKind,
    ) -> Token {
        match (self.peek_at(1), self.peek_at(2)) {
            (Some(next), Some(b'=')) if next == ch => self.advance_with(shift_eq, 3),
            (Some(next), _) if next == ch => self.advance_with(shift, 2),
            (Some(b'='), _) => self.advance_with(single_eq, 2),
            _ => self.advance_with(single, 1),
        }
    }

    fn bad(kind: &LexErrorKind, span: Span) -> Token {
        Token::new(TokenKind::Bad, kind.to_string(), span)
    }

    fn unexpected_character(&mut self) -> Token {
        let span = self.position();
        let width = usize::from(self.width_under_cursor());
        let end = (self.pos + width).min(self.input.len());
        let ch = std::str::from_utf8(&self.input[self.pos..end])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        for _ in 0..width {
            self.advance();
        }
        Self::bad(&LexErrorKind::UnexpectedCharacter(ch), span)
    }

    /// Space, tab, vertical tab, form feed and carriage return. Line
    /// breaks are tokens of their own.
    fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | 0x0B | 0x0C | b'\r')) {
            self.advance();
        }
    }

    /// Whitespace other than a plain space, which literals drop.
    fn skip_literal_spaces(&mut self) {
        while matches!(self.peek(), Some(b'\t' | b'\n' | 0x0B | 0x0C | b'\r')) {
            self.advance();
        }
    }

    /// Skip a `//` or `/* */` comment. Returns whether a line break was
    /// crossed; a line comment always ends one.
    fn skip_comment(&mut self) -> bool {
        self.advance(); // skip '/'
        if self.peek() == Some(b'*') {
            self.advance();
            let mut crossed = false;
            while let Some(ch) = self.peek() {
                if ch == b'*' && self.peek_at(1) == Some(b'/') {
                    self.advance();
                    self.advance();
                    return crossed;
                }
                crossed |= ch == b'\n';
                self.advance();
            }
            return crossed;
        }

        while let Some(ch) = self.peek() {
            self.advance();
            if ch == b'\n' {
                break;
            }
        }
        true
    }

    fn read_word(&mut self) -> Token {
        let span = self.position();
        let start = self.pos;
        while matches!(self.peek(), Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')) {
            self.advance();
        }

        let word = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        let kind = match word.as_str() {
            "null" => TokenKind::Null,
            "true" | "false" => TokenKind::Boolean,
            "break" | "continue" => TokenKind::Controller,
            "is" => TokenKind::Is,
            "in" => TokenKind::In,
            "as" => TokenKind::As,
            _ => TokenKind::Word,
        };
        Token::new(kind, word, span)
    }

    fn read_number(&mut self) -> Token {
        let span = self.position();
        let mut number = String::new();
        let mut mode = NumberMode::Integer;
        let mut has_dot = false;
        let mut has_exponent = false;

        let first = self.peek().unwrap_or(b'0');
        self.advance();
        let prefix = if first == b'0' {
            match self.peek() {
                Some(b'o') => Some(NumberMode::Octal),
                Some(b'x') => Some(NumberMode::Hexadecimal),
                Some(b'b') => Some(NumberMode::Binary),
                _ => None,
            }
        } else {
            None
        };
        if let Some(radix) = prefix {
            mode = radix;
            self.advance();
        } else {
            number.push(char::from(first));
        }

        while let Some(ch) = self.peek() {
            match ch {
                b'0'..=b'9' => {
                    number.push(char::from(ch));
                    self.advance();
                }
                b'_' => self.advance(),
                b'.' => {
                    if !mode.allows_fraction() {
                        return self.malformed_number(&LexErrorKind::RadixFraction, span);
                    }
                    if has_dot {
                        let at = self.position();
                        return self.malformed_number(&LexErrorKind::RepeatedDot, at);
                    }
                    has_dot = true;
                    mode = NumberMode::Float;
                    number.push('.');
                    self.advance();
                }
                b'e' | b'E' => {
                    if !mode.allows_fraction() {
                        return self.malformed_number(&LexErrorKind::RadixExponent, span);
                    }
                    if has_exponent {
                        let at = self.position();
                        return self.malformed_number(&LexErrorKind::RepeatedExponent, at);
                    }
                    self.advance();
                    let Some(sign @ (b'+' | b'-')) = self.peek() else {
                        return self.malformed_number(&LexErrorKind::ExponentMissingSign, span);
                    };
                    has_exponent = true;
                    mode = NumberMode::Float;
                    number.push('e');
                    number.push(char::from(sign));
                    self.advance();
                }
                _ => break,
            }
        }

        match self.peek() {
            Some(b'L') => {
                self.advance();
                if mode == NumberMode::Float {
                    return Self::bad(&LexErrorKind::LongDecimal, span);
                }
                mode = NumberMode::LongInteger;
            }
            Some(b'D') => {
                self.advance();
                mode = NumberMode::LongFloat;
            }
            _ => {}
        }

        match number.chars().last() {
            None => Self::bad(&LexErrorKind::RadixMissingDigits, span),
            Some('+' | '-') => Self::bad(&LexErrorKind::ExponentMissingDigits, span),
            Some('.') => Self::bad(&LexErrorKind::FractionMissingDigits, span),
            Some(_) => Token::new(mode.token_kind(), number, span),
        }
    }

    /// Consume the rest of a malformed numeric literal, then report it.
    fn malformed_number(&mut self, kind: &LexErrorKind, span: Span) -> Token {
        while let Some(ch) = self.peek() {
            match ch {
                b'0'..=b'9' | b'_' | b'.' => self.advance(),
                b'e' | b'E' => {
                    self.advance();
                    if matches!(self.peek(), Some(b'+' | b'-')) {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
        if matches!(self.peek(), Some(b'L' | b'D')) {
            self.advance();
        }
        Self::bad(kind, span)
    }

    /// Decode one escape sequence starting at `\` into raw bytes.
    ///
    /// `\u`/`\x` take 1-8 hex digits (one byte per pair), `\o` up to 11
    /// octal digits (one byte per group of 4), `\B` up to 32 binary
    /// digits (one byte per group of 8). Short runs are left-padded with
    /// zeros. A prefix without a valid first digit decodes to the prefix
    /// letter itself.
    fn read_escape(&mut self, out: &mut Vec<u8>) {
        self.advance(); // skip '\'
        let Some(ch) = self.peek() else {
            return;
        };

        let control = match ch {
            b'0' => Some(0x00),
            b'n' => Some(b'\n'),
            b't' => Some(b'\t'),
            b'r' => Some(b'\r'),
            b'f' => Some(0x0C),
            b'v' => Some(0x0B),
            b'b' => Some(0x08),
            b'a' => Some(0x07),
            _ => None,
        };
        if let Some(byte) = control {
            out.push(byte);
            self.advance();
            return;
        }

        match ch {
            b'u' | b'x' => self.read_radix_escape(out, ch, 16, 2),
            b'o' => self.read_radix_escape(out, ch, 8, 4),
            b'B' => self.read_radix_escape(out, ch, 2, 8),
            _ => {
                out.push(ch);
                self.advance();
            }
        }
    }

    fn read_radix_escape(&mut self, out: &mut Vec<u8>, letter: u8, radix: u32, group: usize) {
        self.advance(); // skip the escape letter
        let is_digit = |byte: u8| char::from(byte).is_digit(radix);

        let Some(first) = self.peek().filter(|&b| is_digit(b)) else {
            out.push(letter);
            return;
        };
        let limit = match radix {
            16 => 8,
            8 if first > b'3' => 10,
            8 => 11,
            _ => 32,
        };

        let mut digits = Vec::with_capacity(limit);
        while digits.len() < limit {
            match self.peek() {
                Some(byte) if is_digit(byte) => {
                    digits.push(byte);
                    self.advance();
                }
                _ => break,
            }
        }

        let padding = (group - digits.len() % group) % group;
        let mut padded = vec![b'0'; padding];
        padded.extend_from_slice(&digits);
        for chunk in padded.chunks(group) {
            let value = chunk.iter().fold(0_u32, |acc, &d| {
                acc * radix + char::from(d).to_digit(radix).unwrap_or(0)
            });
            out.push(value.to_le_bytes()[0]);
        }
    }

    fn read_string(&mut self) -> Token {
        let span = self.position();
        self.advance(); // skip opening quote
        self.skip_literal_spaces();

        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(b'"') => {
                    self.advance();
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    return Token::new(TokenKind::String, text, span);
                }
                Some(b'\\') => self.read_escape(&mut bytes),
                Some(byte) => {
                    bytes.push(byte);
                    self.advance();
                }
            }
            self.skip_literal_spaces();
        }

        Self::bad(&LexErrorKind::UnterminatedString, span)
    }

    fn read_char(&mut self) -> Token {
        let span = self.position();
        self.advance(); // skip opening quote
        self.skip_literal_spaces();

        let mut bytes = Vec::new();
        match self.peek() {
            Some(b'\\') => self.read_escape(&mut bytes),
            Some(lead) => {
                for _ in 0..utf8_width(lead) {
                    let Some(byte) = self.peek() else {
                        break;
                    };
                    bytes.push(byte);
                    self.advance();
                }
            }
            None => {}
        }
        self.skip_literal_spaces();

        if self.peek() == Some(b'\'') {
            self.advance();
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Token::new(TokenKind::Char, text, span);
        }

        while let Some(byte) = self.peek() {
            self.advance();
            if byte == b'\'' {
                break;
            }
        }
        Self::bad(&LexErrorKind::UnterminatedCharacter, span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn empty_input_is_eof() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(tokens[0].span, Span::new(1, 1));
    }

    #[test]
    fn newline_then_semicolon() {
        let tokens = tokenize("\n;");
        assert_eq!(tokens[0].kind, TokenKind::NewLine);
        assert_eq!(tokens[0].span, Span::new(1, 1));
        assert_eq!(tokens[1].kind, TokenKind::Semicolon);
        assert_eq!(tokens[1].span, Span::new(2, 1));
    }

    #[test]
    fn words_and_keywords() {
        assert_eq!(
            kinds("x null true break is in as"),
            vec![
                TokenKind::Word,
                TokenKind::Null,
                TokenKind::Boolean,
                TokenKind::Controller,
                TokenKind::Is,
                TokenKind::In,
                TokenKind::As,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operators_with_lookahead() {
        assert_eq!(
            kinds("!in != ! %= >>= <"),
            vec![
                TokenKind::NotIn,
                TokenKind::NotEq,
                TokenKind::Not,
                TokenKind::PercentEq,
                TokenKind::RShiftEq,
                TokenKind::Less,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn column_counts_code_points() {
        let tokens = tokenize("\"é\";");
        assert_eq!(tokens[0].text, "é");
        assert_eq!(tokens[1].span, Span::new(1, 4));
    }

    #[test]
    fn unexpected_multibyte_character_is_one_column() {
        let tokens = tokenize("é");
        assert_eq!(tokens[0].kind, TokenKind::Bad);
        assert_eq!(tokens[0].text, "Unexpected character 'é'");
        assert_eq!(tokens[1].span, Span::new(1, 2));
    }

    #[test]
    fn separators_are_dropped_from_numbers() {
        let tokens = tokenize("1_000");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_eq!(tokens[0].text, "1000");
    }

    #[test]
    fn hex_escape_produces_raw_bytes() {
        let tokens = tokenize(r#""\xe282ac""#);
        assert_eq!(tokens[0].text, "€");
    }

    #[test]
    fn malformed_escape_falls_back_to_letter() {
        let tokens = tokenize(r#""\xg" "\uz" "\o9" "\B2""#);
        assert_eq!(tokens[0].text, "xg");
        assert_eq!(tokens[1].text, "uz");
        assert_eq!(tokens[2].text, "o9");
        assert_eq!(tokens[3].text, "B2");
    }

    #[test]
    fn reuse_resets_position() {
        let mut lexer = Lexer::new("a\nb");
        let _ = lexer.tokenize();
        lexer.reuse("c");
        let token = lexer.next_token();
        assert_eq!(token.text, "c");
        assert_eq!(token.span, Span::new(1, 1));
    }
}
