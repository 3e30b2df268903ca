//! Lexer positions, literals and error tokens.

mod common;

use common::{assert_tokens, bad_token, kinds};
use seabow_syntax::{LexErrorKind, Lexer, Span, TokenKind, tokenize};
use test_log::test;

// -----------------------------------------------------------
// Positions and whitespace.
// -----------------------------------------------------------

#[test]
fn lex_positions_across_lines_and_literals() {
    assert_tokens(
        "\n;\t;   ;/*abc\ndef\nghi*/ \"é\nà\"",
        &[
            (TokenKind::NewLine, "<NL>", 1, 1),
            (TokenKind::Semicolon, ";", 2, 1),
            (TokenKind::Semicolon, ";", 2, 3),
            (TokenKind::Semicolon, ";", 2, 7),
            (TokenKind::NewLine, "<NL>", 4, 6),
            (TokenKind::String, "éà", 4, 7),
            (TokenKind::Eof, "<EOF>", 5, 3),
        ],
    );
}

#[test]
fn lex_insignificant_spaces() {
    assert_eq!(kinds(" \t\u{b}\u{c}\r"), vec![TokenKind::Eof]);
}

#[test]
fn lex_empty_input() {
    assert_tokens("", &[(TokenKind::Eof, "<EOF>", 1, 1)]);
}

#[test]
fn lex_exactly_one_eof() {
    let tokens = tokenize("a\nb\n");
    let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
    assert_eq!(eofs, 1);
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
}

#[test]
fn lex_eof_is_repeated_after_end() {
    let mut lexer = Lexer::new("x");
    assert_eq!(lexer.next_token().kind, TokenKind::Word);
    assert_eq!(lexer.next_token().span, Span::new(1, 2));
    assert_eq!(lexer.next_token().kind, TokenKind::Eof);
}

// -----------------------------------------------------------
// Punctuation and operators.
// -----------------------------------------------------------

#[test]
fn lex_single_characters() {
    assert_eq!(
        kinds("\n(){}[];,:.?$@#~"),
        vec![
            TokenKind::NewLine,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Dot,
            TokenKind::Question,
            TokenKind::Dollar,
            TokenKind::At,
            TokenKind::Hash,
            TokenKind::Tilde,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_longest_operator_wins() {
    assert_eq!(
        kinds("+++=+-*---=*=>>=<<<<="),
        vec![
            TokenKind::PlusPlus,
            TokenKind::PlusEq,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::MinusMinus,
            TokenKind::MinusEq,
            TokenKind::StarEq,
            TokenKind::RShiftEq,
            TokenKind::LShift,
            TokenKind::LShiftEq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_logical_and_bitwise_operators() {
    assert_eq!(
        kinds("& && &= | || |= ^ ^= == = < <= > >= >> / /= % %="),
        vec![
            TokenKind::Amp,
            TokenKind::AmpAmp,
            TokenKind::AmpEq,
            TokenKind::Pipe,
            TokenKind::PipePipe,
            TokenKind::PipeEq,
            TokenKind::Caret,
            TokenKind::CaretEq,
            TokenKind::EqEq,
            TokenKind::Eq,
            TokenKind::Less,
            TokenKind::LessEq,
            TokenKind::Greater,
            TokenKind::GreaterEq,
            TokenKind::RShift,
            TokenKind::Slash,
            TokenKind::SlashEq,
            TokenKind::Percent,
            TokenKind::PercentEq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_not_in_needs_no_space() {
    assert_tokens(
        "a !in b",
        &[
            (TokenKind::Word, "a", 1, 1),
            (TokenKind::NotIn, "!in", 1, 3),
            (TokenKind::Word, "b", 1, 7),
        ],
    );
}

#[test]
fn lex_unexpected_character() {
    assert_tokens(
        "`",
        &[
            (TokenKind::Bad, "Unexpected character '`'", 1, 1),
            (TokenKind::Eof, "<EOF>", 1, 2),
        ],
    );
}

#[test]
fn lex_resumes_after_unexpected_character() {
    assert_eq!(
        kinds("1 ` 2"),
        vec![
            TokenKind::Integer,
            TokenKind::Bad,
            TokenKind::Integer,
            TokenKind::Eof
        ]
    );
}

// -----------------------------------------------------------
// Comments.
// -----------------------------------------------------------

#[test]
fn lex_single_line_comment_ends_line() {
    assert_eq!(
        kinds("// Un Commentaire français\n"),
        vec![TokenKind::NewLine, TokenKind::Eof]
    );
}

#[test]
fn lex_multi_line_comment_counts_as_line_break() {
    assert_eq!(
        kinds("/*Il\nétait\n\tune\nfois*/"),
        vec![TokenKind::NewLine, TokenKind::Eof]
    );
}

#[test]
fn lex_inline_block_comment_is_skipped() {
    assert_eq!(
        kinds("1 /* two */ + 3"),
        vec![
            TokenKind::Integer,
            TokenKind::Plus,
            TokenKind::Integer,
            TokenKind::Eof
        ]
    );
}

#[test]
fn lex_mixed_comments() {
    assert_eq!(
        kinds("// Little comment\n/*Big\nComment\n\t..*/"),
        vec![TokenKind::NewLine, TokenKind::NewLine, TokenKind::Eof]
    );
}

#[test]
fn lex_unclosed_block_comment_runs_to_end() {
    let tokens = tokenize("1 /* open\nforever");
    assert_eq!(tokens[1].kind, TokenKind::NewLine);
    assert_eq!(tokens[2].kind, TokenKind::Eof);
    assert_eq!(tokens[2].span, Span::new(2, 8));
}

// -----------------------------------------------------------
// Words and keywords.
// -----------------------------------------------------------

#[test]
fn lex_special_keywords() {
    assert_tokens(
        "null in is as false true break continue",
        &[
            (TokenKind::Null, "null", 1, 1),
            (TokenKind::In, "in", 1, 6),
            (TokenKind::Is, "is", 1, 9),
            (TokenKind::As, "as", 1, 12),
            (TokenKind::Boolean, "false", 1, 15),
            (TokenKind::Boolean, "true", 1, 21),
            (TokenKind::Controller, "break", 1, 26),
            (TokenKind::Controller, "continue", 1, 32),
        ],
    );
}

#[test]
fn lex_words() {
    assert_tokens(
        "word __word word__ two-word word1 2word",
        &[
            (TokenKind::Word, "word", 1, 1),
            (TokenKind::Word, "__word", 1, 6),
            (TokenKind::Word, "word__", 1, 13),
            (TokenKind::Word, "two", 1, 20),
            (TokenKind::Minus, "-", 1, 23),
            (TokenKind::Word, "word", 1, 24),
            (TokenKind::Word, "word1", 1, 29),
            (TokenKind::Integer, "2", 1, 35),
            (TokenKind::Word, "word", 1, 36),
            (TokenKind::Eof, "<EOF>", 1, 40),
        ],
    );
}

#[test]
fn lex_type_keywords_are_words() {
    assert_eq!(
        kinds("int ldouble return"),
        vec![
            TokenKind::Word,
            TokenKind::Word,
            TokenKind::Word,
            TokenKind::Eof
        ]
    );
}

// -----------------------------------------------------------
// String and character literals.
// -----------------------------------------------------------

#[test]
fn lex_strings() {
    assert_tokens(
        "\"\\xe282ac\" \"平仮名, ひらがな\n한\t글\"",
        &[
            (TokenKind::String, "€", 1, 1),
            (TokenKind::String, "平仮名, ひらがな한글", 1, 12),
            (TokenKind::Eof, "<EOF>", 2, 5),
        ],
    );
}

#[test]
fn lex_characters() {
    assert_tokens(
        "'²' '\\uF09F9880' '\\n'",
        &[
            (TokenKind::Char, "²", 1, 1),
            (TokenKind::Char, "😀", 1, 5),
            (TokenKind::Char, "\n", 1, 18),
            (TokenKind::Eof, "<EOF>", 1, 22),
        ],
    );
}

#[test]
fn lex_control_escapes() {
    let tokens = tokenize(r#""\n\t\r\f\v\b\a\0\\\"""#);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "\n\t\r\u{c}\u{b}\u{8}\u{7}\0\\\"");
}

#[test]
fn lex_octal_and_binary_escapes() {
    let tokens = tokenize(r#""\o0101" '\B01000010'"#);
    assert_eq!(tokens[0].text, "A");
    assert_eq!(tokens[1].text, "B");
}

#[test]
fn lex_short_hex_escape_is_padded() {
    let tokens = tokenize(r"'\x41' '\x9'");
    assert_eq!(tokens[0].text, "A");
    assert_eq!(tokens[1].text, "\t");
}

#[test]
fn lex_invalid_utf8_escape_is_replaced() {
    let tokens = tokenize(r#""\xff""#);
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "\u{fffd}");
}

#[test]
fn lex_plain_spaces_are_kept_in_strings() {
    let tokens = tokenize("\"  a b  \"");
    assert_eq!(tokens[0].text, "  a b  ");
}

#[test]
fn lex_unterminated_string() {
    assert_tokens(
        "\"abc\ndef 123",
        &[
            (TokenKind::Bad, "Unterminated string", 1, 1),
            (TokenKind::Eof, "<EOF>", 2, 8),
        ],
    );
}

#[test]
fn lex_unterminated_character() {
    assert_tokens(
        "'too big\nfor a simple char",
        &[
            (TokenKind::Bad, "Unterminated character", 1, 1),
            (TokenKind::Eof, "<EOF>", 2, 18),
        ],
    );
}

#[test]
fn lex_oversized_character_stops_at_closing_quote() {
    assert_eq!(
        kinds("'ab' 1"),
        vec![TokenKind::Bad, TokenKind::Integer, TokenKind::Eof]
    );
}

// -----------------------------------------------------------
// Numbers.
// -----------------------------------------------------------

#[test]
fn lex_numbers() {
    let tokens = tokenize(
        "123 0x123 0o123 0b1011 12.345 1e+87 0b1011_1011 1_2e-12_3 12L 12.34D 12D 1E+2D 1.2e+2",
    );
    let got: Vec<(TokenKind, &str)> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
    assert_eq!(
        got,
        vec![
            (TokenKind::Integer, "123"),
            (TokenKind::Hexadecimal, "123"),
            (TokenKind::Octal, "123"),
            (TokenKind::Binary, "1011"),
            (TokenKind::Decimal, "12.345"),
            (TokenKind::Decimal, "1e+87"),
            (TokenKind::Binary, "10111011"),
            (TokenKind::Decimal, "12e-123"),
            (TokenKind::LongInteger, "12"),
            (TokenKind::LongDecimal, "12.34"),
            (TokenKind::LongDecimal, "12"),
            (TokenKind::LongDecimal, "1e+2"),
            (TokenKind::Decimal, "1.2e+2"),
            (TokenKind::Eof, "<EOF>"),
        ]
    );
}

#[test]
fn lex_incorrect_numbers() {
    let tokens = tokenize("12.3L 1e+23L 12e23 0x12E-3 0o123.45 12e+34e+56 12.34.56 1e+ 12.");
    let expected = [
        LexErrorKind::LongDecimal,
        LexErrorKind::LongDecimal,
        LexErrorKind::ExponentMissingSign,
        LexErrorKind::RadixExponent,
        LexErrorKind::RadixFraction,
        LexErrorKind::RepeatedExponent,
        LexErrorKind::RepeatedDot,
        LexErrorKind::ExponentMissingDigits,
        LexErrorKind::FractionMissingDigits,
    ];
    assert_eq!(tokens.len(), expected.len() + 1);
    for (token, kind) in tokens.iter().zip(&expected) {
        assert_eq!(token.kind, TokenKind::Bad);
        assert_eq!(token.text, kind.to_string());
    }
}

#[test]
fn lex_incorrect_number_messages() {
    assert_eq!(
        bad_token("12.3L").text,
        "Decimal number can not have modifier 'L'"
    );
    assert_eq!(
        bad_token("12e23").text,
        "Exponential number must have '+' or '-' after 'e'"
    );
    assert_eq!(
        bad_token("0x12E-3").text,
        "Hexadecimal, octal or binary number can not be exponential number"
    );
    assert_eq!(
        bad_token("0o1.5").text,
        "Hexadecimal, octal or binary number can not be decimal number"
    );
    assert_eq!(
        bad_token("1e+").text,
        "Exponential number must have at least 1 digit after 'e+' or 'e-'"
    );
    assert_eq!(
        bad_token("12.").text,
        "Decimal number must have at least 1 digit after '.'"
    );
}

#[test]
fn lex_repeated_marker_is_reported_where_it_occurs() {
    assert_eq!(bad_token("12.34.56").span, Span::new(1, 6));
    assert_eq!(bad_token("12e+34e+56").span, Span::new(1, 7));
    assert_eq!(bad_token("  1e+").span, Span::new(1, 3));
}

#[test]
fn lex_radix_prefix_without_digits() {
    let token = bad_token("0x");
    assert_eq!(
        token.text,
        "Hexadecimal, octal or binary number must have at least 1 digit"
    );
    assert_eq!(token.span, Span::new(1, 1));
}

#[test]
fn lex_hex_digits_beyond_nine_end_the_literal() {
    assert_tokens(
        "0xff",
        &[
            (TokenKind::Bad, &LexErrorKind::RadixMissingDigits.to_string(), 1, 1),
            (TokenKind::Word, "ff", 1, 3),
        ],
    );
}

#[test]
fn lex_member_access_after_number_is_an_error() {
    assert_eq!(bad_token("1.x").text, "Decimal number must have at least 1 digit after '.'");
}

// -----------------------------------------------------------
// Reuse.
// -----------------------------------------------------------

#[test]
fn lex_reuse_scans_new_buffer_from_start() {
    let mut lexer = Lexer::new("first\nsecond");
    let _ = lexer.tokenize();
    assert_eq!(lexer.position(), Span::new(2, 7));

    lexer.reuse("'x'");
    let tokens = lexer.tokenize();
    assert_eq!(tokens[0].kind, TokenKind::Char);
    assert_eq!(tokens[0].span, Span::new(1, 1));
    assert_eq!(tokens[1].span, Span::new(1, 4));
}
