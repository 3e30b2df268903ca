#![allow(dead_code)]

use seabow_syntax::{
    Diagnostic, Node, ParseOptions, Parser, Span, Token, TokenKind, format, parse, tokenize,
};

/// Kinds of every token of `input`, `Eof` included.
pub fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).iter().map(|t| t.kind).collect()
}

/// Assert kind, text and position of the leading tokens of `input`.
pub fn assert_tokens(input: &str, expected: &[(TokenKind, &str, usize, usize)]) {
    let tokens = tokenize(input);
    assert!(
        tokens.len() >= expected.len(),
        "too few tokens for {input:?}: {tokens:#?}"
    );
    for (i, (token, &(kind, text, line, column))) in tokens.iter().zip(expected).enumerate() {
        assert_eq!(
            (token.kind, token.text.as_str(), token.span),
            (kind, text, Span::new(line, column)),
            "token #{i} of {input:?}"
        );
    }
}

/// The single `Bad` token in `input`.
pub fn bad_token(input: &str) -> Token {
    let bad: Vec<Token> = tokenize(input)
        .into_iter()
        .filter(|t| t.kind == TokenKind::Bad)
        .collect();
    assert_eq!(bad.len(), 1, "expected one bad token in {input:?}: {bad:#?}");
    bad[0].clone()
}

/// Parse with default options and render as S-expressions.
pub fn sexpr(input: &str) -> String {
    format(&parse(&tokenize(input)))
}

/// Parse with `options` and render as S-expressions.
pub fn sexpr_with(input: &str, options: ParseOptions) -> String {
    format(&Parser::new(tokenize(input)).with_options(options).parse())
}

/// Parse `input`, asserting it fails, and return the diagnostic.
pub fn syntax_error(input: &str) -> Diagnostic {
    let root: Node = parse(&tokenize(input));
    match root.into_result() {
        Ok(root) => panic!("expected a syntax error for {input:?}, got {root:#?}"),
        Err(error) => error,
    }
}
