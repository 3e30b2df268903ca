//! Demonstrate how lexical and syntax errors surface for invalid input.

use seabow_syntax::{Error, TokenKind, tokenize};

fn main() {
    // Unterminated string: the lexer reports a Bad token and keeps going
    for token in tokenize("\"unclosed\n1 + 2") {
        if token.kind == TokenKind::Bad {
            println!("Bad token at {}: {}", token.span, token.text);
        }
    }

    println!();

    // Unclosed parenthesis: parsing stops at the first syntax error
    match seabow_syntax::parse_str("(1 + 2\n") {
        Ok(_) => println!("Parsed OK (unexpected)"),
        Err(Error::Syntax(e)) => {
            println!("Syntax error: {e}");
            println!("  Location: line {}, column {}", e.line, e.column);
        }
        Err(Error::Io { path, source }) => {
            println!("{}: {source}", path.display());
        }
    }

    println!();

    // Missing separator between two statements on one line
    match seabow_syntax::parse_str("1 2") {
        Ok(_) => println!("Parsed OK (unexpected)"),
        Err(e) => println!("Error: {e}"),
    }
}
