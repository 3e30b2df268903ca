//! S-expression dump of a syntax tree.
//!
//! Each top-level statement is written on its own line; nested nodes
//! are rendered as parenthesized prefix forms, so `1 + 2 * 3` becomes
//! `(+ 1 (* 2 3))`.

use std::fmt::Write;

use crate::ast::{Literal, Node, NodeKind};

/// Format a parse result. A `Compound` root yields one line per
/// statement; any other node yields a single line.
#[must_use]
pub fn format(root: &Node) -> String {
    let mut out = String::new();
    match &root.kind {
        NodeKind::Compound { statements } => {
            for statement in statements {
                write_node(&mut out, statement);
                out.push('\n');
            }
        }
        _ => {
            write_node(&mut out, root);
            out.push('\n');
        }
    }
    out
}

/// Format a single node as one S-expression, without a trailing newline.
#[must_use]
pub fn format_expr(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

fn write_node(out: &mut String, node: &Node) {
    match &node.kind {
        NodeKind::Compound { statements } => {
            out.push_str("(block");
            for statement in statements {
                out.push(' ');
                write_node(out, statement);
            }
            out.push(')');
        }
        NodeKind::Bad { error } => {
            out.push_str("(error ");
            write_quoted(out, &error.message, '"');
            let _ = write!(out, " @{})", error.span());
        }
        NodeKind::Literal { value } => write_literal(out, value),
        NodeKind::Parenthesized { inner } => {
            out.push_str("(group ");
            write_node(out, inner);
            out.push(')');
        }
        NodeKind::Convert { target, inner } => {
            let _ = write!(out, "(convert {} ", target.keyword());
            write_node(out, inner);
            out.push(')');
        }
        NodeKind::Unary { operator, operand } => {
            let _ = write!(out, "({operator} ");
            write_node(out, operand);
            out.push(')');
        }
        NodeKind::Binary {
            operator,
            left,
            right,
        } => match right {
            Some(right) => {
                let _ = write!(out, "({operator} ");
                write_node(out, left);
                out.push(' ');
                write_node(out, right);
                out.push(')');
            }
            None => {
                let _ = write!(out, "(postfix {operator} ");
                write_node(out, left);
                out.push(')');
            }
        },
        NodeKind::Return { expression } => {
            out.push_str("(return ");
            write_node(out, expression);
            out.push(')');
        }
        NodeKind::Break => out.push_str("break"),
        NodeKind::Continue => out.push_str("continue"),
    }
}

fn write_literal(out: &mut String, literal: &Literal) {
    match literal {
        Literal::Integer(text) | Literal::Decimal(text) => out.push_str(text),
        Literal::LongInteger(text) => {
            let _ = write!(out, "{text}L");
        }
        Literal::LongDecimal(text) => {
            let _ = write!(out, "{text}D");
        }
        Literal::Hexadecimal(text) => {
            let _ = write!(out, "0x{text}");
        }
        Literal::Octal(text) => {
            let _ = write!(out, "0o{text}");
        }
        Literal::Binary(text) => {
            let _ = write!(out, "0b{text}");
        }
        Literal::Char(text) => write_quoted(out, text, '\''),
        Literal::String(text) => write_quoted(out, text, '"'),
        Literal::Boolean(value) => {
            let _ = write!(out, "{value}");
        }
        Literal::Null => out.push_str("null"),
    }
}

fn write_quoted(out: &mut String, text: &str, quote: char) {
    out.push(quote);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}
