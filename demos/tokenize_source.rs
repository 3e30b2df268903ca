//! Print every token of a small program with its position.

use seabow_syntax::Lexer;

fn main() {
    let source = "/* header */\nint(0x1F) + 2.5e+3D\nx !in \"平仮名\"; '\\n'\n";

    let mut lexer = Lexer::new(source);
    for token in lexer.tokenize() {
        println!("{:>5}  {:<12} {:?}", token.span.to_string(), token.kind, token.text);
    }
}
