//! Parse a program with loop control enabled and dump its tree.

use seabow_syntax::{ParseOptions, Parser, format, tokenize};

fn main() {
    let source = "1 + 2 * 3\n-(4 - 5)++; int(6 << 1)\n{\n\tbreak\n\tcontinue\n}\n";

    let options = ParseOptions::default().loop_control(true);
    let mut parser = Parser::new(tokenize(source)).with_options(options);
    let root = parser.parse();

    print!("{}", format(&root));
}
