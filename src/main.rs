//! CLI tool to inspect, parse and check seabow source files.

use std::collections::HashMap;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser as _, Subcommand};
use seabow_syntax::{Lexer, Node, ParseOptions, Parser, format};
use tracing::level_filters::LevelFilter;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

/// Lexer and parser front end for seabow.
#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    /// Accept `break` and `continue` as top-level statements
    #[arg(long, global = true)]
    allow_loop_control: bool,
    /// Accept `return <expr>` as a top-level statement
    #[arg(long, global = true)]
    allow_function_control: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the tokens of each file with their positions
    Tokens {
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },
    /// Print the syntax tree of each file as S-expressions
    Ast {
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },
    /// Check that each file parses
    Check {
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },
    /// Read statements from stdin, one line at a time
    Repl,
}

impl Cli {
    const fn level_filter(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::ERROR;
        }
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }

    const fn options(&self) -> ParseOptions {
        ParseOptions {
            allow_loop_control: self.allow_loop_control,
            allow_function_control: self.allow_function_control,
        }
    }
}

fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.level_filter());
    trace!("starting seabow with args: {cli:?}");

    let options = cli.options();
    match cli.command.unwrap_or(Command::Repl) {
        Command::Tokens { files } => for_each_file(&files, |path, source| {
            let mut lexer = Lexer::new(source);
            for token in lexer.tokenize() {
                println!(
                    "{}:{}\t{}\t{:?}",
                    path.display(),
                    token.span,
                    token.kind,
                    token.text
                );
            }
            true
        }),
        Command::Ast { files } => for_each_file(&files, |_, source| {
            let root = parse_source(source, options);
            print!("{}", format(&root));
            !root.is_bad()
        }),
        Command::Check { files } => check(&files, options),
        Command::Repl => repl(options, io::stdin().lock(), io::stdout()),
    }
}

fn parse_source(source: &str, options: ParseOptions) -> Node {
    let tokens = Lexer::new(source).tokenize();
    Parser::new(tokens).with_options(options).parse()
}

/// Run `action` over every readable file. Fails if a file cannot be
/// read or `action` reports a failure for it.
fn for_each_file(files: &[PathBuf], mut action: impl FnMut(&Path, &str) -> bool) -> ExitCode {
    let mut had_error = false;

    for path in files {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                had_error = true;
                continue;
            }
        };
        debug!(file = %path.display(), bytes = source.len(), "read source");
        if !action(path, &source) {
            had_error = true;
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Module name a file is registered under in the imports table.
fn module_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}

fn check(files: &[PathBuf], options: ParseOptions) -> ExitCode {
    let mut imports = HashMap::new();

    let code = for_each_file(files, |path, source| {
        let display = path.display();
        let tokens = Lexer::new(source).tokenize();
        let mut parser =
            Parser::with_imports(tokens, std::mem::take(&mut imports)).with_options(options);
        let root = parser.parse();

        let valid = match root.error() {
            Some(error) => {
                eprintln!("{display}: {error}");
                false
            }
            None => {
                let count = root.statements().map_or(0, <[Node]>::len);
                eprintln!("{display}: valid ({count} statement(s))");
                parser.register_import(module_name(path), root)
            }
        };
        imports = parser.into_imports();
        valid
    });

    debug!(modules = imports.len(), "check finished");
    code
}

/// Parse `input` line by line, writing each tree (or its error) to
/// `output`. Stops at end of input or on the first I/O error.
fn repl(options: ParseOptions, mut input: impl BufRead, mut output: impl Write) -> ExitCode {
    let mut lexer = Lexer::new("");
    let mut parser = Parser::new(Vec::new()).with_options(options);

    loop {
        if let Err(e) = write!(output, "> ").and_then(|()| output.flush()) {
            eprintln!("stdout: {e}");
            return ExitCode::FAILURE;
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("stdin: {e}");
                return ExitCode::FAILURE;
            }
        }

        lexer.reuse(line);
        parser.reuse(lexer.tokenize());
        let root = parser.parse();
        match root.error() {
            Some(error) => eprintln!("{error}"),
            None => {
                if let Err(e) = write!(output, "{}", format(&root)) {
                    eprintln!("stdout: {e}");
                    return ExitCode::FAILURE;
                }
            }
        }
    }

    if let Err(e) = writeln!(output) {
        eprintln!("stdout: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;

    #[test]
    fn defaults_to_repl_at_warn() {
        let cli = Cli::try_parse_from(["seabow"]).expect("could not parse args");
        assert!(cli.command.is_none());
        assert_eq!(cli.level_filter(), LevelFilter::WARN);
        assert_eq!(cli.options(), ParseOptions::default());
    }

    #[test]
    fn verbosity_flags() {
        let cli = Cli::try_parse_from(["seabow", "-vv", "repl"]).expect("could not parse args");
        assert_eq!(cli.level_filter(), LevelFilter::TRACE);
        let cli = Cli::try_parse_from(["seabow", "-q", "repl"]).expect("could not parse args");
        assert_eq!(cli.level_filter(), LevelFilter::ERROR);
        assert!(Cli::try_parse_from(["seabow", "-q", "-v"]).is_err());
    }

    #[test]
    fn check_takes_files_and_options() {
        let cli = Cli::try_parse_from(["seabow", "check", "a.sb", "lib/b.sb", "--allow-loop-control"])
            .expect("could not parse args");
        assert!(cli.options().allow_loop_control);
        let Some(Command::Check { files }) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(module_name(&files[1]), "b");
    }

    /// Writer whose every write fails.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn repl_prints_each_line() {
        let mut output = Vec::new();
        let code = repl(ParseOptions::default(), &b"1 + 2\n(3\n4\n"[..], &mut output);
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(
            String::from_utf8(output).expect("utf-8 output"),
            "> (+ 1 2)\n> > 4\n> \n"
        );
    }

    #[test]
    fn repl_stops_when_output_fails() {
        let code = repl(ParseOptions::default(), &b"1\n"[..], ClosedPipe);
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn file_commands_need_files() {
        assert!(Cli::try_parse_from(["seabow", "ast"]).is_err());
    }
}
