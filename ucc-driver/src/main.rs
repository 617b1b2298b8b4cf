//! µC Compiler Driver
//!
//! Command-line entry point for the µC front end. Each subcommand runs the
//! front end up to some phase over one or more files and reports the first
//! problem of every file with its source line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use ucc_common::{CompilerError, Source};
use ucc_frontend::{Frontend, FrontendConfig, Token};

#[derive(Parser)]
#[command(name = "ucc")]
#[command(about = "µC compiler front end")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log front end activity (level taken from RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print diagnostics without colors
    #[arg(long, global = true)]
    no_colors: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tokens of each file
    Lex {
        /// Input files; `-` reads standard input
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Emit the tokens as JSON
        #[arg(long)]
        json: bool,

        /// Print at most N tokens per file
        #[arg(short = 'n', value_name = "N")]
        limit: Option<usize>,
    },

    /// Dump the syntax tree of each file as JSON
    Parse {
        /// Input files; `-` reads standard input
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Resolve names and type check each file
    Check {
        /// Input files; `-` reads standard input
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Reject function definitions inside function bodies
        #[arg(long)]
        no_nested_functions: bool,

        /// Front end configuration file (JSON)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::init();
    }
    let color = !cli.no_colors;

    let (files, action) = match cli.command {
        Commands::Lex { files, json, limit } => (files, Action::Lex { json, limit }),
        Commands::Parse { files } => (files, Action::Parse),
        Commands::Check {
            files,
            no_nested_functions,
            config,
        } => {
            let mut frontend_config = match config {
                Some(path) => FrontendConfig::load(&path)?,
                None => FrontendConfig::default(),
            };
            if no_nested_functions {
                frontend_config.no_nested_functions = true;
            }
            debug!("front end configuration: {:?}", frontend_config);
            (files, Action::Check(frontend_config))
        }
    };

    let mut failed = 0;
    for path in &files {
        let ok = read_input(path).and_then(|input| action.run(&input, color));
        match ok {
            Ok(true) => {}
            Ok(false) => failed += 1,
            Err(e) => {
                let prefix = if color {
                    "error:".red().bold().to_string()
                } else {
                    "error:".to_string()
                };
                eprintln!("{} {:#}", prefix, e);
                failed += 1;
            }
        }
    }

    info!("{} of {} files failed", failed, files.len());
    Ok(if failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// What to do with every input file
enum Action {
    Lex { json: bool, limit: Option<usize> },
    Parse,
    Check(FrontendConfig),
}

impl Action {
    /// Run on one file; `Ok(false)` means diagnostics were reported
    fn run(&self, input: &Input, color: bool) -> Result<bool> {
        match self {
            Action::Lex { json, limit } => lex_file(input, *json, *limit, color),
            Action::Parse => parse_file(input, color),
            Action::Check(config) => check_file(input, config, color),
        }
    }
}

/// Raw bytes of one input file and its normalized text for diagnostics
struct Input {
    bytes: Vec<u8>,
    source: Source,
}

impl Input {
    fn new(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        let source = Frontend::source(path, &bytes);
        Self { bytes, source }
    }
}

/// Read a whole input file, or standard input for `-`
fn read_input(path: &Path) -> Result<Input> {
    if path == Path::new("-") {
        let mut bytes = Vec::new();
        io::stdin()
            .read_to_end(&mut bytes)
            .context("cannot read standard input")?;
        return Ok(Input::new("<stdin>", bytes));
    }
    let bytes = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    Ok(Input::new(path.display().to_string(), bytes))
}

fn lex_file(input: &Input, json: bool, limit: Option<usize>, color: bool) -> Result<bool> {
    let source = &input.source;
    let tokens = Frontend::tokenize_bytes(&input.bytes);
    let shown = &tokens[..limit.unwrap_or(tokens.len()).min(tokens.len())];

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
    } else {
        for token in shown {
            println!("{}", format_token(source, token));
        }
    }

    let errors = Frontend::lex_errors(&tokens);
    errors.print_diagnostics(Some(source), color);
    if errors.has_errors() {
        eprintln!("{}: {}", source.path, errors.summary());
    }
    Ok(!errors.has_errors())
}

/// One line of the token listing: `path:line:column  Kind  "lexeme"`
fn format_token(source: &Source, token: &Token) -> String {
    let loc = source.position(token.pos);
    format!(
        "{}:{:<8} {:<20} {:?}",
        source.path,
        loc.to_string(),
        format!("{:?}", token.kind),
        token.lexeme
    )
}

fn parse_file(input: &Input, color: bool) -> Result<bool> {
    match Frontend::parse_bytes(&input.bytes) {
        Ok(unit) => {
            println!("{}", serde_json::to_string_pretty(&unit)?);
            Ok(true)
        }
        Err(e) => {
            report(&e, &input.source, color);
            Ok(false)
        }
    }
}

fn check_file(input: &Input, config: &FrontendConfig, color: bool) -> Result<bool> {
    match Frontend::analyze_bytes(&input.bytes, config) {
        Ok((unit, types)) => {
            debug!(
                "{}: {} items, {} typed expressions",
                input.source.path,
                unit.items.len(),
                types.len()
            );
            Ok(true)
        }
        Err(e) => {
            report(&e, &input.source, color);
            Ok(false)
        }
    }
}

fn report(err: &CompilerError, source: &Source, color: bool) {
    eprintln!("{}", err.to_diagnostic().render(Some(source), color));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use ucc_frontend::TokenKind;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_flags() {
        let cli = Cli::try_parse_from([
            "ucc",
            "check",
            "--no-nested-functions",
            "--no-colors",
            "a.c",
            "-",
        ])
        .unwrap();
        assert!(cli.no_colors);
        match cli.command {
            Commands::Check {
                files,
                no_nested_functions,
                config,
            } => {
                assert_eq!(files, vec![PathBuf::from("a.c"), PathBuf::from("-")]);
                assert!(no_nested_functions);
                assert_eq!(config, None);
            }
            _ => panic!("expected check"),
        }
    }

    #[test]
    fn test_parse_lex_limit() {
        let cli = Cli::try_parse_from(["ucc", "lex", "--json", "-n", "3", "x.c"]).unwrap();
        match cli.command {
            Commands::Lex { files, json, limit } => {
                assert_eq!(files, vec![PathBuf::from("x.c")]);
                assert!(json);
                assert_eq!(limit, Some(3));
            }
            _ => panic!("expected lex"),
        }
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["ucc", "check"]).is_err());
    }

    #[test]
    fn test_format_token() {
        let source = Source::new("t.c", "int x;\n  x = 1;\n");
        let token = Token::new(TokenKind::Identifier, "x", 9);
        assert_eq!(
            format_token(&source, &token),
            "t.c:2:3      Identifier           \"x\""
        );
    }

    #[test]
    fn test_missing_file_is_reported() {
        let Err(err) = read_input(Path::new("/nonexistent/dir/missing.c")) else {
            panic!("expected a read error");
        };
        assert!(format!("{:#}", err).starts_with("cannot read /nonexistent/dir/missing.c: "));
    }

    #[test]
    fn test_check_result() {
        let config = FrontendConfig::default();
        let good = Input::new("good.c", b"int main(void) { return 0; }\n".to_vec());
        assert!(check_file(&good, &config, false).unwrap());
        let bad = Input::new("bad.c", b"int main(void) { return b; }\n".to_vec());
        assert!(!check_file(&bad, &config, false).unwrap());
    }

    #[test]
    fn test_utf16_input_is_shown_as_text() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "int a;\n  a = 1;\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let input = Input::new("wide.c", bytes);
        assert_eq!(input.source.line(2), "  a = 1;");

        let tokens = Frontend::tokenize_bytes(&input.bytes);
        assert_eq!(
            format_token(&input.source, &tokens[3]),
            "wide.c:2:3      Identifier           \"a\""
        );
    }
}
