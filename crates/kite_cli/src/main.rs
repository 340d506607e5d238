//! Kite CLI — runs the front end over a source file.
//!
//! The exit code equals the number of lex errors plus parse errors, so a
//! clean run exits 0. Dumps (tokens, AST, timings) go to standard output;
//! errors go to standard error.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{debug, Level, LevelFilter};
use owo_colors::{OwoColorize, Stream};

use kite_ast::pretty_print;
use kite_lexer::{Lexer, SourceBuffer};

/// Program used by `--test` to smoke both phases.
const SMOKE_PROGRAM: &str =
    "import std;\n\ndef main() {\n    float number = 6.9;\n    std.print(\"Hello, world!\");\n}\n";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Parses Kite source into tokens and an AST")]
struct Args {
    /// Print the token dump after lexing
    #[clap(long)]
    tokens: bool,

    /// Print the AST dump after a clean parse
    #[clap(long)]
    ast: bool,

    /// Print phase timings
    #[clap(long)]
    timer: bool,

    /// Run the embedded smoke program through both phases
    #[clap(long)]
    test: bool,

    #[clap(short = 'v', action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    #[clap(short = 'q', action = clap::ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,

    /// The source file to process
    #[clap(value_name = "source file", value_hint = clap::ValueHint::FilePath)]
    file: Option<PathBuf>,
}

impl Args {
    fn log_level_filter(&self) -> LevelFilter {
        match self.verbose as i8 - self.quiet as i8 {
            i8::MIN..=-2 => LevelFilter::Off,
            -1 => LevelFilter::Error,
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(error) = init_logging(args.log_level_filter()) {
        eprintln!("failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }
    debug!("starting kite with args: {args:?}");

    let mut errors = 0usize;

    if args.test {
        errors += run_source(SourceBuffer::new(SMOKE_PROGRAM), &args);
        if errors == 0 {
            println!("self test passed");
        } else {
            eprintln!("self test failed with {errors} error(s)");
        }
    }

    if let Some(file) = &args.file {
        match read_source(file) {
            Ok(source) => errors += run_source(source, &args),
            Err(message) => {
                eprintln!("{message}");
                return ExitCode::FAILURE;
            }
        }
    } else if !args.test {
        eprintln!("no source file given; see --help");
        return ExitCode::FAILURE;
    }

    ExitCode::from(errors.min(u8::MAX as usize) as u8)
}

/// Read and decode a source file; decoding errors come from the
/// transcoder, not the lexer.
fn read_source(file: &Path) -> Result<SourceBuffer, String> {
    let bytes =
        std::fs::read(file).map_err(|error| format!("could not read {}: {error}", file.display()))?;
    kite_lexer::decode_utf8(&bytes).map_err(|error| format!("{}: {error}", file.display()))
}

/// Lex and parse one source text, printing the requested dumps.
/// Returns the total error count.
fn run_source(source: SourceBuffer, args: &Args) -> usize {
    let lex_started = Instant::now();
    let lexed = Lexer::from_buffer(source).tokenize();
    let lex_time = lex_started.elapsed();

    if args.timer {
        println!("Finished lexing in {}s", lex_time.as_secs_f64());
    }
    for error in &lexed.errors {
        eprintln!("LexError: {error}");
    }
    if args.tokens {
        println!("tokens:");
        for token in &lexed.tokens {
            println!("\t{token}");
        }
    }

    let parse_started = Instant::now();
    let result = kite_parser::parse(lexed.tokens);
    let parse_time = parse_started.elapsed();

    if args.timer {
        println!("Finished parsing in {}s", parse_time.as_secs_f64());
    }
    for error in &result.errors {
        eprintln!("ParseError: {error}");
    }

    let errors = lexed.errors.len() + result.errors.len();
    if args.ast && errors == 0 {
        print!("{}", pretty_print(&result.module));
    }
    errors
}

fn init_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}]: {}",
                record
                    .level()
                    .if_supports_color(Stream::Stderr, |level| match level {
                        Level::Error => level.bright_red().to_string(),
                        Level::Warn => level.bright_yellow().to_string(),
                        Level::Info => level.green().to_string(),
                        Level::Debug => level.cyan().to_string(),
                        Level::Trace => level.white().to_string(),
                    }),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}
