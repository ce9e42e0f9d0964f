use std::path::PathBuf;

use clap::{Parser as ClapParser, ValueEnum};
use colored::Colorize;
use farpy::diagnostics::Severity;
use farpy::{compile, CompileOptions};
use log::error;

/// Farpy's compiler front end: lexes, parses, analyzes, optimizes, and
/// emits LLVM-IR text for a `.fp` source file.
#[derive(ClapParser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// The Farpy source file to compile.
    file: PathBuf,

    /// Where to write the emitted LLVM-IR text. Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip the constant-folding optimizer pass.
    #[arg(long)]
    no_optimize: bool,

    /// Skip the dead-code elimination pass.
    #[arg(long)]
    no_dead_code_elimination: bool,

    /// Target triple to embed in the module header.
    #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
    target: String,

    #[arg(value_enum, short, long, default_value_t = LogLevel::Warn)]
    verbosity: LogLevel,
}

#[derive(ValueEnum, Clone, Debug, Default)]
enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    simple_logger::init_with_level(log::Level::from(&cli.verbosity)).ok();

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            error!("could not read '{}': {err}", cli.file.display());
            std::process::exit(1);
        }
    };

    let options = CompileOptions {
        run_optimizer: !cli.no_optimize,
        run_dead_code_elimination: !cli.no_dead_code_elimination,
        debug: matches!(cli.verbosity, LogLevel::Debug),
        target_triple: cli.target,
        emit_llvm_ir: true,
    };

    let outcome = match compile(&cli.file.to_string_lossy(), &source, &options) {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    for diagnostic in outcome.diagnostics.all() {
        let colored_label = match diagnostic.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        eprintln!("{colored_label}: {} ({})", diagnostic.message, diagnostic.location);
        for suggestion in &diagnostic.suggestions {
            eprintln!("  {} {}", "help:".cyan(), suggestion.message);
        }
    }
    eprintln!("{}", outcome.diagnostics.summary());

    if outcome.diagnostics.has_errors() {
        std::process::exit(1);
    }

    match cli.output {
        Some(path) => {
            if let Err(err) = std::fs::write(&path, &outcome.llvm_ir) {
                error!("could not write '{}': {err}", path.display());
                std::process::exit(1);
            }
        }
        None => println!("{}", outcome.llvm_ir),
    }

    if !outcome.link_flags.is_empty() {
        eprintln!("note: link with {}", outcome.link_flags.join(" "));
    }
}
