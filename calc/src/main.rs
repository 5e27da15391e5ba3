use anyhow::Context;
use calc::{Session, Status};
use calc_interp::{Interpreter, Store};
use calc_source::{Diagnostic, Source};
use clap::Parser;
use console::style;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calc")]
#[command(about = "Interpreter for a small language of integers, strings, loops and print")]
#[command(version)]
struct Cli {
    /// Program to run. Starts an interactive session when omitted.
    file: Option<PathBuf>,

    /// Print the parsed syntax tree before running
    #[arg(long)]
    dump_ast: bool,

    /// Print the program in canonical form before running
    #[arg(long)]
    print_source: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.file {
        Some(path) => run_file(&cli, path),
        None => run_interactive().map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{} {:#}", style("error:").red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{} {}", style("warning:").yellow().bold(), diagnostic);
    }
}

fn report_error(error: &dyn std::error::Error) {
    eprintln!("{} {}", style("error:").red().bold(), error);
}

/// Runs a whole file. Returns `Ok(false)` if the program failed to parse or aborted.
fn run_file(cli: &Cli, path: &Path) -> anyhow::Result<bool> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read file '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "running file");

    let source = Source::new(&text);
    let parsed = calc::parse_program(&source);
    report_diagnostics(
        &source
            .errors
            .diagnostics()
            .into_iter()
            .filter(|diagnostic| diagnostic.kind == calc_source::DiagnosticKind::Lexical)
            .collect::<Vec<_>>(),
    );
    let program = match parsed {
        Ok(program) => program,
        Err(err) => {
            report_error(&err);
            return Ok(false);
        }
    };

    if cli.dump_ast {
        eprintln!("{:#?}", program);
    }
    if cli.print_source {
        eprint!("{}", program);
    }

    let mut store = Store::new();
    let stdout = io::stdout();
    let mut interpreter = Interpreter::new(&mut store, stdout.lock());
    let result = interpreter.evaluate(&program);
    for warning in interpreter.warnings() {
        eprintln!("{} {}", style("Semantic error:").yellow().bold(), warning);
    }
    match result {
        Ok(_) => Ok(true),
        Err(err) => {
            report_error(&err);
            Ok(false)
        }
    }
}

fn run_interactive() -> anyhow::Result<()> {
    println!("Simple Calculator Language Interpreter");
    println!("Type 'exit' to quit");

    let mut session = Session::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        let prompt = if session.is_buffering() { "...> " } else { "calc> " };
        print!("{}", style(prompt).cyan());
        stdout.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break, // EOF
        };
        if line.trim().eq_ignore_ascii_case("exit") {
            break;
        }
        if line.trim().is_empty() && !session.is_buffering() {
            continue;
        }

        let feed = session.feed(&line, stdout.lock());
        report_diagnostics(&feed.diagnostics);
        for warning in &feed.warnings {
            eprintln!("{} {}", style("Semantic error:").yellow().bold(), warning);
        }
        match feed.status {
            Status::Evaluated(_) | Status::Incomplete => {}
            Status::Rejected(err) => report_error(&err),
            Status::Failed(err) => report_error(&err),
        }
    }

    println!();
    Ok(())
}
