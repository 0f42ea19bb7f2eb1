use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use deslang::ast_printer::AstPrinter;
use deslang::error::LoxError;
use deslang::parser::Parser;
use deslang::scanner::Scanner;
use deslang::session::{Outcome, Session};

#[derive(ClapParser, Debug)]
#[command(version, about = "deslang interpreter", long_about = None)]
pub struct Cli {
    /// Starts the interactive prompt when omitted
    #[command(subcommand)]
    commands: Option<Commands>,

    /// Script to run; shorthand for `deslang run <SCRIPT>`
    script: Option<PathBuf>,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the token list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses a file and prints each statement's syntax tree
    Parse {
        filename: PathBuf,

        /// Print the statements as JSON
        #[arg(long)]
        json: bool,
    },

    /// Runs a file as a deslang program
    Run { filename: PathBuf },

    /// Starts the interactive prompt
    Repl,
}

/// Reads the contents of a file into a Vec<u8>
fn read_file(filename: &Path) -> Result<Vec<u8>> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'deslang::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("deslang::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn print_diagnostics(diagnostics: &[LoxError]) {
    for e in diagnostics {
        eprintln!("{}", e);
    }
}

fn tokenize(filename: PathBuf, json: bool) -> Result<()> {
    let buf = read_file(&filename)?;
    let mut diagnostics: Vec<LoxError> = Vec::new();

    let tokens = Scanner::new().scan_tokens(buf.as_slice(), &mut diagnostics)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    } else {
        for token in &tokens {
            println!("{}", token);
        }
    }

    if !diagnostics.is_empty() {
        print_diagnostics(&diagnostics);
        debug!("Tokenization failed, exiting with code 65");
        std::process::exit(65);
    }

    info!("Tokenization completed successfully");
    Ok(())
}

fn parse(filename: PathBuf, json: bool) -> Result<()> {
    let buf = read_file(&filename)?;
    let mut diagnostics: Vec<LoxError> = Vec::new();

    let tokens = Scanner::new().scan_tokens(buf.as_slice(), &mut diagnostics)?;
    let statements = Parser::new().parse(tokens, &mut diagnostics);

    if !diagnostics.is_empty() {
        print_diagnostics(&diagnostics);
        std::process::exit(65);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&statements)?);
    } else {
        for stmt in &statements {
            println!("{}", AstPrinter::print_stmt(stmt));
        }
    }

    info!("Parse subcommand completed");
    Ok(())
}

fn run(filename: PathBuf) -> Result<()> {
    let buf = read_file(&filename)?;
    let mut session = Session::new(io::stdout());

    match session.run(buf.as_slice())? {
        Outcome::Completed => {
            info!("Program executed successfully");
        }

        Outcome::CompileError => {
            session.output_mut().flush()?;
            std::process::exit(65);
        }

        Outcome::RuntimeError => {
            session.output_mut().flush()?;
            std::process::exit(70);
        }
    }

    Ok(())
}

/// Reads stdin a line at a time; every line is one invocation on the same
/// session.
fn repl() -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut session = Session::new(io::stdout());
    // Raw bytes: a line that is not valid UTF-8 is still handed to the
    // scanner instead of ending the session.
    let mut line: Vec<u8> = Vec::new();

    loop {
        print!("deslang> ");
        io::stdout().flush()?;

        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            break;
        }

        let outcome = session.run(line.as_slice())?;
        debug!("REPL line finished: {:?}", outcome);

        session.output_mut().flush()?;
    }

    info!("REPL closed");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Some(Commands::Tokenize { filename, json }) => tokenize(filename, json),
        Some(Commands::Parse { filename, json }) => parse(filename, json),
        Some(Commands::Run { filename }) => run(filename),
        Some(Commands::Repl) => repl(),
        None => match args.script {
            Some(script) => run(script),
            None => repl(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_path_runs_as_script() {
        let cli = Cli::try_parse_from(["deslang", "hello.dl"]).unwrap();

        assert!(cli.commands.is_none());
        assert_eq!(cli.script, Some(PathBuf::from("hello.dl")));
    }

    #[test]
    fn subcommand_names_win_over_script() {
        let cli = Cli::try_parse_from(["deslang", "run", "hello.dl"]).unwrap();

        assert!(matches!(cli.commands, Some(Commands::Run { .. })));
        assert!(cli.script.is_none());
    }

    #[test]
    fn no_arguments_means_repl() {
        let cli = Cli::try_parse_from(["deslang"]).unwrap();

        assert!(cli.commands.is_none() && cli.script.is_none());
    }
}
