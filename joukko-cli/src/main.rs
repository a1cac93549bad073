//! Joukko CLI - Mob programming sessions with git
//!
//! Takes exactly one argument naming the operation. Every path exits with
//! status 0; the last line printed tells whether the operation completed.

mod help;
mod prompt;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use joukko_core::{Config, Git, Outcome, Session};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use prompt::TerminalPrompt;

/// joukko: mob programming session tool for git
#[derive(Parser, Debug)]
#[command(name = "joukko")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Operation to run
    operation: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Operation {
    /// Start the mob programming session
    Start,
    /// Set up the new driver's turn
    Take,
    /// End the current driver's turn
    Pass,
    /// Finish the mob programming session
    Finish,
    /// Rename the session branch
    Rename,
    Help,
}

fn accepted_arguments() -> Vec<String> {
    Operation::value_variants()
        .iter()
        .filter_map(|operation| operation.to_possible_value())
        .map(|value| value.get_name().to_string())
        .collect()
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().without_time().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let accepted = accepted_arguments();
    let argument = match Cli::try_parse() {
        Ok(Cli {
            operation: Some(argument),
        }) if !argument.is_empty() => argument,
        Ok(_) => {
            help::print_usage_error("An argument must be given.", &accepted);
            return Ok(());
        }
        Err(e) => {
            tracing::debug!("{}", e);
            help::print_usage_error("Invalid argument given.", &accepted);
            return Ok(());
        }
    };

    let Ok(operation) = <Operation as ValueEnum>::from_str(&argument, false) else {
        help::print_usage_error(&format!("Invalid argument '{}' given.", argument), &accepted);
        return Ok(());
    };

    // Setup failures are reported, never turned into an exit code
    match run(operation) {
        Ok(Some(outcome)) => print_outcome(&outcome),
        Ok(None) => {}
        Err(e) => tracing::error!("{:#}", e),
    }
    Ok(())
}

/// Run `operation`, returning its outcome when it is a session operation
fn run(operation: Operation) -> anyhow::Result<Option<Outcome>> {
    if operation == Operation::Help {
        help::print_help();
        return Ok(None);
    }

    let config = Config::load_with_env()?;
    tracing::debug!(
        remote = %config.session.remote,
        descriptor_file = %config.session.descriptor_file,
        "Configuration loaded"
    );

    let git = Git::new(std::env::current_dir()?, config.session.remote.clone());
    let prompt = TerminalPrompt;
    let session = Session::new(&git, &prompt, &config.session);

    let outcome = match operation {
        Operation::Start => session.start(),
        Operation::Take => session.take(),
        Operation::Pass => session.pass(),
        Operation::Finish => session.finish(),
        Operation::Rename => session.rename(),
        Operation::Help => return Ok(None),
    };
    Ok(Some(outcome))
}

fn print_outcome(outcome: &Outcome) {
    println!();
    match outcome {
        Outcome::Completed(message) => println!("  {}", message.green()),
        Outcome::NotCompleted(message) => println!("  {}", message.red()),
    }
}
