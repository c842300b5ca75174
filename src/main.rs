use anyhow::{Context, Result};
use archdiff::cli::{Cli, Commands};
use archdiff::config::{Config, parser, validator::ConfigValidator};
use archdiff::errors::ReconcileError;
use archdiff::output::{self, Verbosity};
use archdiff::reconcile::Reconciler;
use archdiff::{commands, thread_pool};
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use std::io::{self, Write};
use std::process;

fn main() {
    if let Err(e) = run() {
        match e.downcast_ref::<ReconcileError>() {
            Some(err) => eprintln!("{} {}: {:#}", "Error:".red().bold(), err.error_type(), e),
            None => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    output::init_logging(Verbosity::from_flags(cli.quiet, cli.verbose))?;

    // These never touch the package database or the mirror
    match &cli.command {
        Commands::Completion { shell } => {
            print_completions(*shell, &mut Cli::command());
            return Ok(());
        }
        Commands::Collections => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            commands::ls::describe(&mut out)?;
            return Ok(out.flush()?);
        }
        Commands::Ls { .. } | Commands::Status { .. } => {}
    }

    ConfigValidator::new().validate_config_file(&cli.config)?;
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config: {}", cli.config.display()))?;
    cli.apply_overrides(&mut config);
    parser::validate_config(&config)?;
    thread_pool::configure_from_config(&config)?;

    let mut reconciler = Reconciler::new(&config)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Ls { names } => commands::ls::execute(&mut reconciler, &names, &mut out)?,
        Commands::Status { short } => commands::status::execute(&mut reconciler, short, &mut out)?,
        Commands::Collections | Commands::Completion { .. } => {}
    }

    out.flush()?;
    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
