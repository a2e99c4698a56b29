mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    check, edit, export, init, redo, styles, undo, CheckArgs, EditArgs, ExportArgs, InitArgs,
    SessionArgs, StylesArgs,
};
use tracing_subscriber::EnvFilter;

/// Pagecraft CLI - page schema editing and static export
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a new Pagecraft project
    Init(InitArgs),

    /// Validate a page schema
    Check(CheckArgs),

    /// Export a page schema to static HTML
    Export(ExportArgs),

    /// Apply a JSON array of mutations to a page schema
    Edit(EditArgs),

    /// Undo the last edit
    Undo(SessionArgs),

    /// Redo the last undone edit
    Redo(SessionArgs),

    /// Print the resolved CSS for one node
    Styles(StylesArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| match cli.command {
            Command::Init(args) => init(args, &cwd),
            Command::Check(args) => check(args, &cwd),
            Command::Export(args) => export(args, &cwd),
            Command::Edit(args) => edit(args, &cwd),
            Command::Undo(args) => undo(args, &cwd),
            Command::Redo(args) => redo(args, &cwd),
            Command::Styles(args) => styles(args, &cwd),
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
