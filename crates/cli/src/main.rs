// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fwt: test every Terra featured workspace by running its workflows in a fresh clone

mod color;
mod commands;
mod config;
mod env;
mod exit_error;
mod logging;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{
    cleanup::CleanupArgs, costs::CostsArgs, list::ListArgs, report::ReportArgs, run::RunArgs,
};
use crate::config::FileConfig;

#[derive(Parser)]
#[command(name = "fwt", version = env::VERSION, styles = color::styles())]
#[command(about = "Featured workspace tester: clone, run, and report on Terra featured workspaces")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/fwt/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging for fwt crates
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone and test featured workspaces, publish reports, notify owners
    Run(RunArgs),
    /// Delete old clones from the clone billing project
    Cleanup(CleanupArgs),
    /// List the featured workspaces a run would test
    List(ListArgs),
    /// Rebuild a run's master report from its published workspace reports
    Report(ReportArgs),
    /// Show what each past run cost, from the clones it left behind
    Costs(CostsArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = dispatch(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(exit_error::exit_code(&e));
    }
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };
    let _guard = logging::init(cli.verbose, cli.log_file.as_deref())?;
    let file = FileConfig::load(cli.config.as_deref())?;

    match command {
        Commands::Run(args) => commands::run::handle(args, file).await,
        Commands::Cleanup(args) => commands::cleanup::handle(args, file).await,
        Commands::List(args) => commands::list::handle(args, file).await,
        Commands::Report(args) => commands::report::handle(args, file).await,
        Commands::Costs(args) => commands::costs::handle(args, file).await,
    }
}
