mod cli;
mod commands;
mod config;
mod data_sources;
mod diagnostics;
mod entity;
mod error;
mod host;
mod provider;
mod resources;
mod session;
#[cfg(test)]
mod testing;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the host protocol
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        Command::Serve => commands::serve::run(),
        Command::Schema => commands::schema::run(),
        Command::Check { config } => commands::check::run(&ctx, config),
        Command::RenderPolicy { file } => commands::render::run(&file),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "terraform-provider-commonfate", &mut io::stdout());
            Ok(())
        }
    }
}
