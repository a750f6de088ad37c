use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "terraform-provider-commonfate")]
#[command(version)]
#[command(about = "Common Fate provider: access workflows, policies and integrations as declarative resources", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (logs go to stderr)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the provider protocol on stdin/stdout
    Serve,

    /// Print the provider, resource and data source schemas as JSON
    Schema,

    /// Validate configuration and authenticate against the API
    Check {
        /// Config file (default: ~/.config/commonfate/provider.toml)
        #[arg(short, long, env = "CF_PROVIDER_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Render policies declared in a TOML file to Cedar
    RenderPolicy {
        /// File with one `[[policy]]` table per policy
        file: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
