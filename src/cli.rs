//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::transform::Mode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Convert HTML pages between shared-fragment partials and static pages
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Site root directory (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name, relative to the site root
    #[arg(short = 'C', long, default_value = "pagefold.toml")]
    pub config: PathBuf,

    /// Fragment directory, relative to the site root (default: partials)
    #[arg(short, long)]
    pub fragments: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Page selection and write behavior shared by every mode
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Report what would change without writing any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Walk subdirectories of the site root too
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Pages to process instead of discovering them
    pub files: Vec<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Replace shared regions of static pages with include markers
    Collapse {
        /// Collapse the home page as well
        #[arg(long)]
        include_home: bool,

        #[command(flatten)]
        args: RunArgs,
    },

    /// Inline shared fragments into pages with include markers
    Expand {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Normalize links only
    Repair {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Replace header and footer of static pages with the shared fragments
    Sync {
        /// Sync the home page as well
        #[arg(long)]
        include_home: bool,

        #[command(flatten)]
        args: RunArgs,
    },
}

impl Cli {
    pub fn mode(&self) -> Mode {
        match self.command {
            Commands::Collapse { .. } => Mode::Collapse,
            Commands::Expand { .. } => Mode::Expand,
            Commands::Repair { .. } => Mode::Repair,
            Commands::Sync { .. } => Mode::Sync,
        }
    }

    pub fn run_args(&self) -> &RunArgs {
        match &self.command {
            Commands::Collapse { args, .. }
            | Commands::Sync { args, .. }
            | Commands::Expand { args }
            | Commands::Repair { args } => args,
        }
    }

    /// Whether discovery keeps the home page.
    pub fn include_home(&self) -> bool {
        match self.command {
            Commands::Collapse { include_home, .. } | Commands::Sync { include_home, .. } => {
                include_home
            }
            Commands::Expand { .. } | Commands::Repair { .. } => true,
        }
    }
}
