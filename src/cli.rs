//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::runner::DEFAULT_MANIFEST;

/// Generate a Ninja manifest for a GameCube/Wii homebrew project.
#[derive(Debug, Default, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Treat this directory as the project root.
    #[arg(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Configuration file to load instead of `dolgen.toml`.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `generate` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse the provided arguments, applying the default command when needed.
    ///
    /// # Errors
    ///
    /// Returns the clap error when the arguments are invalid.
    pub fn try_parse_from_with_default<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::with_default_command)
    }

    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::default_generate());
        }
        self
    }
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Write the Ninja manifest (default).
    Generate {
        /// Destination file; `-` writes to stdout.
        #[arg(value_name = "FILE", default_value = DEFAULT_MANIFEST)]
        file: PathBuf,
    },

    /// List discovered sources with their object paths.
    Sources,
}

impl Commands {
    /// `generate` writing to the default manifest path.
    #[must_use]
    pub fn default_generate() -> Self {
        Self::Generate {
            file: PathBuf::from(DEFAULT_MANIFEST),
        }
    }
}
