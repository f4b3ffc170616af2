/*!
 * Configuration handling for DirPack
 */

use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::error::{PackError, Result};

/// Command-line arguments for DirPack
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "dirpack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Pack a directory tree into a single XML snapshot for LLM context",
    long_about = "Walks a directory tree and emits one XML document with per-file metadata and full line-by-line content, for feeding a codebase to Large Language Models (LLMs)."
)]
pub struct Args {
    /// Root directory to pack
    #[clap(default_value = ".")]
    pub directory_path: String,

    /// Output XML file name
    #[clap(default_value = ".dirpack.xml")]
    pub output_file: String,

    /// Comma-separated list of additional patterns to ignore
    #[clap(long, value_delimiter = ',')]
    pub ignore_patterns: Vec<String>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Target directory to pack
    pub target_dir: PathBuf,

    /// Output XML file path
    pub output_file: PathBuf,

    /// Additional patterns to ignore
    pub ignore_patterns: Vec<String>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            target_dir: PathBuf::from(args.directory_path),
            output_file: PathBuf::from(args.output_file),
            ignore_patterns: args.ignore_patterns,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target_dir.exists() || !self.target_dir.is_dir() {
            return Err(PackError::PathNotFound(format!(
                "Target directory not found: {}",
                self.target_dir.display()
            )));
        }

        // Check if the output file directory exists
        if let Some(parent) = self.output_file.parent() {
            if !parent.exists() && parent != PathBuf::from("") {
                return Err(PackError::PathNotFound(format!(
                    "Output directory not found: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }
}
