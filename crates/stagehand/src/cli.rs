use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use stagehand_core::kernel::Priority;

/// Stagehand: run a process through its lifecycle stages
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every lifecycle stage with its event and whether it blocks
    Stages,
    /// Run a demo application through the kernel
    Run {
        /// Kernel configuration file (.json, .yaml, .yml or .toml)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Register a demo extension, optionally with a priority
        #[arg(long = "extension", value_name = "NAME[:PRIORITY]")]
        extensions: Vec<ExtensionArg>,

        /// Make the application fail
        #[arg(long)]
        fail: bool,
    },
}

/// A `--extension` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionArg {
    pub name: String,
    pub priority: Option<Priority>,
}

impl FromStr for ExtensionArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, priority) = match s.rsplit_once(':') {
            Some((name, priority)) => {
                let priority = priority
                    .trim()
                    .parse::<Priority>()
                    .map_err(|e| format!("invalid priority '{}': {}", priority, e))?;
                (name, Some(priority))
            }
            None => (s, None),
        };

        let name = name.trim();
        if name.is_empty() {
            return Err("extension name must not be empty".to_string());
        }
        Ok(Self {
            name: name.to_string(),
            priority,
        })
    }
}
