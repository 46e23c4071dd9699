//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `retask`.
#[derive(Debug, Parser)]
#[command(
    name = "retask",
    version,
    about = "Repoint scheduled tasks at a new task-definition revision"
)]
pub struct Cli {
    /// Workspace root for resolving relative descriptor paths.
    ///
    /// Defaults to GITHUB_WORKSPACE when set, otherwise the current
    /// directory.
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Find scheduled targets on a stale revision and repoint them.
    Deploy {
        /// Task-definition descriptor file (JSON or YAML).
        #[arg(long, value_name = "FILE")]
        task_definition: PathBuf,

        /// Cluster whose scheduled tasks are in scope (name or ARN).
        #[arg(long, default_value = "default")]
        cluster: String,

        /// Only scan rules whose name starts with this prefix.
        #[arg(long, default_value = "")]
        rule_prefix: String,

        /// Compute and print the plan without writing anything back.
        #[arg(long)]
        dry_run: bool,

        /// Upper bound on concurrently processed rules.
        #[arg(long, default_value_t = 8, value_name = "N")]
        max_concurrency: usize,

        /// File to append the task-definition-arn step output to.
        ///
        /// Defaults to GITHUB_OUTPUT when set, otherwise the value is
        /// printed to stdout.
        #[arg(long, value_name = "FILE")]
        output_file: Option<PathBuf>,
    },
    /// Print the ARN carried by a task-definition descriptor.
    Arn {
        /// Task-definition descriptor file (JSON or YAML).
        #[arg(value_name = "FILE")]
        task_definition: PathBuf,
    },
}
