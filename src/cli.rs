// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the logs subcommand and its request options.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deploylog")]
#[command(about = "Stream the logs of a deployment from its deployer or application processes")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the logs of a deployment config's latest (or chosen) deployment
    Logs {
        /// Deployment config name
        config: String,

        /// Namespace holding the config (overrides deploylog.yml)
        #[arg(short, long)]
        namespace: Option<String>,

        /// Deployment version to read instead of the latest
        #[arg(long)]
        version: Option<i64>,

        /// Read the deployment before the latest one
        #[arg(short, long)]
        previous: bool,

        /// Return at once with no output if the deployment has not started
        #[arg(long)]
        no_wait: bool,

        /// Keep streaming as new output is written
        #[arg(short, long)]
        follow: bool,

        /// Container to read when the process has several
        #[arg(short, long)]
        container: Option<String>,

        /// Number of lines to show from the end
        #[arg(long)]
        tail: Option<u64>,

        /// Only show output newer than this many seconds
        #[arg(long, conflicts_with = "since_time")]
        since: Option<u64>,

        /// Only show output newer than this RFC 3339 timestamp
        #[arg(long)]
        since_time: Option<DateTime<Utc>>,

        /// Prefix each line with its timestamp
        #[arg(long)]
        timestamps: bool,

        /// Stop after this many bytes
        #[arg(long)]
        limit_bytes: Option<u64>,

        /// Read the previous instance of a restarted container
        #[arg(long)]
        previous_container: bool,

        /// Manifest directory (overrides deploylog.yml)
        #[arg(long)]
        manifests: Option<PathBuf>,

        /// Container runtime socket (overrides deploylog.yml)
        #[arg(long)]
        socket: Option<String>,
    },
}
