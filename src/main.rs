// ABOUTME: Entry point for the deploylog CLI application.
// ABOUTME: Parses arguments, wires the stores together and streams logs to stdout.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use deploylog::config::Settings;
use deploylog::error::Result;
use deploylog::logs::{CopyError, DeploymentLogs, LogsError};
use deploylog::model::DeploymentLogOptions;
use deploylog::store::{ContainerProcessStore, ManifestStore};
use deploylog::types::ConfigName;
use std::env;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Log output goes to stderr so it never mixes with streamed logs.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Logs {
            config,
            namespace,
            version,
            previous,
            no_wait,
            follow,
            container,
            tail,
            since,
            since_time,
            timestamps,
            limit_bytes,
            previous_container,
            manifests,
            socket,
        } => {
            let cwd = env::current_dir()?;
            let mut settings = Settings::discover_or_default(&cwd)?;
            if let Some(manifests) = manifests {
                settings.manifests = manifests;
            }
            if socket.is_some() {
                settings.runtime.socket = socket;
            }
            let namespace = namespace.unwrap_or_else(|| settings.namespace.to_string());

            let opts = DeploymentLogOptions {
                version,
                previous,
                no_wait,
                follow,
                container,
                tail_lines: tail,
                since_seconds: since,
                since_time,
                timestamps,
                limit_bytes,
                previous_container,
            };

            logs(&settings, &namespace, ConfigName::new(config), &opts).await
        }
    }
}

/// Resolve the deployment's log source and copy it to stdout until it ends.
async fn logs(
    settings: &Settings,
    namespace: &str,
    config: ConfigName,
    opts: &DeploymentLogOptions,
) -> Result<()> {
    let manifests = ManifestStore::new(&settings.manifests);
    let processes = ContainerProcessStore::connect(settings.runtime.socket.as_deref())?;
    let service = DeploymentLogs::new(
        Arc::new(manifests.clone()),
        Arc::new(manifests),
        Arc::new(processes),
        settings.wait,
    );

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, cancelling");
            on_signal.cancel();
        }
    });

    let stream = match service.get(namespace, &config, opts, &cancel).await {
        Ok(stream) => stream,
        Err(LogsError::Cancelled) => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    let mut stdout = tokio::io::stdout();
    match stream.copy_to(&mut stdout, &cancel).await {
        Ok(written) => {
            tracing::debug!(bytes = written, "log stream finished");
            Ok(())
        }
        // Interrupting a followed stream is how it normally ends.
        Err(CopyError::Cancelled) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
