mod cli;
mod error;

use clap::Parser;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use url::Url;

use nudge_core::{ExclusionSet, ReconnectOptions, Reconnector, UnifiSession};

use crate::cli::Cli;
use crate::error::{CliError, exit_code};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(exit_code::GENERAL);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "info" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stdout)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let loaded = nudge_config::load(cli_options(cli)?)?;
    let config = loaded.config;

    // Verbosity can come from the options file, so logging starts here.
    init_tracing(config.verbose);
    if let Some(path) = &loaded.source {
        info!("Loaded options from {}", path.display());
    }

    let session = UnifiSession::open(config.base_uri.clone())?;

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received");
                cancel.cancel();
            }
        }
    });

    let mut reconnector = Reconnector::new(session, config)?.with_cancellation(cancel);
    let outcome = reconnector.run().await;
    if outcome.is_err() {
        debug!(state = ?reconnector.state(), "reconnect pass stopped");
    }
    let summary = outcome?;

    info!(
        "Reconnected {} of {} clients (attempt {})",
        summary.reconnected.len(),
        summary.inspected,
        summary.attempts
    );
    Ok(())
}

/// The command line as the highest-precedence options source.
fn cli_options(cli: Cli) -> Result<ReconnectOptions, CliError> {
    let base_uri = cli
        .base_uri
        .map(|value| {
            Url::parse(&value).map_err(|source| CliError::InvalidBaseUri { value, source })
        })
        .transpose()?;

    Ok(ReconnectOptions {
        base_uri,
        username: cli.username,
        password: cli.password.map(SecretString::from),
        minimum_signal_strength: cli.minimum_signal_strength,
        insecure_tls: cli.insecure_tls.then_some(true),
        excluded_macs: cli.excluded_macs.into_iter().collect::<ExclusionSet>(),
        excluded_ssids: cli.excluded_ssids.into_iter().collect::<ExclusionSet>(),
        verbose: cli.verbose,
        options_file: cli.options_file,
    })
}
