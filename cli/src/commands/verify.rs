//! Verification lifecycle commands.

use crate::config::AppConfig;
use crate::display;
use accesschain_chain::{connect, connect_with_signer, EvmVerifier};
use accesschain_verification::VerificationCoordinator;
use alloy_primitives::{Address, Bytes};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;

#[derive(clap::Subcommand)]
pub enum VerifyAction {
    /// Start verification for a subject and follow it to a terminal state.
    ///
    /// Ctrl-C cancels the request instead of leaving it dangling.
    Start {
        subject: Address,
        /// Auxiliary payload for the attestation platform, hex encoded.
        #[arg(long)]
        aux: Option<String>,
    },
    /// Read the verification state stored on chain for a subject.
    Status { subject: Address },
    /// Re-read the chain until the subject's verification settles.
    Watch { subject: Address },
    /// Cancel the in-flight verification for a subject.
    Cancel { subject: Address },
}

pub async fn run(config: &AppConfig, action: VerifyAction) -> anyhow::Result<()> {
    match action {
        VerifyAction::Start { subject, aux } => start(config, subject, aux.as_deref()).await,
        VerifyAction::Status { subject } => status(config, subject).await,
        VerifyAction::Watch { subject } => watch(config, subject).await,
        VerifyAction::Cancel { subject } => cancel(config, subject).await,
    }
}

fn coordinator_over(verifier: Arc<EvmVerifier>, config: &AppConfig) -> VerificationCoordinator {
    VerificationCoordinator::new(verifier.clone(), verifier, config.coordinator_config())
}

async fn start(config: &AppConfig, subject: Address, aux: Option<&str>) -> anyhow::Result<()> {
    let aux_data = decode_aux(aux)?;
    let key = config.private_key()?;
    let (provider, signer) = connect_with_signer(&config.network, &key)?;
    tracing::debug!(%signer, "connected with signer");

    let verifier = Arc::new(EvmVerifier::new(
        provider,
        config.contracts.verifier,
        config.network.clone(),
    ));
    let coordinator = coordinator_over(verifier, config);

    // Subscribe before starting so no transition is missed.
    let mut events = coordinator.events();
    coordinator
        .start_verification_with(subject, aux_data)
        .await?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                if coordinator.cancel_verification(subject).await {
                    println!("Verification cancelled.");
                }
                return Ok(());
            }
            event = events.recv() => match event {
                Ok(event) if event.subject() == subject => {
                    let record = coordinator.status(subject).await;
                    println!("{}", display::status_line(&record, &config.platform_url));
                    if event.is_terminal() {
                        return Ok(());
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event stream lagged");
                }
                Err(RecvError::Closed) => return Ok(()),
            }
        }
    }
}

async fn status(config: &AppConfig, subject: Address) -> anyhow::Result<()> {
    let provider = connect(&config.network)?;
    let verifier = Arc::new(EvmVerifier::new(
        provider,
        config.contracts.verifier,
        config.network.clone(),
    ));
    let coordinator = coordinator_over(verifier, config);

    let record = coordinator.check_status(subject).await;
    println!("{}", display::status_line(&record, &config.platform_url));
    if let Some(error) = &record.last_error {
        println!("Last error: {error}");
    }
    Ok(())
}

async fn watch(config: &AppConfig, subject: Address) -> anyhow::Result<()> {
    let provider = connect(&config.network)?;
    let verifier = Arc::new(EvmVerifier::new(
        provider,
        config.contracts.verifier,
        config.network.clone(),
    ));
    let coordinator = coordinator_over(verifier, config);
    let interval = coordinator.config().poll_interval;

    let mut last_line = String::new();
    loop {
        let record = coordinator.check_status(subject).await;
        let line = display::status_line(&record, &config.platform_url);
        if line != last_line {
            println!("{line}");
            last_line = line;
        }
        if record.status.is_terminal() {
            return Ok(());
        }
        tokio::select! {
            _ = tokio::signal::ctrl_c() => return Ok(()),
            _ = tokio::time::sleep(interval) => {}
        }
    }
}

async fn cancel(config: &AppConfig, subject: Address) -> anyhow::Result<()> {
    let provider = connect(&config.network)?;
    let verifier = Arc::new(EvmVerifier::new(
        provider,
        config.contracts.verifier,
        config.network.clone(),
    ));
    let coordinator = coordinator_over(verifier, config);

    if coordinator.cancel_verification(subject).await {
        println!("Verification cancelled.");
    } else {
        println!("No verification in progress.");
    }
    Ok(())
}

fn decode_aux(aux: Option<&str>) -> anyhow::Result<Bytes> {
    match aux {
        None => Ok(Bytes::new()),
        Some(raw) => {
            let stripped = raw.trim().trim_start_matches("0x");
            let bytes = hex::decode(stripped).context("invalid --aux hex payload")?;
            Ok(Bytes::from(bytes))
        }
    }
}
