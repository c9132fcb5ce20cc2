//! Grant administration commands.

use crate::config::AppConfig;
use crate::display;
use accesschain_chain::{connect, connect_with_signer, EvmVerifier, GrantRegistry};
use accesschain_grants::{GrantClient, GrantPlan, MilestoneInput};
use alloy_primitives::{Address, U256};
use anyhow::Context;
use std::sync::Arc;

#[derive(clap::Subcommand)]
pub enum GrantAction {
    /// Create a grant from milestone tranches.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Total funding in wei; must equal the milestone sum.
        #[arg(long)]
        total: U256,
        /// Milestone as "<description>=<amount in wei>", repeatable.
        #[arg(long = "milestone", required = true)]
        milestones: Vec<String>,
    },
    /// List every grant.
    List,
    /// Show one grant with its milestones.
    Show { id: u64 },
    /// Apply for a grant as the configured signer.
    Apply { id: u64 },
    /// List who applied to a grant.
    Applicants { id: u64 },
    /// Approve one application, moving the grant in progress.
    Approve { id: u64, applicant: Address },
    /// Milestone submission and approval.
    Milestone {
        #[command(subcommand)]
        action: MilestoneAction,
    },
}

#[derive(clap::Subcommand)]
pub enum MilestoneAction {
    /// Submit a milestone for review.
    Submit { grant: u64, index: u64 },
    /// Approve a submitted milestone, releasing its tranche.
    Approve { grant: u64, index: u64 },
}

pub async fn run(config: &AppConfig, action: GrantAction) -> anyhow::Result<()> {
    match action {
        GrantAction::Create {
            title,
            description,
            total,
            milestones,
        } => {
            let milestones = milestones
                .iter()
                .map(|raw| parse_milestone(raw))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let plan = GrantPlan {
                title,
                description,
                total_amount: total,
                milestones,
            };
            let (client, _) = write_client(config)?;
            let id = client.create_grant(&plan).await?;
            println!("Created grant #{id}");
        }
        GrantAction::List => {
            let client = read_client(config)?;
            let grants = client.grants().await?;
            if grants.is_empty() {
                println!("No grants yet.");
            }
            for grant in &grants {
                println!("{}", display::grant_summary(grant));
            }
        }
        GrantAction::Show { id } => {
            let client = read_client(config)?;
            let grant = client.grant(id).await?;
            println!("{}", display::grant_details(&grant));
        }
        GrantAction::Apply { id } => {
            let (client, signer) = write_client(config)?;
            client.apply(id, signer).await?;
            println!("Applied for grant #{id} as {signer}");
        }
        GrantAction::Applicants { id } => {
            let client = read_client(config)?;
            let applications = client.applicants(id).await?;
            if applications.is_empty() {
                println!("No applicants yet.");
            }
            for application in &applications {
                println!("{}", display::application_line(application));
            }
        }
        GrantAction::Approve { id, applicant } => {
            let (client, _) = write_client(config)?;
            client.approve_application(id, applicant).await?;
            println!("Approved {applicant} for grant #{id}");
        }
        GrantAction::Milestone { action } => match action {
            MilestoneAction::Submit { grant, index } => {
                let (client, _) = write_client(config)?;
                client.submit_milestone(grant, index).await?;
                println!("Submitted milestone {index} of grant #{grant}");
            }
            MilestoneAction::Approve { grant, index } => {
                let (client, _) = write_client(config)?;
                client.approve_milestone(grant, index).await?;
                println!("Approved milestone {index} of grant #{grant}; funds released");
            }
        },
    }
    Ok(())
}

fn read_client(config: &AppConfig) -> anyhow::Result<GrantClient> {
    let provider = connect(&config.network)?;
    let registry = Arc::new(GrantRegistry::new(
        provider.clone(),
        config.contracts.access_grant,
    ));
    let verifier = Arc::new(EvmVerifier::new(
        provider,
        config.contracts.verifier,
        config.network.clone(),
    ));
    Ok(GrantClient::new(registry, verifier))
}

fn write_client(config: &AppConfig) -> anyhow::Result<(GrantClient, Address)> {
    let key = config.private_key()?;
    let (provider, signer) = connect_with_signer(&config.network, &key)?;
    let registry = Arc::new(GrantRegistry::new(
        provider.clone(),
        config.contracts.access_grant,
    ));
    let verifier = Arc::new(EvmVerifier::new(
        provider,
        config.contracts.verifier,
        config.network.clone(),
    ));
    Ok((GrantClient::new(registry, verifier), signer))
}

/// Parse a `--milestone` argument of the form `<description>=<amount>`.
fn parse_milestone(raw: &str) -> anyhow::Result<MilestoneInput> {
    let (description, amount) = raw
        .rsplit_once('=')
        .with_context(|| format!("milestone {raw:?} must be <description>=<amount>"))?;
    let amount: U256 = amount
        .trim()
        .parse()
        .with_context(|| format!("milestone amount {:?} must be a wei value", amount.trim()))?;
    Ok(MilestoneInput {
        description: description.trim().to_owned(),
        amount,
    })
}
