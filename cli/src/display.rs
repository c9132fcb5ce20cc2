//! Human-readable rendering of domain state.
//!
//! The structured enums stay structured everywhere else in the workspace;
//! this is the one place they become prose.

use accesschain_types::{Application, Grant, NgoProfile};
use accesschain_verification::{VerificationRequest, VerificationStatus};
use std::fmt::Write;

/// The status line shown for a verification record.
pub fn status_line(request: &VerificationRequest, platform_url: &str) -> String {
    match &request.status {
        VerificationStatus::Idle => "No verification in progress.".into(),
        VerificationStatus::Submitting => "Initiating verification...".into(),
        VerificationStatus::AwaitingCompletion => format!(
            "Verification requested. Please complete verification on KRNL platform: {platform_url}"
        ),
        VerificationStatus::Completed { verified: true } => "Verification successful!".into(),
        VerificationStatus::Completed { verified: false } => "Verification failed".into(),
        VerificationStatus::TimedOut => "Verification timed out. Please try again.".into(),
        VerificationStatus::Failed { reason } => format!("Verification failed: {reason}"),
    }
}

/// One-line summary used by `grant list`.
pub fn grant_summary(grant: &Grant) -> String {
    format!(
        "#{} {} [{}] {} wei, {} milestones",
        grant.id,
        grant.title,
        grant.status,
        grant.total_amount,
        grant.milestones.len()
    )
}

/// Full rendering used by `grant show`.
pub fn grant_details(grant: &Grant) -> String {
    let mut out = format!(
        "Grant #{}: {} [{}]\n  NGO: {}\n  Total: {} wei\n  {}",
        grant.id, grant.title, grant.status, grant.ngo, grant.total_amount, grant.description
    );
    for (index, milestone) in grant.milestones.iter().enumerate() {
        let _ = write!(
            out,
            "\n  Milestone {index}: {} ({} wei) [{}]",
            milestone.description, milestone.amount, milestone.status
        );
    }
    out
}

pub fn application_line(application: &Application) -> String {
    format!("{} [{}]", application.applicant, application.status)
}

pub fn ngo_line(profile: &NgoProfile) -> String {
    if !profile.registered {
        return format!("{} is not registered", profile.address);
    }
    let authority = if profile.authorized {
        "authorized to create grants"
    } else {
        "registered, awaiting authorization"
    };
    format!("{} ({}) is {}", profile.address, profile.name, authority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accesschain_types::{GrantStatus, Milestone, MilestoneStatus};
    use alloy_primitives::{Address, U256};

    fn request_with(status: VerificationStatus) -> VerificationRequest {
        let mut request = VerificationRequest::idle(Address::repeat_byte(0x11));
        request.status = status;
        request
    }

    const URL: &str = "https://app.platform.krnl.xyz";

    #[test]
    fn status_lines_match_the_product_copy() {
        assert_eq!(
            status_line(&request_with(VerificationStatus::Idle), URL),
            "No verification in progress."
        );
        assert_eq!(
            status_line(&request_with(VerificationStatus::Submitting), URL),
            "Initiating verification..."
        );
        assert_eq!(
            status_line(&request_with(VerificationStatus::AwaitingCompletion), URL),
            "Verification requested. Please complete verification on KRNL platform: \
             https://app.platform.krnl.xyz"
        );
        assert_eq!(
            status_line(
                &request_with(VerificationStatus::Completed { verified: true }),
                URL
            ),
            "Verification successful!"
        );
        assert_eq!(
            status_line(
                &request_with(VerificationStatus::Completed { verified: false }),
                URL
            ),
            "Verification failed"
        );
        assert_eq!(
            status_line(&request_with(VerificationStatus::TimedOut), URL),
            "Verification timed out. Please try again."
        );
        assert_eq!(
            status_line(
                &request_with(VerificationStatus::Failed {
                    reason: "no verification event".into()
                }),
                URL
            ),
            "Verification failed: no verification event"
        );
    }

    #[test]
    fn grant_details_renders_every_milestone() {
        let grant = Grant {
            id: 3,
            ngo: Address::repeat_byte(0x99),
            title: "Clean water wells".into(),
            description: "Dig three wells".into(),
            total_amount: U256::from(1_000u64),
            status: GrantStatus::Open,
            milestones: vec![
                Milestone {
                    description: "Survey".into(),
                    amount: U256::from(400u64),
                    status: MilestoneStatus::Approved,
                },
                Milestone {
                    description: "Dig".into(),
                    amount: U256::from(600u64),
                    status: MilestoneStatus::Pending,
                },
            ],
        };

        let text = grant_details(&grant);
        assert!(text.contains("Grant #3: Clean water wells [open]"));
        assert!(text.contains("Milestone 0: Survey (400 wei) [approved]"));
        assert!(text.contains("Milestone 1: Dig (600 wei) [pending]"));

        assert_eq!(
            grant_summary(&grant),
            "#3 Clean water wells [open] 1000 wei, 2 milestones"
        );
    }

    #[test]
    fn ngo_lines_reflect_the_registry_state() {
        let address = Address::repeat_byte(0x77);
        let unknown = NgoProfile::unknown(address);
        assert!(ngo_line(&unknown).ends_with("is not registered"));

        let registered = NgoProfile {
            address,
            name: "Water For All".into(),
            registered: true,
            authorized: false,
        };
        assert!(ngo_line(&registered).contains("awaiting authorization"));

        let authorized = NgoProfile {
            authorized: true,
            ..registered
        };
        assert!(ngo_line(&authorized).contains("authorized to create grants"));
    }
}
