//! Verification request state tracking.

use accesschain_types::{Attestation, RequestId};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a verification request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    /// No request in flight for this subject.
    Idle,
    /// A verification transaction is being simulated, submitted, and confirmed.
    Submitting,
    /// The request is registered on-chain; the external attestation has not
    /// finished yet.
    AwaitingCompletion,
    /// The verifier reported a final result.
    Completed { verified: bool },
    /// The poll ceiling elapsed without a result.
    TimedOut,
    /// The request failed before a result could be tracked.
    Failed { reason: String },
}

impl VerificationStatus {
    /// Terminal states never transition on their own; only a new start or a
    /// direct chain read moves the record again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::TimedOut | Self::Failed { .. }
        )
    }

    /// Whether a request is currently in flight.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Submitting | Self::AwaitingCompletion)
    }

    /// Whether the subject ended up verified.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Completed { verified: true })
    }
}

/// One in-flight or settled attestation attempt for a subject.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    /// The account being verified.
    pub subject: Address,
    /// On-chain request identifier; set exactly once, when the submitting
    /// transaction confirms and the verifier's event is found.
    pub request_id: Option<RequestId>,
    /// Current lifecycle status.
    pub status: VerificationStatus,
    /// Poll cycles that returned "not yet completed".
    pub attempts_polled: u32,
    /// Last transport or contract error observed. Informational; errors
    /// during polling never change the status on their own.
    pub last_error: Option<String>,
    /// Attestation payload fetched for a verified subject, when available.
    pub attestation: Option<Attestation>,
}

impl VerificationRequest {
    /// Fresh idle record for a subject.
    pub fn idle(subject: Address) -> Self {
        Self {
            subject,
            request_id: None,
            status: VerificationStatus::Idle,
            attempts_polled: 0,
            last_error: None,
            attestation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    #[test]
    fn terminal_and_active_partition_the_states() {
        let states = [
            VerificationStatus::Idle,
            VerificationStatus::Submitting,
            VerificationStatus::AwaitingCompletion,
            VerificationStatus::Completed { verified: true },
            VerificationStatus::Completed { verified: false },
            VerificationStatus::TimedOut,
            VerificationStatus::Failed {
                reason: "boom".into(),
            },
        ];

        for state in &states {
            assert!(
                !(state.is_terminal() && state.is_active()),
                "{state:?} is both terminal and active"
            );
        }

        assert!(!VerificationStatus::Idle.is_terminal());
        assert!(VerificationStatus::Submitting.is_active());
        assert!(VerificationStatus::AwaitingCompletion.is_active());
        assert!(VerificationStatus::TimedOut.is_terminal());
    }

    #[test]
    fn only_a_positive_completion_counts_as_verified() {
        assert!(VerificationStatus::Completed { verified: true }.is_verified());
        assert!(!VerificationStatus::Completed { verified: false }.is_verified());
        assert!(!VerificationStatus::AwaitingCompletion.is_verified());
    }

    #[test]
    fn serde_round_trip_preserves_result_distinction() {
        let subject = Address::repeat_byte(0x11);
        let mut request = VerificationRequest::idle(subject);
        request.request_id = Some(RequestId::new(B256::repeat_byte(0x22)));
        request.status = VerificationStatus::Completed { verified: false };
        request.attempts_polled = 4;
        request.last_error = Some("rpc error: connection reset".into());

        let json = serde_json::to_string(&request).unwrap();
        let back: VerificationRequest = serde_json::from_str(&json).unwrap();

        assert_eq!(back, request);
        assert_eq!(
            back.status,
            VerificationStatus::Completed { verified: false }
        );
    }

    #[test]
    fn serde_round_trip_preserves_failure_reason() {
        let mut request = VerificationRequest::idle(Address::ZERO);
        request.status = VerificationStatus::Failed {
            reason: "no verification event".into(),
        };

        let json = serde_json::to_string(&request).unwrap();
        let back: VerificationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }
}
