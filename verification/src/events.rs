//! Transition events broadcast by the coordinator.

use accesschain_types::RequestId;
use alloy_primitives::Address;

/// Events emitted as a verification lifecycle progresses.
///
/// Delivered over a `tokio::sync::broadcast` channel; subscribers that
/// fall behind lose the oldest events, so treat the stream as advisory
/// and query the coordinator for authoritative state.
#[derive(Clone, Debug)]
pub enum VerificationEvent {
    /// A verification transaction is about to be submitted.
    Started { subject: Address },
    /// The transaction confirmed and the request identifier was recovered.
    RequestConfirmed {
        subject: Address,
        request_id: RequestId,
    },
    /// The verifier reported a final result.
    Completed { subject: Address, verified: bool },
    /// The poll ceiling elapsed without a result.
    TimedOut { subject: Address },
    /// The request failed before a result could be tracked.
    Failed { subject: Address, reason: String },
    /// The request was cancelled by the caller.
    Cancelled { subject: Address },
}

impl VerificationEvent {
    /// The subject the event concerns.
    pub fn subject(&self) -> Address {
        match self {
            Self::Started { subject }
            | Self::RequestConfirmed { subject, .. }
            | Self::Completed { subject, .. }
            | Self::TimedOut { subject }
            | Self::Failed { subject, .. }
            | Self::Cancelled { subject } => *subject,
        }
    }

    /// Whether this event ends a lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. }
                | Self::TimedOut { .. }
                | Self::Failed { .. }
                | Self::Cancelled { .. }
        )
    }
}
