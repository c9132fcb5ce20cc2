//! Coordinator configuration.

use alloy_primitives::Address;
use std::time::Duration;

/// Default delay between poll attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default number of poll attempts before a pending request times out.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 12;

/// Attestation platform users complete their verification on.
pub const DEFAULT_PLATFORM_URL: &str = "https://app.platform.krnl.xyz";

/// Configuration for a [`VerificationCoordinator`](crate::VerificationCoordinator).
///
/// Always passed in explicitly; the coordinator keeps no global state.
#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    /// Chain the verifier contract is deployed on.
    pub chain_id: u64,
    /// Address of the verifier contract. Receipt logs from this address
    /// carry the request identifier.
    pub verifier: Address,
    /// Delay between poll attempts.
    pub poll_interval: Duration,
    /// Poll attempts before a pending request is declared timed out.
    pub max_attempts: u32,
    /// Link surfaced to users while a request is pending.
    pub platform_url: String,
}

impl CoordinatorConfig {
    pub fn new(chain_id: u64, verifier: Address) -> Self {
        Self {
            chain_id,
            verifier,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            platform_url: DEFAULT_PLATFORM_URL.to_string(),
        }
    }

    /// Total wall-clock budget the poll loop can consume.
    pub fn polling_budget(&self) -> Duration {
        self.poll_interval * self.max_attempts
    }
}
