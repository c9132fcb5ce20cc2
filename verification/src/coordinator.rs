//! Verification coordinator: one attestation lifecycle per subject.
//!
//! A lifecycle is driven by a spawned task: submit the verification
//! transaction, recover the request identifier from the receipt, then poll
//! the verifier until completion, timeout, or cancellation. The coordinator
//! serializes lifecycles per subject and publishes every transition on a
//! broadcast channel.

use crate::config::CoordinatorConfig;
use crate::error::VerificationError;
use crate::events::VerificationEvent;
use crate::state::{VerificationRequest, VerificationStatus};
use accesschain_types::{Attestation, ChainError, ChainReader, ChainWriter};
use alloy_primitives::{Address, Bytes};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Coordinates verification lifecycles keyed by subject address.
pub struct VerificationCoordinator {
    reader: Arc<dyn ChainReader>,
    writer: Arc<dyn ChainWriter>,
    config: CoordinatorConfig,
    /// Guards the map only; per-subject state has its own lock and this
    /// one is never held across an await on it.
    subjects: Mutex<HashMap<Address, Arc<Subject>>>,
    events: broadcast::Sender<VerificationEvent>,
}

/// Per-subject slot: the record plus bookkeeping for its driver task.
struct Subject {
    inner: Mutex<Slot>,
}

struct Slot {
    request: VerificationRequest,
    /// Identifies the current lifecycle. Driver tasks carry the generation
    /// they were spawned under and their writes are discarded once it moves.
    generation: u64,
    task: Option<DriverTask>,
}

struct DriverTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Slot {
    fn new(subject: Address) -> Self {
        Self {
            request: VerificationRequest::idle(subject),
            generation: 0,
            task: None,
        }
    }

    /// Invalidate the current lifecycle: stop any live driver task and bump
    /// the generation so its in-flight writes land nowhere.
    fn supersede(&mut self) -> bool {
        self.generation += 1;
        if let Some(task) = self.task.take() {
            task.cancel.cancel();
            task.handle.abort();
            true
        } else {
            false
        }
    }
}

impl VerificationCoordinator {
    pub fn new(
        reader: Arc<dyn ChainReader>,
        writer: Arc<dyn ChainWriter>,
        config: CoordinatorConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            reader,
            writer,
            config,
            subjects: Mutex::new(HashMap::new()),
            events,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Subscribe to lifecycle transitions. Events sent before the call are
    /// not replayed.
    pub fn events(&self) -> broadcast::Receiver<VerificationEvent> {
        self.events.subscribe()
    }

    /// Read the durable verification flag for `subject` and fold the result
    /// into the local record.
    ///
    /// A positive flag always wins: whatever the record says, it becomes
    /// `Completed { verified: true }` and any live poll task is stopped.
    /// A negative flag leaves the record untouched. A failed read records
    /// `last_error` and changes nothing else, so the caller can retry.
    pub async fn check_status(&self, subject: Address) -> VerificationRequest {
        match self.reader.is_verified(subject).await {
            Ok(true) => {
                let attestation = match self.reader.verification_data(subject).await {
                    Ok(data) => Some(data),
                    Err(err) => {
                        tracing::warn!(%subject, "attestation read failed: {err}");
                        None
                    }
                };
                self.complete_from_chain(subject, attestation).await
            }
            // A negative flag leaves whatever is tracked untouched and
            // creates nothing for subjects never seen.
            Ok(false) => self.status(subject).await,
            Err(err) => {
                tracing::warn!(%subject, "verified-flag read failed: {err}");
                self.record_read_error(subject, &err).await
            }
        }
    }

    /// Start a verification lifecycle for `subject`.
    ///
    /// Returns synchronously once the request is accepted; submission and
    /// polling continue in a background task and surface through
    /// [`events`](Self::events) and the request record.
    pub async fn start_verification(&self, subject: Address) -> Result<(), VerificationError> {
        self.start_verification_with(subject, Bytes::new()).await
    }

    /// Start a verification whose transaction carries `aux_data` for the
    /// attestation platform.
    pub async fn start_verification_with(
        &self,
        subject: Address,
        aux_data: Bytes,
    ) -> Result<(), VerificationError> {
        let slot = self.subject_slot(subject).await;
        let mut state = slot.inner.lock().await;

        if state.request.status.is_active() {
            return Err(VerificationError::ConflictingRequest(subject));
        }

        // Network precondition, checked before any state changes. Holding
        // the slot lock serializes racing starts for the same subject.
        if let Err(err) = self.writer.ensure_chain(self.config.chain_id).await {
            tracing::warn!(%subject, "network precondition failed: {err}");
            return Err(VerificationError::NetworkMismatch {
                expected: self.config.chain_id,
                detail: err.to_string(),
            });
        }

        // A settled lifecycle can still own a live task (timeout races,
        // completion via direct read). It must be gone before the record
        // is reused.
        state.supersede();

        state.request = VerificationRequest {
            subject,
            request_id: None,
            status: VerificationStatus::Submitting,
            attempts_polled: 0,
            last_error: None,
            attestation: None,
        };
        tracing::info!(%subject, chain = self.config.chain_id, "verification started");
        self.emit(VerificationEvent::Started { subject });

        let cancel = CancellationToken::new();
        let driver = Driver {
            slot: Arc::clone(&slot),
            reader: Arc::clone(&self.reader),
            writer: Arc::clone(&self.writer),
            events: self.events.clone(),
            config: self.config.clone(),
            subject,
            generation: state.generation,
            cancel: cancel.clone(),
        };
        let handle = tokio::spawn(driver.run(aux_data));
        state.task = Some(DriverTask { cancel, handle });

        Ok(())
    }

    /// Stop an active lifecycle for `subject` and reset its record to idle.
    ///
    /// Settled records are left alone. Returns whether anything was
    /// actually cancelled.
    pub async fn cancel_verification(&self, subject: Address) -> bool {
        let slot = {
            let map = self.subjects.lock().await;
            map.get(&subject).cloned()
        };
        let Some(slot) = slot else {
            return false;
        };

        let mut state = slot.inner.lock().await;
        if !state.request.status.is_active() {
            // Nothing in flight; clean up a finished task handle if present.
            state.supersede();
            return false;
        }

        state.supersede();
        state.request = VerificationRequest::idle(subject);
        tracing::info!(%subject, "verification cancelled");
        self.emit(VerificationEvent::Cancelled { subject });
        true
    }

    /// Current record for `subject`. Subjects never seen report idle.
    pub async fn status(&self, subject: Address) -> VerificationRequest {
        let slot = {
            let map = self.subjects.lock().await;
            map.get(&subject).cloned()
        };
        match slot {
            Some(slot) => slot.inner.lock().await.request.clone(),
            None => VerificationRequest::idle(subject),
        }
    }

    /// Snapshot of every tracked record.
    pub async fn snapshot(&self) -> Vec<VerificationRequest> {
        let slots: Vec<Arc<Subject>> = {
            let map = self.subjects.lock().await;
            map.values().cloned().collect()
        };

        let mut records = Vec::with_capacity(slots.len());
        for slot in slots {
            records.push(slot.inner.lock().await.request.clone());
        }
        records
    }

    async fn subject_slot(&self, subject: Address) -> Arc<Subject> {
        let mut map = self.subjects.lock().await;
        Arc::clone(map.entry(subject).or_insert_with(|| {
            Arc::new(Subject {
                inner: Mutex::new(Slot::new(subject)),
            })
        }))
    }

    /// Apply a positive `isVerified` read: the chain is the source of truth,
    /// so the record becomes completed-verified regardless of what any
    /// in-flight lifecycle believes.
    async fn complete_from_chain(
        &self,
        subject: Address,
        attestation: Option<Attestation>,
    ) -> VerificationRequest {
        let slot = self.subject_slot(subject).await;
        let mut state = slot.inner.lock().await;

        let already_verified = state.request.status.is_verified();
        if !already_verified {
            state.supersede();
            state.request.status = VerificationStatus::Completed { verified: true };
        }
        if let Some(data) = attestation {
            state.request.attestation = Some(data);
        }
        let record = state.request.clone();
        drop(state);

        if !already_verified {
            tracing::info!(%subject, "verified flag found on chain");
            self.emit(VerificationEvent::Completed {
                subject,
                verified: true,
            });
        }
        record
    }

    /// Record a failed flag read on the tracked record, if there is one.
    /// Untracked subjects get the error on the returned snapshot only.
    async fn record_read_error(&self, subject: Address, err: &ChainError) -> VerificationRequest {
        let slot = {
            let map = self.subjects.lock().await;
            map.get(&subject).cloned()
        };
        match slot {
            Some(slot) => {
                let mut state = slot.inner.lock().await;
                state.request.last_error = Some(err.to_string());
                state.request.clone()
            }
            None => {
                let mut record = VerificationRequest::idle(subject);
                record.last_error = Some(err.to_string());
                record
            }
        }
    }

    fn emit(&self, event: VerificationEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }
}

/// Owns one lifecycle from submission to settlement.
struct Driver {
    slot: Arc<Subject>,
    reader: Arc<dyn ChainReader>,
    writer: Arc<dyn ChainWriter>,
    events: broadcast::Sender<VerificationEvent>,
    config: CoordinatorConfig,
    subject: Address,
    generation: u64,
    cancel: CancellationToken,
}

impl Driver {
    async fn run(self, aux_data: Bytes) {
        let subject = self.subject;

        let outcome = tokio::select! {
            _ = self.cancel.cancelled() => return,
            result = self.writer.request_verification(subject, aux_data) => result,
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::error!(%subject, "verification transaction failed: {err}");
                let reason = err.to_string();
                let applied = self
                    .transition(|request| {
                        request.status = VerificationStatus::Failed {
                            reason: reason.clone(),
                        };
                        request.last_error = Some(reason.clone());
                    })
                    .await;
                if applied {
                    self.emit(VerificationEvent::Failed { subject, reason });
                }
                return;
            }
        };

        let Some(request_id) = outcome.request_id_from(self.config.verifier) else {
            tracing::warn!(
                %subject,
                tx = %outcome.tx_hash,
                "confirmed transaction carried no verification event"
            );
            let reason = "no verification event".to_string();
            let applied = self
                .transition(|request| {
                    request.status = VerificationStatus::Failed {
                        reason: reason.clone(),
                    };
                })
                .await;
            if applied {
                self.emit(VerificationEvent::Failed { subject, reason });
            }
            return;
        };

        let entered = self
            .transition(|request| {
                request.request_id = Some(request_id);
                request.status = VerificationStatus::AwaitingCompletion;
            })
            .await;
        if !entered {
            return;
        }
        tracing::info!(%subject, %request_id, tx = %outcome.tx_hash, "verification requested; polling");
        self.emit(VerificationEvent::RequestConfirmed {
            subject,
            request_id,
        });

        for attempt in 1..=self.config.max_attempts {
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            let status = tokio::select! {
                _ = self.cancel.cancelled() => return,
                result = self.reader.verification_status(request_id) => result,
            };

            match status {
                Ok(status) if status.completed => {
                    let applied = self
                        .transition(|request| {
                            request.status = VerificationStatus::Completed {
                                verified: status.verified,
                            };
                        })
                        .await;
                    if applied {
                        tracing::info!(%subject, verified = status.verified, "verification completed");
                        self.emit(VerificationEvent::Completed {
                            subject,
                            verified: status.verified,
                        });
                    }
                    return;
                }
                Ok(_) => {
                    let applied = self
                        .transition(|request| {
                            request.attempts_polled += 1;
                        })
                        .await;
                    if !applied {
                        return;
                    }
                    tracing::debug!(%subject, attempt, "verification still pending");
                }
                Err(err) => {
                    // Transient; the loop keeps going and the ceiling still
                    // bounds the total wait.
                    tracing::warn!(%subject, attempt, "status poll failed: {err}");
                    let applied = self
                        .transition(|request| {
                            request.last_error = Some(err.to_string());
                        })
                        .await;
                    if !applied {
                        return;
                    }
                }
            }
        }

        // Ceiling reached. Re-check under the lock: a completion that
        // already settled the record wins over the timeout.
        let timed_out = self
            .transition_if(
                |request| request.status == VerificationStatus::AwaitingCompletion,
                |request| {
                    request.status = VerificationStatus::TimedOut;
                },
            )
            .await;
        if timed_out {
            tracing::warn!(
                %subject,
                attempts = self.config.max_attempts,
                "verification timed out"
            );
            self.emit(VerificationEvent::TimedOut { subject });
        }
    }

    /// Apply a record change if this driver still owns the lifecycle.
    async fn transition<F>(&self, apply: F) -> bool
    where
        F: FnOnce(&mut VerificationRequest),
    {
        self.transition_if(|_| true, apply).await
    }

    async fn transition_if<C, F>(&self, check: C, apply: F) -> bool
    where
        C: FnOnce(&VerificationRequest) -> bool,
        F: FnOnce(&mut VerificationRequest),
    {
        let mut state = self.slot.inner.lock().await;
        if state.generation != self.generation {
            return false;
        }
        if !check(&state.request) {
            return false;
        }
        apply(&mut state.request);
        true
    }

    fn emit(&self, event: VerificationEvent) {
        let _ = self.events.send(event);
    }
}
