//! Timing behavior of the verification poll loop, run against scripted
//! chain doubles on tokio's paused clock: interval spacing, the attempt
//! ceiling, cancellation, and completion racing the timeout.

use accesschain_nullables::{NullChainReader, NullChainWriter};
use accesschain_types::{ChainError, ChainReader, ChainWriter, RequestId, RequestStatus};
use accesschain_verification::{
    CoordinatorConfig, VerificationCoordinator, VerificationEvent, VerificationStatus,
};
use alloy_primitives::{Address, B256};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const SUBJECT: Address = Address::repeat_byte(0x51);
const VERIFIER: Address = Address::repeat_byte(0xc0);

fn request_id(byte: u8) -> RequestId {
    RequestId::new(B256::repeat_byte(byte))
}

fn coordinator_with(
    reader: &Arc<NullChainReader>,
    writer: &Arc<NullChainWriter>,
    config: CoordinatorConfig,
) -> VerificationCoordinator {
    let reader: Arc<dyn ChainReader> = reader.clone();
    let writer: Arc<dyn ChainWriter> = writer.clone();
    VerificationCoordinator::new(reader, writer, config)
}

fn default_config() -> CoordinatorConfig {
    CoordinatorConfig::new(11155111, VERIFIER)
}

async fn scripted_start(
    reader: &Arc<NullChainReader>,
    writer: &Arc<NullChainWriter>,
    id: RequestId,
    steps: Vec<Result<RequestStatus, ChainError>>,
) {
    reader.script_status(id, steps).await;
    writer
        .push_outcome(Ok(NullChainWriter::outcome_with_request(VERIFIER, id)))
        .await;
}

async fn next_event(events: &mut broadcast::Receiver<VerificationEvent>) -> VerificationEvent {
    events.recv().await.expect("event channel closed")
}

async fn wait_for_terminal(
    events: &mut broadcast::Receiver<VerificationEvent>,
) -> VerificationEvent {
    loop {
        let event = next_event(events).await;
        if event.is_terminal() {
            return event;
        }
    }
}

fn drain(events: &mut broadcast::Receiver<VerificationEvent>) -> Vec<VerificationEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

// ---------------------------------------------------------------------------
// 1. Attempt ceiling and timeout window
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn never_completing_request_times_out_inside_the_budget() {
    let reader = Arc::new(NullChainReader::new());
    let writer = Arc::new(NullChainWriter::new());
    let id = request_id(0xaa);
    // No completion scripted: every poll answers "not yet".
    scripted_start(&reader, &writer, id, Vec::new()).await;

    let coordinator = coordinator_with(&reader, &writer, default_config());
    let mut events = coordinator.events();

    let started = tokio::time::Instant::now();
    coordinator.start_verification(SUBJECT).await.unwrap();

    let terminal = wait_for_terminal(&mut events).await;
    let elapsed = started.elapsed();

    assert!(matches!(terminal, VerificationEvent::TimedOut { .. }));
    assert!(
        elapsed >= Duration::from_millis(55_000),
        "timed out too early: {elapsed:?}"
    );
    assert!(
        elapsed <= Duration::from_millis(60_000),
        "timed out too late: {elapsed:?}"
    );

    let record = coordinator.status(SUBJECT).await;
    assert_eq!(record.status, VerificationStatus::TimedOut);
    assert_eq!(record.attempts_polled, 12);
    assert_eq!(reader.status_calls(id).await, 12, "one poll per interval");
}

#[tokio::test(start_paused = true)]
async fn custom_poll_budget_is_honored() {
    let reader = Arc::new(NullChainReader::new());
    let writer = Arc::new(NullChainWriter::new());
    let id = request_id(0xab);
    scripted_start(&reader, &writer, id, Vec::new()).await;

    let mut config = default_config();
    config.poll_interval = Duration::from_millis(100);
    config.max_attempts = 3;
    let coordinator = coordinator_with(&reader, &writer, config);
    let mut events = coordinator.events();

    let started = tokio::time::Instant::now();
    coordinator.start_verification(SUBJECT).await.unwrap();
    let terminal = wait_for_terminal(&mut events).await;

    assert!(matches!(terminal, VerificationEvent::TimedOut { .. }));
    assert!(started.elapsed() <= Duration::from_millis(300));
    assert_eq!(reader.status_calls(id).await, 3);
}

// ---------------------------------------------------------------------------
// 2. Interval spacing and attempt counting
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn poll_attempts_track_elapsed_intervals() {
    let reader = Arc::new(NullChainReader::new());
    let writer = Arc::new(NullChainWriter::new());
    let id = request_id(0xac);
    scripted_start(&reader, &writer, id, Vec::new()).await;

    let coordinator = coordinator_with(&reader, &writer, default_config());
    coordinator.start_verification(SUBJECT).await.unwrap();

    // Two full intervals plus a margin: exactly two polls have happened.
    tokio::time::sleep(Duration::from_millis(10_100)).await;

    let record = coordinator.status(SUBJECT).await;
    assert_eq!(record.status, VerificationStatus::AwaitingCompletion);
    assert_eq!(record.attempts_polled, 2);
    assert_eq!(reader.status_calls(id).await, 2);
}

#[tokio::test(start_paused = true)]
async fn completion_on_third_attempt_counts_two_pending_polls() {
    let reader = Arc::new(NullChainReader::new());
    let writer = Arc::new(NullChainWriter::new());
    let id = request_id(0xad);
    scripted_start(
        &reader,
        &writer,
        id,
        vec![
            Ok(RequestStatus::PENDING),
            Ok(RequestStatus::PENDING),
            Ok(RequestStatus::completed(true)),
        ],
    )
    .await;

    let coordinator = coordinator_with(&reader, &writer, default_config());
    let mut events = coordinator.events();

    let started = tokio::time::Instant::now();
    coordinator.start_verification(SUBJECT).await.unwrap();
    let terminal = wait_for_terminal(&mut events).await;

    assert!(matches!(
        terminal,
        VerificationEvent::Completed { verified: true, .. }
    ));
    assert!(started.elapsed() >= Duration::from_secs(15));
    assert!(started.elapsed() < Duration::from_secs(20));

    let record = coordinator.status(SUBJECT).await;
    assert_eq!(
        record.status,
        VerificationStatus::Completed { verified: true }
    );
    assert_eq!(
        record.attempts_polled, 2,
        "only not-yet-completed polls are counted"
    );
    assert_eq!(record.request_id, Some(id));

    // Settling stops the loop: no further polls fire.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(reader.status_calls(id).await, 3);
}

#[tokio::test(start_paused = true)]
async fn rejection_settles_the_request_as_not_verified() {
    let reader = Arc::new(NullChainReader::new());
    let writer = Arc::new(NullChainWriter::new());
    let id = request_id(0xae);
    // A transient failure on the first poll, then a firm rejection.
    scripted_start(
        &reader,
        &writer,
        id,
        vec![
            Err(ChainError::Rpc("gateway timeout".into())),
            Ok(RequestStatus::completed(false)),
        ],
    )
    .await;

    let coordinator = coordinator_with(&reader, &writer, default_config());
    let mut events = coordinator.events();
    coordinator.start_verification(SUBJECT).await.unwrap();

    let terminal = wait_for_terminal(&mut events).await;
    assert!(matches!(
        terminal,
        VerificationEvent::Completed {
            verified: false,
            ..
        }
    ));

    let record = coordinator.status(SUBJECT).await;
    assert_eq!(
        record.status,
        VerificationStatus::Completed { verified: false }
    );
    assert!(
        record.last_error.is_some(),
        "the transient failure stays on the record as a diagnostic"
    );
}

// ---------------------------------------------------------------------------
// 3. Transient poll failures
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn poll_errors_record_last_error_and_keep_polling() {
    let reader = Arc::new(NullChainReader::new());
    let writer = Arc::new(NullChainWriter::new());
    let id = request_id(0xaf);
    scripted_start(
        &reader,
        &writer,
        id,
        vec![
            Err(ChainError::Rpc("gateway timeout".into())),
            Ok(RequestStatus::PENDING),
            Ok(RequestStatus::completed(true)),
        ],
    )
    .await;

    let coordinator = coordinator_with(&reader, &writer, default_config());
    let mut events = coordinator.events();
    coordinator.start_verification(SUBJECT).await.unwrap();

    // After the failed first attempt the request is still in flight.
    tokio::time::sleep(Duration::from_millis(5_100)).await;
    let record = coordinator.status(SUBJECT).await;
    assert_eq!(record.status, VerificationStatus::AwaitingCompletion);
    assert_eq!(record.last_error, Some("rpc error: gateway timeout".to_string()));
    assert_eq!(record.attempts_polled, 0, "errored polls are not counted");

    let terminal = wait_for_terminal(&mut events).await;
    assert!(matches!(
        terminal,
        VerificationEvent::Completed { verified: true, .. }
    ));

    // last_error survives as a diagnostic even after success.
    let record = coordinator.status(SUBJECT).await;
    assert!(record.status.is_verified());
    assert_eq!(record.attempts_polled, 1);
    assert!(record.last_error.is_some());
}

#[tokio::test(start_paused = true)]
async fn errored_attempts_still_consume_the_ceiling() {
    let reader = Arc::new(NullChainReader::new());
    let writer = Arc::new(NullChainWriter::new());
    let id = request_id(0xb0);
    let steps = (0..12)
        .map(|_| Err(ChainError::Rpc("unreachable".into())))
        .collect();
    scripted_start(&reader, &writer, id, steps).await;

    let coordinator = coordinator_with(&reader, &writer, default_config());
    let mut events = coordinator.events();

    let started = tokio::time::Instant::now();
    coordinator.start_verification(SUBJECT).await.unwrap();
    let terminal = wait_for_terminal(&mut events).await;

    // A dead endpoint cannot extend the wait forever.
    assert!(matches!(terminal, VerificationEvent::TimedOut { .. }));
    assert!(started.elapsed() <= Duration::from_millis(60_000));

    let record = coordinator.status(SUBJECT).await;
    assert_eq!(record.status, VerificationStatus::TimedOut);
    assert_eq!(record.attempts_polled, 0);
    assert!(record.last_error.is_some());
}

// ---------------------------------------------------------------------------
// 4. Completion racing the timeout
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn direct_read_completion_is_not_overridden_by_the_timeout() {
    let reader = Arc::new(NullChainReader::new());
    let writer = Arc::new(NullChainWriter::new());
    let id = request_id(0xb1);
    scripted_start(&reader, &writer, id, Vec::new()).await;

    let coordinator = coordinator_with(&reader, &writer, default_config());
    let mut events = coordinator.events();
    coordinator.start_verification(SUBJECT).await.unwrap();

    // Let a couple of polls happen, then the durable flag flips on chain.
    tokio::time::sleep(Duration::from_millis(12_000)).await;
    reader.set_verified(SUBJECT, true).await;
    let record = coordinator.check_status(SUBJECT).await;
    assert!(record.status.is_verified());

    let polls_at_completion = reader.status_calls(id).await;
    drain(&mut events);

    // Run far past the poll budget: the settled record must not move and
    // the superseded task must not poll again.
    tokio::time::sleep(Duration::from_secs(120)).await;

    let record = coordinator.status(SUBJECT).await;
    assert_eq!(
        record.status,
        VerificationStatus::Completed { verified: true }
    );
    assert_eq!(reader.status_calls(id).await, polls_at_completion);
    assert!(
        !drain(&mut events)
            .iter()
            .any(|event| matches!(event, VerificationEvent::TimedOut { .. })),
        "timeout fired after the request had settled"
    );
}

// ---------------------------------------------------------------------------
// 5. Cancellation and restart
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn cancelled_task_stops_polling_and_restart_gets_a_fresh_lifecycle() {
    let reader = Arc::new(NullChainReader::new());
    let writer = Arc::new(NullChainWriter::new());
    let first = request_id(0xb2);
    let second = request_id(0xb3);
    scripted_start(&reader, &writer, first, Vec::new()).await;

    let coordinator = coordinator_with(&reader, &writer, default_config());
    let mut events = coordinator.events();
    coordinator.start_verification(SUBJECT).await.unwrap();

    loop {
        if matches!(
            next_event(&mut events).await,
            VerificationEvent::RequestConfirmed { .. }
        ) {
            break;
        }
    }

    assert!(coordinator.cancel_verification(SUBJECT).await);
    assert_eq!(
        coordinator.status(SUBJECT).await.status,
        VerificationStatus::Idle
    );

    // The second lifecycle completes on its first poll.
    scripted_start(
        &reader,
        &writer,
        second,
        vec![Ok(RequestStatus::completed(true))],
    )
    .await;
    coordinator
        .start_verification(SUBJECT)
        .await
        .expect("restart after cancel must not conflict");

    let terminal = wait_for_terminal(&mut events).await;
    assert!(matches!(
        terminal,
        VerificationEvent::Completed { verified: true, .. }
    ));

    let record = coordinator.status(SUBJECT).await;
    assert_eq!(record.request_id, Some(second));
    assert_eq!(record.attempts_polled, 0);

    // The first lifecycle's task is gone: its request is never polled, even
    // as time keeps moving.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(reader.status_calls(first).await, 0);
}

// ---------------------------------------------------------------------------
// 6. Event stream ordering
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn events_follow_the_lifecycle_order() {
    let reader = Arc::new(NullChainReader::new());
    let writer = Arc::new(NullChainWriter::new());
    let id = request_id(0xb4);
    scripted_start(
        &reader,
        &writer,
        id,
        vec![Ok(RequestStatus::PENDING), Ok(RequestStatus::completed(true))],
    )
    .await;

    let coordinator = coordinator_with(&reader, &writer, default_config());
    let mut events = coordinator.events();
    coordinator.start_verification(SUBJECT).await.unwrap();

    assert!(matches!(
        next_event(&mut events).await,
        VerificationEvent::Started { .. }
    ));
    match next_event(&mut events).await {
        VerificationEvent::RequestConfirmed {
            request_id: confirmed,
            ..
        } => assert_eq!(confirmed, id),
        other => panic!("expected RequestConfirmed, got {other:?}"),
    }
    assert!(matches!(
        next_event(&mut events).await,
        VerificationEvent::Completed { verified: true, .. }
    ));
}
