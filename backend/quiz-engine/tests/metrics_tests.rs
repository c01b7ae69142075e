use quiz_engine::metrics::{SESSIONS_ACTIVE, SESSIONS_TOTAL};
use serial_test::serial;
use tokio_test::assert_ok;

mod common;

use common::{carryover, start_session, CORRECT};

fn abandoned_total() -> u64 {
    SESSIONS_TOTAL.with_label_values(&["abandoned"]).get()
}

#[test]
#[serial]
fn test_dropping_live_sessions_releases_active_gauge() {
    let active_before = SESSIONS_ACTIVE.get();
    let abandoned_before = abandoned_total();

    let sessions: Vec<_> = (0..5)
        .map(|_| start_session(3, carryover(3, 0, false), &[]))
        .collect();
    assert_eq!(SESSIONS_ACTIVE.get(), active_before + 5);

    drop(sessions);

    assert_eq!(SESSIONS_ACTIVE.get(), active_before);
    assert_eq!(abandoned_total(), abandoned_before + 5);
}

#[test]
#[serial]
fn test_dropping_finished_session_is_not_counted_twice() {
    let active_before = SESSIONS_ACTIVE.get();
    let abandoned_before = abandoned_total();

    let mut session = start_session(1, carryover(3, 0, false), &[]);
    assert_ok!(session.answer(CORRECT));
    assert!(session.is_terminal());
    assert_eq!(SESSIONS_ACTIVE.get(), active_before);

    drop(session);

    assert_eq!(SESSIONS_ACTIVE.get(), active_before);
    assert_eq!(abandoned_total(), abandoned_before);
}
