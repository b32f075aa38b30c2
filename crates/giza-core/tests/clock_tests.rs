// Host-side tests for the session clock.

use giza_core::clock::SessionClock;
use std::time::Duration;

#[test]
fn clock_is_monotonic() {
    let clock = SessionClock::start();
    let a = clock.seconds();
    std::thread::sleep(Duration::from_millis(5));
    let b = clock.seconds();
    assert!(a >= 0.0);
    assert!(b > a);
}

#[test]
fn offset_shifts_session_time() {
    let clock = SessionClock::starting_at(Duration::from_secs(30));
    assert!(clock.seconds() >= 30.0);
    assert!(clock.elapsed() >= Duration::from_secs(30));
}
