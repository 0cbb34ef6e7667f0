use super::*;

fn millis(delays: &[Duration]) -> Vec<u128> {
    delays.iter().map(Duration::as_millis).collect()
}

#[test]
fn doubles_up_to_the_cap() {
    let mut backoff = Backoff::new(INITIAL_BACKOFF, MAX_BACKOFF);
    let delays: Vec<_> = (0..6).map(|_| backoff.next_delay()).collect();
    assert_eq!(millis(&delays), vec![1000, 2000, 4000, 8000, 10_000, 10_000]);
}

#[test]
fn reset_returns_to_initial() {
    let mut backoff = Backoff::new(INITIAL_BACKOFF, MAX_BACKOFF);
    backoff.next_delay();
    backoff.next_delay();
    backoff.reset();
    assert_eq!(backoff.next_delay(), INITIAL_BACKOFF);
}

#[test]
fn jitter_stays_within_bound() {
    let mut backoff = Backoff::default();
    for _ in 0..20 {
        backoff.reset();
        let delay = backoff.next_delay();
        assert!(delay >= INITIAL_BACKOFF);
        assert!(delay <= INITIAL_BACKOFF + DEFAULT_JITTER);
    }
}

#[test]
fn capped_delay_still_jitters_within_bound() {
    let mut backoff = Backoff::default();
    for _ in 0..10 {
        backoff.next_delay();
    }
    let delay = backoff.next_delay();
    assert!(delay >= MAX_BACKOFF && delay <= MAX_BACKOFF + DEFAULT_JITTER);
}
