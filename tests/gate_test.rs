use std::{sync::Arc, time::Duration};

use tokio::time::Instant;
use vinylcli::gate::FetchGate;

#[tokio::test(start_paused = true)]
async fn test_first_permit_is_immediate() {
    let gate = FetchGate::new(Duration::from_secs(1));
    let start = Instant::now();

    let permit = gate.acquire().await;

    assert_eq!(permit.granted_at(), start);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_permits_are_spaced() {
    let interval = Duration::from_millis(1100);
    let gate = Arc::new(FetchGate::new(interval));
    let start = Instant::now();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move { gate.acquire().await.granted_at() })
        })
        .collect();

    let mut granted = Vec::new();
    for handle in handles {
        granted.push(handle.await.unwrap());
    }
    granted.sort();

    assert_eq!(granted[0], start);
    for pair in granted.windows(2) {
        assert!(pair[1] - pair[0] >= interval);
    }
    assert!(granted[3] - start >= interval * 3);
}

#[tokio::test(start_paused = true)]
async fn test_idle_gate_does_not_delay() {
    let interval = Duration::from_secs(1);
    let gate = FetchGate::new(interval);

    gate.acquire().await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    let before = Instant::now();
    let permit = gate.acquire().await;
    assert_eq!(permit.granted_at(), before);
    assert_eq!(gate.min_interval(), interval);
}

#[tokio::test(start_paused = true)]
async fn test_sequential_permits_wait_for_remaining_interval() {
    let interval = Duration::from_secs(2);
    let gate = FetchGate::new(interval);

    let first = gate.acquire().await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    let second = gate.acquire().await;

    assert_eq!(second.granted_at() - first.granted_at(), interval);
}
