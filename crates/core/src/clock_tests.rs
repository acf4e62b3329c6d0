// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn fake_clock_advances_monotonic_and_wall_together() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    let w1 = clock.wall();
    clock.advance(Duration::from_secs(90));
    assert_eq!(clock.now().duration_since(t1), Duration::from_secs(90));
    assert_eq!((clock.wall() - w1).num_seconds(), 90);
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::new();
    let clock2 = clock1.clone();
    let t1 = clock1.now();
    clock2.advance(Duration::from_secs(30));
    assert!(clock1.now().duration_since(t1) >= Duration::from_secs(30));
}

#[test]
fn fake_clock_set_wall() {
    let clock = FakeClock::new();
    let target = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
    clock.set_wall(target);
    assert_eq!(clock.wall(), target);
}
