//! Tests for the logical clock and the event scheduler

use ticket_desk_simulator_core_rs::{Scheduler, SchedulerError, SimClock, SimTime};

#[test]
fn test_scheduler_starts_at_zero() {
    let scheduler = Scheduler::new();
    assert_eq!(scheduler.now(), SimTime::ZERO);
    assert!(scheduler.is_empty());
}

#[test]
fn test_pop_order_is_due_then_seq() {
    let mut scheduler = Scheduler::new();

    scheduler.schedule(300, 1).unwrap();
    scheduler.schedule(100, 2).unwrap();
    scheduler.schedule(300, 3).unwrap();
    scheduler.schedule(100, 4).unwrap();

    let mut order = Vec::new();
    while let Some(wakeup) = scheduler.pop_next().unwrap() {
        order.push((wakeup.due.as_millis(), wakeup.customer));
    }

    assert_eq!(order, vec![(100, 2), (100, 4), (300, 1), (300, 3)]);
}

#[test]
fn test_sequence_numbers_increase() {
    let mut scheduler = Scheduler::new();
    let a = scheduler.schedule(0, 1).unwrap();
    let b = scheduler.schedule(0, 2).unwrap();
    let c = scheduler.schedule(10, 3).unwrap();

    assert!(a < b && b < c);
}

#[test]
fn test_zero_delay_runs_at_current_instant() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule(250, 1).unwrap();
    scheduler.pop_next().unwrap();

    scheduler.schedule(0, 2).unwrap();
    let wakeup = scheduler.pop_next().unwrap().unwrap();

    assert_eq!(wakeup.due, SimTime::from_millis(250));
    assert_eq!(scheduler.now(), SimTime::from_millis(250));
}

#[test]
fn test_zero_delay_queues_behind_same_instant_peers() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule(0, 1).unwrap();
    scheduler.schedule(0, 2).unwrap();

    let first = scheduler.pop_next().unwrap().unwrap();
    assert_eq!(first.customer, 1);

    // Scheduled while customer 2 is still pending at the same time
    scheduler.schedule(0, 3).unwrap();

    let rest: Vec<_> = std::iter::from_fn(|| scheduler.pop_next().unwrap())
        .map(|w| w.customer)
        .collect();
    assert_eq!(rest, vec![2, 3]);
}

#[test]
fn test_negative_delay_rejected() {
    let mut scheduler = Scheduler::new();
    assert_eq!(
        scheduler.schedule(-1, 1),
        Err(SchedulerError::InvalidDelay { delay_ms: -1 })
    );
    assert!(scheduler.is_empty());
}

#[test]
fn test_schedule_at_past_rejected() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule(1_000, 1).unwrap();
    scheduler.pop_next().unwrap();

    let err = scheduler.schedule_at(SimTime::from_millis(999), 2).unwrap_err();
    assert_eq!(
        err,
        SchedulerError::InPast {
            requested: SimTime::from_millis(999),
            now: SimTime::from_millis(1_000),
        }
    );
}

#[test]
fn test_empty_scheduler_leaves_clock_alone() {
    let mut scheduler = Scheduler::new();
    scheduler.schedule(40, 1).unwrap();
    scheduler.pop_next().unwrap();

    assert_eq!(scheduler.pop_next().unwrap(), None);
    assert_eq!(scheduler.now(), SimTime::from_millis(40));
}

#[test]
fn test_clock_is_monotonic() {
    let mut clock = SimClock::new();
    clock.advance_to(SimTime::from_millis(7)).unwrap();
    assert!(clock.advance_to(SimTime::from_millis(3)).is_err());
    assert_eq!(clock.now(), SimTime::from_millis(7));
}

#[test]
fn test_display_in_seconds() {
    assert_eq!(SimTime::from_millis(4_500).to_string(), "4.500s");
}
