use tempo::prelude::*;

fn registry() -> (ManualClock, TempoRegistry<ManualClock>) {
    let clock = ManualClock::new();
    let tempo = TempoRegistry::new(clock.clone());
    (clock, tempo)
}

#[test]
fn first_periodic_tick_never_fires() {
    let (_clock, mut tempo) = registry();
    for (n, period) in [0u32, 1, 1_000, u32::MAX].into_iter().enumerate() {
        let id = TimerId::from_raw(n as u32 + 1);
        assert!(!tempo.periodic(id).tick(period), "period {period}");
    }
}

#[test]
fn periodic_advances_anchor_by_exactly_one_period() {
    let (clock, mut tempo) = registry();
    let id = TimerId::named("HEARTBEAT");
    clock.set(50);
    tempo.periodic(id).tick(100);

    // Poll late; the schedule stays on 150, 250, 350...
    clock.set(180);
    assert!(tempo.periodic(id).tick(100));
    assert_eq!(tempo.slot(id).map(|s| s.anchor), Some(150));

    clock.set(249);
    assert!(!tempo.periodic(id).tick(100));
    clock.set(250);
    assert!(tempo.periodic(id).tick(100));
    assert_eq!(tempo.slot(id).map(|s| s.anchor), Some(250));
}

#[test]
fn periodic_reports_one_firing_per_call() {
    let (clock, mut tempo) = registry();
    let id = TimerId::named("slow-poll");
    tempo.periodic(id).tick(100);

    clock.advance(350);
    let fired: Vec<bool> = (0..4).map(|_| tempo.periodic(id).tick(100)).collect();
    assert_eq!(fired, vec![true, true, true, false]);
    assert_eq!(tempo.slot(id).map(|s| s.anchor), Some(300));
}

#[test]
fn periodic_survives_clock_wrap() {
    let clock = ManualClock::starting_at(u32::MAX - 99);
    let mut tempo = TempoRegistry::new(clock.clone());
    let id = TimerId::named("wrap");
    tempo.periodic(id).tick(250);

    clock.advance(249);
    assert!(!tempo.periodic(id).tick(250));
    clock.advance(1);
    assert!(tempo.periodic(id).tick(250));
}

#[test]
fn periodic_text_form_parses_or_latches() {
    let (clock, mut tempo) = registry();
    let good = TimerId::named("good");
    let bad = TimerId::named("bad");

    assert!(!tempo.periodic(bad).tick_hms("10s"));
    assert_eq!(tempo.last_error(), Some(TempoError::InvalidFormat));
    assert!(tempo.slot(bad).is_none());

    assert!(!tempo.periodic(good).tick_hms("00:00:02"));
    clock.advance(2_000);
    assert!(tempo.periodic(good).tick_hms("00:00:02"));
}

#[test]
fn one_shot_expiry_reports_done() {
    let (clock, mut tempo) = registry();
    let id = TimerId::named("WATCHDOG");
    tempo.one_shot(id).start(5_000);
    clock.advance(6_000);

    let shot = tempo.one_shot(id);
    assert!(shot.is_done());
    assert!(!shot.is_running());
    assert_eq!(shot.remaining(), 0);
    assert_eq!(shot.elapsed(), 6_000);
}

#[test]
fn one_shot_remaining_is_exact_before_expiry() {
    let (clock, mut tempo) = registry();
    let id = TimerId::named("delay");
    tempo.one_shot(id).start(1_000);
    for step in [0, 1, 250, 500, 248] {
        clock.advance(step);
        let shot = tempo.one_shot(id);
        assert!(shot.is_running());
        assert_eq!(shot.remaining(), 1_000 - shot.elapsed());
    }
}

#[test]
fn one_shot_start_always_restarts() {
    let (clock, mut tempo) = registry();
    let id = TimerId::named("retrigger");
    tempo.one_shot(id).start(1_000);
    clock.advance(800);
    tempo.one_shot(id).start(300);
    assert_eq!(tempo.one_shot(id).remaining(), 300);
    clock.advance(300);
    assert!(tempo.one_shot(id).is_done());
}

#[test]
fn restart_keeps_duration_and_only_touches_active_timers() {
    let (clock, mut tempo) = registry();
    let id = TimerId::named("debounce");

    tempo.one_shot(id).restart();
    assert!(tempo.is_empty());

    tempo.one_shot(id).start(500);
    clock.advance(400);
    tempo.one_shot(id).restart();
    assert_eq!(tempo.one_shot(id).remaining(), 500);

    tempo.one_shot(id).cancel();
    clock.advance(100);
    tempo.one_shot(id).restart();
    assert!(!tempo.one_shot(id).is_running());
}

#[test]
fn cancel_deactivates_but_keeps_the_slot() {
    let (clock, mut tempo) = registry();
    let id = TimerId::named("timeout");
    tempo.one_shot(id).start(100);
    clock.advance(200);
    tempo.one_shot(id).cancel();

    let shot = tempo.one_shot(id);
    assert!(!shot.is_done() && !shot.is_running());
    assert_eq!((shot.elapsed(), shot.remaining()), (0, 0));
    assert_eq!(tempo.len(), 1);
    assert_eq!(tempo.slot(id).map(|s| s.active), Some(false));
}

#[test]
fn unknown_one_shot_is_idle_and_unallocated() {
    let (_clock, mut tempo) = registry();
    let id = TimerId::named("never-started");
    let mut shot = tempo.one_shot(id);
    shot.cancel();
    assert!(!shot.is_running() && !shot.is_done());
    assert_eq!((shot.elapsed(), shot.remaining()), (0, 0));
    assert!(tempo.is_empty());
    assert_eq!(tempo.last_error(), None);
}

#[test]
fn one_shot_text_form_parses_or_latches() {
    let (_clock, mut tempo) = registry();
    let id = TimerId::named("test");
    tempo.one_shot(id).start_hms("01:02:03.5");
    assert_eq!(tempo.last_error(), Some(TempoError::InvalidFormat));
    assert!(!tempo.one_shot(id).is_running());

    tempo.one_shot(id).start_hms("00:02:10");
    assert_eq!(tempo.one_shot(id).remaining(), 130_000);
    // Success does not clear the latch.
    assert_eq!(tempo.last_error(), Some(TempoError::InvalidFormat));
}

#[test]
fn table_overflow_latches_and_spares_existing_timers() {
    let clock = ManualClock::new();
    let mut tempo = TempoRegistry::new(clock.clone());
    let capacity = tempo.capacity() as u32;
    assert_eq!(capacity, 32);

    for raw in 1..=capacity {
        tempo.one_shot(TimerId::from_raw(raw)).start(1_000);
    }
    assert!(tempo.is_full());
    assert_eq!(tempo.last_error(), None);

    let overflow = TimerId::from_raw(capacity + 1);
    tempo.one_shot(overflow).start(1_000);
    assert_eq!(tempo.last_error(), Some(TempoError::SlotTableFull { id: overflow }));
    assert!(!tempo.one_shot(overflow).is_running());
    assert!(!tempo.periodic(overflow).tick(10));

    clock.advance(1_000);
    for raw in 1..=capacity {
        assert!(tempo.one_shot(TimerId::from_raw(raw)).is_done());
    }
}

#[test]
fn reusing_an_id_across_kinds_latches_mismatch() {
    let (clock, mut tempo) = registry();
    let id = TimerId::named("confused");
    tempo.periodic(id).tick(100);

    tempo.one_shot(id).start(5_000);
    assert_eq!(
        tempo.last_error(),
        Some(TempoError::IdKindMismatch {
            id,
            bound: TimerKind::Periodic,
            requested: TimerKind::OneShot,
        })
    );
    assert_eq!(tempo.one_shot(id).remaining(), 0);

    // The periodic schedule is untouched by the rejected call.
    clock.advance(100);
    assert!(tempo.periodic(id).tick(100));
}

#[test]
fn registries_are_independent() {
    let clock = ManualClock::new();
    let mut a = TempoRegistry::with_capacity(clock.clone(), 1);
    let mut b = TempoRegistry::with_capacity(clock.clone(), 1);
    let id = TimerId::named("shared-name");

    a.one_shot(id).start(100);
    assert!(b.is_empty());
    b.periodic(id).tick(100);
    assert_eq!(a.last_error(), None);
    assert_eq!(b.last_error(), None);
}

#[test]
fn rendering_reads_through_the_registry() {
    let (clock, mut tempo) = registry();
    let id = TimerId::named("test");
    tempo.one_shot(id).start_hms("00:02:10");
    clock.advance(5_250);

    assert_eq!(render_remaining(&tempo, id, Format::HmsMs).to_string(), "00:02:04.750");
    assert_eq!(render_elapsed(&tempo, id, Format::AutoShort).to_string(), "5 sec");
    assert_eq!(tempo.one_shot(id).remaining_text(Format::Ms).to_string(), "124750");
    assert_eq!(tempo.one_shot(id).elapsed_text(Format::Hms).to_string(), "00:00:05");
    assert_eq!(render_remaining(&tempo, TimerId::named("nope"), Format::Hms).to_string(), "00:00:00");
}

#[test]
fn registry_honours_configured_capacity() {
    let config = TempoConfig {
        capacity: 2,
        ..TempoConfig::default()
    };
    let mut tempo = TempoRegistry::from_config(ManualClock::new(), &config);
    for name in ["a", "b", "c"] {
        tempo.one_shot(TimerId::named(name)).start(10);
    }
    assert_eq!(tempo.len(), 2);
    assert_eq!(
        tempo.last_error(),
        Some(TempoError::SlotTableFull { id: TimerId::named("c") })
    );
}
