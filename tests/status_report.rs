#![cfg(feature = "status-report")]

use tick_timer::prelude::*;

use pretty_assertions::assert_eq;

#[test]
fn test_public_events_follow_timer_lifecycle() -> AnyResult<()> {
    let mut scheduler: Scheduler<()> = SchedulerBuilder::default()
        .enable_status_report()
        .build();
    let reporter = scheduler
        .take_status_reporter()
        .ok_or_else(|| anyhow!("status reporter missing"))?;
    assert!(scheduler.take_status_reporter().is_none());

    let periodic = scheduler.add_timer(|_, _, _| {}, ());
    let once = scheduler.add_timer(|_, _, _| {}, ());
    scheduler.start(periodic, 2, true)?;
    scheduler.start(once, 3, false)?;

    scheduler.advance_ticks(3);
    scheduler.stop(periodic)?;

    assert_eq!(
        reporter.drain_public_events(),
        vec![
            PublicEvent::TimerStarted(periodic, 2),
            PublicEvent::TimerStarted(once, 3),
            PublicEvent::TimerFired(periodic, 2),
            PublicEvent::TimerRearmed(periodic, 4),
            PublicEvent::TimerFired(once, 3),
            PublicEvent::TimerStopped(periodic),
        ]
    );
    assert!(reporter.next_public_event().is_err());
    Ok(())
}

#[test]
fn test_events_start_when_reporter_is_taken() -> AnyResult<()> {
    let mut scheduler: Scheduler<()> = SchedulerBuilder::default()
        .enable_status_report()
        .build();

    let id = scheduler.add_timer(|_, _, _| {}, ());
    scheduler.start(id, 1, true)?;
    scheduler.advance_ticks(100);

    let reporter = scheduler
        .take_status_reporter()
        .ok_or_else(|| anyhow!("status reporter missing"))?;
    assert!(reporter.next_public_event().is_err());

    scheduler.stop(id)?;
    assert_eq!(
        reporter.drain_public_events(),
        vec![PublicEvent::TimerStopped(id)]
    );
    Ok(())
}

#[test]
fn test_no_reporter_unless_enabled() {
    let mut scheduler: Scheduler<()> = Scheduler::new();
    assert!(scheduler.take_status_reporter().is_none());
}

#[test]
fn test_wait_for_next_event() -> AnyResult<()> {
    let mut scheduler: Scheduler<()> = SchedulerBuilder::default()
        .enable_status_report()
        .build();
    let reporter = scheduler
        .take_status_reporter()
        .ok_or_else(|| anyhow!("status reporter missing"))?;

    let id = scheduler.add_timer(|_, _, _| {}, ());
    scheduler.start(id, 1, false)?;
    scheduler.advance_tick();

    smol::block_on(async {
        assert_eq!(
            reporter.next_public_event_with_async_wait().await?,
            PublicEvent::TimerStarted(id, 1)
        );
        assert_eq!(
            reporter.next_public_event_with_async_wait().await?,
            PublicEvent::TimerFired(id, 1)
        );
        Ok::<(), anyhow::Error>(())
    })
}
