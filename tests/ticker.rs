use tick_timer::prelude::*;

use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

fn counting_scheduler(delay: u64) -> (Scheduler<Rc<Cell<u64>>>, Rc<Cell<u64>>) {
    let hits = Rc::new(Cell::new(0));
    let mut scheduler = Scheduler::new();
    let id = scheduler.add_timer(
        |_: &mut Scheduler<Rc<Cell<u64>>>, _, hits: &mut Rc<Cell<u64>>| hits.set(hits.get() + 1),
        hits.clone(),
    );
    scheduler.start(id, delay, true).unwrap();
    (scheduler, hits)
}

#[tokio::test]
async fn test_tokio_ticker_drives_scheduler() {
    let (mut scheduler, hits) = counting_scheduler(2);
    let ticker = Ticker::new(Duration::from_millis(2)).runtime_kind(RuntimeKind::Tokio);

    let start = Instant::now();
    let driven = ticker.run(&mut scheduler, Some(10)).await;

    assert_eq!(driven, 10);
    assert_eq!(scheduler.current_tick(), 10);
    assert_eq!(hits.get(), 5);
    assert!(start.elapsed() >= Duration::from_millis(20));
}

#[test]
fn test_smol_ticker_run_blocking() -> AnyResult<()> {
    let (mut scheduler, hits) = counting_scheduler(1);
    let ticker = Ticker::new(Duration::from_millis(1)).runtime_kind(RuntimeKind::Smol);

    assert_eq!(ticker.run_blocking(&mut scheduler, Some(5))?, 5);
    assert_eq!(hits.get(), 5);
    Ok(())
}

#[test]
fn test_tokio_run_blocking_outside_runtime() -> AnyResult<()> {
    let (mut scheduler, hits) = counting_scheduler(3);
    let ticker = Ticker::new(Duration::from_millis(1));

    assert_eq!(ticker.run_blocking(&mut scheduler, Some(6))?, 6);
    assert_eq!(hits.get(), 2);
    Ok(())
}

#[test]
fn test_stopped_ticker_drives_nothing() -> AnyResult<()> {
    let (mut scheduler, hits) = counting_scheduler(1);
    let ticker = Ticker::new(Duration::from_millis(1)).runtime_kind(RuntimeKind::Smol);
    let handle = ticker.handle();

    assert!(handle.is_running());
    handle.stop();
    assert!(!handle.is_running());

    assert_eq!(ticker.run_blocking(&mut scheduler, Some(5))?, 0);
    assert_eq!(scheduler.current_tick(), 0);
    assert_eq!(hits.get(), 0);
    Ok(())
}

#[test]
fn test_callback_stops_ticker() -> AnyResult<()> {
    let ticker = Ticker::new(Duration::from_millis(1)).runtime_kind(RuntimeKind::Smol);
    let handle = ticker.handle();

    let mut scheduler: Scheduler<u32> = Scheduler::new();
    let id = scheduler.add_timer(
        move |_: &mut Scheduler<u32>, _, fired: &mut u32| {
            *fired += 1;
            if *fired == 3 {
                handle.stop();
            }
        },
        0,
    );
    scheduler.start(id, 2, true)?;

    // Unbounded run, ended from inside the third callback.
    assert_eq!(ticker.run_blocking(&mut scheduler, None)?, 6);
    assert_eq!(scheduler.data(id), Some(&3));
    Ok(())
}
