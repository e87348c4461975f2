use tick_timer::prelude::*;

// cargo run --example=status_report --features=full
fn main() -> AnyResult<()> {
    env_logger::init();

    let mut scheduler: Scheduler<u32> = SchedulerBuilder::default()
        .enable_status_report()
        .build();
    let reporter = scheduler
        .take_status_reporter()
        .ok_or_else(|| anyhow!("status report is not enabled"))?;

    let pulse = scheduler.add_timer(
        |scheduler: &mut Scheduler<u32>, id, count: &mut u32| {
            *count += 1;
            if *count == 3 {
                let _ = scheduler.stop(id);
            }
        },
        0,
    );
    scheduler.start(pulse, 4, true)?;

    // Watch the events from another thread while the main thread ticks.
    let watcher = std::thread::spawn(move || {
        smol::block_on(async {
            while let Ok(event) = reporter.next_public_event_with_async_wait().await {
                println!("{:?}", event);
            }
        })
    });

    scheduler.advance_ticks(20);

    // Dropping the scheduler closes the channel and ends the watcher.
    drop(scheduler);
    watcher
        .join()
        .map_err(|_| anyhow!("status watcher panicked"))?;

    Ok(())
}
