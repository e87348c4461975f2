use tick_timer::prelude::*;

use std::time::Duration;
use tokio::time::sleep;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> AnyResult<()> {
    // a builder for `FmtSubscriber`.
    FmtSubscriber::builder()
        // all spans/events with a level higher than DEBUG will be written to stdout.
        .with_max_level(Level::DEBUG)
        // completes the builder.
        .init();

    // One tick every 10ms.
    let ticker = Ticker::new(Duration::from_millis(10)).runtime_kind(RuntimeKind::Tokio);
    let handle = ticker.handle();

    let mut scheduler: Scheduler<&'static str> = Scheduler::new();
    let heartbeat = scheduler.add_timer(
        |scheduler: &mut Scheduler<&'static str>, _, name: &mut &'static str| {
            println!("{} at tick {}", name, scheduler.current_tick());
        },
        "heartbeat",
    );
    scheduler.start(heartbeat, 25, true)?;

    // Stop the ticker from outside after roughly a second.
    tokio::spawn(async move {
        sleep(Duration::from_secs(1)).await;
        handle.stop();
    });

    let driven = ticker.run(&mut scheduler, None).await;
    println!("ticker drove {} ticks", driven);

    Ok(())
}
