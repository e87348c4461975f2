use tick_timer::prelude::*;

// Two LEDs on one scheduler, driven by a hand-rolled tick loop.
// Run with `RUST_LOG=tick_timer=trace` to watch the scheduler work.
fn main() -> AnyResult<()> {
    pretty_env_logger::init();

    let mut scheduler: Scheduler<bool> = SchedulerBuilder::default().capacity(4).build();

    let fast = scheduler.add_timer(
        |scheduler: &mut Scheduler<bool>, _, lit: &mut bool| {
            *lit = !*lit;
            println!("tick {:>3}: fast led {}", scheduler.current_tick(), on_off(*lit));
        },
        false,
    );

    // The slow LED gives up after five blinks and starts a one-shot farewell.
    let farewell = scheduler.add_timer(
        |scheduler: &mut Scheduler<bool>, _, _: &mut bool| {
            println!("tick {:>3}: slow led done", scheduler.current_tick());
        },
        false,
    );
    let mut blinks = 0;
    let slow = scheduler.add_timer(
        move |scheduler: &mut Scheduler<bool>, id, lit: &mut bool| {
            *lit = !*lit;
            blinks += 1;
            println!("tick {:>3}: slow led {}", scheduler.current_tick(), on_off(*lit));

            if blinks == 5 {
                if let Err(e) = scheduler.stop(id).and_then(|_| scheduler.start(farewell, 2, false)) {
                    eprintln!("slow led: {}", e);
                }
            }
        },
        false,
    );

    scheduler.start(fast, 3, true)?;
    scheduler.start(slow, 7, true)?;

    while scheduler.current_tick() < 50 {
        if let Some(wait) = scheduler.ticks_until_next() {
            // Nothing is due before then, so skip the idle ticks.
            scheduler.advance_ticks(wait.max(1));
        } else {
            break;
        }
    }

    println!("{:?}", scheduler);
    Ok(())
}

fn on_off(lit: bool) -> &'static str {
    if lit {
        "on"
    } else {
        "off"
    }
}
