//! # Example: order_flow
//!
//! Drives three order tasks on one [`MultiExecutor`]:
//! - two orders grouped by an aggregate task and filled by a simulated venue thread;
//! - one order that is canceled while it waits for its fill.
//!
//! ## Flow
//! ```text
//! main()
//!   ├─► MultiExecutor::new(), add(reactors), open()
//!   ├─► basket.execute()  ──► executes "buy" and "sell"
//!   ├─► venue thread      ──► fills "buy" and "sell" (wakes the executor)
//!   ├─► stale.execute(), stale.cancel()
//!   └─► print every task's transitions, close()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example order_flow
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::{select, Either};
use futures::pin_mut;
use taskreactor::{
    aggregate, ExecutorConfig, FnTask, MultiExecutor, Task, TaskContext, TaskError, TaskRef,
};

/// Order task waiting for the venue to report a fill quantity.
fn order(name: &'static str, quantity: u32) -> (Arc<FnTask>, oneshot::Sender<u32>) {
    let (tx, rx) = oneshot::channel::<u32>();
    let task = FnTask::arc(name, move |ctx: TaskContext| async move {
        let cancelled = ctx.cancelled();
        pin_mut!(rx, cancelled);
        match select(rx, cancelled).await {
            Either::Left((Ok(filled), _)) if filled == quantity => Ok(()),
            Either::Left((Ok(filled), _)) => Err(TaskError::fail(format!(
                "expired with {filled}/{quantity} filled"
            ))),
            Either::Left((Err(_), _)) => Err(TaskError::fail("venue disconnected")),
            Either::Right(_) => Err(TaskError::Canceled),
        }
    });
    (task, tx)
}

/// Prints transitions of `task` until it is terminal.
fn monitor(task: &TaskRef) -> thread::JoinHandle<()> {
    let mut rx = task.publisher().subscribe();
    let label = format!("{}#{}", task.name(), task.id());
    thread::spawn(move || {
        while let Ok(entry) = rx.blocking_recv() {
            match entry.message.as_deref() {
                Some(message) => println!("[{label}] {} ({message})", entry.state),
                None => println!("[{label}] {}", entry.state),
            }
            if entry.state.is_terminal() {
                break;
            }
        }
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== order_flow example ===\n");

    let executor = MultiExecutor::with_config(ExecutorConfig::named("order-flow"));

    let (buy, buy_fill) = order("buy", 100);
    let (sell, sell_fill) = order("sell", 50);
    let (stale, _stale_fill) = order("stale", 10);
    let basket = aggregate("basket", vec![buy.clone() as TaskRef, sell.clone() as TaskRef]);

    let tasks: Vec<TaskRef> = vec![
        buy.clone() as TaskRef,
        sell.clone() as TaskRef,
        stale.clone() as TaskRef,
        basket.clone() as TaskRef,
    ];
    let monitors: Vec<_> = tasks.iter().map(monitor).collect();

    executor.add(buy.reactor());
    executor.add(sell.reactor());
    executor.add(stale.reactor());
    executor.add(basket.reactor());
    executor.open()?;

    basket.execute();
    stale.execute();

    let venue = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        let _ = buy_fill.send(100);
        thread::sleep(Duration::from_millis(50));
        let _ = sell_fill.send(50);
    });

    thread::sleep(Duration::from_millis(20));
    stale.cancel();

    venue.join().expect("venue thread panicked");
    for handle in monitors {
        handle.join().expect("monitor thread panicked");
    }

    executor.close();
    println!("\n=== done ===");
    Ok(())
}
