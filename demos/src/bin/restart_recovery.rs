// demos/src/bin/restart_recovery.rs
//
// This demo walks through what survives a restart. Items and their ids are
// durable; cursor positions are not, so every consumer starts over from the
// oldest item after the queue is reopened.
//
// Run this demo with:
//   cargo run --bin restart_recovery
//   (from the demos directory)

use demos::setup_logger;
use ledgerq::prelude::*;
use std::error::Error;
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    setup_logger();

    let dir = std::env::temp_dir().join("ledgerq-restart-demo");

    // First run: write two items and consume both.
    {
        let queue = Queue::open(&dir)?;
        let a = queue.enqueue_str("a")?;
        let b = queue.enqueue_str("b")?;
        info!("Enqueued #{} and #{}", a.id, b.id);

        for _ in 0..2 {
            let item = queue.dequeue(0)?;
            info!("Cursor 0 read #{} = {:?}", item.id, item.as_str()?);
        }

        match queue.dequeue(0) {
            Err(QueueError::Empty { cursor }) => info!("Cursor {cursor} is caught up"),
            other => info!("Unexpected result: {other:?}"),
        }

        queue.close()?;
        info!("Closed queue\n");
    }

    // Second run: the tail is recovered from the stored keys, the cursor
    // is not.
    let queue = Queue::open(&dir)?;
    info!(
        "Reopened queue: baseline {}, tail {}",
        queue.baseline()?,
        queue.tail()?
    );
    info!("Cursor 0 has {} items pending", queue.pending(0)?);

    let item = queue.dequeue(0)?;
    info!("Cursor 0 read #{} = {:?} again", item.id, item.as_str()?);

    let next = queue.enqueue_str("c")?;
    info!("New items continue the sequence at #{}", next.id);

    queue.destroy()?;
    info!("Destroyed queue directory {}", dir.display());
    Ok(())
}
