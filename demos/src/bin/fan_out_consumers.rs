// demos/src/bin/fan_out_consumers.rs
//
// This demo shows one producer feeding several independent consumers from a
// single durable queue. Every consumer owns a cursor index and reads the
// whole stream at its own pace; nothing is deleted as it is read.
//
// Run this demo with:
//   cargo run --bin fan_out_consumers
//   (from the demos directory)

use demos::setup_logger;
use ledgerq::prelude::*;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
struct Thumbnail {
    image: String,
    width: u32,
}

const JOBS: u32 = 12;
const CONSUMERS: &[(usize, &str)] = &[(0, "resizer"), (1, "auditor"), (2, "indexer")];

fn main() -> Result<(), Box<dyn Error>> {
    setup_logger();

    let dir = std::env::temp_dir().join("ledgerq-fan-out-demo");
    let queue = Arc::new(Queue::open(&dir)?);
    info!("Opened queue at {} (tail {})", dir.display(), queue.tail()?);

    let producer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || -> Result<(), QueueError> {
            for n in 0..JOBS {
                let job = Thumbnail {
                    image: format!("photos/{n:04}.jpg"),
                    width: 128 * (1 + n % 3),
                };
                let item = queue.enqueue_json(&job)?;
                info!("produced #{} {}", item.id, job.image);
                thread::sleep(Duration::from_millis(5));
            }
            Ok(())
        })
    };

    let consumers: Vec<_> = CONSUMERS
        .iter()
        .map(|&(cursor, name)| {
            let queue = Arc::clone(&queue);
            thread::spawn(move || -> Result<u32, QueueError> {
                let mut handled = 0;
                while handled < JOBS {
                    match queue.dequeue(cursor) {
                        Ok(item) => {
                            let job: Thumbnail = item.to_json()?;
                            info!("{name} got #{} {} @{}px", item.id, job.image, job.width);
                            handled += 1;
                        }
                        // Caught up with the producer; poll again shortly.
                        Err(QueueError::Empty { .. }) => thread::sleep(Duration::from_millis(2)),
                        Err(e) => return Err(e),
                    }
                }
                Ok(handled)
            })
        })
        .collect();

    producer.join().map_err(|_| "producer panicked")??;
    for (handle, (_, name)) in consumers.into_iter().zip(CONSUMERS) {
        let handled = handle.join().map_err(|_| "consumer panicked")??;
        info!("{name} handled {handled} jobs");
    }

    info!("Dropping queue directory {}", dir.display());
    queue.destroy()?;
    Ok(())
}
