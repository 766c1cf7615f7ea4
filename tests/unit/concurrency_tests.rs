#[cfg(test)]
mod tests_concurrency {
    use crate::support::temp_dir;
    use ledgerq::{Queue, QueueError};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::thread;

    const PRODUCERS: usize = 4;
    const PER_PRODUCER: usize = 50;

    #[test]
    fn concurrent_producers_get_unique_gap_free_ids() {
        let dir = temp_dir();
        let queue = Arc::new(Queue::open(dir.path()).expect("open"));

        let handles: Vec<_> = (0..PRODUCERS)
            .map(|producer| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    (0..PER_PRODUCER)
                        .map(|seq| {
                            let payload = format!("{producer}:{seq}");
                            queue.enqueue_str(&payload).expect("enqueue").id
                        })
                        .collect::<Vec<u64>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|handle| handle.join().expect("producer thread"))
            .collect();
        ids.sort_unstable();

        let total = (PRODUCERS * PER_PRODUCER) as u64;
        assert_eq!(ids, (1..=total).collect::<Vec<u64>>());
        assert_eq!(queue.tail().expect("tail"), total);
    }

    #[test]
    fn per_producer_order_is_preserved() {
        let dir = temp_dir();
        let queue = Arc::new(Queue::open(dir.path()).expect("open"));

        let handles: Vec<_> = (0..PRODUCERS)
            .map(|producer| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for seq in 0..PER_PRODUCER {
                        queue
                            .enqueue_str(&format!("{producer}:{seq}"))
                            .expect("enqueue");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("producer thread");
        }

        // A single reader must see each producer's items in the order that
        // producer wrote them.
        let mut last_seen: HashMap<usize, usize> = HashMap::new();
        loop {
            let item = match queue.dequeue(0) {
                Ok(item) => item,
                Err(QueueError::Empty { .. }) => break,
                Err(e) => panic!("dequeue: {e}"),
            };
            let text = item.as_str().expect("utf8");
            let (producer, seq) = text.split_once(':').expect("payload format");
            let producer: usize = producer.parse().expect("producer");
            let seq: usize = seq.parse().expect("seq");

            if let Some(previous) = last_seen.insert(producer, seq) {
                assert!(previous < seq, "producer {producer} reordered");
            }
        }
        assert_eq!(last_seen.len(), PRODUCERS);
    }

    #[test]
    fn concurrent_consumers_on_distinct_cursors_each_read_everything() {
        let dir = temp_dir();
        let queue = Arc::new(Queue::open(dir.path()).expect("open"));
        for i in 0..100u32 {
            queue.enqueue(&i.to_be_bytes()).expect("enqueue");
        }

        let handles: Vec<_> = (0..4usize)
            .map(|cursor| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut ids = Vec::new();
                    loop {
                        match queue.dequeue(cursor) {
                            Ok(item) => ids.push(item.id),
                            Err(QueueError::Empty { .. }) => return ids,
                            Err(e) => panic!("dequeue: {e}"),
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            let ids = handle.join().expect("consumer thread");
            assert_eq!(ids, (1..=100u64).collect::<Vec<u64>>());
        }
    }

    #[test]
    fn producer_and_consumer_interleave() {
        let dir = temp_dir();
        let queue = Arc::new(Queue::open(dir.path()).expect("open"));

        let producer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                for i in 0..200u32 {
                    queue.enqueue(&i.to_be_bytes()).expect("enqueue");
                }
            })
        };

        let mut received = Vec::new();
        while received.len() < 200 {
            match queue.dequeue(0) {
                Ok(item) => received.push(item.id),
                Err(QueueError::Empty { .. }) => thread::yield_now(),
                Err(e) => panic!("dequeue: {e}"),
            }
        }
        producer.join().expect("producer thread");

        assert_eq!(received, (1..=200u64).collect::<Vec<u64>>());
    }
}
