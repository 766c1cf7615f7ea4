#[cfg(test)]
mod tests_queue_metrics {
    use ledgerq::queue::metrics::{DEQUEUED_TOTAL, EMPTY_TOTAL, ENQUEUED_TOTAL, TAIL};
    use ledgerq::{MemoryStore, Queue, QueueError, QueueOptions, encode_id};
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};
    use std::collections::HashMap;

    /// Run `body` against a local recorder and return the final value of
    /// every metric it touched, keyed by name.
    fn record<F: FnOnce()>(body: F) -> HashMap<String, DebugValue> {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        metrics::with_local_recorder(&recorder, body);

        snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|(key, _, _, value)| (key.key().name().to_string(), value))
            .collect()
    }

    fn counter(values: &HashMap<String, DebugValue>, name: &str) -> u64 {
        match values.get(name) {
            Some(DebugValue::Counter(value)) => *value,
            other => panic!("{name} is not a counter: {other:?}"),
        }
    }

    fn gauge(values: &HashMap<String, DebugValue>, name: &str) -> f64 {
        match values.get(name) {
            Some(DebugValue::Gauge(value)) => value.into_inner(),
            other => panic!("{name} is not a gauge: {other:?}"),
        }
    }

    #[test]
    fn enqueue_dequeue_and_empty_are_counted() {
        let dir = tempfile::tempdir().expect("tempdir");

        let values = record(|| {
            let queue = Queue::with_store(dir.path(), MemoryStore::new(), QueueOptions::default())
                .expect("open");
            queue.enqueue_str("a").expect("enqueue");
            queue.enqueue_str("b").expect("enqueue");
            queue.dequeue(0).expect("dequeue");
            queue.dequeue(0).expect("dequeue");
            assert!(matches!(queue.dequeue(0), Err(QueueError::Empty { cursor: 0 })));
        });

        assert_eq!(counter(&values, ENQUEUED_TOTAL), 2);
        assert_eq!(counter(&values, DEQUEUED_TOTAL), 2);
        assert_eq!(counter(&values, EMPTY_TOTAL), 1);
        assert_eq!(gauge(&values, TAIL), 2.0);
    }

    #[test]
    fn open_publishes_recovered_tail() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store: MemoryStore = (1u64..=7)
            .map(|id| (encode_id(id).to_vec(), b"v".to_vec()))
            .collect();

        let values = record(|| {
            Queue::with_store(dir.path(), store, QueueOptions::default()).expect("open");
        });

        assert_eq!(gauge(&values, TAIL), 7.0);
        assert!(!values.contains_key(ENQUEUED_TOTAL));
    }

    #[test]
    fn exhausted_head_counts_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store: MemoryStore = [(encode_id(u64::MAX).to_vec(), b"last".to_vec())]
            .into_iter()
            .collect();

        let values = record(|| {
            let queue =
                Queue::with_store(dir.path(), store, QueueOptions::default()).expect("open");
            assert_eq!(queue.dequeue(0).expect("last item").id, u64::MAX);
            assert!(matches!(queue.dequeue(0), Err(QueueError::Empty { .. })));
            assert!(matches!(queue.dequeue(0), Err(QueueError::Empty { .. })));
        });

        assert_eq!(counter(&values, DEQUEUED_TOTAL), 1);
        assert_eq!(counter(&values, EMPTY_TOTAL), 2);
    }
}
