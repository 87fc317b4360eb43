use std::sync::Arc;
use std::thread;
use std::time::Duration;

use recognition_dispatcher::DeliveryMode;
use recognition_dispatcher::InlineExecutor;
use recognition_dispatcher::ProcessOutcome;
use recognition_dispatcher::Recognition;
use recognition_dispatcher::RecognitionDispatcher;
use recognition_dispatcher::ThreadExecutor;

use crate::common::dispatcher;
use crate::common::gated_dispatcher;
use crate::common::Collector;
use crate::common::DetectorSettings;
use crate::common::FaceConfig;
use crate::common::Frame;
use crate::common::Journal;
use crate::enable_logger;

const CALLERS: u64 = 8;
const CALLS_PER_CALLER: u64 = 40;

/// # Case: many callers share one dispatcher
///
/// ## Validation Criterias:
/// 1. No two computations ever overlap
/// 2. Every call reaches the listener exactly once
/// 3. Every result matches its input
#[test]
fn concurrent_callers_should_never_overlap_computations() {
    enable_logger();
    let journal = Arc::new(Journal::default());
    let dispatcher = dispatcher(journal.clone(), 10, DeliveryMode::AfterUnlock);
    let collector = Collector::new();
    dispatcher.add_listener(collector.clone());

    let workers: Vec<_> = (0..CALLERS)
        .map(|caller| {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                for i in 0..CALLS_PER_CALLER {
                    let frame = (caller * 7 + i * 3) % 25;
                    dispatcher.process(Frame(frame), &InlineExecutor).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert!(!journal.overlapped());
    assert_eq!(collector.count() as u64, CALLERS * CALLS_PER_CALLER);
    for (frame, detection) in collector.events() {
        let detection = detection.unwrap();
        assert_eq!(detection.frame, frame);
        assert_eq!(detection.faces, (frame % 4) as u32);
    }

    let stats = dispatcher.cache_stats();
    assert!(stats.len <= 10);
    assert_eq!(stats.hits + stats.misses, CALLERS * CALLS_PER_CALLER);
    assert_eq!(journal.processed() as u64, stats.misses);
    assert_eq!(journal.applied(), vec![24]);
}

/// # Case: a miss is parked inside the algorithm
///
/// ## Validation Criterias:
/// 1. A cache hit from another caller completes meanwhile
/// 2. A settings change does not block on the computation
#[test]
fn cache_hit_should_not_wait_for_inflight_miss() {
    enable_logger();
    let journal = Arc::new(Journal::default());
    let (dispatcher, gate) = gated_dispatcher(journal.clone(), 100, DeliveryMode::Barrier);
    let collector = Collector::new();
    dispatcher.add_listener(collector.clone());

    dispatcher.process(Frame(1), &InlineExecutor).unwrap();

    let blocked = {
        let dispatcher = dispatcher.clone();
        thread::spawn(move || dispatcher.process(Frame(100), &InlineExecutor).unwrap())
    };
    gate.wait_started();

    let outcome = dispatcher.process(Frame(1), &InlineExecutor).unwrap();
    assert_eq!(outcome, ProcessOutcome::CacheHit);
    assert!(dispatcher.set_settings(DetectorSettings { min_face_size: 48 }));
    assert!(!blocked.is_finished());

    gate.release();
    assert_eq!(blocked.join().unwrap(), ProcessOutcome::Computed);

    let frames: Vec<u64> = collector.events().iter().map(|(f, _)| *f).collect();
    assert_eq!(frames, vec![1, 1, 100]);
    // Settings changed mid-compute are picked up by the next miss only
    assert!(dispatcher.has_pending_settings());
    assert_eq!(journal.applied(), vec![24]);
}

/// # Case: barrier delivery with a slow listener on a worker thread
///
/// ## Validation Criterias:
/// 1. Each process call returns only after its notification ran
#[test]
fn barrier_delivery_should_order_notifications_per_call() {
    let journal = Arc::new(Journal::default());
    let dispatcher = dispatcher(journal, 20, DeliveryMode::Barrier);
    let executor = ThreadExecutor::new("slow-listener").unwrap();

    let collector = Collector::new();
    dispatcher.add_listener(Arc::new(
        |_: &RecognitionDispatcher<FaceConfig>, _: &Frame, _: &Recognition<FaceConfig>| {
            thread::sleep(Duration::from_millis(5));
        },
    ));
    dispatcher.add_listener(collector.clone());

    for (expected, frame) in [3u64, 5, 3, 9].into_iter().enumerate() {
        dispatcher.process(Frame(frame), &executor).unwrap();
        assert_eq!(collector.count(), expected + 1);
    }
}
