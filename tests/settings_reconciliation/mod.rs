use std::sync::Arc;

use recognition_dispatcher::DeliveryMode;
use recognition_dispatcher::InlineExecutor;
use recognition_dispatcher::ProcessOutcome;

use crate::common::dispatcher;
use crate::common::Call;
use crate::common::Collector;
use crate::common::DetectorSettings;
use crate::common::Frame;
use crate::common::Journal;
use crate::common::UNREADABLE_FRAME;

fn size(min_face_size: u32) -> DetectorSettings {
    DetectorSettings { min_face_size }
}

#[test]
fn initial_settings_should_be_applied_before_first_process() {
    let journal = Arc::new(Journal::default());
    let dispatcher = dispatcher(journal.clone(), 20, DeliveryMode::Barrier);

    dispatcher.process(Frame(5), &InlineExecutor).unwrap();

    assert_eq!(journal.calls(), vec![Call::Apply(24), Call::Process(5)]);
}

/// # Case: settings change between misses
///
/// ## Validation Criterias:
/// 1. Each distinct change is applied once, right before the next compute
/// 2. Changes overwritten before any miss are never applied
/// 3. Re-setting the current value is not a change
#[test]
fn settings_should_reach_algorithm_once_per_change() {
    let journal = Arc::new(Journal::default());
    let dispatcher = dispatcher(journal.clone(), 20, DeliveryMode::Barrier);
    let collector = Collector::new();
    dispatcher.add_listener(collector.clone());

    dispatcher.process(Frame(1), &InlineExecutor).unwrap();

    dispatcher.set_settings(size(32));
    dispatcher.set_settings(size(40));
    dispatcher.set_settings(size(48));
    dispatcher.process(Frame(2), &InlineExecutor).unwrap();

    assert!(!dispatcher.set_settings(size(48)));
    dispatcher.process(Frame(3), &InlineExecutor).unwrap();

    // Back to an earlier value is still a change
    assert!(dispatcher.set_settings(size(24)));
    dispatcher.process(Frame(4), &InlineExecutor).unwrap();

    assert_eq!(
        journal.calls(),
        vec![
            Call::Apply(24),
            Call::Process(1),
            Call::Apply(48),
            Call::Process(2),
            Call::Process(3),
            Call::Apply(24),
            Call::Process(4),
        ]
    );

    let sizes: Vec<u32> = collector
        .events()
        .into_iter()
        .map(|(_, d)| d.unwrap().min_face_size)
        .collect();
    assert_eq!(sizes, vec![24, 48, 48, 24]);
}

/// # Case: a result cached under old settings
///
/// ## Validation Criterias:
/// 1. The hit returns the result computed under the old settings
/// 2. The new settings wait for the next miss
#[test]
fn cached_result_should_survive_settings_change() {
    let journal = Arc::new(Journal::default());
    let dispatcher = dispatcher(journal.clone(), 20, DeliveryMode::Barrier);
    let collector = Collector::new();
    dispatcher.add_listener(collector.clone());

    dispatcher.process(Frame(7), &InlineExecutor).unwrap();
    dispatcher.set_settings(size(64));

    let outcome = dispatcher.process(Frame(7), &InlineExecutor).unwrap();
    assert_eq!(outcome, ProcessOutcome::CacheHit);

    let (_, detection) = collector.events().pop().unwrap();
    assert_eq!(detection.unwrap().min_face_size, 24);
    assert_eq!(journal.applied(), vec![24]);
    assert!(dispatcher.has_pending_settings());
}

#[test]
fn failure_should_be_delivered_and_retried() {
    let journal = Arc::new(Journal::default());
    let dispatcher = dispatcher(journal.clone(), 20, DeliveryMode::Barrier);
    let collector = Collector::new();
    dispatcher.add_listener(collector.clone());

    for _ in 0..2 {
        let outcome = dispatcher.process(Frame(UNREADABLE_FRAME), &InlineExecutor).unwrap();
        assert_eq!(outcome, ProcessOutcome::Failed);
    }

    assert_eq!(journal.processed(), 2);
    assert!(!dispatcher.is_cached(&Frame(UNREADABLE_FRAME)));
    for (frame, detection) in collector.events() {
        assert_eq!(frame, UNREADABLE_FRAME);
        assert!(detection.unwrap_err().contains("unreadable"));
    }
}

/// # Case: capacity = 2; process A, B, C
///
/// ## Validation Criterias:
/// 1. A is evicted and recomputed when requested again
/// 2. A recently hit entry outlives an older untouched one
#[test]
fn least_recently_used_result_should_be_evicted() {
    let journal = Arc::new(Journal::default());
    let dispatcher = dispatcher(journal.clone(), 2, DeliveryMode::Barrier);

    for frame in [1, 2, 3] {
        dispatcher.process(Frame(frame), &InlineExecutor).unwrap();
    }
    assert!(!dispatcher.is_cached(&Frame(1)));
    assert!(dispatcher.is_cached(&Frame(2)));
    assert!(dispatcher.is_cached(&Frame(3)));

    // Touch 2, so 3 is the oldest when 1 comes back
    dispatcher.process(Frame(2), &InlineExecutor).unwrap();
    assert_eq!(
        dispatcher.process(Frame(1), &InlineExecutor).unwrap(),
        ProcessOutcome::Computed
    );

    assert!(dispatcher.is_cached(&Frame(1)));
    assert!(dispatcher.is_cached(&Frame(2)));
    assert!(!dispatcher.is_cached(&Frame(3)));
    assert_eq!(journal.processed(), 4);
    assert_eq!(dispatcher.cache_stats().evictions, 2);
}
