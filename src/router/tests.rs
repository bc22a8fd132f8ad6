//! Router tests: sharding, termination frames and per-message filtering.

use super::*;
use crate::messages::{Message, StreamDescriptorMessage};
use crate::sink::{CollectorSink, Sink};
use crate::test_utils::{
    depth_semantic_type, init_tracing, publish, shared_bus, stream_config, video_message,
    wait_until,
};
use crate::transport::MemoryTransport;
use crate::types::FrameAnnotation;
use std::time::Duration;

fn router(transport: Arc<dyn Transport>) -> FrameRouter {
    let options = RouterOptions { poll_interval_ms: 2, ..Default::default() };
    FrameRouter::new(transport, Arc::new(MessageRegistry::with_default_codecs()), options)
}

fn collectors(n: usize) -> (Vec<Arc<CollectorSink<Frame>>>, Vec<SharedSink<Frame>>) {
    let collectors: Vec<_> = (0..n).map(|_| Arc::new(CollectorSink::new())).collect();
    let shared = collectors.iter().map(|c| c.clone() as SharedSink<Frame>).collect();
    (collectors, shared)
}

fn data_topic(index: usize) -> String {
    format!("p/cam{index:02}/str/depth")
}

fn streams(count: usize) -> Vec<StreamConfig> {
    (0..count).map(|i| stream_config(i, &data_topic(i), depth_semantic_type())).collect()
}

async fn wait_for_subscribers(bus: &MemoryTransport, count: usize) {
    assert!(
        wait_until(|| bus.subscriber_count(None) == count, Duration::from_secs(2)).await,
        "receivers did not subscribe"
    );
}

#[test]
fn worker_slots_wrap_and_clamp() {
    let slots: Vec<_> = (0..5).map(|i| worker_slot(i, 3)).collect();
    assert_eq!(slots, [0, 1, 2, 0, 1]);
    assert_eq!(worker_slot(7, 0), 0);
    assert_eq!(worker_slot(7, 1), 0);
}

#[tokio::test]
async fn frames_are_sharded_by_stream_index() {
    init_tracing();
    let (bus, transport) = shared_bus();
    let (sinks, shared) = collectors(3);
    let cancel = CancellationToken::new();

    let set = router(transport).start_all_receivers(3, &shared, &streams(5), cancel).unwrap();
    assert_eq!(set.len(), 5);
    wait_for_subscribers(&bus, 5).await;

    for i in 0..5 {
        publish(&bus, &data_topic(i), &video_message(100 + i as u64));
    }
    assert!(
        wait_until(|| sinks.iter().map(|s| s.len()).sum::<usize>() == 5, Duration::from_secs(2))
            .await
    );

    let indices = |sink: &CollectorSink<Frame>| {
        let mut v: Vec<_> = sink.snapshot().iter().map(|f| f.stream_index).collect();
        v.sort_unstable();
        v
    };
    assert_eq!(indices(&*sinks[0]), [0, 3]);
    assert_eq!(indices(&*sinks[1]), [1, 4]);
    assert_eq!(indices(&*sinks[2]), [2]);

    let stats = set.shutdown().await;
    assert_eq!(stats.len(), 5);
    assert!(stats.iter().all(|(_, s)| s.delivered == 1));
}

#[tokio::test]
async fn only_streams_owning_their_slot_send_sentinels() {
    let (bus, transport) = shared_bus();
    let (sinks, shared) = collectors(3);
    let cancel = CancellationToken::new();

    let set = router(transport).start_all_receivers(3, &shared, &streams(5), cancel).unwrap();
    wait_for_subscribers(&bus, 5).await;
    let stats = set.shutdown().await;

    // Streams 0, 1, 2 own slots 0, 1, 2; streams 3 and 4 do not.
    for (slot, sink) in sinks.iter().enumerate() {
        let frames = sink.take();
        assert_eq!(frames.len(), 1, "slot {slot}");
        assert!(frames[0].is_sentinel());
        assert_eq!(frames[0].stream_index, slot);
    }
    let sent: Vec<_> = stats.iter().map(|(_, s)| s.sentinel_sent).collect();
    assert_eq!(sent, [true, true, true, false, false]);
    assert_eq!(bus.subscriber_count(None), 0);
}

#[tokio::test]
async fn single_worker_gets_a_sentinel_from_index_zero_only() {
    let (bus, transport) = shared_bus();
    let (sinks, shared) = collectors(1);

    let set = router(transport)
        .start_all_receivers(1, &shared, &streams(3), CancellationToken::new())
        .unwrap();
    wait_for_subscribers(&bus, 3).await;
    set.shutdown().await;

    // Only stream 0 has index == slot index with one worker.
    let frames = sinks[0].take();
    assert_eq!(frames.len(), 1);
    assert!(frames[0].is_sentinel());
}

#[tokio::test]
async fn zero_timestamp_and_undecodable_messages_are_dropped() {
    let (bus, transport) = shared_bus();
    let (sinks, shared) = collectors(1);
    let set = router(transport)
        .start_all_receivers(1, &shared, &streams(1), CancellationToken::new())
        .unwrap();
    wait_for_subscribers(&bus, 1).await;

    let topic = data_topic(0);
    publish(&bus, &topic, &video_message(0));
    bus.publish(&topic, b"garbage".to_vec(), None);
    // A descriptor decodes fine but has no timestamp.
    publish(&bus, &topic, &Message::from(StreamDescriptorMessage::default()));
    publish(&bus, &topic, &video_message(42));

    assert!(wait_until(|| sinks[0].len() == 1, Duration::from_secs(2)).await);
    let stats = set.shutdown().await;
    let (_, stats) = &stats[0];
    assert_eq!(stats.received, 4);
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.skipped, 3);
    assert_eq!(stats.decode_errors, 1);

    let frames = sinks[0].take();
    assert_eq!(frames[0].timestamp, 42);
    assert!(frames[1].is_sentinel());
}

#[tokio::test]
async fn frames_carry_stream_metadata_in_order() {
    let (bus, transport) = shared_bus();
    let (sinks, shared) = collectors(1);
    let mut config = stream_config(0, &data_topic(0), depth_semantic_type());
    config.add_annotation(FrameAnnotation::CameraModel(crate::test_utils::camera_model(640, 576)));

    let set = router(transport)
        .start_all_receivers(1, &shared, &[config], CancellationToken::new())
        .unwrap();
    wait_for_subscribers(&bus, 1).await;

    for ts in 1..=10u64 {
        publish(&bus, &data_topic(0), &video_message(ts));
    }
    assert!(wait_until(|| sinks[0].len() == 10, Duration::from_secs(2)).await);
    set.shutdown().await;

    let frames = sinks[0].take();
    let timestamps: Vec<_> = frames.iter().take(10).map(|f| f.timestamp).collect();
    assert_eq!(timestamps, (1..=10).collect::<Vec<_>>());
    for frame in &frames[..10] {
        assert_eq!(frame.semantic_type, depth_semantic_type());
        assert_eq!(frame.annotations.camera_model().map(|c| c.width), Some(640));
    }
}

#[tokio::test]
async fn streams_without_descriptor_are_skipped() {
    let (_bus, transport) = shared_bus();
    let (_, shared) = collectors(2);
    let mut all = streams(2);
    all[1].descriptor = None;

    let set = router(transport)
        .start_all_receivers(2, &shared, &all, CancellationToken::new())
        .unwrap();
    assert_eq!(set.stream_names().collect::<Vec<_>>(), ["cam00_depth"]);
    set.shutdown().await;
}

#[tokio::test]
async fn too_few_sinks_is_a_config_error() {
    let (_bus, transport) = shared_bus();
    let (_, shared) = collectors(2);
    let result = router(transport).start_all_receivers(3, &shared, &streams(3), CancellationToken::new());
    assert!(matches!(result, Err(TcnError::Config { .. })));
}

#[tokio::test]
async fn subscribe_failure_ends_loop_without_sentinel() {
    let (bus, transport) = shared_bus();
    bus.fail_subscriptions(true);
    let (sinks, shared) = collectors(1);

    let set = router(transport)
        .start_all_receivers(1, &shared, &streams(1), CancellationToken::new())
        .unwrap();
    let stats = set.join().await;
    assert_eq!(stats[0].1, ReceiverStats::default());
    assert!(sinks[0].is_empty());
}

#[tokio::test]
async fn dropping_the_set_stops_receivers() {
    let (bus, transport) = shared_bus();
    let (sinks, shared) = collectors(1);
    let set = router(transport)
        .start_all_receivers(1, &shared, &streams(1), CancellationToken::new())
        .unwrap();
    wait_for_subscribers(&bus, 1).await;

    drop(set);
    assert!(wait_until(|| bus.subscriber_count(None) == 0, Duration::from_secs(2)).await);
    assert!(wait_until(|| sinks[0].len() == 1, Duration::from_secs(2)).await);
}

struct RejectingSink;

#[async_trait::async_trait]
impl Sink<Frame> for RejectingSink {
    async fn accept(&self, _frame: Frame) -> Result<()> {
        Err(TcnError::sink_closed("full"))
    }
}

#[tokio::test]
async fn rejected_frames_do_not_stop_the_stream() {
    let (bus, transport) = shared_bus();
    let shared: Vec<SharedSink<Frame>> = vec![Arc::new(RejectingSink)];
    let set = router(transport)
        .start_all_receivers(1, &shared, &streams(1), CancellationToken::new())
        .unwrap();
    wait_for_subscribers(&bus, 1).await;

    publish(&bus, &data_topic(0), &video_message(1));
    publish(&bus, &data_topic(0), &video_message(2));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!set.cancellation_token().is_cancelled());
    let stats = set.shutdown().await;
    assert_eq!(stats[0].1.rejected, 2);
    assert!(!stats[0].1.sentinel_sent);
}

#[tokio::test]
async fn full_channel_sink_drops_frames_and_shutdown_completes() {
    let (bus, transport) = shared_bus();
    let (sink, _undrained) = crate::sink::ChannelSink::<Frame>::shared(1);
    let set = router(transport)
        .start_all_receivers(1, &[sink], &streams(1), CancellationToken::new())
        .unwrap();
    wait_for_subscribers(&bus, 1).await;

    for ts in 1..=3u64 {
        publish(&bus, &data_topic(0), &video_message(ts));
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let stats = tokio::time::timeout(Duration::from_secs(2), set.shutdown())
        .await
        .expect("shutdown stalled on a full sink");
    let (_, stats) = &stats[0];
    assert_eq!(stats.delivered, 1);
    assert_eq!(stats.rejected, 2);
    assert!(!stats.sentinel_sent);
}
