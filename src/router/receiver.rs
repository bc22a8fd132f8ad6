//! Per-stream receive loop.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use crate::registry::MessageRegistry;
use crate::sink::{SharedSink, deliver};
use crate::transport::Transport;
use crate::types::{Annotations, Frame};

/// Counters reported by a finished receive loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Samples taken off the subscription.
    pub received: u64,
    /// Frames accepted by the sink.
    pub delivered: u64,
    /// Messages without a usable timestamp.
    pub skipped: u64,
    /// Samples that failed to decode.
    pub decode_errors: u64,
    /// Frames the sink rejected.
    pub rejected: u64,
    pub sentinel_sent: bool,
}

/// Everything one receive loop needs, moved into its task.
pub(crate) struct ReceiveLoop {
    pub transport: Arc<dyn Transport>,
    pub registry: Arc<MessageRegistry>,
    pub topic: String,
    pub source: String,
    pub stream_index: usize,
    pub worker_index: usize,
    pub semantic_type: u64,
    pub annotations: Arc<Annotations>,
    pub sink: SharedSink<Frame>,
    pub default_type: String,
    pub poll_interval: Duration,
}

impl ReceiveLoop {
    pub(crate) async fn run(self, cancel: CancellationToken) -> ReceiverStats {
        let mut stats = ReceiverStats::default();

        let mut subscription = match self.transport.subscribe(&self.topic).await {
            Ok(subscription) => subscription,
            Err(e) => {
                error!(stream = %self.source, topic = %self.topic, "Failed to subscribe: {}", e);
                return stats;
            }
        };

        info!(
            stream = %self.source,
            topic = %self.topic,
            index = self.stream_index,
            worker = self.worker_index,
            "Starting receiver"
        );

        while let Some(sample) = subscription.next_polled(&cancel, self.poll_interval).await {
            stats.received += 1;

            let message = match self.registry.decode_sample(&sample, &self.default_type) {
                Ok(message) => message,
                Err(e) => {
                    warn!(stream = %self.source, "Decode failed, forwarding invalid message: {}", e);
                    stats.decode_errors += 1;
                    crate::messages::Message::Invalid
                }
            };

            let timestamp = message.timestamp().unwrap_or(0);
            if timestamp == 0 {
                trace!(stream = %self.source, "Dropping message without timestamp");
                stats.skipped += 1;
                continue;
            }

            let frame = Frame::new(
                timestamp,
                self.semantic_type,
                self.stream_index,
                message,
                self.annotations.clone(),
            );
            if deliver(self.sink.as_ref(), frame, &self.source).await {
                stats.delivered += 1;
            } else {
                stats.rejected += 1;
            }
        }

        if let Err(e) = subscription.release() {
            error!(stream = %self.source, "Failed to release subscription: {}", e);
        }

        // Only the stream pinned to its own slot index closes that worker.
        if self.stream_index == self.worker_index {
            debug!(stream = %self.source, worker = self.worker_index, "Sending end-of-stream frame");
            stats.sentinel_sent =
                deliver(self.sink.as_ref(), Frame::sentinel(self.worker_index), &self.source).await;
        }

        info!(
            stream = %self.source,
            received = stats.received,
            delivered = stats.delivered,
            "Receiver stopped"
        );
        stats
    }
}
