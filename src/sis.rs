//! SIS join listener.
//!
//! Listens on the SIS join topic (usually the `<prefix>/*/sis/join` wildcard)
//! and forwards every decoded message to a single sink. There is no sharding
//! and no frame stamping. Undecodable samples are forwarded as
//! [`Message::Invalid`], and one final `Message::Invalid` is always sent when
//! the listener stops.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::SisOptions;
use crate::messages::Message;
use crate::registry::MessageRegistry;
use crate::router::ReceiverStats;
use crate::sink::{SharedSink, deliver};
use crate::transport::Transport;

#[derive(Clone)]
pub struct SisJoinListener {
    transport: Arc<dyn Transport>,
    registry: Arc<MessageRegistry>,
    options: SisOptions,
}

impl SisJoinListener {
    pub fn new(
        transport: Arc<dyn Transport>,
        registry: Arc<MessageRegistry>,
        options: SisOptions,
    ) -> Self {
        Self { transport, registry, options }
    }

    /// Spawn the listener on the current tokio runtime.
    pub fn start(
        &self,
        topic: impl Into<String>,
        sink: SharedSink<Message>,
        cancel: CancellationToken,
    ) -> JoinHandle<ReceiverStats> {
        let listener = self.clone();
        let topic = topic.into();
        tokio::spawn(async move { listener.run(&topic, sink, cancel).await })
    }

    /// Receive until `cancel` fires or the subscription closes.
    pub async fn run(
        &self,
        topic: &str,
        sink: SharedSink<Message>,
        cancel: CancellationToken,
    ) -> ReceiverStats {
        let mut stats = ReceiverStats::default();

        let mut subscription = match self.transport.subscribe(topic).await {
            Ok(subscription) => subscription,
            Err(e) => {
                error!(topic, "Failed to subscribe to SIS joins: {}", e);
                return stats;
            }
        };
        info!(topic, "Starting SIS join listener");

        while let Some(sample) = subscription.next_polled(&cancel, self.options.poll_interval()).await {
            stats.received += 1;
            let message = match self.registry.decode_sample(&sample, &self.options.default_type) {
                Ok(message) => message,
                Err(e) => {
                    warn!(topic, key = %sample.key_expr, "Decode failed, forwarding invalid message: {}", e);
                    stats.decode_errors += 1;
                    Message::Invalid
                }
            };
            if deliver(sink.as_ref(), message, topic).await {
                stats.delivered += 1;
            } else {
                stats.rejected += 1;
            }
        }

        if let Err(e) = subscription.release() {
            error!(topic, "Failed to release SIS subscription: {}", e);
        }

        stats.sentinel_sent = deliver(sink.as_ref(), Message::Invalid, topic).await;
        info!(topic, received = stats.received, "SIS join listener stopped");
        stats
    }
}
