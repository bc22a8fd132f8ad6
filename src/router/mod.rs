//! Worker-sharded frame routing.
//!
//! Each resolved stream gets its own receive loop. A loop decodes every sample
//! of its stream, stamps it with the stream's semantic type, index and
//! annotations, and hands the resulting [`Frame`] to the sink of its worker
//! slot (`stream_index % num_workers`). Several streams may share a slot.
//!
//! On shutdown a loop sends one end-of-stream frame (see [`Frame::sentinel`])
//! only if its stream index equals its slot index, so with more streams than
//! workers only the first stream of each slot closes it.
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tcnart::Result<()> {
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use tcnart::config::RouterOptions;
//! use tcnart::registry::MessageRegistry;
//! use tcnart::router::FrameRouter;
//! use tcnart::sink::{CollectorSink, SharedSink};
//! use tcnart::transport::MemoryTransport;
//! use tcnart::types::Frame;
//!
//! let router = FrameRouter::new(
//!     Arc::new(MemoryTransport::new()),
//!     Arc::new(MessageRegistry::with_default_codecs()),
//!     RouterOptions::default(),
//! );
//! let sink = Arc::new(CollectorSink::<Frame>::new());
//! let sinks: Vec<SharedSink<Frame>> = vec![sink.clone()];
//!
//! let receivers = router.start_all_receivers(1, &sinks, &[], CancellationToken::new())?;
//! assert!(receivers.is_empty());
//! receivers.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod receiver;

#[cfg(test)]
mod tests;

pub use receiver::ReceiverStats;

use futures::future::join_all;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::RouterOptions;
use crate::registry::MessageRegistry;
use crate::sink::SharedSink;
use crate::transport::Transport;
use crate::types::{Frame, StreamConfig};
use crate::{Result, TcnError};
use receiver::ReceiveLoop;

/// Worker slot of a stream. `num_workers` is clamped to at least one.
pub fn worker_slot(stream_index: usize, num_workers: usize) -> usize {
    stream_index % num_workers.max(1)
}

/// Spawns receive loops over a shared transport session.
#[derive(Clone)]
pub struct FrameRouter {
    transport: Arc<dyn Transport>,
    registry: Arc<MessageRegistry>,
    options: RouterOptions,
}

impl FrameRouter {
    pub fn new(
        transport: Arc<dyn Transport>,
        registry: Arc<MessageRegistry>,
        options: RouterOptions,
    ) -> Self {
        Self { transport, registry, options }
    }

    /// Start one receive loop per resolved stream.
    ///
    /// Streams without a descriptor are skipped. Each loop subscribes to its
    /// descriptor's data topic and stamps frames with the descriptor's semantic
    /// type. `sinks` must hold at least one sink per worker slot.
    ///
    /// Loops are spawned with [`tokio::spawn`], so this must be called from
    /// within a tokio runtime.
    pub fn start_all_receivers(
        &self,
        num_workers: usize,
        sinks: &[SharedSink<Frame>],
        streams: &[StreamConfig],
        cancel: CancellationToken,
    ) -> Result<ReceiverSet> {
        let num_workers = num_workers.max(1);
        if sinks.len() < num_workers {
            return Err(TcnError::config(format!(
                "{num_workers} workers need {num_workers} sinks, got {}",
                sinks.len()
            )));
        }

        let mut handles = Vec::with_capacity(streams.len());
        for stream in streams {
            let Some(descriptor) = stream.descriptor.as_ref() else {
                warn!(stream = %stream.stream_name, "No descriptor, not starting receiver");
                continue;
            };

            let worker_index = worker_slot(stream.stream_index, num_workers);
            let receive_loop = ReceiveLoop {
                transport: self.transport.clone(),
                registry: self.registry.clone(),
                topic: descriptor.stream_topic.clone(),
                source: stream.stream_name.clone(),
                stream_index: stream.stream_index,
                worker_index,
                semantic_type: descriptor.buffer_info.semantic_type,
                annotations: Arc::new(stream.annotations.clone()),
                sink: sinks[worker_index].clone(),
                default_type: self.options.default_type.clone(),
                poll_interval: self.options.poll_interval(),
            };
            debug!(stream = %stream.stream_name, worker = worker_index, "Spawning receiver");

            let name = stream.stream_name.clone();
            let task_cancel = cancel.clone();
            let handle = tokio::spawn(async move { receive_loop.run(task_cancel).await });
            handles.push((name, handle));
        }

        info!(streams = handles.len(), workers = num_workers, "Receivers started");
        Ok(ReceiverSet { handles, cancel })
    }
}

/// Running receive loops plus the token that stops them.
///
/// Dropping the set cancels every loop without waiting for it.
pub struct ReceiverSet {
    handles: Vec<(String, JoinHandle<ReceiverStats>)>,
    cancel: CancellationToken,
}

impl ReceiverSet {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn stream_names(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(|(name, _)| name.as_str())
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Signal shutdown and wait for every loop to finish.
    pub async fn shutdown(mut self) -> Vec<(String, ReceiverStats)> {
        self.cancel.cancel();
        self.join_all().await
    }

    /// Wait for every loop to finish without signalling shutdown.
    pub async fn join(mut self) -> Vec<(String, ReceiverStats)> {
        self.join_all().await
    }

    async fn join_all(&mut self) -> Vec<(String, ReceiverStats)> {
        let (names, handles): (Vec<_>, Vec<_>) = std::mem::take(&mut self.handles).into_iter().unzip();
        let mut results = Vec::with_capacity(names.len());
        for (name, outcome) in names.into_iter().zip(join_all(handles).await) {
            match outcome {
                Ok(stats) => results.push((name, stats)),
                Err(e) => error!(stream = %name, "Receiver task failed: {}", e),
            }
        }
        results
    }
}

impl Drop for ReceiverSet {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            debug!("Dropping receiver set");
            self.cancel.cancel();
        }
    }
}
