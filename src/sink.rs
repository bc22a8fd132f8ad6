//! Delivery targets for routed frames and SIS messages.
//!
//! A sink is chosen once when a loop is spawned. Several receive loops may
//! share one sink, so implementations must accept concurrent calls.
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> tcnart::Result<()> {
//! use futures::StreamExt;
//! use tcnart::sink::{ChannelSink, Sink};
//!
//! let (sink, mut frames) = ChannelSink::<u32>::new(8);
//! sink.accept(7).await?;
//! drop(sink);
//! assert_eq!(frames.next().await, Some(7));
//! assert_eq!(frames.next().await, None);
//! # Ok(())
//! # }
//! ```

use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;

use crate::{Result, TcnError};

/// Consumer side of a receive loop.
#[async_trait::async_trait]
pub trait Sink<T>: Send + Sync {
    /// Take ownership of `item`. An error means the item was dropped.
    async fn accept(&self, item: T) -> Result<()>;
}

pub type SharedSink<T> = Arc<dyn Sink<T>>;

/// Bounded channel sink.
///
/// `accept` never waits: an item that finds the channel full is rejected, so a
/// slow consumer loses frames instead of stalling the receive loop.
#[derive(Debug)]
pub struct ChannelSink<T> {
    tx: mpsc::Sender<T>,
}

impl<T: Send + 'static> ChannelSink<T> {
    /// Create a sink and the stream draining it.
    pub fn new(capacity: usize) -> (Self, ReceiverStream<T>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, ReceiverStream::new(rx))
    }

    /// Shared sink plus its stream, ready to hand to a router.
    pub fn shared(capacity: usize) -> (SharedSink<T>, ReceiverStream<T>) {
        let (sink, stream) = Self::new(capacity);
        (Arc::new(sink), stream)
    }
}

impl<T> Clone for ChannelSink<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

#[async_trait::async_trait]
impl<T: Send + 'static> Sink<T> for ChannelSink<T> {
    async fn accept(&self, item: T) -> Result<()> {
        self.tx.try_send(item).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => TcnError::sink_closed("channel full"),
            mpsc::error::TrySendError::Closed(_) => {
                TcnError::sink_closed("channel receiver dropped")
            }
        })
    }
}

/// Calls a function for every item.
///
/// The callback runs inline on the receive loop's tokio worker. It must not
/// block; hand heavy work to `tokio::task::spawn_blocking` or a channel.
pub struct CallbackSink<T> {
    callback: Box<dyn Fn(T) + Send + Sync>,
}

impl<T> CallbackSink<T> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self { callback: Box::new(callback) }
    }
}

#[async_trait::async_trait]
impl<T: Send + 'static> Sink<T> for CallbackSink<T> {
    async fn accept(&self, item: T) -> Result<()> {
        (self.callback)(item);
        Ok(())
    }
}

/// Appends every item to an in-memory list.
#[derive(Debug)]
pub struct CollectorSink<T> {
    items: Mutex<Vec<T>>,
}

impl<T> Default for CollectorSink<T> {
    fn default() -> Self {
        Self { items: Mutex::new(Vec::new()) }
    }
}

impl<T> CollectorSink<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return everything collected so far.
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> CollectorSink<T> {
    pub fn snapshot(&self) -> Vec<T> {
        self.lock().clone()
    }
}

#[async_trait::async_trait]
impl<T: Send + 'static> Sink<T> for CollectorSink<T> {
    async fn accept(&self, item: T) -> Result<()> {
        self.lock().push(item);
        Ok(())
    }
}

/// Hand `item` to `sink`, logging and dropping it on failure.
///
/// Returns whether the item was accepted.
pub(crate) async fn deliver<T: Send>(sink: &dyn Sink<T>, item: T, source: &str) -> bool {
    match sink.accept(item).await {
        Ok(()) => true,
        Err(e) => {
            warn!(source, "Dropping item, sink rejected it: {}", e);
            false
        }
    }
}
