//! Publish/subscribe transport seam.
//!
//! The crate only needs two operations from a bus: subscribe to a key
//! expression, and run a request/reply query. Every sample carries its payload
//! bytes and an optional attachment naming the payload's wire type.
//!
//! Key expressions follow the zenoh convention: `/`-separated chunks where `*`
//! matches exactly one chunk and `**` matches any number of chunks.

mod memory;

pub use memory::MemoryTransport;

use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::Result;

/// One message received from the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub key_expr: String,
    pub payload: Vec<u8>,
    pub attachment: Option<String>,
}

impl Sample {
    pub fn new(key_expr: impl Into<String>, payload: Vec<u8>) -> Self {
        Self { key_expr: key_expr.into(), payload, attachment: None }
    }

    pub fn with_attachment(mut self, type_name: impl Into<String>) -> Self {
        self.attachment = Some(type_name.into());
        self
    }

    /// Wire type name from the attachment, or `default` when there is none.
    pub fn type_name_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.attachment.as_deref().unwrap_or(default)
    }
}

/// Request/reply and subscribe operations of a bus session.
///
/// Implementations are shared by every receive loop and must be safe for
/// concurrent use.
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Subscribe to `key_expr`. Samples are queued until the subscription reads them.
    async fn subscribe(&self, key_expr: &str) -> Result<Subscription>;

    /// Send `payload` to every queryable matching `key_expr` and collect the replies.
    async fn query(&self, key_expr: &str, payload: Vec<u8>) -> Result<Vec<Sample>>;
}

type ReleaseFn = Box<dyn FnOnce() -> Result<()> + Send + Sync>;

/// Result of a non-blocking read from a [`Subscription`].
#[derive(Debug)]
pub enum Inbound {
    Sample(Sample),
    Empty,
    /// The transport dropped the subscription; no more samples will arrive.
    Closed,
}

/// Owned inbound queue of one subscriber.
///
/// The subscription is undeclared on [`release`](Subscription::release) or on
/// drop, whichever comes first.
pub struct Subscription {
    key_expr: String,
    rx: mpsc::UnboundedReceiver<Sample>,
    release: Option<ReleaseFn>,
}

impl Subscription {
    /// Wrap a receiver fed by the transport's delivery callback.
    ///
    /// `release` is called at most once, to undeclare the subscriber.
    pub fn new<F>(key_expr: impl Into<String>, rx: mpsc::UnboundedReceiver<Sample>, release: F) -> Self
    where
        F: FnOnce() -> Result<()> + Send + Sync + 'static,
    {
        Self { key_expr: key_expr.into(), rx, release: Some(Box::new(release)) }
    }

    pub fn key_expr(&self) -> &str {
        &self.key_expr
    }

    /// Pop the oldest queued sample without waiting.
    pub fn try_next(&mut self) -> Inbound {
        match self.rx.try_recv() {
            Ok(sample) => Inbound::Sample(sample),
            Err(mpsc::error::TryRecvError::Empty) => Inbound::Empty,
            Err(mpsc::error::TryRecvError::Disconnected) => Inbound::Closed,
        }
    }

    /// Wait for the next sample, polling every `poll_interval`.
    ///
    /// Returns `None` once `cancel` fires or the subscription is closed. The
    /// token is checked before every read.
    pub async fn next_polled(
        &mut self,
        cancel: &CancellationToken,
        poll_interval: Duration,
    ) -> Option<Sample> {
        loop {
            if cancel.is_cancelled() {
                return None;
            }
            match self.try_next() {
                Inbound::Sample(sample) => return Some(sample),
                Inbound::Closed => return None,
                Inbound::Empty => {
                    tokio::select! {
                        _ = cancel.cancelled() => return None,
                        _ = tokio::time::sleep(poll_interval) => {}
                    }
                }
            }
        }
    }

    /// Undeclare the subscriber. Calling it again is a no-op.
    pub fn release(&mut self) -> Result<()> {
        match self.release.take() {
            Some(release) => release(),
            None => Ok(()),
        }
    }

    pub fn is_released(&self) -> bool {
        self.release.is_none()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("key_expr", &self.key_expr)
            .field("released", &self.is_released())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(key_expr = %self.key_expr, "Failed to release subscription on drop: {}", e);
        }
    }
}

/// Check whether the concrete `key` matches the key expression `pattern`.
pub fn key_expr_matches(pattern: &str, key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('/').collect();
    let key: Vec<&str> = key.split('/').collect();
    chunks_match(&pattern, &key)
}

fn chunks_match(pattern: &[&str], key: &[&str]) -> bool {
    match (pattern.first(), key.first()) {
        (None, None) => true,
        (Some(&"**"), _) => {
            // `**` swallows zero chunks, or one chunk and stays in place.
            chunks_match(&pattern[1..], key) || (!key.is_empty() && chunks_match(pattern, &key[1..]))
        }
        (Some(&"*"), Some(_)) => chunks_match(&pattern[1..], &key[1..]),
        (Some(p), Some(k)) => p == k && chunks_match(&pattern[1..], &key[1..]),
        _ => false,
    }
}

/// Check whether two key expressions, either of which may hold wildcards,
/// match at least one common key.
pub fn key_exprs_intersect(left: &str, right: &str) -> bool {
    let left: Vec<&str> = left.split('/').collect();
    let right: Vec<&str> = right.split('/').collect();
    chunks_intersect(&left, &right)
}

fn chunks_intersect(left: &[&str], right: &[&str]) -> bool {
    match (left.first(), right.first()) {
        (None, None) => true,
        (Some(&"**"), _) => {
            chunks_intersect(&left[1..], right)
                || (!right.is_empty() && chunks_intersect(left, &right[1..]))
        }
        (_, Some(&"**")) => {
            chunks_intersect(left, &right[1..])
                || (!left.is_empty() && chunks_intersect(&left[1..], right))
        }
        (Some(l), Some(r)) => {
            (*l == "*" || *r == "*" || l == r) && chunks_intersect(&left[1..], &right[1..])
        }
        _ => false,
    }
}
