//! In-process transport.
//!
//! Routes samples between publishers, subscribers and queryables living in the
//! same process. Useful for tests, benches and single-process deployments.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use super::{Sample, Subscription, Transport, key_expr_matches, key_exprs_intersect};
use crate::{Result, TcnError};

type QueryHandler = Arc<dyn Fn(&str, &[u8]) -> Vec<Sample> + Send + Sync>;

struct Subscriber {
    id: u64,
    key_expr: String,
    tx: mpsc::UnboundedSender<Sample>,
}

struct Queryable {
    id: u64,
    key_expr: String,
    handler: QueryHandler,
}

#[derive(Default)]
struct State {
    next_id: u64,
    subscribers: Vec<Subscriber>,
    queryables: Vec<Queryable>,
    fail_queries: bool,
    fail_subscriptions: bool,
}

impl State {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Bus session whose peers all live in this process.
///
/// Clones share the same session.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    state: Arc<Mutex<State>>,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a sample to every subscriber whose key expression matches `key`.
    ///
    /// Returns the number of subscribers reached.
    pub fn publish(&self, key: &str, payload: Vec<u8>, attachment: Option<&str>) -> usize {
        let state = lock(&self.state);
        let mut delivered = 0;
        for sub in state.subscribers.iter().filter(|s| key_expr_matches(&s.key_expr, key)) {
            let sample = Sample {
                key_expr: key.to_string(),
                payload: payload.clone(),
                attachment: attachment.map(str::to_string),
            };
            if sub.tx.send(sample).is_ok() {
                delivered += 1;
            }
        }
        trace!(key, delivered, "Published sample");
        delivered
    }

    /// Answer queries on `key` with `handler(query_key, payload)`.
    ///
    /// Returns an id for [`undeclare_queryable`](Self::undeclare_queryable).
    pub fn declare_queryable<F>(&self, key: impl Into<String>, handler: F) -> u64
    where
        F: Fn(&str, &[u8]) -> Vec<Sample> + Send + Sync + 'static,
    {
        let mut state = lock(&self.state);
        let id = state.allocate_id();
        state.queryables.push(Queryable { id, key_expr: key.into(), handler: Arc::new(handler) });
        id
    }

    pub fn undeclare_queryable(&self, id: u64) {
        lock(&self.state).queryables.retain(|q| q.id != id);
    }

    /// Make every subsequent query fail with a network error.
    pub fn fail_queries(&self, fail: bool) {
        lock(&self.state).fail_queries = fail;
    }

    /// Make every subsequent subscribe fail with a network error.
    pub fn fail_subscriptions(&self, fail: bool) {
        lock(&self.state).fail_subscriptions = fail;
    }

    /// Number of live subscribers, optionally restricted to one key expression.
    pub fn subscriber_count(&self, key_expr: Option<&str>) -> usize {
        lock(&self.state)
            .subscribers
            .iter()
            .filter(|s| key_expr.is_none_or(|k| s.key_expr == k))
            .count()
    }
}

#[async_trait::async_trait]
impl Transport for MemoryTransport {
    async fn subscribe(&self, key_expr: &str) -> Result<Subscription> {
        let mut state = lock(&self.state);
        if state.fail_subscriptions {
            return Err(TcnError::network(format!("subscribe to '{key_expr}' refused")));
        }
        let id = state.allocate_id();
        let (tx, rx) = mpsc::unbounded_channel();
        state.subscribers.push(Subscriber { id, key_expr: key_expr.to_string(), tx });
        debug!(key_expr, id, "Declared subscriber");

        let weak: Weak<Mutex<State>> = Arc::downgrade(&self.state);
        Ok(Subscription::new(key_expr, rx, move || {
            if let Some(state) = weak.upgrade() {
                lock(&state).subscribers.retain(|s| s.id != id);
            }
            Ok(())
        }))
    }

    async fn query(&self, key_expr: &str, payload: Vec<u8>) -> Result<Vec<Sample>> {
        let handlers: Vec<QueryHandler> = {
            let state = lock(&self.state);
            if state.fail_queries {
                return Err(TcnError::network(format!("query on '{key_expr}' timed out")));
            }
            state
                .queryables
                .iter()
                .filter(|q| key_exprs_intersect(key_expr, &q.key_expr))
                .map(|q| q.handler.clone())
                .collect()
        };
        // Handlers run without the lock so they may publish.
        let replies: Vec<Sample> =
            handlers.iter().flat_map(|handler| handler(key_expr, &payload)).collect();
        trace!(key_expr, replies = replies.len(), "Query answered");
        Ok(replies)
    }
}
