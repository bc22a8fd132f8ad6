//! Sensor stream discovery and worker-sharded frame routing over a pub/sub bus.
//!
//! tcnart finds the camera streams advertised on a publish/subscribe bus,
//! works out what each stream carries from a compact 64-bit semantic type, and
//! fans decoded frames out to a fixed pool of worker sinks.
//!
//! # Features
//!
//! - **Semantic types**: a 64-bit identifier packing scalar, cardinality,
//!   container and memory representation plus a content-specific descriptor
//!   (image, geometry, transform or generic data)
//! - **Discovery**: sensor enumeration by query, and descriptor resolution by
//!   query with a subscribe-and-wait fallback
//! - **Routing**: one receive loop per stream, frames sharded to worker sinks by
//!   `stream_index % num_workers`
//! - **SIS joins**: a single-topic listener for spatial anchor join announcements
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use futures::StreamExt;
//! use tokio_util::sync::CancellationToken;
//! use tcnart::config::TcnConfig;
//! use tcnart::discovery::{Discovery, build_channel_configs};
//! use tcnart::registry::MessageRegistry;
//! use tcnart::router::FrameRouter;
//! use tcnart::sink::ChannelSink;
//! use tcnart::transport::{MemoryTransport, Transport};
//!
//! #[tokio::main]
//! async fn main() -> tcnart::Result<()> {
//!     let config = TcnConfig::from_path("tcnart.yaml")?;
//!     let transport: Arc<dyn Transport> = Arc::new(MemoryTransport::new());
//!     let registry = Arc::new(MessageRegistry::with_default_codecs());
//!     let cancel = CancellationToken::new();
//!
//!     let discovery = Discovery::new(transport.clone(), registry.clone(), config.discovery.clone());
//!     let sensors = discovery.find_camera_sensors(&config.describe_topic()).await?;
//!     let plan = build_channel_configs(&sensors);
//!     let streams = discovery.resolve_stream_descriptors(&config.topic_prefix, &plan, &cancel).await;
//!
//!     let (sinks, mut outputs): (Vec<_>, Vec<_>) =
//!         (0..config.num_workers).map(|_| ChannelSink::shared(64)).unzip();
//!     let router = FrameRouter::new(transport, registry, config.router.clone());
//!     let receivers =
//!         router.start_all_receivers(config.num_workers, &sinks, &streams, cancel.clone())?;
//!
//!     // Stop after a minute of capture.
//!     let stop = cancel.clone();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_secs(60)).await;
//!         stop.cancel();
//!     });
//!
//!     loop {
//!         tokio::select! {
//!             _ = cancel.cancelled() => break,
//!             frame = outputs[0].next() => match frame {
//!                 Some(frame) if !frame.is_sentinel() => {
//!                     println!("stream {} @ {}", frame.stream_index, frame.timestamp);
//!                 }
//!                 _ => break,
//!             },
//!         }
//!     }
//!     receivers.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod discovery;
mod error;
pub mod messages;
pub mod registry;
pub mod router;
pub mod semantic_type;
pub mod sink;
pub mod sis;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod transport;
pub mod types;

// Core exports
pub use error::*;
pub use types::*;

// Main API exports
pub use config::TcnConfig;
pub use discovery::{ChannelPlan, ChannelSpec, Discovery, build_channel_configs};
pub use messages::Message;
pub use registry::MessageRegistry;
pub use router::{FrameRouter, ReceiverSet, ReceiverStats, worker_slot};
pub use semantic_type::SemanticType;
pub use sink::{CallbackSink, ChannelSink, CollectorSink, SharedSink, Sink};
pub use sis::SisJoinListener;
pub use transport::{MemoryTransport, Sample, Subscription, Transport};
