//! Core data types flowing from discovery to the worker sinks.
//!
//! - [`StreamConfig`] describes one discovered stream and its annotations
//! - [`Frame`] is one decoded message stamped with its stream's semantic type
//! - [`Annotations`] holds the per-stream metadata (buffer info, calibration,
//!   pose) shared by every frame of that stream
//!
//! ```rust
//! use std::sync::Arc;
//! use tcnart::types::{Annotations, Frame, FrameAnnotation, StreamConfig};
//! use tcnart::messages::{BufferInfo, Message, VideoStreamMessage};
//!
//! let mut cfg = StreamConfig::new(0, "cam01_color", "tcn/cam01/cfg/dsc/color_image_bitstream");
//! cfg.add_annotation(FrameAnnotation::BufferInfo(BufferInfo::default()));
//!
//! let msg = Message::from(VideoStreamMessage::new(1_000, vec![]));
//! let frame = Frame::new(1_000, 0, cfg.stream_index, msg, Arc::new(cfg.annotations.clone()));
//! assert!(!frame.is_sentinel());
//! assert!(frame.annotations.buffer_info().is_some());
//! ```

mod annotation;
mod frame;
mod stream_config;

pub use annotation::{AnnotationKey, Annotations, FrameAnnotation};
pub use frame::Frame;
pub use stream_config::StreamConfig;
