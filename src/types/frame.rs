//! Frames delivered to worker sinks.

use std::sync::Arc;

use super::Annotations;
use crate::messages::Message;
use crate::semantic_type::{self, SemanticType};

/// One decoded message stamped with its stream's metadata.
///
/// Annotations are shared with the producing stream; cloning a frame does not
/// copy them.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Capture timestamp. Zero only on the end-of-stream sentinel.
    pub timestamp: u64,
    /// Packed semantic type identifier of the stream.
    pub semantic_type: u64,
    pub stream_index: usize,
    pub message: Message,
    pub annotations: Arc<Annotations>,
}

impl Frame {
    pub fn new(
        timestamp: u64,
        semantic_type: u64,
        stream_index: usize,
        message: Message,
        annotations: Arc<Annotations>,
    ) -> Self {
        Self { timestamp, semantic_type, stream_index, message, annotations }
    }

    /// End-of-stream marker: timestamp 0, semantic type 0, invalid payload.
    pub fn sentinel(stream_index: usize) -> Self {
        Self::new(0, 0, stream_index, Message::Invalid, Arc::default())
    }

    pub fn is_sentinel(&self) -> bool {
        self.timestamp == 0 && self.message.is_invalid()
    }

    /// Decoded form of [`semantic_type`](Self::semantic_type).
    pub fn semantic(&self) -> SemanticType {
        semantic_type::decode(self.semantic_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::VideoStreamMessage;

    #[test]
    fn sentinel_shape() {
        let frame = Frame::sentinel(2);
        assert!(frame.is_sentinel());
        assert_eq!(frame.stream_index, 2);
        assert_eq!(frame.semantic_type, 0);
        assert!(frame.annotations.is_empty());
    }

    #[test]
    fn data_frames_are_not_sentinels() {
        let msg = Message::from(VideoStreamMessage::new(10, vec![]));
        let frame = Frame::new(10, 0x0002_8348, 1, msg, Arc::default());
        assert!(!frame.is_sentinel());
        assert_eq!(frame.semantic().base.identifier(), 0x8348);
    }
}
