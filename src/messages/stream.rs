//! Stream descriptors and the video payload they announce.

use serde::{Deserialize, Serialize};

use crate::semantic_type::{self, SemanticType};

/// Layout of the buffers carried by a stream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BufferInfo {
    /// Packed semantic type identifier of every frame on the stream.
    pub semantic_type: u64,
    pub width: u32,
    pub height: u32,
    /// Row stride in bytes, 0 when not applicable.
    #[serde(default)]
    pub stride: u32,
}

impl BufferInfo {
    pub fn semantic(&self) -> SemanticType {
        semantic_type::decode(self.semantic_type)
    }
}

/// Published on a sensor's descriptor topic; points at the data topic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamDescriptorMessage {
    /// Topic the stream's payload messages are published on.
    pub stream_topic: String,
    pub buffer_info: BufferInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoStreamMessage {
    /// Capture time in nanoseconds. Zero marks an unusable message.
    pub timestamp: u64,
    #[serde(default)]
    pub sequence: u64,
    #[serde(default)]
    pub data: Vec<u8>,
}

impl VideoStreamMessage {
    pub fn new(timestamp: u64, data: Vec<u8>) -> Self {
        Self { timestamp, sequence: 0, data }
    }
}
