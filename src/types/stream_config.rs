//! Resolved description of one discovered stream.

use crate::messages::StreamDescriptorMessage;

use super::{Annotations, FrameAnnotation};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamConfig {
    /// Position in worker-assignment space.
    pub stream_index: usize,
    pub stream_name: String,
    /// Descriptor topic the stream was discovered on.
    pub topic: String,
    pub sensor_name: String,
    /// Descriptor fetched from the producer, if resolved.
    pub descriptor: Option<StreamDescriptorMessage>,
    pub annotations: Annotations,
}

impl StreamConfig {
    pub fn new(stream_index: usize, stream_name: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            stream_index,
            stream_name: stream_name.into(),
            topic: topic.into(),
            ..Default::default()
        }
    }

    pub fn with_sensor(mut self, sensor_name: impl Into<String>) -> Self {
        self.sensor_name = sensor_name.into();
        self
    }

    pub fn add_annotation(&mut self, annotation: FrameAnnotation) {
        self.annotations.insert(annotation);
    }

    /// Data topic announced by the descriptor.
    pub fn stream_topic(&self) -> Option<&str> {
        self.descriptor.as_ref().map(|d| d.stream_topic.as_str())
    }

    /// Semantic type announced by the descriptor.
    pub fn semantic_type(&self) -> Option<u64> {
        self.descriptor.as_ref().map(|d| d.buffer_info.semantic_type)
    }
}
