//! Fixtures shared by unit tests, integration tests and benches.
//!
//! Everything here talks to a [`MemoryTransport`] and encodes with the global
//! registry, so tests exercise the same codecs as production code.

#![cfg(any(test, feature = "benchmark"))]

use std::sync::Arc;
use std::time::Duration;

use crate::messages::{
    BufferInfo, CameraModel, CameraSensorMessage, DeviceContextReply, Message, RigidTransform,
    StreamDescriptorMessage, Vector3, VideoStreamMessage,
};
use crate::registry::MessageRegistry;
use crate::semantic_type::{
    self, BaseType, CardinalityType, ContainerType, ContentConfig, ImageCompressionType,
    ImageContentConfig, ImageFormatType, MemoryRepresentationType, ScalarType, SemanticType,
};
use crate::transport::{MemoryTransport, Sample};
use crate::types::StreamConfig;

/// Install a test subscriber once; later calls are no-ops.
#[cfg(test)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tcnart=debug")),
        )
        .with_test_writer()
        .try_init();
}

pub fn camera_model(width: u32, height: u32) -> CameraModel {
    CameraModel {
        width,
        height,
        fx: width as f64 * 0.8,
        fy: width as f64 * 0.8,
        cx: width as f64 / 2.0,
        cy: height as f64 / 2.0,
        distortion: vec![0.0; 5],
    }
}

/// Sensor reply with distinguishable color and depth calibration.
///
/// Color intrinsics are 1920x1080 with a color-to-depth offset of 1 m on x;
/// depth intrinsics are 640x576 with the sensor 2 m up.
pub fn sensor_reply(name: &str, color: bool, depth: bool) -> DeviceContextReply {
    DeviceContextReply {
        name: name.to_string(),
        value: CameraSensorMessage {
            color_enabled: color,
            depth_enabled: depth,
            color_parameters: camera_model(1920, 1080),
            depth_parameters: camera_model(640, 576),
            color2depth_transform: RigidTransform::from_translation(Vector3::new(1.0, 0.0, 0.0)),
            camera_pose: RigidTransform::from_translation(Vector3::new(0.0, 0.0, 2.0)),
        },
    }
}

/// Semantic type of a zdepth-compressed 16-bit depth image.
pub fn depth_semantic_type() -> u64 {
    let mut st = SemanticType::new(BaseType::new(
        ScalarType::UInt16,
        CardinalityType::Fixed,
        ContainerType::Array2D,
        MemoryRepresentationType::Compressed,
    ));
    st.content = ContentConfig::Image(ImageContentConfig {
        compression: ImageCompressionType::Zdepth,
        format: ImageFormatType::Depth,
        ..Default::default()
    });
    semantic_type::encode(&st)
}

/// Semantic type of a JPEG-compressed RGB image.
pub fn color_semantic_type() -> u64 {
    let mut st = SemanticType::new(BaseType::new(
        ScalarType::UChar,
        CardinalityType::Fixed,
        ContainerType::Array2D,
        MemoryRepresentationType::Compressed,
    ));
    st.content = ContentConfig::Image(ImageContentConfig {
        compression: ImageCompressionType::Jpeg,
        format: ImageFormatType::Rgb,
        ..Default::default()
    });
    semantic_type::encode(&st)
}

pub fn descriptor(stream_topic: &str, semantic_type: u64) -> StreamDescriptorMessage {
    StreamDescriptorMessage {
        stream_topic: stream_topic.to_string(),
        buffer_info: BufferInfo { semantic_type, width: 640, height: 576, stride: 1280 },
    }
}

/// Resolved stream config whose descriptor points at `stream_topic`.
pub fn stream_config(index: usize, stream_topic: &str, semantic_type: u64) -> StreamConfig {
    let mut config = StreamConfig::new(index, format!("cam{index:02}_depth"), format!("dsc/{index}"));
    config.descriptor = Some(descriptor(stream_topic, semantic_type));
    config
}

pub fn video_message(timestamp: u64) -> Message {
    Message::from(VideoStreamMessage::new(timestamp, vec![0u8; 16]))
}

/// Encode `msg` with the global registry and wrap it as a reply sample.
pub fn encoded_sample(key: &str, msg: &Message) -> Sample {
    let registry = MessageRegistry::global();
    let payload = registry.encode(msg).expect("fixture messages always encode");
    let sample = Sample::new(key, payload);
    match msg.type_name() {
        Some(type_name) => sample.with_attachment(type_name),
        None => sample,
    }
}

/// Publish `msg` on `key` with its type name as attachment.
pub fn publish(bus: &MemoryTransport, key: &str, msg: &Message) -> usize {
    let sample = encoded_sample(key, msg);
    bus.publish(key, sample.payload, sample.attachment.as_deref())
}

/// Answer queries on `key` with a fixed message.
pub fn serve(bus: &MemoryTransport, key: &str, msg: Message) -> u64 {
    let sample = encoded_sample(key, &msg);
    bus.declare_queryable(key, move |_, _| vec![sample.clone()])
}

pub fn shared_bus() -> (MemoryTransport, Arc<dyn crate::transport::Transport>) {
    let bus = MemoryTransport::new();
    let shared: Arc<dyn crate::transport::Transport> = Arc::new(bus.clone());
    (bus, shared)
}

/// Poll `condition` every millisecond until it holds or `timeout` elapses.
pub async fn wait_until<F: Fn() -> bool>(condition: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    condition()
}
