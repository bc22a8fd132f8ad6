//! Sensor enumeration and stream descriptor discovery.
//!
//! Discovery runs in three steps:
//!
//! 1. [`Discovery::find_camera_sensors`] queries every sensor's `describe`
//!    queryable for its [`DeviceContextReply`].
//! 2. [`build_channel_configs`] turns the replies into a [`ChannelPlan`]: one
//!    channel per enabled color/depth stream plus calibration and pose per sensor.
//! 3. [`Discovery::resolve_stream_descriptors`] fetches each channel's
//!    [`StreamDescriptorMessage`], first by query and then by waiting on the
//!    descriptor topic, producing the [`StreamConfig`]s the router consumes.

pub mod topics;


use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::DiscoveryOptions;
use crate::messages::{
    CameraModel, DeviceContextReply, Message, NullRequest, RigidTransform, StreamDescriptorMessage,
};
use crate::registry::MessageRegistry;
use crate::transport::Transport;
use crate::types::{FrameAnnotation, StreamConfig};
use crate::{Result, TcnError};

/// One stream advertised by a sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub sensor: String,
    /// Stream name, `<sensor>_color` or `<sensor>_depth`.
    pub name: String,
    /// Descriptor topic, relative to the topic prefix.
    pub topic: String,
}

/// Channels to resolve, with per-sensor calibration and pose.
///
/// Calibration and pose are keyed by sensor name. When a sensor offers both
/// color and depth, the depth entries win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelPlan {
    pub channels: Vec<ChannelSpec>,
    pub calibrations: HashMap<String, CameraModel>,
    pub poses: HashMap<String, RigidTransform>,
}

impl ChannelPlan {
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Build the channel plan for the given sensors.
///
/// Color is handled before depth, so for a sensor with both enabled the
/// calibration map holds the depth intrinsics and the pose map holds the
/// sensor pose.
pub fn build_channel_configs(sensors: &[DeviceContextReply]) -> ChannelPlan {
    let mut plan = ChannelPlan::default();

    for sensor in sensors {
        let name = &sensor.name;
        let info = &sensor.value;

        if info.color_enabled {
            plan.channels.push(ChannelSpec {
                sensor: name.clone(),
                name: topics::color_stream_name(name),
                topic: topics::color_topic(name),
            });
            plan.calibrations.insert(name.clone(), info.color_parameters.clone());
            plan.poses.insert(name.clone(), info.color2depth_transform);
        }

        if info.depth_enabled {
            plan.channels.push(ChannelSpec {
                sensor: name.clone(),
                name: topics::depth_stream_name(name),
                topic: topics::depth_topic(name),
            });
            plan.calibrations.insert(name.clone(), info.depth_parameters.clone());
            plan.poses.insert(name.clone(), info.camera_pose);
        }

        if !info.color_enabled && !info.depth_enabled {
            debug!(sensor = %name, "Sensor has no enabled streams");
        }
    }

    plan
}

/// Stream discovery over a shared transport session.
#[derive(Clone)]
pub struct Discovery {
    transport: Arc<dyn Transport>,
    registry: Arc<MessageRegistry>,
    options: DiscoveryOptions,
}

impl Discovery {
    pub fn new(
        transport: Arc<dyn Transport>,
        registry: Arc<MessageRegistry>,
        options: DiscoveryOptions,
    ) -> Self {
        Self { transport, registry, options }
    }

    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Query `topic` for sensor descriptions.
    ///
    /// Replies that fail to decode or are not a [`DeviceContextReply`] are
    /// logged and skipped. A failing query is a network error.
    pub async fn find_camera_sensors(&self, topic: &str) -> Result<Vec<DeviceContextReply>> {
        let payload = match self.registry.encode(&Message::from(NullRequest::default())) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode null request, sending empty payload: {}", e);
                Vec::new()
            }
        };

        let samples = self.transport.query(topic, payload).await.map_err(|e| {
            TcnError::network_with_source(format!("sensor query on '{topic}' failed"), Box::new(e))
        })?;

        let mut sensors = Vec::new();
        for sample in &samples {
            let type_name = sample.type_name_or(&self.options.sensor_type);
            match self.registry.decode(type_name, &sample.payload) {
                Ok(Message::DeviceContextReply(reply)) => {
                    debug!(sensor = %reply.name, key = %sample.key_expr, "Found sensor");
                    sensors.push(reply);
                }
                Ok(_) => {
                    let err = TcnError::unknown_type(type_name, "DeviceContextReply");
                    warn!(key = %sample.key_expr, "Skipping reply: {}", err);
                }
                Err(e) => {
                    warn!(key = %sample.key_expr, "Skipping undecodable reply: {}", e);
                }
            }
        }

        info!(topic, count = sensors.len(), "Sensor enumeration finished");
        Ok(sensors)
    }

    /// Resolve the stream descriptor published on `channel.topic`.
    ///
    /// A single query is tried first; a descriptor found this way is annotated
    /// with its buffer info and the given calibration and pose. If the query
    /// yields no descriptor, the topic is subscribed and polled until one
    /// arrives or `cancel` fires. That config carries only the sensor and
    /// descriptor, without annotations. Cancellation
    /// without a descriptor is a network error. The subscription is released
    /// on every path.
    pub async fn get_or_waitfor_descriptor(
        &self,
        stream_index: usize,
        channel: &ChannelSpec,
        calibration: Option<&CameraModel>,
        pose: Option<&RigidTransform>,
        cancel: &CancellationToken,
    ) -> Result<StreamConfig> {
        let topic = channel.topic.as_str();
        let default_type = self.options.descriptor_type.as_str();

        let samples = match self.transport.query(topic, Vec::new()).await {
            Ok(samples) => samples,
            Err(e) => {
                warn!(topic, "Descriptor query failed, waiting on subscription: {}", e);
                Vec::new()
            }
        };
        for sample in &samples {
            match self.registry.decode_sample(sample, default_type) {
                Ok(Message::StreamDescriptor(descriptor)) => {
                    debug!(topic, stream = %channel.name, "Descriptor received by query");
                    return Ok(build_stream_config(stream_index, channel, descriptor, calibration, pose));
                }
                Ok(_) => debug!(topic, "Ignoring non-descriptor reply"),
                Err(e) => warn!(topic, "Skipping undecodable descriptor reply: {}", e),
            }
        }

        let mut subscription = self.transport.subscribe(topic).await.map_err(|e| {
            TcnError::network_with_source(format!("subscribe to '{topic}' failed"), Box::new(e))
        })?;
        info!(topic, stream = %channel.name, "Waiting for stream descriptor");

        let mut resolved = None;
        while let Some(sample) = subscription.next_polled(cancel, self.options.poll_interval()).await {
            match self.registry.decode_sample(&sample, default_type) {
                Ok(Message::StreamDescriptor(descriptor)) => {
                    resolved = Some(descriptor);
                    break;
                }
                Ok(_) => debug!(topic, "Ignoring non-descriptor sample"),
                Err(e) => warn!(topic, "Skipping undecodable descriptor sample: {}", e),
            }
        }

        if let Err(e) = subscription.release() {
            error!(topic, "Failed to release descriptor subscription: {}", e);
        }

        match resolved {
            Some(descriptor) => {
                debug!(topic, stream = %channel.name, "Descriptor received by subscription");
                Ok(bare_stream_config(stream_index, channel, descriptor))
            }
            None => Err(TcnError::network("failed to discover stream config")),
        }
    }

    /// Resolve every channel of `plan`, in order.
    ///
    /// Topics are qualified with `topic_prefix` and each stream's index is its
    /// position in the plan. Channels that fail to resolve are logged and left
    /// out of the result.
    pub async fn resolve_stream_descriptors(
        &self,
        topic_prefix: &str,
        plan: &ChannelPlan,
        cancel: &CancellationToken,
    ) -> Vec<StreamConfig> {
        let mut streams = Vec::with_capacity(plan.len());

        for (index, channel) in plan.channels.iter().enumerate() {
            let qualified = ChannelSpec {
                topic: topics::qualified(topic_prefix, &channel.topic),
                ..channel.clone()
            };
            info!(stream = %qualified.name, topic = %qualified.topic, "Resolving stream");

            let result = self
                .get_or_waitfor_descriptor(
                    index,
                    &qualified,
                    plan.calibrations.get(&channel.sensor),
                    plan.poses.get(&channel.sensor),
                    cancel,
                )
                .await;

            match result {
                Ok(config) => streams.push(config),
                Err(e) => error!(stream = %qualified.name, "Stream not resolved: {}", e),
            }
        }

        streams
    }
}

fn build_stream_config(
    stream_index: usize,
    channel: &ChannelSpec,
    descriptor: StreamDescriptorMessage,
    calibration: Option<&CameraModel>,
    pose: Option<&RigidTransform>,
) -> StreamConfig {
    let mut config = StreamConfig::new(stream_index, channel.name.clone(), channel.topic.clone())
        .with_sensor(channel.sensor.clone());
    config.add_annotation(FrameAnnotation::BufferInfo(descriptor.buffer_info.clone()));
    if let Some(calibration) = calibration {
        config.add_annotation(FrameAnnotation::CameraModel(calibration.clone()));
    }
    if let Some(pose) = pose {
        config.add_annotation(FrameAnnotation::SensorPose(*pose));
    }
    config.descriptor = Some(descriptor);
    config
}

/// Stream config carrying only the sensor and descriptor, without annotations.
fn bare_stream_config(
    stream_index: usize,
    channel: &ChannelSpec,
    descriptor: StreamDescriptorMessage,
) -> StreamConfig {
    let mut config = StreamConfig::new(stream_index, channel.name.clone(), channel.topic.clone())
        .with_sensor(channel.sensor.clone());
    config.descriptor = Some(descriptor);
    config
}
