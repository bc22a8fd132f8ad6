//! Sensor enumeration replies.

use serde::{Deserialize, Serialize};

use super::primitives::{CameraModel, RigidTransform};

/// Capabilities and calibration of one RGB-D sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraSensorMessage {
    pub color_enabled: bool,
    pub depth_enabled: bool,
    pub color_parameters: CameraModel,
    pub depth_parameters: CameraModel,
    /// Extrinsic from the color camera to the depth camera.
    pub color2depth_transform: RigidTransform,
    /// Sensor pose in the world frame.
    pub camera_pose: RigidTransform,
}

/// Reply of a sensor's `describe` queryable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceContextReply {
    pub name: String,
    pub value: CameraSensorMessage,
}

/// Empty request body for RPC queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullRequest {}
