//! Spatial information service (SIS) join announcements.

use serde::{Deserialize, Serialize};

use super::primitives::{RigidTransform, Vector3};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SisScope {
    #[default]
    Local,
    Global,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateAxis {
    #[default]
    X,
    XNegative,
    Y,
    YNegative,
    Z,
    ZNegative,
}

/// Handedness and axis naming of a component's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordinateSystem {
    pub forward: CoordinateAxis,
    pub right: CoordinateAxis,
    pub up: CoordinateAxis,
    pub dimensions: i8,
}

impl Default for CoordinateSystem {
    fn default() -> Self {
        Self {
            forward: CoordinateAxis::X,
            right: CoordinateAxis::Y,
            up: CoordinateAxis::Z,
            dimensions: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SisComponentRef {
    pub name: String,
}

impl SisComponentRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SisRelationRef {
    pub from: SisComponentRef,
    pub to: SisComponentRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SisTransformation {
    Pose6d(RigidTransform),
    Translation3d(Vector3),
}

impl Default for SisTransformation {
    fn default() -> Self {
        SisTransformation::Pose6d(RigidTransform::default())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SisComponentMessage {
    pub node: SisComponentRef,
    #[serde(default)]
    pub coord: CoordinateSystem,
    pub active: bool,
    #[serde(default)]
    pub scope: SisScope,
    #[serde(default)]
    pub tracker_stream_descriptor_topic: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SisRelationMessage {
    pub edge: SisRelationRef,
    pub transform: SisTransformation,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub tracker_stream_descriptor_topic: String,
}

/// Announces a client's components and the relations between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SisJoinMessage {
    pub origin: SisComponentRef,
    #[serde(default)]
    pub components: Vec<SisComponentMessage>,
    #[serde(default)]
    pub relations: Vec<SisRelationMessage>,
}

impl SisJoinMessage {
    /// Find a component by node name.
    pub fn component(&self, name: &str) -> Option<&SisComponentMessage> {
        self.components.iter().find(|c| c.node.name == name)
    }
}
