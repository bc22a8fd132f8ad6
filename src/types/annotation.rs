//! Per-stream metadata attached to every frame.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::messages::{BufferInfo, CameraModel, RigidTransform};

/// Annotation slot. Each stream holds at most one annotation per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnnotationKey {
    BufferInfo,
    CameraModel,
    SensorPose,
}

impl AnnotationKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            AnnotationKey::BufferInfo => "BufferInfo",
            AnnotationKey::CameraModel => "CameraModel",
            AnnotationKey::SensorPose => "SensorPose",
        }
    }
}

impl fmt::Display for AnnotationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameAnnotation {
    BufferInfo(BufferInfo),
    CameraModel(CameraModel),
    SensorPose(RigidTransform),
}

impl FrameAnnotation {
    pub fn key(&self) -> AnnotationKey {
        match self {
            FrameAnnotation::BufferInfo(_) => AnnotationKey::BufferInfo,
            FrameAnnotation::CameraModel(_) => AnnotationKey::CameraModel,
            FrameAnnotation::SensorPose(_) => AnnotationKey::SensorPose,
        }
    }
}

/// Key-unique annotation map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    entries: HashMap<AnnotationKey, FrameAnnotation>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `annotation` under its key, returning the one it replaced.
    pub fn insert(&mut self, annotation: FrameAnnotation) -> Option<FrameAnnotation> {
        self.entries.insert(annotation.key(), annotation)
    }

    pub fn get(&self, key: AnnotationKey) -> Option<&FrameAnnotation> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: AnnotationKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnnotationKey, &FrameAnnotation)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn buffer_info(&self) -> Option<&BufferInfo> {
        match self.get(AnnotationKey::BufferInfo) {
            Some(FrameAnnotation::BufferInfo(info)) => Some(info),
            _ => None,
        }
    }

    pub fn camera_model(&self) -> Option<&CameraModel> {
        match self.get(AnnotationKey::CameraModel) {
            Some(FrameAnnotation::CameraModel(model)) => Some(model),
            _ => None,
        }
    }

    pub fn sensor_pose(&self) -> Option<&RigidTransform> {
        match self.get(AnnotationKey::SensorPose) {
            Some(FrameAnnotation::SensorPose(pose)) => Some(pose),
            _ => None,
        }
    }
}

impl FromIterator<FrameAnnotation> for Annotations {
    fn from_iter<I: IntoIterator<Item = FrameAnnotation>>(iter: I) -> Self {
        let mut annotations = Annotations::new();
        for annotation in iter {
            annotations.insert(annotation);
        }
        annotations
    }
}
