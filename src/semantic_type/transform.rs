//! Transform content descriptors.

use super::content::ContentFields;
use super::enums::{EmptyCustomType, EmptyMaskType, semantic_enum};

semantic_enum! {
    pub enum TransformCompressionType {
        None = 0x00 => "None",
        Match = 0xFF => "Match",
    }
}

semantic_enum! {
    pub enum TransformFormatType {
        None = 0x00 => "None",
        Translation = 0x01 => "Translation",
        Rotation = 0x02 => "Rotation",
        Scaling = 0x03 => "Scaling",
        RigidTransform = 0x04 => "RigidTransform",
        SimilarityTransform = 0x05 => "SimilarityTransform",
        AffineTransform = 0x06 => "AffineTransform",
        ProjectiveTransform = 0x07 => "ProjectiveTransform",
        Acceleration = 0x08 => "Acceleration",
        Match = 0xFF => "Match",
    }
}

semantic_enum! {
    /// Producer-specific detail stored in the first custom slot.
    pub enum TransformDetailType {
        None = 0x00 => "None",
        KinectBodyTracking = 0x01 => "KinectBodyTracking",
        Match = 0xFF => "Match",
    }
}

/// Content sub-descriptor for transforms.
pub type TransformContentConfig = ContentFields<
    TransformCompressionType,
    TransformFormatType,
    TransformDetailType,
    EmptyCustomType,
    EmptyMaskType,
>;
