//! Geometry content descriptors.
//!
//! Unlike the other content kinds, the custom-mask slot of a geometry
//! descriptor is a raw attribute bitmask ([`GeometryAttributes`]).

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::{BitOr, BitOrAssign};

use super::content::ContentFields;
use super::enums::{EmptyCustomType, SlotValue, semantic_enum};

semantic_enum! {
    pub enum GeometryCompressionType {
        None = 0x00 => "None",
        Uncompressed = 0x01 => "Uncompressed",
        Draco = 0x02 => "Draco",
        Match = 0xFF => "Match",
    }
}

semantic_enum! {
    pub enum GeometryFormatType {
        None = 0x00 => "None",
        Point = 0x01 => "Point",
        Anchor = 0x02 => "Anchor",
        Sprite = 0x03 => "Sprite",
        SurfaceMesh = 0x04 => "SurfaceMesh",
        Spline = 0x05 => "Spline",
        Nurbs = 0x06 => "Nurbs",
        VoxelGrid = 0x07 => "VoxelGrid",
        SparseVoxelGrid = 0x08 => "SparseVoxelGrid",
        Match = 0xFF => "Match",
    }
}

/// Bitmask of per-element geometry attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeometryAttributes(pub u8);

impl GeometryAttributes {
    pub const NONE: Self = Self(0x00);
    pub const POSITION: Self = Self(0x01);
    pub const NORMAL: Self = Self(0x02);
    pub const TEXTURE_COORDINATE: Self = Self(0x04);
    pub const RADIUS: Self = Self(0x08);
    pub const COLOR: Self = Self(0x10);
    pub const FACE: Self = Self(0x20);
    pub const COVARIANCE: Self = Self(0x40);
    pub const ID: Self = Self(0x80);

    const NAMED: [(Self, &'static str); 8] = [
        (Self::POSITION, "Position"),
        (Self::NORMAL, "Normal"),
        (Self::TEXTURE_COORDINATE, "TextureCoordinate"),
        (Self::RADIUS, "Radius"),
        (Self::COLOR, "Color"),
        (Self::FACE, "Face"),
        (Self::COVARIANCE, "Covariance"),
        (Self::ID, "Id"),
    ];

    /// OR together a list of attributes.
    pub fn combine(flags: &[GeometryAttributes]) -> Self {
        flags.iter().copied().collect()
    }

    /// Check whether every bit of `flags` is set.
    pub fn contains(&self, flags: GeometryAttributes) -> bool {
        (self.0 & flags.0) == flags.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl BitOr for GeometryAttributes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for GeometryAttributes {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<GeometryAttributes> for GeometryAttributes {
    fn from_iter<I: IntoIterator<Item = GeometryAttributes>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, |acc, flag| acc | flag)
    }
}

impl SlotValue for GeometryAttributes {
    fn from_slot(raw: u8) -> Self {
        Self(raw)
    }

    fn to_slot(self) -> u8 {
        self.0
    }

    fn label(self) -> Cow<'static, str> {
        if self.is_empty() {
            return Cow::Borrowed("None");
        }
        let names: Vec<&str> = Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        Cow::Owned(names.join("|"))
    }
}

/// Content sub-descriptor for geometry.
pub type GeometryContentConfig = ContentFields<
    GeometryCompressionType,
    GeometryFormatType,
    EmptyCustomType,
    EmptyCustomType,
    GeometryAttributes,
>;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn attributes_combine_with_or() {
        let attrs = GeometryAttributes::POSITION | GeometryAttributes::NORMAL | GeometryAttributes::COLOR;
        assert_eq!(attrs.bits(), 0x13);
        assert!(attrs.contains(GeometryAttributes::NORMAL));
        assert!(!attrs.contains(GeometryAttributes::FACE));
        assert_eq!(
            GeometryAttributes::combine(&[GeometryAttributes::POSITION, GeometryAttributes::ID]).bits(),
            0x81
        );
        assert_eq!(attrs.label(), "Position|Normal|Color");
        assert_eq!(GeometryAttributes::NONE.label(), "None");
    }

    #[test]
    fn draco_point_cloud_descriptor() {
        let cfg = GeometryContentConfig {
            compression: GeometryCompressionType::Draco,
            format: GeometryFormatType::Point,
            custom_mask: GeometryAttributes::POSITION | GeometryAttributes::COLOR,
            ..Default::default()
        };
        let bits = cfg.to_u64();
        assert_eq!(bits >> 56, 0x11);
        assert_eq!(GeometryContentConfig::from_u64(bits), cfg);
    }

    proptest! {
        #[test]
        fn any_attribute_mask_roundtrips(mask in any::<u8>()) {
            let cfg = GeometryContentConfig {
                custom_mask: GeometryAttributes(mask),
                ..Default::default()
            };
            prop_assert_eq!(GeometryContentConfig::from_u64(cfg.to_u64()).custom_mask.bits(), mask);
        }
    }
}
