//! Content tag and the content-specific sub-descriptor (bits 16-63).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::*;
use super::enums::{SlotValue, semantic_enum};
use super::geometry::GeometryContentConfig;
use super::generic::GenericContentConfig;
use super::image::ImageContentConfig;
use super::transform::TransformContentConfig;

semantic_enum! {
    /// Data-kind discriminator stored in bits 16-23.
    pub enum ContentType {
        None = 0x00 => "None",
        Generic = 0x01 => "Generic",
        Image = 0x02 => "Image",
        Geometry = 0x03 => "Geometry",
        Transform = 0x04 => "Transform",
        Match = 0xFF => "Match",
    }
}

/// Five 8-bit sub-fields decoded from fixed slots at offsets 24/32/40/48/56.
///
/// Each content variant instantiates this with its own enumerations; see
/// [`GenericContentConfig`], [`ImageContentConfig`], [`GeometryContentConfig`]
/// and [`TransformContentConfig`]. Unset sub-fields hold their `None` value and
/// encode as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentFields<C, F, X1, X2, M> {
    pub compression: C,
    pub format: F,
    pub custom1: X1,
    pub custom2: X2,
    pub custom_mask: M,
}

impl<C, F, X1, X2, M> ContentFields<C, F, X1, X2, M>
where
    C: SlotValue,
    F: SlotValue,
    X1: SlotValue,
    X2: SlotValue,
    M: SlotValue,
{
    pub fn new(compression: C, format: F, custom1: X1, custom2: X2, custom_mask: M) -> Self {
        Self { compression, format, custom1, custom2, custom_mask }
    }

    /// Decode the sub-fields from an identifier (or its content part).
    ///
    /// Only bits 24-63 are read; the content tag and base bits are ignored.
    pub fn from_u64(value: u64) -> Self {
        Self {
            compression: C::from_slot(slot(value, COMPRESSION_TYPE_OFFSET)),
            format: F::from_slot(slot(value, FORMAT_TYPE_OFFSET)),
            custom1: X1::from_slot(slot(value, CUSTOM1_TYPE_OFFSET)),
            custom2: X2::from_slot(slot(value, CUSTOM2_TYPE_OFFSET)),
            custom_mask: M::from_slot(slot(value, CUSTOM_MASK_TYPE_OFFSET)),
        }
    }

    /// Encode the sub-fields into bits 24-63. The content tag is left at zero.
    pub fn to_u64(&self) -> u64 {
        place(self.compression.to_slot(), COMPRESSION_TYPE_OFFSET)
            | place(self.format.to_slot(), FORMAT_TYPE_OFFSET)
            | place(self.custom1.to_slot(), CUSTOM1_TYPE_OFFSET)
            | place(self.custom2.to_slot(), CUSTOM2_TYPE_OFFSET)
            | place(self.custom_mask.to_slot(), CUSTOM_MASK_TYPE_OFFSET)
    }

    fn write_fields(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "compression='{}', format='{}', custom1='{}', custom2='{}', custom_mask='{}'",
            self.compression.label(),
            self.format.label(),
            self.custom1.label(),
            self.custom2.label(),
            self.custom_mask.label()
        )
    }
}

/// The active content sub-descriptor of a semantic type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentConfig {
    /// Content tag 0: no content description.
    #[default]
    None,
    Generic(GenericContentConfig),
    Image(ImageContentConfig),
    Geometry(GeometryContentConfig),
    Transform(TransformContentConfig),
    /// Content tag 0xFF: content wildcard.
    Match,
    /// Unrecognised content tag. The tag is kept so it survives re-encoding.
    Invalid { tag: u8 },
}

impl ContentConfig {
    /// Interpret `bits` (bits 16-63 of an identifier) as the variant for `tag`.
    pub fn from_tag_and_bits(tag: u8, bits: u64) -> Self {
        let bits = bits & SEMANTIC_TYPE_MASK;
        match ContentType::from_u8(tag) {
            Some(ContentType::None) => ContentConfig::None,
            Some(ContentType::Generic) => {
                ContentConfig::Generic(GenericContentConfig::from_u64(bits))
            }
            Some(ContentType::Image) => ContentConfig::Image(ImageContentConfig::from_u64(bits)),
            Some(ContentType::Geometry) => {
                ContentConfig::Geometry(GeometryContentConfig::from_u64(bits))
            }
            Some(ContentType::Transform) => {
                ContentConfig::Transform(TransformContentConfig::from_u64(bits))
            }
            Some(ContentType::Match) => ContentConfig::Match,
            None => ContentConfig::Invalid { tag },
        }
    }

    /// Build the default (all sub-fields unset) configuration for `content_type`.
    pub fn empty(content_type: ContentType) -> Self {
        Self::from_tag_and_bits(content_type.as_u8(), 0)
    }

    /// Content tag implied by the variant.
    pub fn tag(&self) -> u8 {
        match self {
            ContentConfig::None => ContentType::None.as_u8(),
            ContentConfig::Generic(_) => ContentType::Generic.as_u8(),
            ContentConfig::Image(_) => ContentType::Image.as_u8(),
            ContentConfig::Geometry(_) => ContentType::Geometry.as_u8(),
            ContentConfig::Transform(_) => ContentType::Transform.as_u8(),
            ContentConfig::Match => ContentType::Match.as_u8(),
            ContentConfig::Invalid { tag } => *tag,
        }
    }

    /// Known content type, or `None` for [`ContentConfig::Invalid`].
    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            ContentConfig::Invalid { .. } => None,
            other => ContentType::from_u8(other.tag()),
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, ContentConfig::Invalid { .. })
    }

    /// Sub-descriptor bits (24-63) of the active variant, without the tag.
    pub fn to_u64(&self) -> u64 {
        match self {
            ContentConfig::Generic(cfg) => cfg.to_u64(),
            ContentConfig::Image(cfg) => cfg.to_u64(),
            ContentConfig::Geometry(cfg) => cfg.to_u64(),
            ContentConfig::Transform(cfg) => cfg.to_u64(),
            ContentConfig::None | ContentConfig::Match | ContentConfig::Invalid { .. } => 0,
        }
    }
}

impl fmt::Display for ContentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentConfig::Generic(cfg) => {
                f.write_str("content='Generic', ")?;
                cfg.write_fields(f)
            }
            ContentConfig::Image(cfg) => {
                f.write_str("content='Image', ")?;
                cfg.write_fields(f)
            }
            ContentConfig::Geometry(cfg) => {
                f.write_str("content='Geometry', ")?;
                cfg.write_fields(f)
            }
            ContentConfig::Transform(cfg) => {
                f.write_str("content='Transform', ")?;
                cfg.write_fields(f)
            }
            ContentConfig::None | ContentConfig::Match => write!(
                f,
                "content='{}', compression='', format='', custom1='', custom2='', custom_mask=''",
                ContentType::from_u8(self.tag()).unwrap_or_default()
            ),
            ContentConfig::Invalid { tag } => write!(
                f,
                "content='Invalid({tag:#04x})', compression='', format='', custom1='', custom2='', custom_mask=''"
            ),
        }
    }
}
