//! Semantic type codec.
//!
//! A semantic type identifier is a single `u64` describing what kind of data a
//! stream carries. Producers put it in their stream descriptor and consumers
//! filter on it without an extra handshake.
//!
//! ## Layout
//!
//! - Bits 0-15 form the [`BaseType`]: scalar, cardinality, container and memory
//!   representation.
//! - Bits 16-23 hold the [`ContentType`] tag.
//! - Bits 24-63 hold a content-specific sub-descriptor ([`ContentConfig`]):
//!   compression, format, two custom slots and a custom mask.
//!
//! ## Example
//!
//! ```rust
//! use tcnart::semantic_type::*;
//!
//! let mut st = SemanticType::new(BaseType::new(
//!     ScalarType::UChar,
//!     CardinalityType::Fixed,
//!     ContainerType::Array2D,
//!     MemoryRepresentationType::Compressed,
//! ));
//! st.content = ContentConfig::Image(ImageContentConfig {
//!     compression: ImageCompressionType::Jpeg,
//!     format: ImageFormatType::Rgb,
//!     ..Default::default()
//! });
//!
//! let id = encode(&st);
//! assert_eq!(decode(id), st);
//! assert_eq!(id >> 16 & 0xFF, 0x02);
//! ```

mod base;
mod constants;
mod content;
mod enums;
mod generic;
mod geometry;
mod image;
mod transform;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use base::{BaseType, CardinalityType, ContainerType, MemoryRepresentationType, ScalarType};
pub use constants::*;
pub use content::{ContentConfig, ContentFields, ContentType};
pub use enums::{EmptyCustomType, EmptyMaskType, SemanticEnum, SlotValue};
pub use generic::{GenericCompressionType, GenericContentConfig, GenericFormatType};
pub use geometry::{
    GeometryAttributes, GeometryCompressionType, GeometryContentConfig, GeometryFormatType,
};
pub use image::{ImageCompressionType, ImageContentConfig, ImageFormatType};
pub use transform::{
    TransformCompressionType, TransformContentConfig, TransformDetailType, TransformFormatType,
};

/// Decoded form of a semantic type identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SemanticType {
    pub base: BaseType,
    pub content: ContentConfig,
}

impl SemanticType {
    /// Create a semantic type with no content description.
    pub fn new(base: BaseType) -> Self {
        Self { base, content: ContentConfig::None }
    }

    /// Decode an identifier. See [`decode`].
    pub fn from_identifier(id: Identifier) -> Self {
        let base = BaseType::from_identifier((id & BASE_TYPE_MASK) as BaseIdentifier);
        let tag = slot(id, CONTENT_TYPE_OFFSET);
        let content = ContentConfig::from_tag_and_bits(tag, id & SEMANTIC_TYPE_MASK);
        Self { base, content }
    }

    /// Encode into an identifier. See [`encode`].
    ///
    /// The content tag is always derived from the active content variant,
    /// never from whatever tag bits the payload might carry.
    pub fn to_identifier(&self) -> Identifier {
        let payload = self.content.to_u64() & CONTENT_PAYLOAD_MASK;
        let tag = place(self.content.tag(), CONTENT_TYPE_OFFSET);
        let base = self.base.identifier() as u64 & BASE_TYPE_MASK;
        payload | tag | base
    }

    /// Replace the content description by interpreting `bits` (bits 16-63 of
    /// an identifier, tag ignored) as `content_type`.
    pub fn set_content_type(&mut self, content_type: ContentType, bits: u64) {
        self.content = ContentConfig::from_tag_and_bits(content_type.as_u8(), bits);
    }

    /// Check whether the base type packed in `other` is compatible with this one.
    pub fn is_compatible(&self, other: BaseIdentifier) -> bool {
        self.base.is_compatible(other)
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.base.scalar
    }

    pub fn set_scalar_type(&mut self, scalar: ScalarType) {
        self.base.scalar = scalar;
    }

    pub fn cardinality_type(&self) -> CardinalityType {
        self.base.cardinality
    }

    pub fn set_cardinality_type(&mut self, cardinality: CardinalityType) {
        self.base.cardinality = cardinality;
    }

    pub fn container_type(&self) -> ContainerType {
        self.base.container
    }

    pub fn set_container_type(&mut self, container: ContainerType) {
        self.base.container = container;
    }

    pub fn memory_representation_type(&self) -> MemoryRepresentationType {
        self.base.memory_representation
    }

    pub fn set_memory_representation_type(&mut self, memory: MemoryRepresentationType) {
        self.base.memory_representation = memory;
    }
}

impl From<Identifier> for SemanticType {
    fn from(id: Identifier) -> Self {
        Self::from_identifier(id)
    }
}

impl From<SemanticType> for Identifier {
    fn from(st: SemanticType) -> Self {
        st.to_identifier()
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SemanticType(scalar='{}', cardinality='{}', container='{}', memory_representation='{}', {})",
            self.base.scalar,
            self.base.cardinality,
            self.base.container,
            self.base.memory_representation,
            self.content
        )
    }
}

/// Split `id` into its base fields and content descriptor.
///
/// Unknown base-field patterns decode to `None`; an unknown content tag decodes
/// to [`ContentConfig::Invalid`] carrying the tag.
pub fn decode(id: Identifier) -> SemanticType {
    SemanticType::from_identifier(id)
}

/// Pack a semantic type into its identifier.
pub fn encode(st: &SemanticType) -> Identifier {
    st.to_identifier()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_base() -> impl Strategy<Value = BaseType> {
        (
            prop::sample::select(ScalarType::ALL),
            prop::sample::select(CardinalityType::ALL),
            prop::sample::select(ContainerType::ALL),
            prop::sample::select(MemoryRepresentationType::ALL),
        )
            .prop_map(|(s, c, k, m)| BaseType::new(s, c, k, m))
    }

    fn arb_content() -> impl Strategy<Value = ContentConfig> {
        prop_oneof![
            Just(ContentConfig::None),
            Just(ContentConfig::Match),
            (
                prop::sample::select(GenericCompressionType::ALL),
                prop::sample::select(GenericFormatType::ALL),
                prop::sample::select(EmptyCustomType::ALL),
                prop::sample::select(EmptyCustomType::ALL),
                prop::sample::select(EmptyMaskType::ALL),
            )
                .prop_map(|(c, f, x1, x2, m)| {
                    ContentConfig::Generic(GenericContentConfig::new(c, f, x1, x2, m))
                }),
            (
                prop::sample::select(ImageCompressionType::ALL),
                prop::sample::select(ImageFormatType::ALL),
                prop::sample::select(EmptyCustomType::ALL),
                prop::sample::select(EmptyCustomType::ALL),
                prop::sample::select(EmptyMaskType::ALL),
            )
                .prop_map(|(c, f, x1, x2, m)| {
                    ContentConfig::Image(ImageContentConfig::new(c, f, x1, x2, m))
                }),
            (
                prop::sample::select(GeometryCompressionType::ALL),
                prop::sample::select(GeometryFormatType::ALL),
                prop::sample::select(EmptyCustomType::ALL),
                prop::sample::select(EmptyCustomType::ALL),
                any::<u8>(),
            )
                .prop_map(|(c, f, x1, x2, m)| {
                    ContentConfig::Geometry(GeometryContentConfig::new(
                        c,
                        f,
                        x1,
                        x2,
                        GeometryAttributes(m),
                    ))
                }),
            (
                prop::sample::select(TransformCompressionType::ALL),
                prop::sample::select(TransformFormatType::ALL),
                prop::sample::select(TransformDetailType::ALL),
                prop::sample::select(EmptyCustomType::ALL),
                prop::sample::select(EmptyMaskType::ALL),
            )
                .prop_map(|(c, f, x1, x2, m)| {
                    ContentConfig::Transform(TransformContentConfig::new(c, f, x1, x2, m))
                }),
        ]
    }

    fn arb_semantic_type() -> impl Strategy<Value = SemanticType> {
        (arb_base(), arb_content()).prop_map(|(base, content)| SemanticType { base, content })
    }

    proptest! {
        #[test]
        fn prop_decode_encode_roundtrip(st in arb_semantic_type()) {
            prop_assert_eq!(decode(encode(&st)), st);
        }

        #[test]
        fn prop_encode_decode_roundtrip_for_valid_ids(st in arb_semantic_type()) {
            let id = encode(&st);
            prop_assert_eq!(encode(&decode(id)), id);
        }

        #[test]
        fn prop_content_bits_never_change_base(id in any::<u64>(), content_bits in any::<u64>()) {
            let mutated = (id & BASE_TYPE_MASK) | (content_bits & SEMANTIC_TYPE_MASK);
            prop_assert_eq!(decode(id).base, decode(mutated).base);
        }

        #[test]
        fn prop_base_bits_never_change_content(id in any::<u64>(), base_bits in any::<u16>()) {
            let mutated = (id & SEMANTIC_TYPE_MASK) | base_bits as u64;
            prop_assert_eq!(decode(id).content, decode(mutated).content);
        }

        #[test]
        fn prop_unknown_content_tag_is_invalid(
            base in arb_base(),
            tag in 5u8..0xFF,
            payload in any::<u64>(),
        ) {
            let id = (payload & CONTENT_PAYLOAD_MASK)
                | place(tag, CONTENT_TYPE_OFFSET)
                | base.identifier() as u64;
            let st = decode(id);
            prop_assert_eq!(st.content, ContentConfig::Invalid { tag });
            prop_assert_eq!(st.base, base);
            // Tag survives, payload is zeroed.
            prop_assert_eq!(encode(&st), place(tag, CONTENT_TYPE_OFFSET) | base.identifier() as u64);
        }

        // Pins strict field equality; a `None` field is not a wildcard.
        #[test]
        fn prop_compatibility_is_strict_equality(a in arb_base(), b in arb_base()) {
            let st = SemanticType::new(a);
            prop_assert_eq!(st.is_compatible(b.identifier()), a == b);
        }
    }

    #[test]
    fn zero_id_decodes_to_unset_everything() {
        let st = decode(0);
        assert_eq!(st, SemanticType::default());
        assert_eq!(encode(&st), 0);
    }

    #[test]
    fn all_none_base_is_only_compatible_with_itself() {
        let unset = decode(0);
        assert!(unset.is_compatible(0));

        let depth = BaseType::new(
            ScalarType::UInt16,
            CardinalityType::Fixed,
            ContainerType::Array2D,
            MemoryRepresentationType::Raw,
        );
        assert!(!unset.is_compatible(depth.identifier()));
        assert!(!SemanticType::new(depth).is_compatible(0));
    }

    #[test]
    fn tag_is_healed_when_content_type_is_switched() {
        let mut st = SemanticType::new(BaseType::default());
        st.content = ContentConfig::Image(ImageContentConfig {
            compression: ImageCompressionType::Jpeg,
            format: ImageFormatType::Rgb,
            ..Default::default()
        });
        let image_bits = st.content.to_u64();

        // Image payload bits reinterpreted as a transform descriptor.
        st.set_content_type(ContentType::Transform, image_bits);
        let id = encode(&st);
        assert_eq!(slot(id, CONTENT_TYPE_OFFSET), ContentType::Transform.as_u8());
        assert_eq!(
            decode(id).content,
            ContentConfig::Transform(TransformContentConfig::from_u64(image_bits))
        );

        // Switching with no payload yields the zero-initialised variant.
        st.set_content_type(ContentType::Geometry, 0);
        let id = encode(&st);
        assert_eq!(id, place(ContentType::Geometry.as_u8(), CONTENT_TYPE_OFFSET));
        assert_eq!(decode(id).content, ContentConfig::empty(ContentType::Geometry));
    }

    #[test]
    fn stale_tag_bits_in_payload_are_ignored() {
        let st = SemanticType {
            base: BaseType::default(),
            content: ContentConfig::Generic(GenericContentConfig::default()),
        };
        // Payload built for another variant, including its tag, is masked out.
        let id = encode(&st);
        assert_eq!(slot(id, CONTENT_TYPE_OFFSET), ContentType::Generic.as_u8());
    }

    #[test]
    fn depth_image_identifier_layout() {
        let st = SemanticType {
            base: BaseType::new(
                ScalarType::UInt16,
                CardinalityType::Fixed,
                ContainerType::Array2D,
                MemoryRepresentationType::Compressed,
            ),
            content: ContentConfig::Image(ImageContentConfig {
                compression: ImageCompressionType::Zdepth,
                format: ImageFormatType::Depth,
                ..Default::default()
            }),
        };
        let id = encode(&st);
        assert_eq!(id, 0x0000_0003_0702_8348);
        assert_eq!(SemanticType::from(id), st);
        assert_eq!(Identifier::from(st), id);
    }

    #[test]
    fn display_lists_every_field() {
        let st = SemanticType {
            base: BaseType::new(
                ScalarType::Float32,
                CardinalityType::Variable,
                ContainerType::Array1D,
                MemoryRepresentationType::Raw,
            ),
            content: ContentConfig::Geometry(GeometryContentConfig {
                compression: GeometryCompressionType::Draco,
                format: GeometryFormatType::Point,
                custom_mask: GeometryAttributes::POSITION | GeometryAttributes::NORMAL,
                ..Default::default()
            }),
        };
        assert_eq!(
            st.to_string(),
            "SemanticType(scalar='FLOAT32', cardinality='VARIABLE', container='ARRAY1D', \
             memory_representation='RAW', content='Geometry', compression='Draco', \
             format='Point', custom1='None', custom2='None', custom_mask='Position|Normal')"
        );
    }

    #[test]
    fn setters_only_touch_their_field() {
        let mut st = decode(0);
        st.set_scalar_type(ScalarType::Complex64);
        st.set_container_type(ContainerType::Array4D);
        assert_eq!(st.scalar_type(), ScalarType::Complex64);
        assert_eq!(st.container_type(), ContainerType::Array4D);
        assert_eq!(st.cardinality_type(), CardinalityType::None);
        assert_eq!(st.memory_representation_type(), MemoryRepresentationType::None);
        assert_eq!(encode(&st), 0x0E | (0x05 << 8));
    }
}
