//! The 16-bit base type: scalar, cardinality, container and memory representation.

use serde::{Deserialize, Serialize};

use super::constants::*;
use super::enums::{SemanticEnum, semantic_enum};

semantic_enum! {
    /// Element scalar type (6 bits).
    pub enum ScalarType {
        None = 0x00 => "NONE",
        Bool = 0x01 => "BOOL",
        Char = 0x02 => "CHAR",
        UChar = 0x03 => "UCHAR",
        WChar = 0x04 => "WCHAR",
        Int16 = 0x05 => "INT16",
        Int32 = 0x06 => "INT32",
        Int64 = 0x07 => "INT64",
        UInt16 = 0x08 => "UINT16",
        UInt32 = 0x09 => "UINT32",
        UInt64 = 0x0A => "UINT64",
        Float32 = 0x0B => "FLOAT32",
        Float64 = 0x0C => "FLOAT64",
        Complex32 = 0x0D => "COMPLEX32",
        Complex64 = 0x0E => "COMPLEX64",
        Match = 0x3F => "MATCH",
    }
}

semantic_enum! {
    /// Whether the element count is fixed or variable (2 bits).
    pub enum CardinalityType {
        None = 0x00 => "NONE",
        Fixed = 0x01 => "FIXED",
        Variable = 0x02 => "VARIABLE",
        Match = 0x03 => "MATCH",
    }
}

semantic_enum! {
    /// Container shape (6 bits).
    pub enum ContainerType {
        None = 0x00 => "NONE",
        Scalar = 0x01 => "SCALAR",
        Array1D = 0x02 => "ARRAY1D",
        Array2D = 0x03 => "ARRAY2D",
        Array3D = 0x04 => "ARRAY3D",
        Array4D = 0x05 => "ARRAY4D",
        Match = 0x3F => "MATCH",
    }
}

impl ContainerType {
    /// Number of array dimensions, or `None` for the `None`/`Match` markers.
    pub const fn dimensions(self) -> Option<u8> {
        match self {
            ContainerType::Scalar => Some(0),
            ContainerType::Array1D => Some(1),
            ContainerType::Array2D => Some(2),
            ContainerType::Array3D => Some(3),
            ContainerType::Array4D => Some(4),
            ContainerType::None | ContainerType::Match => None,
        }
    }
}

semantic_enum! {
    /// In-memory representation of the data (2 bits).
    pub enum MemoryRepresentationType {
        None = 0x00 => "NONE",
        Raw = 0x01 => "RAW",
        Compressed = 0x02 => "COMPRESSED",
        Match = 0x03 => "MATCH",
    }
}

/// Content-independent part of a semantic type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseType {
    pub scalar: ScalarType,
    pub cardinality: CardinalityType,
    pub container: ContainerType,
    pub memory_representation: MemoryRepresentationType,
}

impl BaseType {
    pub const fn new(
        scalar: ScalarType,
        cardinality: CardinalityType,
        container: ContainerType,
        memory_representation: MemoryRepresentationType,
    ) -> Self {
        Self { scalar, cardinality, container, memory_representation }
    }

    /// Unpack the base fields from the low 16 bits of `value`.
    ///
    /// Bit patterns that are not a known enumeration value decode to that
    /// field's `None`.
    pub fn from_identifier(value: BaseIdentifier) -> Self {
        let value = value as u64;
        let field = |mask: u64, offset: u32| ((value & mask) >> offset) as u8;
        Self {
            scalar: ScalarType::from_u8_or_none(field(SCALAR_TYPE_MASK, SCALAR_TYPE_OFFSET)),
            cardinality: CardinalityType::from_u8_or_none(field(
                CARDINALITY_TYPE_MASK,
                CARDINALITY_TYPE_OFFSET,
            )),
            container: ContainerType::from_u8_or_none(field(
                CONTAINER_TYPE_MASK,
                CONTAINER_TYPE_OFFSET,
            )),
            memory_representation: MemoryRepresentationType::from_u8_or_none(field(
                MEMORY_REPRESENTATION_TYPE_MASK,
                MEMORY_REPRESENTATION_TYPE_OFFSET,
            )),
        }
    }

    /// Pack the base fields into the low 16 bits.
    pub fn identifier(&self) -> BaseIdentifier {
        let scalar = ((self.scalar.as_u8() & 0x3F) as u64) << SCALAR_TYPE_OFFSET;
        let cardinality = ((self.cardinality.as_u8() & 0x03) as u64) << CARDINALITY_TYPE_OFFSET;
        let container = ((self.container.as_u8() & 0x3F) as u64) << CONTAINER_TYPE_OFFSET;
        let memory = ((self.memory_representation.as_u8() & 0x03) as u64)
            << MEMORY_REPRESENTATION_TYPE_OFFSET;
        ((scalar | cardinality | container | memory) & BASE_TYPE_MASK) as BaseIdentifier
    }

    /// Check whether the base type packed in `other` is compatible with `self`.
    ///
    /// Compatibility is strict field-by-field equality. A `None` field is *not*
    /// treated as a wildcard and `Match` only matches `Match`.
    pub fn is_compatible(&self, other: BaseIdentifier) -> bool {
        let other = BaseType::from_identifier(other);
        fields_compatible(self.scalar, other.scalar)
            && fields_compatible(self.memory_representation, other.memory_representation)
            && fields_compatible(self.container, other.container)
            && fields_compatible(self.cardinality, other.cardinality)
    }
}

// Every call site asks for `Match` semantics, which is plain equality.
fn fields_compatible<T: SemanticEnum>(a: T, b: T) -> bool {
    a.as_u8() == b.as_u8()
}
