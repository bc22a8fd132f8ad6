//! Bit offsets and masks of the 64-bit semantic type identifier.
//!
//! ```text
//!  63      56 55      48 47      40 39      32 31      24 23      16 15 14 13    8 7  6 5      0
//! +----------+----------+----------+----------+----------+----------+-----+-------+----+--------+
//! | mask     | custom2  | custom1  | format   | compress | content  | mem | cont. | card | scalar |
//! +----------+----------+----------+----------+----------+----------+-----+-------+----+--------+
//! ```

/// Storage type of the 16-bit base type (kept in a `u32`).
pub type BaseIdentifier = u32;

/// Storage type of a full semantic type identifier.
pub type Identifier = u64;

pub const SCALAR_TYPE_OFFSET: u32 = 0;
pub const CARDINALITY_TYPE_OFFSET: u32 = 6;
pub const CONTAINER_TYPE_OFFSET: u32 = 8;
pub const MEMORY_REPRESENTATION_TYPE_OFFSET: u32 = 14;

pub const SCALAR_TYPE_MASK: u64 = 0x3F << SCALAR_TYPE_OFFSET;
pub const CARDINALITY_TYPE_MASK: u64 = 0x03 << CARDINALITY_TYPE_OFFSET;
pub const CONTAINER_TYPE_MASK: u64 = 0x3F << CONTAINER_TYPE_OFFSET;
pub const MEMORY_REPRESENTATION_TYPE_MASK: u64 = 0x03 << MEMORY_REPRESENTATION_TYPE_OFFSET;

pub const CONTENT_TYPE_OFFSET: u32 = 16;
pub const COMPRESSION_TYPE_OFFSET: u32 = 24;
pub const FORMAT_TYPE_OFFSET: u32 = 32;
pub const CUSTOM1_TYPE_OFFSET: u32 = 40;
pub const CUSTOM2_TYPE_OFFSET: u32 = 48;
pub const CUSTOM_MASK_TYPE_OFFSET: u32 = 56;

/// Bits 0-15: scalar, cardinality, container and memory representation.
pub const BASE_TYPE_MASK: u64 = 0xFFFF;
/// Bits 16-63: content tag plus the content-specific sub-descriptor.
pub const SEMANTIC_TYPE_MASK: u64 = !BASE_TYPE_MASK;

pub const CONTENT_TYPE_MASK: u64 = 0xFF << CONTENT_TYPE_OFFSET;
pub const COMPRESSION_TYPE_MASK: u64 = 0xFF << COMPRESSION_TYPE_OFFSET;
pub const FORMAT_TYPE_MASK: u64 = 0xFF << FORMAT_TYPE_OFFSET;
pub const CUSTOM1_TYPE_MASK: u64 = 0xFF << CUSTOM1_TYPE_OFFSET;
pub const CUSTOM2_TYPE_MASK: u64 = 0xFF << CUSTOM2_TYPE_OFFSET;
pub const CUSTOM_MASK_TYPE_MASK: u64 = 0xFF << CUSTOM_MASK_TYPE_OFFSET;

/// Content sub-descriptor bits (24-63), excluding the content tag.
pub const CONTENT_PAYLOAD_MASK: u64 = SEMANTIC_TYPE_MASK & !CONTENT_TYPE_MASK;

/// Extract the 8-bit slot at `offset` from `value`.
#[inline]
pub const fn slot(value: u64, offset: u32) -> u8 {
    ((value >> offset) & 0xFF) as u8
}

/// Place an 8-bit slot value at `offset`.
#[inline]
pub const fn place(value: u8, offset: u32) -> u64 {
    (value as u64) << offset
}
