//! Generic (untyped buffer) content descriptors.

use super::content::ContentFields;
use super::enums::{EmptyCustomType, EmptyMaskType, semantic_enum};

semantic_enum! {
    pub enum GenericCompressionType {
        None = 0x00 => "None",
        Uncompressed = 0x01 => "Uncompressed",
        Zstd = 0x02 => "Zstd",
        Zip = 0x03 => "Zip",
        Bzip = 0x04 => "Bzip",
        Match = 0xFF => "Match",
    }
}

semantic_enum! {
    pub enum GenericFormatType {
        None = 0x00 => "None",
        Raw = 0x01 => "Raw",
        Custom = 0x02 => "Custom",
        Match = 0xFF => "Match",
    }
}

/// Content sub-descriptor for generic buffers.
pub type GenericContentConfig = ContentFields<
    GenericCompressionType,
    GenericFormatType,
    EmptyCustomType,
    EmptyCustomType,
    EmptyMaskType,
>;
