//! Image content descriptors.

use super::content::ContentFields;
use super::enums::{EmptyCustomType, EmptyMaskType, semantic_enum};

semantic_enum! {
    pub enum ImageCompressionType {
        None = 0x00 => "None",
        Uncompressed = 0x01 => "Uncompressed",
        Jpeg = 0x02 => "JPEG",
        Png = 0x03 => "PNG",
        Tiff = 0x04 => "TIFF",
        H264 = 0x05 => "H264",
        H265 = 0x06 => "H265",
        Zdepth = 0x07 => "ZDepth",
        Match = 0xFF => "Match",
    }
}

semantic_enum! {
    /// Pixel layout of an image.
    pub enum ImageFormatType {
        None = 0x00 => "None",
        Mask = 0x01 => "Mask",
        Luminance = 0x02 => "Luminance",
        Depth = 0x03 => "Depth",
        Rgb = 0x04 => "RGB",
        Bgr = 0x05 => "BGR",
        Rgba = 0x06 => "RGBA",
        Bgra = 0x07 => "BGRA",
        Hsv = 0x08 => "HSV",
        Lab = 0x09 => "LAB",
        Yuv422 = 0x0A => "YUV422",
        Nv12 = 0x0B => "NV12",
        Yuv420 = 0x0C => "YUV420",
        Yuv444 = 0x0D => "YUV444",
        Match = 0xFF => "Match",
    }
}

impl ImageFormatType {
    /// Number of colour channels, or `None` for the `None`/`Match` markers.
    pub const fn num_channels(self) -> Option<u8> {
        match self {
            ImageFormatType::Mask | ImageFormatType::Luminance | ImageFormatType::Depth => Some(1),
            ImageFormatType::Rgb
            | ImageFormatType::Bgr
            | ImageFormatType::Hsv
            | ImageFormatType::Lab
            | ImageFormatType::Yuv422
            | ImageFormatType::Nv12
            | ImageFormatType::Yuv420
            | ImageFormatType::Yuv444 => Some(3),
            ImageFormatType::Rgba | ImageFormatType::Bgra => Some(4),
            ImageFormatType::None | ImageFormatType::Match => None,
        }
    }
}

/// Content sub-descriptor for images.
pub type ImageContentConfig = ContentFields<
    ImageCompressionType,
    ImageFormatType,
    EmptyCustomType,
    EmptyCustomType,
    EmptyMaskType,
>;
