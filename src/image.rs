use std::path::PathBuf;

use crate::color::RGBAColorFormat;
use crate::error::Error;
use crate::image::import::ColorSpace;

pub mod asset;
pub mod import;
pub mod packer;
pub mod reader;
pub mod source;
pub mod writer;

/// Row-major RGBA pixels of one image. The origin and axis order are
/// whatever the source format uses and are carried through unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    dots: Vec<RGBAColorFormat<f32>>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, dots: Vec<RGBAColorFormat<f32>>) -> crate::Result<Self> {
        let expected_number_of_dots = width as usize * height as usize;
        if dots.len() != expected_number_of_dots {
            return Err(Error::BufferLengthMismatch(
                expected_number_of_dots,
                dots.len(),
            ));
        }
        Ok(Self {
            width,
            height,
            dots,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dots(&self) -> &[RGBAColorFormat<f32>] {
        &self.dots
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }

    pub fn to_rgba8(&self) -> Vec<u8> {
        self.dots
            .iter()
            .flat_map(<[u8; 4]>::from)
            .collect()
    }
}

/// Which material property each channel of a packed texture carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelContent {
    MetallicRGB,
    Smoothness,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedSemantics {
    pub color_channels: ChannelContent,
    pub alpha_channel: ChannelContent,
    pub color_space: ColorSpace,
    pub alpha_meaningful: bool,
}

impl Default for PackedSemantics {
    fn default() -> Self {
        Self {
            color_channels: ChannelContent::MetallicRGB,
            alpha_channel: ChannelContent::Smoothness,
            color_space: ColorSpace::Linear,
            alpha_meaningful: true,
        }
    }
}

/// Output of the packer. Handed to the writer by value and dropped there.
pub struct PackedImage {
    pixels: PixelBuffer,
    semantics: PackedSemantics,
}

impl PackedImage {
    pub fn new(pixels: PixelBuffer) -> Self {
        Self::with_semantics(pixels, PackedSemantics::default())
    }

    pub fn with_semantics(pixels: PixelBuffer, semantics: PackedSemantics) -> Self {
        Self { pixels, semantics }
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn semantics(&self) -> &PackedSemantics {
        &self.semantics
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackOutcome {
    Persisted(PathBuf),
    /// No destination was chosen. Nothing was written.
    Cancelled,
}

pub trait ImageReader {
    fn read_image(&mut self) -> crate::Result<PixelBuffer>;
}

pub trait ImageWriter {
    fn write_image(&mut self) -> crate::Result<()>;
}
