use std::fs;
use std::io::Write;
use std::path::Path;

use ::png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use clap::builder::PossibleValue;
use clap::ValueEnum;

use crate::image::import::{ImportMetadataStore, ImportSettings};
use crate::image::{ImageWriter, PackOutcome, PackedImage, PackedSemantics};
use crate::{Arguments, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompressionPreset {
    Fast,
    Default,
    Best,
}

impl ValueEnum for CompressionPreset {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Fast, Self::Default, Self::Best]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Fast => Some(PossibleValue::new("Fast")),
            Self::Default => Some(PossibleValue::new("Default")),
            Self::Best => Some(PossibleValue::new("Best")),
        }
    }
}

/// Encoder settings. Each preset fixes both compression and filter so equal
/// input always yields byte-identical files.
#[derive(Clone, Copy, Debug)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self::from(CompressionPreset::Default)
    }
}

impl From<CompressionPreset> for PngConfig {
    fn from(value: CompressionPreset) -> Self {
        match value {
            CompressionPreset::Fast => Self {
                compression: Compression::Fast,
                filter: FilterType::NoFilter,
            },
            CompressionPreset::Default => Self {
                compression: Compression::Default,
                filter: FilterType::NoFilter,
            },
            CompressionPreset::Best => Self {
                compression: Compression::Best,
                filter: FilterType::Paeth,
            },
        }
    }
}

impl From<&Arguments> for PngConfig {
    fn from(value: &Arguments) -> Self {
        Self::from(value.compression_preset)
    }
}

pub struct PngImageWriter<'a, T: Write> {
    writer: T,
    image: &'a PackedImage,
    config: &'a PngConfig,
}

impl<'a, T: Write> PngImageWriter<'a, T> {
    pub fn new(writer: T, image: &'a PackedImage, config: &'a PngConfig) -> Self {
        Self {
            writer,
            image,
            config,
        }
    }
}

impl<T: Write> ImageWriter for PngImageWriter<'_, T> {
    fn write_image(&mut self) -> crate::Result<()> {
        let pixels = self.image.pixels();
        let mut encoder = Encoder::new(&mut self.writer, pixels.width(), pixels.height());
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(self.config.compression);
        encoder.set_filter(self.config.filter);
        let mut png_writer = encoder.write_header().map_err(encode_error)?;
        png_writer
            .write_image_data(&pixels.to_rgba8())
            .map_err(encode_error)?;
        png_writer.finish().map_err(encode_error)?;
        self.writer
            .flush()
            .map_err(|e| Error::Encode(e.to_string()))
    }
}

fn encode_error(error: ::png::EncodingError) -> Error {
    Error::Encode(error.to_string())
}

/// Serializes the packed image as an 8-bit RGBA PNG. Channels are quantized
/// to 8 bits, saturating values outside `[0.0, 1.0]`.
pub fn encode(image: PackedImage, config: &PngConfig) -> crate::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngImageWriter::new(&mut bytes, &image, config).write_image()?;
    log::debug!("Encoded packed texture into {} bytes", bytes.len());
    Ok(bytes)
}

/// Writes `bytes` to `destination`. A file created by a failed write is
/// removed again.
pub fn persist(bytes: &[u8], destination: &Path) -> crate::Result<()> {
    let existed = destination.exists();
    fs::write(destination, bytes).map_err(|e| {
        if !existed {
            let _ = fs::remove_file(destination);
        }
        Error::Io(destination.display().to_string(), e)
    })?;
    log::info!("Wrote {} bytes to '{}'", bytes.len(), destination.display());
    Ok(())
}

/// Tags `destination` so the host samples it as `semantics` describe.
pub fn apply_metadata<S: ImportMetadataStore + ?Sized>(
    store: &S,
    destination: &Path,
    semantics: &PackedSemantics,
) -> crate::Result<()> {
    store.set_metadata(destination, &ImportSettings::from(semantics))
}

/// Encodes, persists and tags the packed image. An absent or empty
/// destination means the save was cancelled and skips all three steps.
pub fn write_packed<S: ImportMetadataStore + ?Sized>(
    image: PackedImage,
    destination: Option<&Path>,
    store: &S,
    config: &PngConfig,
) -> crate::Result<PackOutcome> {
    let Some(destination) = destination.filter(|path| !path.as_os_str().is_empty()) else {
        log::info!("No destination chosen, packed texture is discarded");
        return Ok(PackOutcome::Cancelled);
    };
    let semantics = *image.semantics();
    let bytes = encode(image, config)?;
    persist(&bytes, destination)?;
    apply_metadata(store, destination, &semantics)?;
    Ok(PackOutcome::Persisted(destination.to_owned()))
}
