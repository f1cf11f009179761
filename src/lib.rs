use std::path::PathBuf;

pub use cli::CLIParser;
pub use error::Error;
use image::{
    asset::AssetImageHandle, import::SidecarMetadataStore, writer::png::CompressionPreset,
    writer::png::PngConfig,
};
pub use image::PackOutcome;
use pipeline::{pack_textures, METALLIC_SOURCE_NAME, ROUGHNESS_SOURCE_NAME};

mod cli;
pub mod color;
mod error;
pub mod image;
mod logger;
pub mod pipeline;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    metallic_file: Option<PathBuf>,
    roughness_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    compression_preset: CompressionPreset,
}

/// Packs the metallic and roughness PNG files named in `arguments`. Import
/// settings of all files involved are kept in sidecar files next to them.
pub fn pack_texture_files(arguments: &Arguments) -> Result<PackOutcome> {
    let metallic_file = arguments
        .metallic_file
        .as_deref()
        .ok_or(Error::MissingInput(METALLIC_SOURCE_NAME))?;
    let roughness_file = arguments
        .roughness_file
        .as_deref()
        .ok_or(Error::MissingInput(ROUGHNESS_SOURCE_NAME))?;
    let store = SidecarMetadataStore::new();
    let mut metallic = AssetImageHandle::open(metallic_file, &store)?;
    let mut roughness = AssetImageHandle::open(roughness_file, &store)?;
    pack_textures(
        Some(&mut metallic),
        Some(&mut roughness),
        arguments.output_file.as_deref(),
        &store,
        &PngConfig::from(arguments),
    )
}
