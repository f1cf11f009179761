//! The end-to-end packing operation.
//!
//! Sources are validated from their metadata before any access state changes.
//! Each source is then made readable inside its own [`ReadableScope`], so both
//! are restored on every exit path and a failing restore on one never keeps
//! the other from being restored.

use std::path::Path;

use crate::image::import::ImportMetadataStore;
use crate::image::packer::pack;
use crate::image::source::{ImageHandle, ReadableScope};
use crate::image::writer::png::{write_packed, PngConfig};
use crate::image::{PackOutcome, PackedImage};
use crate::Error;

pub const METALLIC_SOURCE_NAME: &str = "metallic";
pub const ROUGHNESS_SOURCE_NAME: &str = "roughness";

pub fn pack_textures<M, R, S>(
    metallic: Option<&mut M>,
    roughness: Option<&mut R>,
    destination: Option<&Path>,
    store: &S,
    config: &PngConfig,
) -> crate::Result<PackOutcome>
where
    M: ImageHandle + ?Sized,
    R: ImageHandle + ?Sized,
    S: ImportMetadataStore + ?Sized,
{
    let metallic = metallic.ok_or(Error::MissingInput(METALLIC_SOURCE_NAME))?;
    let roughness = roughness.ok_or(Error::MissingInput(ROUGHNESS_SOURCE_NAME))?;
    check_dimensions_match(&*metallic, &*roughness)?;

    let metallic_scope = ReadableScope::acquire(metallic)?;
    let roughness_scope = ReadableScope::acquire(roughness)?;

    let outcome = pack_and_write(&metallic_scope, &roughness_scope, destination, store, config);
    let metallic_restored = metallic_scope.release();
    let roughness_restored = roughness_scope.release();

    let outcome = outcome?;
    metallic_restored?;
    roughness_restored?;
    Ok(outcome)
}

fn check_dimensions_match<M, R>(metallic: &M, roughness: &R) -> crate::Result<()>
where
    M: ImageHandle + ?Sized,
    R: ImageHandle + ?Sized,
{
    if metallic.dimensions() != roughness.dimensions() {
        return Err(Error::DimensionMismatch {
            metallic: metallic.dimensions(),
            roughness: roughness.dimensions(),
        });
    }
    Ok(())
}

fn pack_and_write<M, R, S>(
    metallic: &ReadableScope<'_, M>,
    roughness: &ReadableScope<'_, R>,
    destination: Option<&Path>,
    store: &S,
    config: &PngConfig,
) -> crate::Result<PackOutcome>
where
    M: ImageHandle + ?Sized,
    R: ImageHandle + ?Sized,
    S: ImportMetadataStore + ?Sized,
{
    let metallic_pixels = metallic.read_pixels()?;
    let roughness_pixels = roughness.read_pixels()?;
    let packed = PackedImage::new(pack(&metallic_pixels, &roughness_pixels)?);
    log::info!(
        "Packed '{}' and '{}' into a {}x{} metallic/smoothness texture",
        metallic.handle().name(),
        roughness.handle().name(),
        packed.pixels().width(),
        packed.pixels().height()
    );
    write_packed(packed, destination, store, config)
}
