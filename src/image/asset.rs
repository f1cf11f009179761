use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::import::ImportMetadataStore;
use super::reader::png::{read_dimensions, PngImageReader};
use super::source::{AccessState, ImageHandle};
use super::{ImageReader, PixelBuffer};
use crate::Error;

/// A PNG file on disk whose access state lives in an import metadata store.
pub struct AssetImageHandle<'a, S: ImportMetadataStore> {
    path: PathBuf,
    name: String,
    width: u32,
    height: u32,
    store: &'a S,
}

fn open_input_file(file_path: &Path) -> crate::Result<BufReader<File>> {
    File::open(file_path)
        .map(BufReader::new)
        .map_err(|e| Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e))
}

impl<'a, S: ImportMetadataStore> AssetImageHandle<'a, S> {
    /// Opens `path` reading only its header. Neither pixels nor the access
    /// state are touched.
    pub fn open(path: &Path, store: &'a S) -> crate::Result<Self> {
        let name = path.display().to_string();
        let (width, height) = read_dimensions(open_input_file(path)?, &name)?;
        Ok(Self {
            path: path.to_owned(),
            name,
            width,
            height,
            store,
        })
    }
}

impl<S: ImportMetadataStore> ImageHandle for AssetImageHandle<'_, S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn access_state(&self) -> crate::Result<AccessState> {
        let settings = self.store.get_metadata(&self.path)?;
        Ok(if settings.readable {
            AccessState::Readable
        } else {
            AccessState::Locked
        })
    }

    fn set_access_state(&mut self, state: AccessState) -> crate::Result<()> {
        let mut settings = self.store.get_metadata(&self.path)?;
        settings.readable = state == AccessState::Readable;
        self.store.set_metadata(&self.path, &settings)
    }

    fn decode(&self) -> crate::Result<PixelBuffer> {
        let input = open_input_file(&self.path)?;
        PngImageReader::new(input, &self.name).read_image()
    }
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::Path;

    use ::png::{BitDepth, ColorType, Encoder};

    use super::AssetImageHandle;
    use crate::error::Error;
    use crate::image::import::{ColorSpace, ImportMetadataStore, SidecarMetadataStore};
    use crate::image::source::{AccessState, ImageHandle};

    fn write_gray_png(path: &Path, width: u32, height: u32) {
        let file = fs::File::create(path).unwrap();
        let mut encoder = Encoder::new(file, width, height);
        encoder.set_color(ColorType::Grayscale);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer
            .write_image_data(&vec![128; (width * height) as usize])
            .unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn open_reads_dimensions_without_unlocking() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("rough.png");
        write_gray_png(&path, 4, 2);
        let store = SidecarMetadataStore::new();
        let handle = AssetImageHandle::open(&path, &store).unwrap();
        assert_eq!(handle.dimensions(), (4, 2));
        assert_eq!(handle.access_state().unwrap(), AccessState::Locked);
        assert!(!SidecarMetadataStore::sidecar_path(&path).exists());
    }

    #[test]
    fn set_access_state_keeps_other_settings() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("rough.png");
        write_gray_png(&path, 1, 1);
        let store = SidecarMetadataStore::new();
        let mut handle = AssetImageHandle::open(&path, &store).unwrap();
        handle.set_access_state(AccessState::Readable).unwrap();
        let settings = store.get_metadata(&path).unwrap();
        assert!(settings.readable);
        assert_eq!(settings.color_space, ColorSpace::Srgb);
        assert_eq!(handle.access_state().unwrap(), AccessState::Readable);
    }

    #[test]
    fn decode_reads_full_image() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("rough.png");
        write_gray_png(&path, 3, 3);
        let store = SidecarMetadataStore::new();
        let handle = AssetImageHandle::open(&path, &store).unwrap();
        let pixels = handle.decode().unwrap();
        assert_eq!(pixels.len(), 9);
    }

    #[test]
    fn open_missing_file_fails() {
        let directory = tempfile::tempdir().unwrap();
        let store = SidecarMetadataStore::new();
        match AssetImageHandle::open(&directory.path().join("missing.png"), &store) {
            Err(Error::UnableToOpenInputFileForReading(_, _)) => {}
            _ => panic!("Missing input file not reported"),
        }
    }
}
