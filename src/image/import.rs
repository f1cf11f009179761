//! Import settings the host keeps per image file, and the store that owns
//! them.
//!
//! Changing settings through [`ImportMetadataStore::set_metadata`] takes
//! effect before it returns, so the next read observes the new state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::image::PackedSemantics;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorSpace {
    Srgb,
    Linear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaSource {
    None,
    FromInput,
    FromGrayScale,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportSettings {
    pub readable: bool,
    pub color_space: ColorSpace,
    pub alpha_source: AlphaSource,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            readable: false,
            color_space: ColorSpace::Srgb,
            alpha_source: AlphaSource::FromInput,
        }
    }
}

/// Settings that make the host sample a packed texture the way its
/// semantics describe. Alpha without meaning is not imported.
impl From<&PackedSemantics> for ImportSettings {
    fn from(semantics: &PackedSemantics) -> Self {
        Self {
            readable: false,
            color_space: semantics.color_space,
            alpha_source: if semantics.alpha_meaningful {
                AlphaSource::FromInput
            } else {
                AlphaSource::None
            },
        }
    }
}

pub trait ImportMetadataStore {
    fn get_metadata(&self, path: &Path) -> crate::Result<ImportSettings>;

    /// Stores `settings` for `path`. The next `get_metadata` for the same path
    /// returns them.
    fn set_metadata(&self, path: &Path, settings: &ImportSettings) -> crate::Result<()>;
}

/// Keeps import settings as JSON next to each image, in
/// `<image file name>.import.json`. The sidecar is read on every access, so a
/// write is visible to the next read without re-importing anything.
#[derive(Clone, Debug, Default)]
pub struct SidecarMetadataStore;

const SIDECAR_EXTENSION: &str = "import.json";

impl SidecarMetadataStore {
    pub fn new() -> Self {
        Self
    }

    pub fn sidecar_path(path: &Path) -> PathBuf {
        let mut file_name = path.file_name().unwrap_or_default().to_os_string();
        file_name.push(".");
        file_name.push(SIDECAR_EXTENSION);
        path.with_file_name(file_name)
    }
}

impl ImportMetadataStore for SidecarMetadataStore {
    fn get_metadata(&self, path: &Path) -> crate::Result<ImportSettings> {
        let sidecar_path = Self::sidecar_path(path);
        if !sidecar_path.exists() {
            return Ok(ImportSettings::default());
        }
        let content = fs::read_to_string(&sidecar_path)
            .map_err(|e| Error::Metadata(sidecar_path.display().to_string(), e.to_string()))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Metadata(sidecar_path.display().to_string(), e.to_string()))
    }

    fn set_metadata(&self, path: &Path, settings: &ImportSettings) -> crate::Result<()> {
        let sidecar_path = Self::sidecar_path(path);
        let content = serde_json::to_string_pretty(settings)
            .map_err(|e| Error::Metadata(sidecar_path.display().to_string(), e.to_string()))?;
        fs::write(&sidecar_path, content)
            .map_err(|e| Error::Io(sidecar_path.display().to_string(), e))?;
        log::debug!("Stored import settings of '{}'", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::Path;

    use super::{
        AlphaSource, ColorSpace, ImportMetadataStore, ImportSettings, SidecarMetadataStore,
    };
    use crate::error::Error;
    use crate::image::PackedSemantics;

    #[test]
    fn sidecar_path_appends_extension_to_full_file_name() {
        let sidecar = SidecarMetadataStore::sidecar_path(Path::new("textures/metal.png"));
        assert_eq!(sidecar, Path::new("textures/metal.png.import.json"));
    }

    #[test]
    fn missing_sidecar_yields_locked_defaults() {
        let directory = tempfile::tempdir().unwrap();
        let store = SidecarMetadataStore::new();
        let settings = store
            .get_metadata(&directory.path().join("metal.png"))
            .unwrap();
        assert_eq!(settings, ImportSettings::default());
        assert!(!settings.readable);
        assert_eq!(settings.color_space, ColorSpace::Srgb);
    }

    #[test]
    fn stored_settings_are_visible_to_next_read() {
        let directory = tempfile::tempdir().unwrap();
        let image_path = directory.path().join("metal.png");
        let store = SidecarMetadataStore::new();
        let settings = ImportSettings {
            readable: true,
            color_space: ColorSpace::Linear,
            alpha_source: AlphaSource::FromGrayScale,
        };
        store.set_metadata(&image_path, &settings).unwrap();
        assert_eq!(store.get_metadata(&image_path).unwrap(), settings);
    }

    #[test]
    fn packed_semantics_map_to_unreadable_settings() {
        let settings = ImportSettings::from(&PackedSemantics::default());
        assert_eq!(
            settings,
            ImportSettings {
                readable: false,
                color_space: ColorSpace::Linear,
                alpha_source: AlphaSource::FromInput,
            }
        );

        let opaque = PackedSemantics {
            alpha_meaningful: false,
            ..PackedSemantics::default()
        };
        assert_eq!(ImportSettings::from(&opaque).alpha_source, AlphaSource::None);
    }

    #[test]
    fn malformed_sidecar_is_reported() {
        let directory = tempfile::tempdir().unwrap();
        let image_path = directory.path().join("metal.png");
        fs::write(
            SidecarMetadataStore::sidecar_path(&image_path),
            "{ \"readable\": 3 }",
        )
        .unwrap();
        let store = SidecarMetadataStore::new();
        match store.get_metadata(&image_path) {
            Err(Error::Metadata(_, _)) => {}
            other => panic!("Malformed sidecar not detected, got {:?}", other),
        }
    }
}
