use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    MissingInput(&'static str),
    DimensionMismatch {
        metallic: (u32, u32),
        roughness: (u32, u32),
    },
    BufferLengthMismatch(usize, usize),
    NotReadable(String),
    Decode(String, String),
    UnableToOpenInputFileForReading(String, std::io::Error),
    Io(String, std::io::Error),
    Encode(String),
    Metadata(String, String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInput(source_name) => {
                write!(
                    f,
                    "Both sources are required, but the {} texture was not assigned",
                    source_name
                )
            }
            Self::DimensionMismatch {
                metallic,
                roughness,
            } => {
                write!(
                    f,
                    "Sources must match in width and height. Metallic is {}x{}, roughness is {}x{}.",
                    metallic.0, metallic.1, roughness.0, roughness.1
                )
            }
            Self::BufferLengthMismatch(expected, actual) => {
                write!(
                    f,
                    "Pixel buffer length does not match its size. Expected {} pixels, got {}.",
                    expected, actual
                )
            }
            Self::NotReadable(name) => {
                write!(f, "Pixels of '{}' are not readable", name)
            }
            Self::Decode(name, reason) => {
                write!(f, "Unable to decode '{}': {}", name, reason)
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::Io(path, error) => {
                write!(f, "Unable to write '{}': {}", path, error)
            }
            Self::Encode(reason) => {
                write!(f, "Failed to encode packed texture: {}", reason)
            }
            Self::Metadata(path, reason) => {
                write!(f, "Import metadata of '{}' is unusable: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error) | Self::Io(_, error) => Some(error),
            _ => None,
        }
    }
}
