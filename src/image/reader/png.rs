use std::io::Read;

use ::png::{BitDepth, ColorType, Decoder, Transformations};

use super::super::ImageReader;
use super::super::PixelBuffer;
use crate::color::{RGBAColorFormat, RangeColorFormat};
use crate::Error;

/// Decodes a PNG of any color type into normalized RGBA. Palettes, low bit
/// depths and `tRNS` transparency are expanded before conversion.
pub struct PngImageReader<T: Read> {
    reader: T,
    name: String,
}

impl<T: Read> PngImageReader<T> {
    pub fn new(reader: T, name: &str) -> Self {
        Self {
            reader,
            name: name.to_owned(),
        }
    }
}

fn decode_error(name: &str, error: impl ToString) -> Error {
    Error::Decode(name.to_owned(), error.to_string())
}

impl<T: Read> ImageReader for PngImageReader<T> {
    fn read_image(&mut self) -> crate::Result<PixelBuffer> {
        let name = self.name.as_str();
        let mut decoder = Decoder::new(&mut self.reader);
        decoder.set_transformations(Transformations::EXPAND);
        let mut reader = decoder.read_info().map_err(|e| decode_error(name, e))?;
        let mut buffer = vec![0; reader.output_buffer_size()];
        let info = reader
            .next_frame(&mut buffer)
            .map_err(|e| decode_error(name, e))?;
        let samples = to_samples(&buffer[..info.buffer_size()], info.bit_depth);
        let max = match info.bit_depth {
            BitDepth::Sixteen => u16::MAX,
            _ => u8::MAX as u16,
        };
        let dots = match info.color_type {
            ColorType::Grayscale => samples
                .iter()
                .map(|&value| RangeColorFormat::gray(max, value, max))
                .map(RGBAColorFormat::from)
                .collect(),
            ColorType::GrayscaleAlpha => samples
                .chunks_exact(2)
                .map(|s| RangeColorFormat::gray(max, s[0], s[1]))
                .map(RGBAColorFormat::from)
                .collect(),
            ColorType::Rgb => samples
                .chunks_exact(3)
                .map(|s| RangeColorFormat::opaque(max, s[0], s[1], s[2]))
                .map(RGBAColorFormat::from)
                .collect(),
            ColorType::Rgba => samples
                .chunks_exact(4)
                .map(|s| RangeColorFormat::new(max, s[0], s[1], s[2], s[3]))
                .map(RGBAColorFormat::from)
                .collect(),
            ColorType::Indexed => {
                return Err(decode_error(name, "palette was not expanded"));
            }
        };
        PixelBuffer::new(info.width, info.height, dots)
    }
}

fn to_samples(bytes: &[u8], bit_depth: BitDepth) -> Vec<u16> {
    match bit_depth {
        BitDepth::Sixteen => bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect(),
        _ => bytes.iter().map(|&byte| byte as u16).collect(),
    }
}

/// Reads width and height from the PNG header without decoding pixel data.
pub fn read_dimensions<T: Read>(reader: T, name: &str) -> crate::Result<(u32, u32)> {
    let reader = Decoder::new(reader)
        .read_info()
        .map_err(|e| decode_error(name, e))?;
    let info = reader.info();
    Ok((info.width, info.height))
}

#[cfg(test)]
mod test {
    use ::png::{BitDepth, ColorType, Encoder};

    use super::{read_dimensions, PngImageReader};
    use crate::{color::RGBAColorFormat, error::Error, image::ImageReader};

    fn encode(width: u32, height: u32, color: ColorType, depth: BitDepth, data: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut encoder = Encoder::new(&mut bytes, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
        writer.finish().unwrap();
        bytes
    }

    #[test]
    fn read_grayscale_expands_to_opaque_rgb() {
        let bytes = encode(2, 1, ColorType::Grayscale, BitDepth::Eight, &[0, 255]);
        let image = PngImageReader::new(bytes.as_slice(), "gray").read_image().unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(
            image.dots(),
            &[
                RGBAColorFormat::new(0.0, 0.0, 0.0, 1.0),
                RGBAColorFormat::new(1.0, 1.0, 1.0, 1.0)
            ]
        );
    }

    #[test]
    fn read_rgba_keeps_alpha() {
        let data = [255, 0, 0, 0, 0, 255, 0, 255];
        let bytes = encode(1, 2, ColorType::Rgba, BitDepth::Eight, &data);
        let image = PngImageReader::new(bytes.as_slice(), "rgba").read_image().unwrap();
        assert_eq!(image.height(), 2);
        assert_eq!(image.dots()[0], RGBAColorFormat::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(image.dots()[1], RGBAColorFormat::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn read_sixteen_bit_rgb() {
        let data = [0xFF, 0xFF, 0x00, 0x00, 0xFF, 0xFF];
        let bytes = encode(1, 1, ColorType::Rgb, BitDepth::Sixteen, &data);
        let image = PngImageReader::new(bytes.as_slice(), "deep").read_image().unwrap();
        assert_eq!(image.dots()[0], RGBAColorFormat::new(1.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn read_dimensions_from_header() {
        let bytes = encode(3, 2, ColorType::Grayscale, BitDepth::Eight, &[0; 6]);
        assert_eq!(read_dimensions(bytes.as_slice(), "header").unwrap(), (3, 2));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let bytes = b"definitely not a png".to_vec();
        match PngImageReader::new(bytes.as_slice(), "junk").read_image() {
            Err(Error::Decode(name, _)) => assert_eq!(name, "junk"),
            _ => panic!("Invalid PNG data was decoded"),
        }
    }
}
