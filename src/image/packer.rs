use super::PixelBuffer;
use crate::color::RGBAColorFormat;
use crate::Error;

/// Packs metallic color and inverted roughness into one buffer.
///
/// Every output pixel takes red, green and blue from the metallic pixel at the
/// same index and `1.0 - red` of the roughness pixel as alpha. Only the red
/// channel of the roughness source is read. Smoothness is not clamped, so
/// out-of-range roughness yields out-of-range alpha.
///
/// Callers compare the images' width and height before reading pixels. The
/// length check here only guards against buffers that slipped past that.
pub fn pack(metallic: &PixelBuffer, roughness: &PixelBuffer) -> crate::Result<PixelBuffer> {
    if metallic.len() != roughness.len() {
        return Err(Error::DimensionMismatch {
            metallic: (metallic.width(), metallic.height()),
            roughness: (roughness.width(), roughness.height()),
        });
    }
    let dots = metallic
        .dots()
        .iter()
        .zip(roughness.dots())
        .map(|(m, r)| RGBAColorFormat::new(m.red, m.green, m.blue, 1.0 - r.red))
        .collect();
    log::debug!(
        "Packed {} pixels into {}x{} metallic/smoothness",
        metallic.len(),
        metallic.width(),
        metallic.height()
    );
    PixelBuffer::new(metallic.width(), metallic.height(), dots)
}
