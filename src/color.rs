/// A pixel with normalized channels. Values are expected in `[0.0, 1.0]` but
/// nothing here enforces it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RGBAColorFormat<T> {
    pub red: T,
    pub green: T,
    pub blue: T,
    pub alpha: T,
}

/// Integer samples together with the maximum value of their bit depth.
pub struct RangeColorFormat<T> {
    max: T,
    red: T,
    green: T,
    blue: T,
    alpha: T,
}

impl<T> RGBAColorFormat<T> {
    pub fn new(red: T, green: T, blue: T, alpha: T) -> Self {
        RGBAColorFormat {
            red,
            green,
            blue,
            alpha,
        }
    }
}

impl Default for RGBAColorFormat<f32> {
    fn default() -> Self {
        RGBAColorFormat {
            red: 0.0,
            green: 0.0,
            blue: 0.0,
            alpha: 1.0,
        }
    }
}

impl RangeColorFormat<u16> {
    pub fn new(max: u16, red: u16, green: u16, blue: u16, alpha: u16) -> Self {
        RangeColorFormat {
            max,
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn gray(max: u16, value: u16, alpha: u16) -> Self {
        Self::new(max, value, value, value, alpha)
    }

    pub fn opaque(max: u16, red: u16, green: u16, blue: u16) -> Self {
        Self::new(max, red, green, blue, max)
    }
}

impl From<&RangeColorFormat<u16>> for RGBAColorFormat<f32> {
    fn from(value: &RangeColorFormat<u16>) -> Self {
        let max = value.max as f32;
        RGBAColorFormat {
            red: value.red as f32 / max,
            green: value.green as f32 / max,
            blue: value.blue as f32 / max,
            alpha: value.alpha as f32 / max,
        }
    }
}

impl From<RangeColorFormat<u16>> for RGBAColorFormat<f32> {
    fn from(value: RangeColorFormat<u16>) -> Self {
        RGBAColorFormat::from(&value)
    }
}

fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

// Out-of-range channels saturate here and nowhere earlier.
impl From<&RGBAColorFormat<f32>> for [u8; 4] {
    fn from(value: &RGBAColorFormat<f32>) -> Self {
        [
            quantize(value.red),
            quantize(value.green),
            quantize(value.blue),
            quantize(value.alpha),
        ]
    }
}
