#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
/// The color type recorded in a PNG header.
pub enum ColorType {
    /// One gray channel
    Grayscale,
    /// Red, green, and blue channels
    Truecolor,
    /// One palette index per pixel (not decodable by this crate)
    Indexed,
    /// Gray and alpha channels
    GrayscaleAlpha,
    /// Red, green, blue, and alpha channels
    TruecolorAlpha,
}

impl ColorType {
    /// Maps the numeric IHDR value to a color type, or `None` if the value
    /// isn't one that PNG defines.
    pub fn from_number(number: u8) -> Option<ColorType> {
        match number {
            0 => Some(ColorType::Grayscale),
            2 => Some(ColorType::Truecolor),
            3 => Some(ColorType::Indexed),
            4 => Some(ColorType::GrayscaleAlpha),
            6 => Some(ColorType::TruecolorAlpha),
            _ => None,
        }
    }

    /// Returns the numeric IHDR value for this color type.
    pub fn number(&self) -> u8 {
        match *self {
            ColorType::Grayscale => 0,
            ColorType::Truecolor => 2,
            ColorType::Indexed => 3,
            ColorType::GrayscaleAlpha => 4,
            ColorType::TruecolorAlpha => 6,
        }
    }

    /// Returns the number of samples stored per pixel, or `None` for indexed
    /// images (whose samples are palette lookups).
    pub fn channels(&self) -> Option<u32> {
        match *self {
            ColorType::Grayscale => Some(1),
            ColorType::Truecolor => Some(3),
            ColorType::Indexed => None,
            ColorType::GrayscaleAlpha => Some(2),
            ColorType::TruecolorAlpha => Some(4),
        }
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::ColorType;

    #[test]
    fn color_type_round_trip() {
        let color_types = &[
            ColorType::Grayscale,
            ColorType::Truecolor,
            ColorType::Indexed,
            ColorType::GrayscaleAlpha,
            ColorType::TruecolorAlpha,
        ];
        for &color_type in color_types.iter() {
            assert_eq!(
                ColorType::from_number(color_type.number()),
                Some(color_type)
            );
        }
    }

    #[test]
    fn undefined_color_types() {
        assert_eq!(ColorType::from_number(1), None);
        assert_eq!(ColorType::from_number(5), None);
        assert_eq!(ColorType::from_number(7), None);
    }

    #[test]
    fn truecolor_has_three_channels() {
        assert_eq!(ColorType::Truecolor.channels(), Some(3));
        assert_eq!(ColorType::Indexed.channels(), None);
    }
}

//===========================================================================//
