// Display color for per-user invoice item customization.
//
// Responsibilities
// - Convert between the byte triple, a 24-bit unsigned integer and `#rrggbb` hex.
// - Equality only; the triple has no meaningful ordering.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
pub enum ParseColorError {
    #[default]
    #[error("unknown color parse error")]
    Unknown,

    #[error("expected '#' followed by exactly six hex digits")]
    InvalidFormat,

    #[error("invalid hex digit")]
    InvalidDigit,
}

impl Color {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Packs the triple into the low 24 bits: `0xRRGGBB`.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.red) << 16) | (u32::from(self.green) << 8) | u32::from(self.blue)
    }

    /// Reads the low 24 bits; the high byte is ignored.
    pub fn from_u32(value: u32) -> Self {
        Self {
            red: ((value >> 16) & 0xff) as u8,
            green: ((value >> 8) & 0xff) as u8,
            blue: (value & 0xff) as u8,
        }
    }

    /// Renders lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }

    /// Parses `#rrggbb`, case-insensitive.
    pub fn from_hex(input: &str) -> Result<Self, ParseColorError> {
        let digits = input
            .strip_prefix('#')
            .ok_or(ParseColorError::InvalidFormat)?;
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ParseColorError::InvalidFormat);
        }
        let parse_pair = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ParseColorError::InvalidDigit)
        };
        Ok(Self {
            red: parse_pair(0..2)?,
            green: parse_pair(2..4)?,
            blue: parse_pair(4..6)?,
        })
    }
}

#[cfg(test)]
mod color_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Color::new(0, 0, 0), "#000000", 0x000000)]
    #[case(Color::new(255, 255, 255), "#ffffff", 0xffffff)]
    #[case(Color::new(0x12, 0x34, 0x56), "#123456", 0x123456)]
    #[case(Color::new(0xab, 0xcd, 0xef), "#abcdef", 0xabcdef)]
    fn it_should_round_trip_through_hex_and_u32(
        #[case] color: Color,
        #[case] hex: &str,
        #[case] packed: u32,
    ) {
        assert_eq!(color.to_hex(), hex);
        assert_eq!(Color::from_hex(hex).unwrap(), color);
        assert_eq!(color.to_u32(), packed);
        assert_eq!(Color::from_u32(packed), color);
    }

    #[rstest]
    fn it_should_parse_uppercase_hex_but_render_lowercase() {
        let color = Color::from_hex("#ABCDEF").unwrap();
        assert_eq!(color, Color::new(0xab, 0xcd, 0xef));
        assert_eq!(color.to_hex(), "#abcdef");
    }

    #[rstest]
    #[case("abcdef")]
    #[case("#abcde")]
    #[case("#abcdef0")]
    #[case("")]
    fn it_should_reject_malformed_input(#[case] input: &str) {
        assert_eq!(Color::from_hex(input), Err(ParseColorError::InvalidFormat));
    }

    #[rstest]
    fn it_should_reject_non_hex_digits() {
        assert_eq!(Color::from_hex("#12345g"), Err(ParseColorError::InvalidDigit));
    }

    #[rstest]
    fn it_should_round_trip_a_sample_of_the_full_space() {
        for step in [0u16, 17, 51, 85, 119, 153, 187, 221, 255] {
            for other in [0u16, 85, 170, 255] {
                let color = Color::new(step as u8, other as u8, (255 - other) as u8);
                assert_eq!(Color::from_hex(&color.to_hex()).unwrap(), color);
                assert_eq!(Color::from_u32(color.to_u32()), color);
            }
        }
    }

    #[rstest]
    fn it_should_default_the_parse_error_to_unknown() {
        assert_eq!(ParseColorError::default(), ParseColorError::Unknown);
    }
}
