use crate::error::{CoreError, CoreResult};

/// Display color of a calendar, channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}

impl Rgba {
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// ## Summary
    /// Parses `#rrggbb` or `#rrggbbaa`.
    ///
    /// ## Errors
    /// Returns `CoreError::ParseError` if the string is not a hex color.
    pub fn from_hex(value: &str) -> CoreResult<Self> {
        let hex = value
            .strip_prefix('#')
            .ok_or_else(|| CoreError::ParseError(format!("color '{value}' must start with '#'")))?;

        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return Err(CoreError::ParseError(format!(
                "color '{value}' must have 6 or 8 hex digits"
            )));
        }

        let channel = |index: usize| -> CoreResult<f32> {
            let digits = &hex[index * 2..index * 2 + 2];
            u8::from_str_radix(digits, 16)
                .map(|byte| f32::from(byte) / 255.0)
                .map_err(|err| CoreError::ParseError(format!("color '{value}': {err}")))
        };

        Ok(Self {
            red: channel(0)?,
            green: channel(1)?,
            blue: channel(2)?,
            alpha: if hex.len() == 8 { channel(3)? } else { 1.0 },
        })
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::new(0.21, 0.40, 0.59, 1.0)
    }
}

impl std::str::FromStr for Rgba {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_hex() {
        let color = Rgba::from_hex("#ff0000").expect("valid color");
        assert!((color.red - 1.0).abs() < f32::EPSILON);
        assert!(color.green.abs() < f32::EPSILON);
        assert!((color.alpha - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn parses_alpha_channel() {
        let color: Rgba = "#00000080".parse().expect("valid color");
        assert!((color.alpha - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn rejects_malformed_colors() {
        assert!(Rgba::from_hex("ff0000").is_err());
        assert!(Rgba::from_hex("#ff00").is_err());
        assert!(Rgba::from_hex("#gg0000").is_err());
    }
}
