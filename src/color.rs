use thiserror::Error;

/// Linear RGB triple with every channel in `[0, 1]`.
pub type Rgb = [f32; 3];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("expected 3 or 6 hex digits in {0:?}")]
    Length(String),
    #[error("invalid hex digits in {0:?}")]
    Digits(String),
}

/// Parses `#rrggbb`, `rrggbb`, `#rgb` or `rgb` into normalized channels.
///
/// Short forms expand each digit (`abc` becomes `aabbcc`) before conversion,
/// so every channel keeps 8-bit precision.
pub fn parse_hex(hex: &str) -> Result<Rgb, ColorError> {
    let digits = hex.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits).trim();

    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_owned(),
        _ => return Err(ColorError::Length(hex.to_owned())),
    };

    if !expanded.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::Digits(hex.to_owned()));
    }
    let value =
        u32::from_str_radix(&expanded, 16).map_err(|_| ColorError::Digits(hex.to_owned()))?;
    Ok([channel(value, 16), channel(value, 8), channel(value, 0)])
}

/// Same as [`parse_hex`] but renders unparseable input as black.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    parse_hex(hex).unwrap_or([0.0; 3])
}

fn channel(value: u32, shift: u32) -> f32 {
    ((value >> shift) & 0xff) as f32 / 255.0
}
