// Color conversions for the tint effect
//
// The tint color is edited as a hex string in the UI but travels through
// effect snapshots as a single number (packed 0xRRGGBB).

/// Errors for malformed color input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),
}

/// Largest packed RGB value
pub const MAX_PACKED_RGB: u32 = 0x00FF_FFFF;

/// Parse `#rrggbb`, `rrggbb`, `#rgb` or `rgb` into packed 0xRRGGBB
pub fn parse_hex(hex: &str) -> Result<u32, ColorError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(hex.to_string()));
    }

    let expanded = match digits.len() {
        6 => digits.to_string(),
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        _ => return Err(ColorError::InvalidHex(hex.to_string())),
    };

    u32::from_str_radix(&expanded, 16).map_err(|_| ColorError::InvalidHex(hex.to_string()))
}

/// Split packed 0xRRGGBB into its channels
pub fn unpack_rgb(packed: u32) -> (u8, u8, u8) {
    let packed = packed & MAX_PACKED_RGB;
    ((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
}

/// Pack three channels into 0xRRGGBB
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Lower-case `#rrggbb` for three channels
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:06x}", pack_rgb(r, g, b))
}

/// `"r,g,b"` for the color picker, or an empty string when `hex` is not a
/// six digit color
pub fn hex_to_rgb(hex: &str) -> String {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return String::new();
    }
    match parse_hex(digits) {
        Ok(packed) => {
            let (r, g, b) = unpack_rgb(packed);
            format!("{},{},{}", r, g, b)
        }
        Err(_) => String::new(),
    }
}

/// Numeric tint channel value back to a packed color
///
/// Out of range or non-finite values are clamped so a corrupt snapshot
/// cannot produce an invalid color.
pub fn packed_from_channel(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    if value >= f64::from(MAX_PACKED_RGB) {
        return MAX_PACKED_RGB;
    }
    value.round() as u32
}
