//! Color parsing and compositing utilities

/// Parse a hex color into RGBA8
///
/// Accepted forms (leading `#` optional): `rgb`, `rrggbb`, `rrggbbaa`.
/// Alpha defaults to 255.
pub fn parse_hex_color(hex: &str) -> Option<[u8; 4]> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    let byte = |shift: u32| ((value >> shift) & 0xff) as u8;
    match digits.len() {
        3 => {
            let nibble = |shift: u32| ((value >> shift) & 0xf) as u8 * 17;
            Some([nibble(8), nibble(4), nibble(0), 255])
        }
        6 => Some([byte(16), byte(8), byte(0), 255]),
        8 => Some([byte(24), byte(16), byte(8), byte(0)]),
        _ => None,
    }
}

/// Parse hex color to RGBA8, white on invalid input
pub fn parse_hex_color_to_rgba8(hex: &str) -> [u8; 4] {
    parse_hex_color(hex).unwrap_or([255; 4])
}

/// Same as [`parse_hex_color_to_rgba8`] with channels in 0.0-1.0
pub fn parse_hex_color_to_rgba(hex: &str) -> [f32; 4] {
    parse_hex_color_to_rgba8(hex).map(|c| c as f32 / 255.0)
}

/// Composite `src` over `dst` (both non-premultiplied RGBA8).
///
/// # Arguments
/// * `dst` - Existing pixel
/// * `src` - Fill color
/// * `coverage` - Glyph coverage (0.0-1.0), multiplies source alpha
pub fn blend_over(dst: [u8; 4], src: [u8; 4], coverage: f32) -> [u8; 4] {
    let sa = (src[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |s: u8, d: u8| -> u8 {
        let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}
