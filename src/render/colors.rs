//! Hover tint for theme colors.
//!
//! Theme colors are CSS strings. Only `#RRGGBB` values are tinted; anything
//! else passes through unchanged.

/// Shift a color toward contrast: light colors darken, dark colors lighten.
///
/// Used for hover feedback on cells whose theme has no dedicated hover color.
pub fn hover_tint(color: &str, factor: f64) -> String {
    let Some(channels) = parse_hex(color) else {
        return color.to_string();
    };
    let [r, g, b] = channels.map(f64::from);
    // Perceived brightness, 0.299/0.587/0.114 weights
    let light = 0.299 * r + 0.587 * g + 0.114 * b > 127.5;
    let target = if light { 0.0 } else { 255.0 };
    let [r, g, b] = channels.map(|c| blend(c, target, factor));
    format!("#{r:02X}{g:02X}{b:02X}")
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(hex.get(at..at + 2)?, 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Clamped to [0, 255] before the cast.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend(channel: u8, target: f64, factor: f64) -> u8 {
    let from = f64::from(channel);
    let blended = from + (target - from) * factor.clamp(0.0, 1.0);
    blended.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_tint_moves_toward_contrast() {
        assert_eq!(hover_tint("#FFFFFF", 0.5), "#808080");
        assert_eq!(hover_tint("#000000", 0.5), "#808080");
        assert_eq!(hover_tint("#ffffff", 0.06), "#F0F0F0");
        assert_eq!(hover_tint("#336699", 1.0), "#FFFFFF");
        assert_eq!(hover_tint(" #E0E0E0 ", 0.0), "#E0E0E0");
    }

    #[test]
    fn non_hex_colors_pass_through() {
        assert_eq!(hover_tint("rgba(0,0,0,0.5)", 0.5), "rgba(0,0,0,0.5)");
        assert_eq!(hover_tint("#12345", 0.5), "#12345");
        assert_eq!(hover_tint("#+12345", 0.5), "#+12345");
        assert_eq!(hover_tint("white", 0.5), "white");
    }
}
