//! Color to grid-symbol classification.
//!
//! The encoded grid distinguishes content by letter: one symbol per palette
//! color, uppercase for the human layer and lowercase for the generated
//! layer (lowercasing is the encoder's job; this module always reports the
//! canonical uppercase symbol).
//!
//! | Color  | Symbol |
//! |--------|--------|
//! | red    | `R`    |
//! | blue   | `B`    |
//! | green  | `G`    |
//! | yellow | `Y`    |
//! | orange | `O`    |
//! | purple | `P`    |
//! | black / unrecognized | `#` |
//! | white  | `.` (eraser, never overwrites) |

/// The empty-cell symbol. White classifies to this so an eraser stroke never
/// overwrites content.
pub const EMPTY_SYMBOL: char = '.';

/// Symbol for black and for any color the palette cannot classify.
pub const FALLBACK_SYMBOL: char = '#';

/// Classify a color into its canonical uppercase grid symbol.
///
/// Accepts CSS color names for the palette entries and `#rgb`/`#rrggbb` hex
/// strings; hex colors are bucketed by hue. Anything unparseable classifies
/// as [`FALLBACK_SYMBOL`].
#[must_use]
pub fn symbol_for(color: &str) -> char {
    let color = color.trim();
    match color.to_ascii_lowercase().as_str() {
        "red" => return 'R',
        "blue" => return 'B',
        "green" => return 'G',
        "yellow" => return 'Y',
        "orange" => return 'O',
        "purple" => return 'P',
        "white" => return EMPTY_SYMBOL,
        "black" => return FALLBACK_SYMBOL,
        _ => {}
    }

    let Some((r, g, b)) = parse_hex(color) else {
        return FALLBACK_SYMBOL;
    };
    classify_rgb(r, g, b)
}

/// Parse `#rgb` or `#rrggbb` into channel values.
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let mut channels = hex.chars().map(|c| {
                // one hex digit expands to both nibbles: f -> ff
                c.to_digit(16).and_then(|d| u8::try_from(d * 17).ok())
            });
            let r = channels.next()??;
            let g = channels.next()??;
            let b = channels.next()??;
            Some((r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        _ => None,
    }
}

/// Bucket an RGB triple into the palette by hue, with near-grayscale colors
/// split into white (light) and black (dark).
fn classify_rgb(r: u8, g: u8, b: u8) -> char {
    let (rf, gf, bf) = (f64::from(r), f64::from(g), f64::from(b));
    let max = rf.max(gf).max(bf);
    let min = rf.min(gf).min(bf);
    let delta = max - min;

    // Grayscale: no meaningful hue
    if delta < 30.0 {
        return if max > 230.0 {
            EMPTY_SYMBOL
        } else {
            FALLBACK_SYMBOL
        };
    }

    let hue = if (max - rf).abs() < f64::EPSILON {
        60.0 * ((gf - bf) / delta).rem_euclid(6.0)
    } else if (max - gf).abs() < f64::EPSILON {
        60.0 * ((bf - rf) / delta + 2.0)
    } else {
        60.0 * ((rf - gf) / delta + 4.0)
    };

    match hue {
        h if !(15.0..330.0).contains(&h) => 'R',
        h if h < 45.0 => 'O',
        h if h < 75.0 => 'Y',
        h if h < 165.0 => 'G',
        h if h < 255.0 => 'B',
        _ => 'P',
    }
}
