// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Pixel colors and the text forms they can be written in.

use image::Rgba;

use crate::error::RenderError;

/// An 8-bit RGBA pixel, the unit every renderer writes.
pub type Color = Rgba<u8>;

/// Opaque white, the default background.
pub const WHITE: Color = Rgba([255, 255, 255, 255]);

/// Opaque black.
pub const BLACK: Color = Rgba([0, 0, 0, 255]);

/// Parse a color from text.  Accepts `#rgb`, `#rgba`, `#rrggbb` and
/// `#rrggbbaa` (the `#` is optional), `rgb(r, g, b)`, `rgba(r, g, b, a)`,
/// and a handful of common names.
pub fn parse_color(text: &str) -> Result<Color, RenderError> {
    let s = text.trim();
    let lower = s.to_ascii_lowercase();
    named(&lower)
        .or_else(|| functional(&lower))
        .or_else(|| parse_hex(s))
        .ok_or_else(|| RenderError::InvalidColor(text.to_string()))
}

fn named(s: &str) -> Option<Color> {
    let rgba = match s {
        "black" => [0, 0, 0, 255],
        "white" => [255, 255, 255, 255],
        "red" => [255, 0, 0, 255],
        "green" => [0, 128, 0, 255],
        "lime" => [0, 255, 0, 255],
        "blue" => [0, 0, 255, 255],
        "yellow" => [255, 255, 0, 255],
        "cyan" => [0, 255, 255, 255],
        "magenta" => [255, 0, 255, 255],
        "orange" => [255, 165, 0, 255],
        "gray" | "grey" => [128, 128, 128, 255],
        "transparent" => [0, 0, 0, 0],
        _ => return None,
    };
    Some(Rgba(rgba))
}

// rgb(r, g, b) and rgba(r, g, b, a), channels 0-255.
fn functional(s: &str) -> Option<Color> {
    let (body, arity) = if s.starts_with("rgba(") {
        (&s[5..], 4)
    } else if s.starts_with("rgb(") {
        (&s[4..], 3)
    } else {
        return None;
    };
    if !body.ends_with(')') {
        return None;
    }
    let channels: Vec<u8> = body[..body.len() - 1]
        .split(',')
        .map(|c| c.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    if channels.len() != arity {
        return None;
    }
    let alpha = if arity == 4 { channels[3] } else { 255 };
    Some(Rgba([channels[0], channels[1], channels[2], alpha]))
}

fn parse_hex(s: &str) -> Option<Color> {
    let s = if s.starts_with('#') { &s[1..] } else { s };
    let b = s.as_bytes();
    match b.len() {
        3 | 4 => {
            let mut rgba = [255u8; 4];
            for (i, &c) in b.iter().enumerate() {
                let d = hex_digit(c)?;
                rgba[i] = d << 4 | d;
            }
            Some(Rgba(rgba))
        }
        6 | 8 => {
            let mut rgba = [255u8; 4];
            for (i, pair) in b.chunks(2).enumerate() {
                rgba[i] = hex_digit(pair[0])? << 4 | hex_digit(pair[1])?;
            }
            Some(Rgba(rgba))
        }
        _ => None,
    }
}

#[inline]
fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_color("#ff8000").unwrap(), Rgba([255, 128, 0, 255]));
        assert_eq!(parse_color("FF8000").unwrap(), Rgba([255, 128, 0, 255]));
        assert_eq!(parse_color("#f80").unwrap(), Rgba([255, 136, 0, 255]));
        assert_eq!(parse_color("#f808").unwrap(), Rgba([255, 136, 0, 136]));
        assert_eq!(parse_color("#00000080").unwrap(), Rgba([0, 0, 0, 128]));
    }

    #[test]
    fn parses_functional_forms() {
        assert_eq!(parse_color("rgb(1, 2, 3)").unwrap(), Rgba([1, 2, 3, 255]));
        assert_eq!(parse_color(" RGBA(1,2,3,4) ").unwrap(), Rgba([1, 2, 3, 4]));
    }

    #[test]
    fn parses_names() {
        assert_eq!(parse_color("white").unwrap(), WHITE);
        assert_eq!(parse_color("Black").unwrap(), BLACK);
        assert_eq!(parse_color("transparent").unwrap(), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn rejects_garbage() {
        for bad in &["", "#12", "#ggg", "rgb(1,2)", "rgb(1,2,300)", "rgba(1,2,3)", "chartreuse"] {
            assert_eq!(
                parse_color(bad),
                Err(RenderError::InvalidColor(bad.to_string())),
                "{:?} should not parse",
                bad
            );
        }
    }
}
