// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Color palettes.
//!
//! A palette comes in two stages.  A `RawPalette` is what a palette
//! table holds: a name and a list of stops whose colors are still text.
//! Calling `resolve()` parses every color exactly once and produces a
//! `ResolvedPalette`, which is immutable and is the only form the
//! renderers accept.  Parsing failures therefore surface before a
//! single pixel is computed.
//!
//! Stops are scanned in the order they are stored, looking for the
//! first stop whose position is at or below the requested value.  The
//! caller decides the order; the bundled palettes list their stops from
//! position 1.0 down to 0.0.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::color::{parse_color, Color};
use crate::error::RenderError;

/// A palette stop as stored: a color in text form and its position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// The color, in any form `parse_color` accepts.
    pub color: String,
    /// Where along [0, 1] the color sits.
    pub position: f64,
}

/// A named, ordered list of stops, colors not yet parsed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPalette {
    /// The palette's name in its table.
    pub name: String,
    /// The stops, in scan order.
    #[serde(alias = "transitions")]
    pub stops: Vec<ColorStop>,
}

impl RawPalette {
    /// Constructor from `(color text, position)` pairs.
    pub fn new<S: Into<String>>(name: S, stops: &[(&str, f64)]) -> RawPalette {
        RawPalette {
            name: name.into(),
            stops: stops
                .iter()
                .map(|&(color, position)| ColorStop {
                    color: color.to_string(),
                    position,
                })
                .collect(),
        }
    }

    /// Parse every stop's color.  Fails on the first color that does
    /// not parse.
    pub fn resolve(&self) -> Result<ResolvedPalette, RenderError> {
        let stops = self
            .stops
            .iter()
            .map(|stop| parse_color(&stop.color).map(|color| (stop.position, color)))
            .collect::<Result<Vec<_>, RenderError>>()?;
        Ok(ResolvedPalette {
            name: self.name.clone(),
            stops,
        })
    }
}

/// A palette whose colors have all been parsed.  Read-only.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPalette {
    name: String,
    stops: Vec<(f64, Color)>,
}

impl ResolvedPalette {
    /// Build directly from already-parsed colors.
    pub fn from_colors<S: Into<String>>(name: S, stops: Vec<(f64, Color)>) -> ResolvedPalette {
        ResolvedPalette {
            name: name.into(),
            stops,
        }
    }

    /// The palette's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of stops.
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// A palette with no stops cannot produce colors.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// The color at `t`.  `t` is clamped to [0, 1]; a NaN counts as 0.
    /// Past the last matching stop the color is flat.  Between two
    /// stops the channels are interpolated linearly and the result is
    /// fully opaque.
    pub fn color_at(&self, t: f64) -> Result<Color, RenderError> {
        if self.stops.is_empty() {
            return Err(RenderError::EmptyPalette);
        }
        let t = if t.is_nan() { 0.0 } else { t.max(0.0).min(1.0) };
        let last = self.stops.len() - 1;
        let i = self
            .stops
            .iter()
            .position(|&(position, _)| t >= position)
            .unwrap_or(last);
        if i >= last {
            return Ok(self.stops[last].1);
        }

        let (p0, Rgba(c0)) = self.stops[i];
        let (p1, Rgba(c1)) = self.stops[i + 1];
        let span = p1 - p0;
        // Two stops at the same position: nothing to interpolate.
        if span == 0.0 {
            return Ok(Rgba([c0[0], c0[1], c0[2], 255]));
        }
        let g = (t - p0) / span;
        let channel = |k: usize| {
            let a = f64::from(c0[k]);
            let b = f64::from(c1[k]);
            (a + g * (b - a)).round().max(0.0).min(255.0) as u8
        };
        Ok(Rgba([channel(0), channel(1), channel(2), 255]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, WHITE};

    fn black_white() -> ResolvedPalette {
        RawPalette::new("bw", &[("white", 1.0), ("black", 0.0)])
            .resolve()
            .unwrap()
    }

    #[test]
    fn resolve_parses_every_stop() {
        let p = RawPalette::new("t", &[("#ff0000", 1.0), ("rgb(0, 0, 255)", 0.0)])
            .resolve()
            .unwrap();
        assert_eq!(p.name(), "t");
        assert_eq!(p.len(), 2);
        assert_eq!(p.color_at(1.0).unwrap(), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn resolve_rejects_bad_color() {
        let raw = RawPalette::new("t", &[("#ff0000", 1.0), ("not-a-color", 0.0)]);
        assert_eq!(
            raw.resolve(),
            Err(RenderError::InvalidColor("not-a-color".to_string()))
        );
    }

    #[test]
    fn empty_palette_has_no_colors() {
        let p = RawPalette::new("empty", &[]).resolve().unwrap();
        assert!(p.is_empty());
        assert_eq!(p.color_at(0.5), Err(RenderError::EmptyPalette));
    }

    #[test]
    fn boundaries_of_two_stop_palette() {
        let p = black_white();
        assert_eq!(p.color_at(0.0).unwrap(), BLACK);
        assert_eq!(p.color_at(1.0).unwrap(), WHITE);
    }

    #[test]
    fn tail_is_flat() {
        let p = RawPalette::new("three", &[("red", 1.0), ("lime", 0.5), ("blue", 0.0)])
            .resolve()
            .unwrap();
        let blue = Rgba([0, 0, 255, 255]);
        assert_eq!(p.color_at(-5.0).unwrap(), blue);
        assert_eq!(p.color_at(0.0).unwrap(), blue);
        assert_eq!(p.color_at(std::f64::NAN).unwrap(), blue);
    }

    #[test]
    fn input_is_clamped_above() {
        let p = black_white();
        assert_eq!(p.color_at(7.0).unwrap(), p.color_at(1.0).unwrap());
    }

    #[test]
    fn ascending_stops_interpolate() {
        let p = RawPalette::new("up", &[("#000000", 0.0), ("#c8c8c8", 1.0)])
            .resolve()
            .unwrap();
        assert_eq!(p.color_at(0.5).unwrap(), Rgba([100, 100, 100, 255]));
        assert_eq!(p.color_at(0.25).unwrap(), Rgba([50, 50, 50, 255]));
    }

    #[test]
    fn interpolation_clamps_channels_and_forces_opacity() {
        // Scanning descending stops with t = 0.75 picks the stop at 0.5
        // and extrapolates away from the stop at 0.0.
        let p = ResolvedPalette::from_colors(
            "x",
            vec![
                (1.0, Rgba([0, 0, 0, 10])),
                (0.5, Rgba([200, 10, 100, 10])),
                (0.0, Rgba([0, 250, 100, 10])),
            ],
        );
        let c = p.color_at(0.75).unwrap();
        assert_eq!(c, Rgba([255, 0, 100, 255]));
    }

    #[test]
    fn single_stop_is_flat() {
        let p = RawPalette::new("one", &[("orange", 0.3)]).resolve().unwrap();
        for &t in &[0.0, 0.3, 0.9] {
            assert_eq!(p.color_at(t).unwrap(), Rgba([255, 165, 0, 255]));
        }
    }
}
