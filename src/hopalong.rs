// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The Hopalong attractor.
//!
//! The map is
//!
//! ```text
//! x' = y - sign(x) * sqrt(|b * x - c|)
//! y' = a - x
//! ```
//!
//! How far the orbit wanders depends on a, b and c and cannot be known
//! without running it, so a render is two passes over the same orbit.
//! The first pass draws nothing and only measures how far from the
//! origin the orbit gets on each axis.  That bounding box, symmetric
//! about the origin, fixes a single drawing scale.  The second pass
//! replays the orbit from the same starting point and plots every
//! step.  Each step depends on the one before, so neither pass can be
//! split across threads.

use image::Rgba;
use itertools::iproduct;
use log::{debug, info, warn};
use num::Complex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::Color;
use crate::error::RenderError;
use crate::planes::{Orientation, PlaneMapper, Region};
use crate::raster::RasterSurface;

/// With random coloring, a new color is drawn every this many outer
/// iterations.
pub const RECOLOR_EVERY: usize = 50;

/// How plotted points are colored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Coloring {
    /// Every point in one color.
    Fixed(Color),
    /// A random color, redrawn every `RECOLOR_EVERY` iterations.  A
    /// seed makes the colors reproducible.
    Random(Option<u64>),
}

/// The parameters of one attractor render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HopalongParams {
    /// The map's `a` constant.
    pub a: f64,
    /// The map's `b` constant.
    pub b: f64,
    /// The map's `c` constant.
    pub c: f64,
    /// Outer iterations.
    pub iterations: usize,
    /// Each outer iteration runs `resolution²` steps of the map.
    pub resolution: usize,
    /// Where the orbit starts.
    pub start: (f64, f64),
    /// How points are colored.
    pub coloring: Coloring,
}

/// The running state of the map.  Iterating yields the point after
/// each step, forever.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Orbit {
    x: f64,
    y: f64,
    a: f64,
    b: f64,
    c: f64,
}

impl Orbit {
    /// An orbit of the map with constants a, b, c starting at x, y.
    pub fn new(a: f64, b: f64, c: f64, x: f64, y: f64) -> Orbit {
        Orbit { x, y, a, b, c }
    }

    /// Advance one step.
    #[inline]
    pub fn step(&mut self) {
        let t = self.x;
        self.x = self.y - sign(t) * (self.b * t - self.c).abs().sqrt();
        self.y = self.a - t;
    }

    /// The current point.
    pub fn point(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Iterator for Orbit {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<(f64, f64)> {
        self.step();
        Some(self.point())
    }
}

// -1, 0 or 1.  f64::signum gives 1 for zero, which would push an
// orbit sitting at the origin off it.
#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// How far from the origin an orbit got on each axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrbitBounds {
    /// Largest |x| seen.
    pub x_max: f64,
    /// Largest |y| seen.
    pub y_max: f64,
}

impl OrbitBounds {
    /// The full extent along x.
    pub fn width(&self) -> f64 {
        2.0 * self.x_max
    }

    /// The full extent along y.
    pub fn height(&self) -> f64 {
        2.0 * self.y_max
    }

    /// The region of the plane the bounds cover.
    pub fn region(&self) -> Region {
        Region::new(-self.x_max, -self.y_max, self.width(), self.height())
    }
}

/// A Hopalong renderer.
#[derive(Clone, Debug)]
pub struct Hopalong {
    params: HopalongParams,
    sub_steps: usize,
}

impl Hopalong {
    /// Constructor.  Rejects non-finite constants and step counts that
    /// do not fit in memory-sized integers.
    pub fn new(params: HopalongParams) -> Result<Hopalong, RenderError> {
        let constants = [params.a, params.b, params.c, params.start.0, params.start.1];
        if constants.iter().any(|v| !v.is_finite()) {
            return Err(RenderError::InvalidParameter(format!(
                "hopalong constants must be finite: {:?}",
                params
            )));
        }
        let sub_steps = params
            .resolution
            .checked_mul(params.resolution)
            .and_then(|r2| r2.checked_mul(params.iterations))
            .ok_or_else(|| {
                RenderError::InvalidParameter(format!(
                    "{} iterations at resolution {} is too many steps",
                    params.iterations, params.resolution
                ))
            })?;
        Ok(Hopalong { params, sub_steps })
    }

    /// The parameters.
    pub fn params(&self) -> &HopalongParams {
        &self.params
    }

    /// Steps of the map per pass: iterations × resolution².
    pub fn sub_steps(&self) -> usize {
        self.sub_steps
    }

    /// A fresh orbit at the starting point.
    pub fn orbit(&self) -> Orbit {
        let p = &self.params;
        Orbit::new(p.a, p.b, p.c, p.start.0, p.start.1)
    }

    /// Every point of one pass, in order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> {
        self.orbit().take(self.sub_steps)
    }

    /// The first pass: run the orbit and measure it.  An orbit that
    /// never leaves the origin on some axis has no usable scale.
    pub fn fit(&self) -> Result<OrbitBounds, RenderError> {
        let (x_max, y_max) = self
            .points()
            .fold((0.0_f64, 0.0_f64), |(xm, ym), (x, y)| {
                (xm.max(x.abs()), ym.max(y.abs()))
            });
        debug!("hopalong fit: x_max {} y_max {}", x_max, y_max);
        if !(x_max > 0.0 && y_max > 0.0) || !x_max.is_finite() || !y_max.is_finite() {
            return Err(RenderError::DegenerateOrbit);
        }
        Ok(OrbitBounds { x_max, y_max })
    }

    /// The drawing scale, in pixels per unit, for a raster of the given
    /// size.
    pub fn scale(bounds: &OrbitBounds, width: usize, height: usize) -> f64 {
        (width as f64 / bounds.width()).min(height as f64 / bounds.height())
    }

    /// Both passes.  Draws onto whatever is already on the surface.
    pub fn render<S: RasterSurface + ?Sized>(&self, surface: &mut S) -> Result<(), RenderError> {
        let bounds = self.fit()?;
        self.draw(&bounds, surface)
    }

    /// The second pass: replay the orbit and plot it, scaled to fit
    /// `bounds` onto the surface.
    pub fn draw<S: RasterSurface + ?Sized>(
        &self,
        bounds: &OrbitBounds,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        let (width, height) = surface.dimensions();
        let plane =
            PlaneMapper::with_orientation(width, height, bounds.region(), Orientation::Up)?;
        debug!(
            "hopalong {}x{} scale {} over {} steps",
            width,
            height,
            Hopalong::scale(bounds, width, height),
            self.sub_steps
        );

        let mut rng = match self.params.coloring {
            Coloring::Random(Some(seed)) => Some(StdRng::seed_from_u64(seed)),
            Coloring::Random(None) => Some(StdRng::from_entropy()),
            Coloring::Fixed(_) => None,
        };
        let mut color = match self.params.coloring {
            Coloring::Fixed(color) => color,
            Coloring::Random(_) => Rgba([0, 0, 0, 255]),
        };

        let r = self.params.resolution;
        let mut clipped = 0usize;
        let steps = iproduct!(0..self.params.iterations, 0..r, 0..r);
        for ((i, j, k), (x, y)) in steps.zip(self.orbit()) {
            if let Some(rng) = rng.as_mut() {
                if i % RECOLOR_EVERY == 0 && j == 0 && k == 0 {
                    color = random_color(rng);
                }
            }
            match plane.point_to_pixel(&Complex::new(x, y)) {
                Some(pixel) => surface.set_pixel(pixel.0, pixel.1, color),
                None => clipped += 1,
            }
        }
        if clipped > 0 {
            warn!("hopalong: {} points fell outside the raster", clipped);
        }
        info!("hopalong plotted {} points", self.sub_steps - clipped);
        Ok(())
    }
}

fn random_color<R: Rng>(rng: &mut R) -> Color {
    Rgba([rng.gen::<u8>(), rng.gen::<u8>(), rng.gen::<u8>(), 255])
}
