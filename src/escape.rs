// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time rendering: the Julia family, the Phoenix Julia set, and
//! the generalized Mandelbrot set.
//!
//! Every pixel is mapped to a point on the complex plane and iterated
//! until it either leaves the bail-out circle or runs out of
//! iterations.  Rather than coloring by the raw iteration count, which
//! bands, each pixel gets a continuous value: for the Julia family the
//! sum of exp(-|z|) over the orbit, for the Mandelbrot set the
//! normalized iteration count.  Points that never escape take the color
//! at the top of the palette.
//!
//! Pixels do not depend on each other, so the render hands rows out to
//! a pool of scoped threads.  Each thread owns the rows it takes; no
//! two threads ever touch the same pixel.

use std::sync::{Arc, Mutex};

use crossbeam::thread::ScopedJoinHandle;
use image::Rgba;
use log::debug;
use num::Complex;

use crate::color::Color;
use crate::error::RenderError;
use crate::formula::{Formula, Smoothing};
use crate::palette::ResolvedPalette;
use crate::planes::{IntegralPlane, Pixel, PlaneMapper};
use crate::raster::Frame;

/// What became of one orbit.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// Iterations performed before the orbit left the bail-out circle,
    /// or the iteration limit if it never did.
    pub iterations: usize,
    /// Whether the orbit left the bail-out circle.
    pub escaped: bool,
    /// The continuous coloring value of the orbit.
    pub value: f64,
}

/// An escape-time renderer, fully set up for one image.
pub struct EscapeTime<'a> {
    plane: PlaneMapper,
    formula: Formula,
    max_iterations: usize,
    bail_out: f64,
    palette: &'a ResolvedPalette,
}

impl<'a> EscapeTime<'a> {
    /// Everything that can be wrong with the request is caught here,
    /// before any pixel is computed.
    pub fn new(
        plane: PlaneMapper,
        formula: Formula,
        max_iterations: usize,
        bail_out: f64,
        palette: &'a ResolvedPalette,
    ) -> Result<EscapeTime<'a>, RenderError> {
        if !(bail_out > 0.0) || !bail_out.is_finite() {
            return Err(RenderError::InvalidParameter(format!(
                "bail-out must be a positive number, not {}",
                bail_out
            )));
        }
        formula.check()?;
        if palette.is_empty() {
            return Err(RenderError::EmptyPalette);
        }
        Ok(EscapeTime {
            plane,
            formula,
            max_iterations,
            bail_out,
            palette,
        })
    }

    /// The plane mapping the renderer uses.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// Iterate one point.
    pub fn escape(&self, point: Complex<f64>) -> Escape {
        match self.formula.smoothing() {
            Smoothing::Potential => self.potential(point),
            Smoothing::NormalizedCount => self.normalized_count(point),
        }
    }

    // Julia family and Phoenix.  A NaN or infinite |z| fails the
    // `< bail_out` test, so overflow ends the orbit as an escape.
    fn potential(&self, seed: Complex<f64>) -> Escape {
        let mut z = seed;
        let mut prev = seed;
        let mut value = (-z.norm()).exp();
        let mut n = 0;
        while n < self.max_iterations && z.norm() < self.bail_out {
            let next = self.formula.next(z, prev, seed);
            prev = z;
            z = next;
            value += (-z.norm()).exp();
            n += 1;
        }
        Escape {
            iterations: n,
            escaped: n < self.max_iterations,
            value,
        }
    }

    // Generalized Mandelbrot.  Each axis is raised to the exponent
    // separately for the escape test; NaN fails `<=` and escapes.  A
    // fractional exponent of a negative axis has no real value, so
    // those take the magnitude instead.
    fn normalized_count(&self, seed: Complex<f64>) -> Escape {
        let m = match self.formula {
            Formula::Power { m } => m,
            _ => 2.0,
        };
        let bail_out_sq = self.bail_out * self.bail_out;
        let power = |v: f64| {
            if m.fract() == 0.0 {
                v.powf(m)
            } else {
                v.abs().powf(m)
            }
        };
        let (mut x2, mut y2) = (0.0_f64, 0.0_f64);
        let mut z = seed;
        let mut n = 0;
        while n < self.max_iterations {
            x2 = power(z.re);
            y2 = power(z.im);
            if !(x2 + y2 <= bail_out_sq) {
                break;
            }
            z = self.formula.next(z, z, seed);
            n += 1;
        }
        let escaped = n < self.max_iterations;
        let value = if escaped {
            n as f64 - ((x2 + y2).sqrt().ln() / self.bail_out.ln()).log2()
        } else {
            n as f64
        };
        Escape {
            iterations: n,
            escaped,
            value,
        }
    }

    /// Where along the palette an orbit lands.  Orbits that never
    /// escaped sit at the very top.
    pub fn palette_position(&self, escape: &Escape) -> f64 {
        if escape.escaped {
            escape.value / self.max_iterations as f64
        } else {
            1.0
        }
    }

    /// The color of one pixel.
    pub fn color_of(&self, pixel: &Pixel) -> Result<Color, RenderError> {
        let escape = self.escape(self.plane.pixel_to_point(pixel));
        self.palette.color_at(self.palette_position(&escape))
    }

    fn render_row(&self, row: usize, pixels: &mut [Color]) -> Result<(), RenderError> {
        for (column, pixel) in pixels.iter_mut().enumerate() {
            *pixel = self.color_of(&Pixel(column, row))?;
        }
        Ok(())
    }

    /// Render on the calling thread.
    pub fn render_single(&self) -> Result<Frame, RenderError> {
        let IntegralPlane(width, height) = self.plane.integral_plane;
        let mut frame = Frame::new(width, height, Rgba([0, 0, 0, 0]));
        for (row, pixels) in frame.pixels_mut().chunks_mut(width).enumerate() {
            self.render_row(row, pixels)?;
        }
        Ok(frame)
    }

    /// Render with `threads` workers pulling rows from a shared queue.
    /// The result does not depend on the thread count.
    pub fn render(&self, threads: usize) -> Result<Frame, RenderError> {
        let IntegralPlane(width, height) = self.plane.integral_plane;
        debug!(
            "escape-time {}x{} step {} formula {:?} on {} threads",
            width,
            height,
            self.plane.step(),
            self.formula,
            threads
        );
        if threads <= 1 {
            return self.render_single();
        }

        let mut frame = Frame::new(width, height, Rgba([0, 0, 0, 0]));
        {
            let rows = Arc::new(Mutex::new(frame.pixels_mut().chunks_mut(width).enumerate()));
            let results = crossbeam::scope(|spawner| {
                let handles: Vec<ScopedJoinHandle<Result<(), RenderError>>> = (0..threads)
                    .map(|_| {
                        let rows = rows.clone();
                        spawner.spawn(move |_| -> Result<(), RenderError> {
                            loop {
                                let row = rows
                                    .lock()
                                    .map_err(|_| RenderError::WorkerPanicked)?
                                    .next();
                                match row {
                                    Some((row, pixels)) => self.render_row(row, pixels)?,
                                    None => break Ok(()),
                                }
                            }
                        })
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or(Err(RenderError::WorkerPanicked)))
                    .collect::<Result<Vec<()>, RenderError>>()
            })
            .map_err(|_| RenderError::WorkerPanicked)?;
            results?;
        }
        Ok(frame)
    }
}
