#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fractal renderer
//!
//! Two families of fractal are drawn here.  The escape-time fractals
//! (Julia sets under a choice of iteration formula, the Phoenix Julia
//! set, and the Mandelbrot set at any exponent) map every pixel of the
//! image to a point on the complex plane, iterate a formula starting
//! from that point, and color the pixel by how quickly the orbit leaves
//! a circle of radius "bail-out".  A smooth escape value is pushed
//! through a palette of color stops, so bands between iteration counts
//! blend rather than step.
//!
//! The Hopalong attractor is different: a single orbit of a simple
//! two-dimensional map is followed for millions of steps and every
//! point it lands on is plotted.  Its extent is measured in a first
//! pass so the second pass can scale the whole orbit onto the image.
//!
//! Rendering writes into anything implementing [`RasterSurface`];
//! [`image::RgbaImage`] is one.  Palettes come from a [`PaletteStore`],
//! and formulas from the process-wide [`formula::registry`].

pub mod color;
pub mod config;
pub mod error;
pub mod escape;
pub mod formula;
pub mod hopalong;
pub mod palette;
pub mod planes;
pub mod raster;
pub mod render;
pub mod store;

pub use color::{parse_color, Color};
pub use config::{FractalKind, RenderConfig};
pub use error::RenderError;
pub use escape::EscapeTime;
pub use formula::{list_formula_names, Formula, FormulaRegistry};
pub use hopalong::{Coloring, Hopalong, HopalongParams};
pub use palette::{RawPalette, ResolvedPalette};
pub use planes::{PlaneMapper, Region};
pub use raster::{Frame, RasterSurface};
pub use render::render;
pub use store::{resolve_by_name, PaletteCache, PaletteStore, PaletteTable};
