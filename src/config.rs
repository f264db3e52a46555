// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! What a render is asked to do, and the defaults and ceilings a
//! request boundary applies before asking.

use num::Complex;

use crate::color::{Color, BLACK, WHITE};
use crate::error::RenderError;
use crate::formula::Formula;
use crate::hopalong::{Coloring, HopalongParams};
use crate::palette::ResolvedPalette;
use crate::planes::Region;

/// Default image width.
pub const DEFAULT_WIDTH: usize = 800;
/// Default image height.
pub const DEFAULT_HEIGHT: usize = 800;
/// Default background.
pub const DEFAULT_BACKGROUND: Color = WHITE;
/// Palette used when the request names none.
pub const DEFAULT_PALETTE: &str = "orange_blue";
/// Region shown when the request names none.
pub const DEFAULT_REGION: Region = Region {
    x: -1.5,
    y: -1.5,
    width: 3.0,
    height: 3.0,
};

/// Default Julia iteration limit.
pub const JULIA_DEFAULT_ITERATIONS: usize = 250;
/// Largest Julia iteration limit accepted.
pub const JULIA_MAX_ITERATIONS: usize = 500_000;
/// Default Julia constant.
pub const JULIA_DEFAULT_C: Complex<f64> = Complex { re: -0.5, im: 0.6 };
/// Default Julia bail-out.
pub const JULIA_DEFAULT_BAIL_OUT: f64 = 2.0;
/// Default Julia formula name.
pub const JULIA_DEFAULT_FORMULA: &str = "classic";

/// Default Phoenix iteration limit.
pub const PHOENIX_DEFAULT_ITERATIONS: usize = 120;
/// Largest Phoenix iteration limit accepted.
pub const PHOENIX_MAX_ITERATIONS: usize = 500_000;
/// Default Phoenix constant.
pub const PHOENIX_DEFAULT_C: Complex<f64> = Complex { re: 0.271, im: 0.0 };
/// Default Phoenix weight of the previous iterate.
pub const PHOENIX_DEFAULT_K: Complex<f64> = Complex { re: 0.0, im: -0.01 };
/// Default Phoenix bail-out.
pub const PHOENIX_DEFAULT_BAIL_OUT: f64 = 1e20;

/// Default Mandelbrot iteration limit.
pub const MANDELBROT_DEFAULT_ITERATIONS: usize = 250;
/// Largest Mandelbrot iteration limit accepted.
pub const MANDELBROT_MAX_ITERATIONS: usize = 500_000;
/// Default Mandelbrot exponent.
pub const MANDELBROT_DEFAULT_M: f64 = 2.0;
/// Default Mandelbrot bail-out.
pub const MANDELBROT_DEFAULT_BAIL_OUT: f64 = 2.0;
/// Region the Mandelbrot set is shown in by default.
pub const MANDELBROT_DEFAULT_REGION: Region = Region {
    x: -2.5,
    y: -1.5,
    width: 4.0,
    height: 3.0,
};

/// Default Hopalong outer iterations.
pub const HOPALONG_DEFAULT_ITERATIONS: usize = 10_000_000;
/// Largest Hopalong outer iteration count accepted.
pub const HOPALONG_MAX_ITERATIONS: usize = 2_000_000_000;
/// Default Hopalong resolution.
pub const HOPALONG_DEFAULT_RESOLUTION: usize = 2;
/// Largest Hopalong resolution accepted.
pub const HOPALONG_MAX_RESOLUTION: usize = 15;
/// Default Hopalong `a`.
pub const HOPALONG_DEFAULT_A: f64 = 2.0;
/// Default Hopalong `b`.
pub const HOPALONG_DEFAULT_B: f64 = 1.0;
/// Default Hopalong `c`.
pub const HOPALONG_DEFAULT_C: f64 = 0.0;
/// Color used when a Hopalong is drawn in one color and none is named.
pub const HOPALONG_DEFAULT_COLOR: Color = BLACK;

/// Which fractal to draw, with the constants that are particular to it.
#[derive(Copy, Clone, Debug)]
pub enum FractalKind {
    /// A Julia set of any formula.
    Julia(Formula),
    /// The Phoenix Julia set.
    PhoenixJulia {
        /// The Julia constant.
        c: Complex<f64>,
        /// Weight of the previous iterate.
        k: Complex<f64>,
    },
    /// The Mandelbrot set, z^m + c.
    Mandelbrot {
        /// The exponent.
        m: f64,
    },
    /// The Hopalong attractor.
    Hopalong(HopalongParams),
}

impl FractalKind {
    /// The escape-time formula, if this is an escape-time fractal.
    pub fn formula(&self) -> Option<Formula> {
        match *self {
            FractalKind::Julia(formula) => Some(formula),
            FractalKind::PhoenixJulia { c, k } => Some(Formula::Phoenix { c, k }),
            FractalKind::Mandelbrot { m } => Some(Formula::Power { m }),
            FractalKind::Hopalong(_) => None,
        }
    }

    fn max_iterations(&self) -> usize {
        match self {
            FractalKind::Julia(_) => JULIA_MAX_ITERATIONS,
            FractalKind::PhoenixJulia { .. } => PHOENIX_MAX_ITERATIONS,
            FractalKind::Mandelbrot { .. } => MANDELBROT_MAX_ITERATIONS,
            FractalKind::Hopalong(_) => HOPALONG_MAX_ITERATIONS,
        }
    }
}

/// Hopalong parameters at their defaults, with random colors.
pub fn default_hopalong() -> HopalongParams {
    HopalongParams {
        a: HOPALONG_DEFAULT_A,
        b: HOPALONG_DEFAULT_B,
        c: HOPALONG_DEFAULT_C,
        iterations: HOPALONG_DEFAULT_ITERATIONS,
        resolution: HOPALONG_DEFAULT_RESOLUTION,
        start: (0.0, 0.0),
        coloring: Coloring::Random(None),
    }
}

/// Everything one render needs.  Not modified while rendering.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Image width in pixels.
    pub width: usize,
    /// Image height in pixels.
    pub height: usize,
    /// Iteration limit per point.  Ignored by the attractor, which
    /// carries its own count.
    pub max_iterations: usize,
    /// Escape radius.
    pub bail_out: f64,
    /// The part of the plane to draw.
    pub region: Region,
    /// The colors escape values are mapped through.
    pub palette: ResolvedPalette,
    /// Color of pixels nothing is drawn on.
    pub background: Color,
    /// The fractal itself.
    pub fractal: FractalKind,
}

impl RenderConfig {
    /// A configuration for `fractal` with that fractal's default size,
    /// iteration limit, bail-out and region.
    pub fn new(fractal: FractalKind, palette: ResolvedPalette) -> RenderConfig {
        let (max_iterations, bail_out, region) = match fractal {
            FractalKind::Julia(_) => (JULIA_DEFAULT_ITERATIONS, JULIA_DEFAULT_BAIL_OUT, DEFAULT_REGION),
            FractalKind::PhoenixJulia { .. } => {
                (PHOENIX_DEFAULT_ITERATIONS, PHOENIX_DEFAULT_BAIL_OUT, DEFAULT_REGION)
            }
            FractalKind::Mandelbrot { .. } => (
                MANDELBROT_DEFAULT_ITERATIONS,
                MANDELBROT_DEFAULT_BAIL_OUT,
                MANDELBROT_DEFAULT_REGION,
            ),
            FractalKind::Hopalong(params) => (params.iterations, JULIA_DEFAULT_BAIL_OUT, DEFAULT_REGION),
        };
        RenderConfig {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            max_iterations,
            bail_out,
            region,
            palette,
            background: DEFAULT_BACKGROUND,
            fractal,
        }
    }

    /// Change the image size.
    pub fn with_size(mut self, width: usize, height: usize) -> RenderConfig {
        self.width = width;
        self.height = height;
        self
    }

    /// Apply the ceilings a request boundary enforces.  Geometry and
    /// palette problems are left to the renderers, which catch them
    /// during setup.
    pub fn validate(&self) -> Result<(), RenderError> {
        let ceiling = self.fractal.max_iterations();
        match self.fractal {
            FractalKind::Hopalong(params) => {
                if params.iterations > ceiling {
                    return Err(RenderError::InvalidParameter(format!(
                        "too many iterations, max {}",
                        ceiling
                    )));
                }
                if params.resolution > HOPALONG_MAX_RESOLUTION {
                    return Err(RenderError::InvalidParameter(format!(
                        "resolution is too high, max {}",
                        HOPALONG_MAX_RESOLUTION
                    )));
                }
            }
            _ => {
                if self.max_iterations > ceiling {
                    return Err(RenderError::InvalidParameter(format!(
                        "too many iterations, max {}",
                        ceiling
                    )));
                }
                if !(self.bail_out > 0.0) {
                    return Err(RenderError::InvalidParameter(format!(
                        "bail-out must be positive, not {}",
                        self.bail_out
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::RawPalette;

    fn palette() -> ResolvedPalette {
        RawPalette::new("bw", &[("white", 1.0), ("black", 0.0)])
            .resolve()
            .unwrap()
    }

    #[test]
    fn defaults_follow_the_fractal() {
        let julia = RenderConfig::new(
            FractalKind::Julia(Formula::Classic { c: JULIA_DEFAULT_C }),
            palette(),
        );
        assert_eq!(julia.max_iterations, 250);
        assert_eq!(julia.bail_out, 2.0);
        assert_eq!(julia.region, DEFAULT_REGION);

        let phoenix = RenderConfig::new(
            FractalKind::PhoenixJulia {
                c: PHOENIX_DEFAULT_C,
                k: PHOENIX_DEFAULT_K,
            },
            palette(),
        );
        assert_eq!(phoenix.max_iterations, 120);
        assert_eq!(phoenix.bail_out, 1e20);

        let mandelbrot = RenderConfig::new(FractalKind::Mandelbrot { m: 2.0 }, palette());
        assert_eq!(mandelbrot.region, MANDELBROT_DEFAULT_REGION);
        assert_eq!(mandelbrot.background, WHITE);
    }

    #[test]
    fn formula_of_each_kind() {
        assert!(FractalKind::Hopalong(default_hopalong()).formula().is_none());
        let mandelbrot = FractalKind::Mandelbrot { m: 3.0 };
        match mandelbrot.formula() {
            Some(Formula::Power { m }) => assert_eq!(m, 3.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ceilings_are_enforced() {
        let mut config = RenderConfig::new(FractalKind::Mandelbrot { m: 2.0 }, palette());
        assert!(config.validate().is_ok());
        config.max_iterations = MANDELBROT_MAX_ITERATIONS + 1;
        assert!(config.validate().is_err());

        let mut hopalong = default_hopalong();
        hopalong.resolution = 16;
        let config = RenderConfig::new(FractalKind::Hopalong(hopalong), palette());
        assert!(config.validate().is_err());
    }

    #[test]
    fn bail_out_must_be_positive() {
        let mut config = RenderConfig::new(FractalKind::Mandelbrot { m: 2.0 }, palette());
        config.bail_out = 0.0;
        assert!(config.validate().is_err());
        config.bail_out = std::f64::NAN;
        assert!(config.validate().is_err());
    }
}
