// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! One entry point for every fractal kind.

use log::info;

use crate::config::{FractalKind, RenderConfig};
use crate::error::RenderError;
use crate::escape::EscapeTime;
use crate::hopalong::Hopalong;
use crate::planes::PlaneMapper;
use crate::raster::RasterSurface;

/// Render `config` onto `surface`, which must be exactly the configured
/// size.  On error the surface is left untouched.
pub fn render<S: RasterSurface + ?Sized>(
    config: &RenderConfig,
    surface: &mut S,
    threads: usize,
) -> Result<(), RenderError> {
    config.validate()?;
    let (width, height) = surface.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidGeometry(format!(
            "raster {}x{} has no pixels",
            width, height
        )));
    }
    if (width, height) != (config.width, config.height) {
        return Err(RenderError::InvalidGeometry(format!(
            "surface is {}x{} but the render is {}x{}",
            width, height, config.width, config.height
        )));
    }

    match config.fractal {
        FractalKind::Hopalong(params) => {
            info!("rendering hopalong a={} b={} c={}", params.a, params.b, params.c);
            let hopalong = Hopalong::new(params)?;
            let bounds = hopalong.fit()?;
            surface.fill(config.background);
            hopalong.draw(&bounds, surface)
        }
        fractal => {
            let formula = match fractal.formula() {
                Some(formula) => formula,
                None => return Err(RenderError::InvalidParameter("no formula".to_string())),
            };
            info!(
                "rendering {:?} at {}x{}, {} iterations on {} threads",
                formula, width, height, config.max_iterations, threads
            );
            let plane = PlaneMapper::new(width, height, config.region)?;
            let engine = EscapeTime::new(
                plane,
                formula,
                config.max_iterations,
                config.bail_out,
                &config.palette,
            )?;
            let frame = engine.render(threads)?;
            frame.flush_to(surface);
            Ok(())
        }
    }
}
