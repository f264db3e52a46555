// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0
//! (the raster), and a rectangular region of the complex plane.  The
//! mapping uses a single step for both axes, so the region is never
//! distorted; whichever axis has room to spare gets an even margin on
//! both sides.
use num::Complex;

use crate::error::RenderError;

/// Describes the width and height of an integral plane that is assumed
/// to start at 0,0.  All values are non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a point on the integral plane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pixel(pub usize, pub usize);

/// A rectangle on the complex plane: `x` and `y` are the real and
/// imaginary coordinates of its first corner, `width` and `height`
/// extend it along each axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    /// Real coordinate of the corner.
    pub x: f64,
    /// Imaginary coordinate of the corner.
    pub y: f64,
    /// Extent along the real axis.
    pub width: f64,
    /// Extent along the imaginary axis.
    pub height: f64,
}

impl Region {
    /// Constructor.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Region {
        Region {
            x,
            y,
            width,
            height,
        }
    }

    /// The center of the region.
    pub fn center(&self) -> Complex<f64> {
        Complex::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    fn check(&self) -> Result<(), RenderError> {
        let fields = [self.x, self.y, self.width, self.height];
        if fields.iter().any(|f| !f.is_finite()) {
            return Err(RenderError::InvalidGeometry(format!(
                "region {:?} has a non-finite field",
                self
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(RenderError::InvalidGeometry(format!(
                "region {}x{} must have a positive width and height",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Which way the imaginary axis runs on the raster.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Orientation {
    /// Pixel rows grow with the imaginary coordinate.  This is what the
    /// escape-time renderers use.
    Down,
    /// Pixel rows shrink as the imaginary coordinate grows, the usual
    /// picture of a cartesian plane.  Used for attractor plots.
    Up,
}

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a complex, real cartesian plane.  Maps points from one to the
/// other.  Build one per render; the step and offsets are computed
/// once here and never per pixel.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The right-lower corner of the integral cartesian plane.  The
    /// left-upper is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The region of the complex plane being shown.
    pub region: Region,
    orientation: Orientation,
    step: f64,
    // The plane coordinates of pixel 0,0.
    offset: Complex<f64>,
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the raster and the region of
    /// the complex plane that has to fit inside it.
    pub fn new(width: usize, height: usize, region: Region) -> Result<PlaneMapper, RenderError> {
        PlaneMapper::with_orientation(width, height, region, Orientation::Down)
    }

    /// As `new`, but lets the caller pick the direction of the
    /// imaginary axis.
    pub fn with_orientation(
        width: usize,
        height: usize,
        region: Region,
        orientation: Orientation,
    ) -> Result<PlaneMapper, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidGeometry(format!(
                "raster {}x{} must have a positive width and height",
                width, height
            )));
        }
        region.check()?;

        let (w, h) = (width as f64, height as f64);
        let step = (region.width / w).max(region.height / h);
        let offset = Complex::new(
            region.x - (w * step - region.width) / 2.0,
            region.y - (h * step - region.height) / 2.0,
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            region,
            orientation,
            step,
            offset,
        })
    }

    /// The distance on the complex plane between two adjacent pixels,
    /// on either axis.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Given a pixel on the integral cartesian plane, map that to its
    /// point on the complex cartesian plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let re = self.offset.re + (pixel.0 as f64) * self.step;
        let im = match self.orientation {
            Orientation::Down => self.offset.im + (pixel.1 as f64) * self.step,
            Orientation::Up => {
                self.offset.im + (self.integral_plane.1 as f64 - pixel.1 as f64) * self.step
            }
        };
        Complex::new(re, im)
    }

    /// Given a complex number corresponding to a location on the
    /// complex cartesian plane, map that as closely as possible to a
    /// point on the integral cartesian plane.  Points that fall off the
    /// raster, and points that are not finite, map to nothing.
    pub fn point_to_pixel(&self, point: &Complex<f64>) -> Option<Pixel> {
        let left = (point.re - self.offset.re) / self.step;
        let top = match self.orientation {
            Orientation::Down => (point.im - self.offset.im) / self.step,
            Orientation::Up => self.integral_plane.1 as f64 - (point.im - self.offset.im) / self.step,
        };
        if !(left >= 0.0 && top >= 0.0) {
            return None;
        }
        let (left, top) = (left.floor(), top.floor());
        if left >= self.integral_plane.0 as f64 || top >= self.integral_plane.1 as f64 {
            return None;
        }
        Some(Pixel(left as usize, top as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Region {
        Region::new(-2.0, -2.0, 4.0, 4.0)
    }

    #[test]
    fn planemapper_fails_on_empty_raster() {
        assert!(PlaneMapper::new(0, 4, unit()).is_err());
        assert!(PlaneMapper::new(4, 0, unit()).is_err());
    }

    #[test]
    fn planemapper_fails_on_bad_region() {
        let flat = Region::new(-1.0, -1.0, 2.0, 0.0);
        let inverted = Region::new(-1.0, -1.0, -2.0, 2.0);
        let nan = Region::new(std::f64::NAN, -1.0, 2.0, 2.0);
        let inf = Region::new(-1.0, -1.0, std::f64::INFINITY, 2.0);
        for region in &[flat, inverted, nan, inf] {
            match PlaneMapper::new(4, 4, *region) {
                Err(RenderError::InvalidGeometry(_)) => {}
                other => panic!("expected InvalidGeometry for {:?}, got {:?}", region, other),
            }
        }
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(4, 4, unit()).unwrap();
        assert_eq!(pm.integral_plane, IntegralPlane(4, 4));
        assert_eq!(pm.step(), 1.0);
    }

    #[test]
    fn step_never_distorts_the_region() {
        let shapes = [(640, 480), (480, 640), (1, 1000), (1000, 1), (333, 333)];
        let regions = [
            Region::new(-2.5, -1.5, 4.0, 3.0),
            Region::new(0.0, 0.0, 0.001, 10.0),
            Region::new(-1.5, -1.5, 3.0, 3.0),
        ];
        for &(w, h) in &shapes {
            for region in &regions {
                let pm = PlaneMapper::new(w, h, *region).unwrap();
                let sx = region.width / w as f64;
                let sy = region.height / h as f64;
                assert!(pm.step() >= sx);
                assert!(pm.step() >= sy);
                assert!(pm.step() == sx || pm.step() == sy);
            }
        }
    }

    #[test]
    fn middle_pixel_maps_near_region_center() {
        let region = Region::new(-2.5, -1.5, 4.0, 3.0);
        for &(w, h) in &[(640, 480), (101, 37), (800, 800)] {
            let pm = PlaneMapper::new(w, h, region).unwrap();
            let p = pm.pixel_to_point(&Pixel(w / 2, h / 2));
            let center = region.center();
            assert!((p.re - center.re).abs() <= pm.step() / 2.0 + 1e-12);
            assert!((p.im - center.im).abs() <= pm.step() / 2.0 + 1e-12);
        }
    }

    #[test]
    fn pixel_to_point_on_square_planes() {
        let pm = PlaneMapper::new(4, 4, unit()).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(2.0, 2.0));
    }

    #[test]
    fn wide_raster_gets_horizontal_margin() {
        // 8x4 pixels showing a 4x4 region: step is 1, two columns of
        // margin on each side.
        let pm = PlaneMapper::new(8, 4, unit()).unwrap();
        assert_eq!(pm.step(), 1.0);
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-4.0, -2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 0)), Complex::new(-2.0, -2.0));
    }

    #[test]
    fn point_to_pixel_on_mixed_planes() {
        let pm = PlaneMapper::new(4, 4, unit()).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.0)), Some(Pixel(2, 2)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, -2.0)), Some(Pixel(0, 0)));
        assert_eq!(pm.point_to_pixel(&Complex::new(1.5, -1.5)), Some(Pixel(3, 0)));
        assert_eq!(pm.point_to_pixel(&Complex::new(2.0, 2.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.5, 0.0)), None);
        assert_eq!(pm.point_to_pixel(&Complex::new(std::f64::NAN, 0.0)), None);
    }

    #[test]
    fn upward_orientation_flips_rows() {
        let pm = PlaneMapper::with_orientation(4, 4, unit(), Orientation::Up).unwrap();
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, 0.5)), Some(Pixel(2, 1)));
        assert_eq!(pm.point_to_pixel(&Complex::new(0.0, -0.5)), Some(Pixel(2, 2)));
        assert_eq!(pm.point_to_pixel(&Complex::new(-2.0, 1.9)), Some(Pixel(0, 0)));
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
    }
}
