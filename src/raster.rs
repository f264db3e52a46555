// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where rendered pixels go.  The renderers only ever call
//! `set_pixel`; allocating and encoding the final image belongs to
//! whoever owns the surface.

use image::RgbaImage;

use crate::color::Color;

/// A surface the renderers write pixels into.
pub trait RasterSurface {
    /// Width and height in pixels.
    fn dimensions(&self) -> (usize, usize);

    /// Write one pixel.  Coordinates outside the surface are ignored.
    fn set_pixel(&mut self, x: usize, y: usize, color: Color);

    /// Paint every pixel the same color.
    fn fill(&mut self, color: Color) {
        let (width, height) = self.dimensions();
        for y in 0..height {
            for x in 0..width {
                self.set_pixel(x, y, color);
            }
        }
    }
}

impl RasterSurface for RgbaImage {
    fn dimensions(&self) -> (usize, usize) {
        (self.width() as usize, self.height() as usize)
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width() as usize && y < self.height() as usize {
            self.put_pixel(x as u32, y as u32, color);
        }
    }
}

/// A plain row-major pixel buffer.  Useful for tests, and as the frame
/// parallel renders compute into before flushing to a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Frame {
    /// A frame of the given size painted in `background`.
    pub fn new(width: usize, height: usize, background: Color) -> Frame {
        Frame {
            width,
            height,
            pixels: vec![background; width * height],
        }
    }

    /// The pixel at x, y, if it is on the frame.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// All pixels, row-major and mutable.
    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Copy every pixel onto another surface.
    pub fn flush_to<S: RasterSurface + ?Sized>(&self, surface: &mut S) {
        for (i, color) in self.pixels.iter().enumerate() {
            surface.set_pixel(i % self.width, i / self.width, *color);
        }
    }
}

impl RasterSurface for Frame {
    fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    fn fill(&mut self, color: Color) {
        for pixel in self.pixels.iter_mut() {
            *pixel = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, WHITE};
    use image::Rgba;

    #[test]
    fn frame_ignores_off_surface_writes() {
        let mut frame = Frame::new(3, 2, WHITE);
        frame.set_pixel(3, 0, BLACK);
        frame.set_pixel(0, 2, BLACK);
        assert!(frame.pixels().iter().all(|p| *p == WHITE));
        frame.set_pixel(2, 1, BLACK);
        assert_eq!(frame.get(2, 1), Some(BLACK));
        assert_eq!(frame.pixels()[5], BLACK);
        assert_eq!(frame.get(3, 1), None);
    }

    #[test]
    fn flush_copies_into_an_image() {
        let mut frame = Frame::new(2, 2, WHITE);
        frame.set_pixel(1, 0, Rgba([1, 2, 3, 255]));
        let mut image = RgbaImage::new(2, 2);
        frame.flush_to(&mut image);
        assert_eq!(*image.get_pixel(1, 0), Rgba([1, 2, 3, 255]));
        assert_eq!(*image.get_pixel(0, 1), WHITE);
    }

    #[test]
    fn fill_paints_everything() {
        let mut image = RgbaImage::new(3, 3);
        RasterSurface::fill(&mut image, BLACK);
        assert!(image.pixels().all(|p| *p == BLACK));
    }
}
