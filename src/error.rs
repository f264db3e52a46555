// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The errors a render can fail with.  Every one of them is detected
//! during setup; numeric overflow inside the pixel loop is absorbed by
//! the escape test and never surfaces here.

use failure::Fail;

/// Why a render was refused or aborted.  No partial image is ever
/// written when one of these is returned.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum RenderError {
    /// The raster or the plane region has a non-positive or
    /// non-finite dimension.
    #[fail(display = "invalid geometry: {}", _0)]
    InvalidGeometry(String),

    /// A palette stop's color text could not be parsed.
    #[fail(display = "invalid color: {:?}", _0)]
    InvalidColor(String),

    /// A palette with no stops was asked for a color.
    #[fail(display = "color palette has no color stops")]
    EmptyPalette,

    /// No palette of that name exists in the palette store.
    #[fail(display = "palette not found: {}", _0)]
    PaletteNotFound(String),

    /// The palette table itself could not be read.
    #[fail(display = "malformed palette table: {}", _0)]
    PaletteFormat(String),

    /// No iteration formula is registered under that name.
    #[fail(display = "unknown formula: {}", _0)]
    UnknownFormula(String),

    /// The attractor orbit never left the origin on one axis, so no
    /// drawing scale can be fitted.
    #[fail(display = "attractor orbit has a zero-extent bounding box")]
    DegenerateOrbit,

    /// A numeric render parameter is out of range.
    #[fail(display = "invalid parameter: {}", _0)]
    InvalidParameter(String),

    /// A render worker thread panicked.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}
