use crate::geometry::{compute_resize, FitMode, ResizeGeometry};
use crate::image::RgbaImage;
use crate::raster::Rasterizer;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io;

//===========================================================================//

/// Bounds and fit mode for [`resize_png`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ResizeOptions {
    /// Maximum output width; `None` leaves the width unconstrained.
    pub max_width: Option<u32>,
    /// Maximum output height; `None` leaves the height unconstrained.
    pub max_height: Option<u32>,
    /// How the source is fitted into the bounds.
    pub fit: FitMode,
}

impl ResizeOptions {
    /// Computes the geometry these options produce for a source of the given
    /// size.
    pub fn geometry(&self, src_width: u32, src_height: u32) -> ResizeGeometry {
        compute_resize(
            src_width,
            src_height,
            self.max_width,
            self.max_height,
            self.fit,
        )
    }
}

/// A resized PNG, with its dimensions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resized {
    /// The encoded PNG data.
    pub data: Vec<u8>,
    /// Width of the encoded image, in pixels.
    pub width: u32,
    /// Height of the encoded image, in pixels.
    pub height: u32,
}

//===========================================================================//

/// Decodes a PNG, resizes it according to `options`, and re-encodes it as an
/// 8-bit RGBA PNG.
///
/// Returns an `InvalidData` error if the input can't be decoded, and an
/// `InvalidInput` error if a bound is zero.
pub fn resize_png(
    png_data: &[u8],
    options: &ResizeOptions,
) -> io::Result<Resized> {
    if options.max_width == Some(0) || options.max_height == Some(0) {
        invalid_input!(
            "Resize bounds must be positive (got {:?}x{:?})",
            options.max_width,
            options.max_height
        );
    }
    let source = RgbaImage::read_png(png_data)?;
    let geometry = options.geometry(source.width(), source.height());
    debug!(
        "resizing {}x{} to {}x{} ({})",
        source.width(),
        source.height(),
        geometry.width,
        geometry.height,
        options.fit.name()
    );
    let data = source.rasterize(&geometry)?;
    Ok(Resized { data, width: geometry.width, height: geometry.height })
}

//===========================================================================//


//===========================================================================//
