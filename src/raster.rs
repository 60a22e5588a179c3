use crate::geometry::ResizeGeometry;
use crate::image::RgbaImage;
use std::io;

//===========================================================================//

/// A decoded source image that can be rendered into encoded PNGs.
///
/// The favicon pipeline only ever talks to its source image through this
/// trait, so it can be driven by any decoder/encoder pair (or by a fake in
/// tests).
pub trait Rasterizer {
    /// Returns the width of the source image, in pixels.
    fn width(&self) -> u32;

    /// Returns the height of the source image, in pixels.
    fn height(&self) -> u32;

    /// Draws the geometry's source rectangle into a canvas of the
    /// geometry's destination size and returns it encoded as a PNG.
    fn rasterize(&self, geometry: &ResizeGeometry) -> io::Result<Vec<u8>>;
}

impl Rasterizer for RgbaImage {
    fn width(&self) -> u32 {
        RgbaImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbaImage::height(self)
    }

    fn rasterize(&self, geometry: &ResizeGeometry) -> io::Result<Vec<u8>> {
        let canvas = self.draw(geometry)?;
        let mut data = Vec::new();
        canvas.write_png(&mut data)?;
        Ok(data)
    }
}

impl<'a, R: Rasterizer + ?Sized> Rasterizer for &'a R {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn rasterize(&self, geometry: &ResizeGeometry) -> io::Result<Vec<u8>> {
        (**self).rasterize(geometry)
    }
}

//===========================================================================//


//===========================================================================//
