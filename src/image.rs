use crate::geometry::ResizeGeometry;
use ::image::imageops::{self, FilterType};
use ::image::{ImageBuffer, Rgba};
use std::io::{self, Read, Write};

//===========================================================================//

// Size limits for decoded images:
const MIN_WIDTH: u32 = 1;
const MIN_HEIGHT: u32 = 1;

//===========================================================================//

/// A decoded image with 8-bit RGBA pixels.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    rgba_data: Vec<u8>,
}

impl RgbaImage {
    /// Creates a new image with the given dimensions and RGBA data.  The
    /// `width` and `height` must be nonzero, and `rgba_data` must have `4 *
    /// width * height` bytes and be in row-major order from top to bottom.
    /// Panics if the dimensions are out of range or if `rgba_data` is the
    /// wrong length.
    pub fn from_rgba_data(
        width: u32,
        height: u32,
        rgba_data: Vec<u8>,
    ) -> RgbaImage {
        if width < MIN_WIDTH {
            panic!(
                "Invalid width (was {}, but must be at least {})",
                width, MIN_WIDTH
            );
        }
        if height < MIN_HEIGHT {
            panic!(
                "Invalid height (was {}, but must be at least {})",
                height, MIN_HEIGHT
            );
        }
        let expected_data_len = (width as u64) * (height as u64) * 4;
        if (rgba_data.len() as u64) != expected_data_len {
            panic!(
                "Invalid data length (was {}, but must be {} for {}x{} image)",
                rgba_data.len(),
                expected_data_len,
                width,
                height
            );
        }
        RgbaImage { width, height, rgba_data }
    }

    /// Decodes an image from a PNG file.  Palette and low-bit-depth images
    /// are expanded and 16-bit channels are truncated, so any PNG that
    /// decodes at all ends up as 8-bit RGBA.  Returns an `InvalidData` error
    /// if the PNG data is malformed.
    pub fn read_png<R: Read>(reader: R) -> io::Result<RgbaImage> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(
            png::Transformations::EXPAND | png::Transformations::STRIP_16,
        );
        let mut png_reader = match decoder.read_info() {
            Ok(png_reader) => png_reader,
            Err(error) => invalid_data!("Malformed PNG data: {}", error),
        };
        let (width, height) = {
            let info = png_reader.info();
            (info.width, info.height)
        };
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            invalid_data!("Invalid PNG dimensions ({}x{})", width, height);
        }
        let (color_type, bit_depth) = png_reader.output_color_type();
        if bit_depth != png::BitDepth::Eight {
            invalid_data!("Unsupported PNG bit depth: {:?}", bit_depth);
        }
        let mut buffer = vec![0u8; png_reader.output_buffer_size()];
        let frame = match png_reader.next_frame(&mut buffer) {
            Ok(frame) => frame,
            Err(error) => invalid_data!("Malformed PNG data: {}", error),
        };
        buffer.truncate(frame.buffer_size());
        let rgba_data = match color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => {
                let mut rgba = Vec::with_capacity(buffer.len() / 3 * 4);
                for pixel in buffer.chunks_exact(3) {
                    rgba.extend_from_slice(pixel);
                    rgba.push(u8::MAX);
                }
                rgba
            }
            png::ColorType::GrayscaleAlpha => {
                let mut rgba = Vec::with_capacity(buffer.len() * 2);
                for pixel in buffer.chunks_exact(2) {
                    let (gray, alpha) = (pixel[0], pixel[1]);
                    rgba.extend_from_slice(&[gray, gray, gray, alpha]);
                }
                rgba
            }
            png::ColorType::Grayscale => {
                let mut rgba = Vec::with_capacity(buffer.len() * 4);
                for gray in buffer.into_iter() {
                    rgba.extend_from_slice(&[gray, gray, gray, u8::MAX]);
                }
                rgba
            }
            png::ColorType::Indexed => {
                // EXPAND should have turned palette entries into RGB(A).
                invalid_data!("Unsupported PNG color type: {:?}", color_type);
            }
        };
        if (rgba_data.len() as u64) != (width as u64) * (height as u64) * 4 {
            invalid_data!(
                "Decoded PNG has wrong length (was {} bytes for {}x{} image)",
                rgba_data.len(),
                width,
                height
            );
        }
        Ok(RgbaImage { width, height, rgba_data })
    }

    /// Encodes the image as an 8-bit RGBA PNG file.
    pub fn write_png<W: Write>(&self, writer: W) -> io::Result<()> {
        match self.write_png_enc(writer) {
            Ok(()) => Ok(()),
            Err(png::EncodingError::IoError(error)) => Err(error),
            Err(png::EncodingError::Format(error)) => {
                invalid_input!("PNG format error: {}", error);
            }
            Err(png::EncodingError::LimitsExceeded) => {
                invalid_input!("PNG limits exceeded");
            }
            Err(png::EncodingError::Parameter(error)) => {
                invalid_input!("PNG parameter error: {}", error);
            }
        }
    }

    fn write_png_enc<W: Write>(
        &self,
        writer: W,
    ) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(writer, self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.rgba_data)?;
        Ok(())
    }

    /// Samples the geometry's source rectangle of this image into a new image
    /// of the geometry's destination size, using a Lanczos filter.  Returns an
    /// `InvalidInput` error if the source rectangle is empty or extends past
    /// the edge of this image, or if the destination is empty.
    pub fn draw(&self, geometry: &ResizeGeometry) -> io::Result<RgbaImage> {
        let ResizeGeometry { width, height, sx, sy, s_width, s_height } =
            *geometry;
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            invalid_input!("Invalid destination size ({}x{})", width, height);
        }
        if s_width == 0
            || s_height == 0
            || (sx as u64) + (s_width as u64) > self.width as u64
            || (sy as u64) + (s_height as u64) > self.height as u64
        {
            invalid_input!(
                "Source rectangle {}x{} at ({}, {}) doesn't fit in {}x{} image",
                s_width,
                s_height,
                sx,
                sy,
                self.width,
                self.height
            );
        }
        let buffer = match ImageBuffer::<Rgba<u8>, _>::from_raw(
            self.width,
            self.height,
            self.rgba_data.clone(),
        ) {
            Some(buffer) => buffer,
            None => invalid_input!(
                "RGBA data doesn't match {}x{} image",
                self.width,
                self.height
            ),
        };
        let region =
            imageops::crop_imm(&buffer, sx, sy, s_width, s_height).to_image();
        let canvas =
            imageops::resize(&region, width, height, FilterType::Lanczos3);
        Ok(RgbaImage::from_rgba_data(width, height, canvas.into_raw()))
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the RGBA data for this image, in row-major order from top to
    /// bottom.
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::RgbaImage;
    use crate::geometry::{compute_resize, FitMode, ResizeGeometry};
    use std::io;

    // Resampling works in floating point, so allow off-by-one channels.
    fn assert_close(actual: &[u8], expected: &[u8]) {
        assert_eq!(actual.len(), expected.len());
        for (index, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
            assert!(
                (a as i32 - e as i32).abs() <= 1,
                "byte {} was {}, expected {}",
                index,
                a,
                e
            );
        }
    }

    fn solid(width: u32, height: u32, pixel: [u8; 4]) -> RgbaImage {
        let rgba = pixel.repeat((width * height) as usize);
        RgbaImage::from_rgba_data(width, height, rgba)
    }

    #[test]
    fn png_round_trip() {
        let width = 11;
        let height = 13;
        let mut rgba = Vec::new();
        for index in 0..(width * height) {
            rgba.push(if index % 2 == 0 { 0 } else { 255 });
            rgba.push(if index % 3 == 0 { 0 } else { 255 });
            rgba.push(if index % 5 == 0 { 0 } else { 255 });
            rgba.push(if index % 7 == 0 { 128 } else { 255 });
        }
        let image = RgbaImage::from_rgba_data(width, height, rgba.clone());
        let mut png = Vec::new();
        image.write_png(&mut png).unwrap();
        let decoded = RgbaImage::read_png(png.as_slice()).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn read_png_grayscale() {
        let input: &[u8] = b"\
            \x89\x50\x4e\x47\x0d\x0a\x1a\x0a\x00\x00\x00\x0d\x49\x48\x44\x52\
            \x00\x00\x00\x02\x00\x00\x00\x02\x08\x00\x00\x00\x00\x57\xdd\x52\
            \xf8\x00\x00\x00\x0e\x49\x44\x41\x54\x78\x9c\x63\xb4\x77\x60\xdc\
            \xef\x00\x00\x04\x08\x01\x81\x86\x2e\xc9\x8d\x00\x00\x00\x00\x49\
            \x45\x4e\x44\xae\x42\x60\x82";
        let image = RgbaImage::read_png(input).unwrap();
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);
        let rgba: &[u8] = b"\
            \x3f\x3f\x3f\xff\x7f\x7f\x7f\xff\
            \xbf\xbf\xbf\xff\xff\xff\xff\xff";
        assert_eq!(image.rgba_data(), rgba);
    }

    #[test]
    fn read_png_rejects_garbage() {
        let error = RgbaImage::read_png(&b"not a png"[..]).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn draw_averages_covered_pixels() {
        let rgba: &[u8] = b"\
            \x00\x00\x00\xff\xff\xff\xff\xff\
            \xff\xff\xff\xff\x00\x00\x00\xff";
        let image = RgbaImage::from_rgba_data(2, 2, rgba.to_vec());
        let geometry = compute_resize(2, 2, Some(1), Some(1), FitMode::Cover);
        let drawn = image.draw(&geometry).unwrap();
        assert_close(drawn.rgba_data(), &[128, 128, 128, 255]);
    }

    #[test]
    fn draw_samples_only_the_source_rectangle() {
        // Red in the middle two columns, green at the edges; cover-cropping
        // the 4x2 image to a square keeps only the red.
        let mut rgba = Vec::new();
        for _ in 0..2 {
            rgba.extend_from_slice(&[0, 255, 0, 255, 255, 0, 0, 255]);
            rgba.extend_from_slice(&[255, 0, 0, 255, 0, 255, 0, 255]);
        }
        let image = RgbaImage::from_rgba_data(4, 2, rgba);
        let geometry = compute_resize(4, 2, Some(3), Some(3), FitMode::Cover);
        assert_eq!((geometry.sx, geometry.s_width), (1, 2));
        let drawn = image.draw(&geometry).unwrap();
        assert_eq!((drawn.width(), drawn.height()), (3, 3));
        assert_close(drawn.rgba_data(), solid(3, 3, [255, 0, 0, 255]).rgba_data());
    }

    #[test]
    fn draw_keeps_solid_color_when_scaling() {
        let image = solid(7, 5, [10, 20, 30, 40]);
        let geometry = compute_resize(7, 5, Some(3), Some(3), FitMode::Cover);
        let drawn = image.draw(&geometry).unwrap();
        assert_close(drawn.rgba_data(), solid(3, 3, [10, 20, 30, 40]).rgba_data());

        let image = solid(1, 1, [10, 20, 30, 40]);
        let geometry = compute_resize(1, 1, Some(4), Some(4), FitMode::Cover);
        let drawn = image.draw(&geometry).unwrap();
        assert_close(drawn.rgba_data(), solid(4, 4, [10, 20, 30, 40]).rgba_data());
    }

    #[test]
    fn draw_rejects_out_of_bounds_rectangle() {
        let image = solid(4, 4, [0, 0, 0, 255]);
        let geometry = ResizeGeometry {
            width: 2,
            height: 2,
            sx: 3,
            sy: 0,
            s_width: 2,
            s_height: 2,
        };
        let error = image.draw(&geometry).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    #[should_panic(expected = "Invalid data length")]
    fn from_rgba_data_checks_length() {
        RgbaImage::from_rgba_data(2, 2, vec![0; 15]);
    }
}

//===========================================================================//
