use crate::geometry::{compute_resize, FitMode};
use crate::icondir::{build_ico_from_pngs, SizedImage};
use crate::image::RgbaImage;
use crate::raster::Rasterizer;
use crate::sizes::{normalize_sizes, DEFAULT_SIZES};
use base64::prelude::*;
use log::{debug, trace};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::io;
use std::thread;

//===========================================================================//

/// The media type of a generated favicon.
pub const ICO_MIME: &str = "image/x-icon";

/// The file name suggested for a generated favicon.
pub const ICO_FILE_NAME: &str = "favicon.ico";

//===========================================================================//

/// Options for favicon generation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FaviconOptions {
    /// The requested icon sizes.  These are cleaned up with
    /// [`normalize_sizes`](crate::normalize_sizes) before any rendering
    /// happens.
    pub sizes: Vec<f64>,
}

impl Default for FaviconOptions {
    fn default() -> FaviconOptions {
        FaviconOptions {
            sizes: DEFAULT_SIZES.iter().map(|&size| size as f64).collect(),
        }
    }
}

//===========================================================================//

/// A generated PNG at one size, as a `data:` URL suitable for display.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Preview {
    size: u32,
    data_url: String,
}

impl Preview {
    /// Returns the edge length of the previewed icon, in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the `data:image/png;base64,...` URL of the icon.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }
}

/// A finished favicon: the ICO file plus a preview of each size in it.
#[derive(Clone, Debug)]
pub struct Favicon {
    data: Vec<u8>,
    previews: Vec<Preview>,
}

impl Favicon {
    /// Returns the encoded ICO file.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the favicon, returning the encoded ICO file.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the length of the ICO file, in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Returns the media type of the ICO file.
    pub fn mime(&self) -> &'static str {
        ICO_MIME
    }

    /// Returns the file name to offer the ICO file under.
    pub fn file_name(&self) -> &'static str {
        ICO_FILE_NAME
    }

    /// Returns the previews, in ascending order of size.
    pub fn previews(&self) -> &[Preview] {
        &self.previews
    }
}

//===========================================================================//

/// Renders the source at each requested size, cover-cropped to a square, and
/// packs the results into an ICO file.
///
/// The size list is validated before anything is rendered.  Any rendering
/// failure aborts the whole batch.
pub fn generate_favicon<R: Rasterizer + ?Sized>(
    source: &R,
    options: &FaviconOptions,
) -> io::Result<Favicon> {
    let sizes = prepare(source, options)?;
    let mut images = Vec::with_capacity(sizes.len());
    for &size in sizes.iter() {
        images.push(render_size(source, size)?);
    }
    assemble(images)
}

/// Like [`generate_favicon`], but renders the sizes on parallel threads,
/// using at most as many threads at once as the machine has cores.  The
/// output is identical to that of [`generate_favicon`].
pub fn generate_favicon_parallel<R: Rasterizer + Sync + ?Sized>(
    source: &R,
    options: &FaviconOptions,
) -> io::Result<Favicon> {
    let sizes = prepare(source, options)?;
    let workers = thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1);
    let mut images = Vec::with_capacity(sizes.len());
    for batch in sizes.chunks(workers) {
        let results: Vec<io::Result<SizedImage>> = thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|&size| scope.spawn(move || render_size(source, size)))
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });
        for result in results {
            images.push(result?);
        }
    }
    assemble(images)
}

/// Decodes a PNG and generates a favicon from it with the built-in
/// rasterizer.  Returns an `InvalidData` error if the PNG can't be decoded.
pub fn generate_favicon_from_png(
    png_data: &[u8],
    options: &FaviconOptions,
) -> io::Result<Favicon> {
    let source = RgbaImage::read_png(png_data)?;
    debug!(
        "decoded favicon source: {}x{}",
        source.width(),
        source.height()
    );
    generate_favicon(&source, options)
}

//===========================================================================//

fn prepare<R: Rasterizer + ?Sized>(
    source: &R,
    options: &FaviconOptions,
) -> io::Result<Vec<u32>> {
    let sizes = normalize_sizes(&options.sizes)?;
    if source.width() == 0 || source.height() == 0 {
        invalid_data!(
            "Source image is empty ({}x{})",
            source.width(),
            source.height()
        );
    }
    debug!("generating favicon sizes {:?}", sizes);
    Ok(sizes)
}

fn render_size<R: Rasterizer + ?Sized>(
    source: &R,
    size: u32,
) -> io::Result<SizedImage> {
    let geometry = compute_resize(
        source.width(),
        source.height(),
        Some(size),
        Some(size),
        FitMode::Cover,
    );
    let data = source.rasterize(&geometry)?;
    trace!(
        "rendered {}x{} icon from {:?} ({} bytes)",
        size,
        size,
        geometry,
        data.len()
    );
    Ok(SizedImage::new(size, data))
}

fn assemble(images: Vec<SizedImage>) -> io::Result<Favicon> {
    let previews = images
        .iter()
        .map(|image| Preview {
            size: image.size(),
            data_url: png_data_url(image.data()),
        })
        .collect();
    let data = build_ico_from_pngs(images)?;
    debug!("built {} ({} bytes)", ICO_FILE_NAME, data.len());
    Ok(Favicon { data, previews })
}

fn png_data_url(data: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64_STANDARD.encode(data))
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{generate_favicon, png_data_url, FaviconOptions};
    use crate::geometry::ResizeGeometry;
    use crate::raster::Rasterizer;
    use std::cell::RefCell;
    use std::io;

    struct Recorder {
        width: u32,
        height: u32,
        calls: RefCell<Vec<ResizeGeometry>>,
    }

    impl Rasterizer for Recorder {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn rasterize(&self, geometry: &ResizeGeometry) -> io::Result<Vec<u8>> {
            self.calls.borrow_mut().push(*geometry);
            Ok(vec![geometry.width as u8; 3])
        }
    }

    fn recorder(width: u32, height: u32) -> Recorder {
        Recorder { width, height, calls: RefCell::new(Vec::new()) }
    }

    #[test]
    fn default_options_use_standard_sizes() {
        let options = FaviconOptions::default();
        assert_eq!(options.sizes, vec![16.0, 32.0, 48.0, 64.0, 128.0, 256.0]);
    }

    #[test]
    fn renders_each_size_with_cover_geometry() {
        let source = recorder(800, 400);
        let options = FaviconOptions { sizes: vec![32.0, 16.0, 32.0] };
        let favicon = generate_favicon(&source, &options).unwrap();
        let calls = source.calls.borrow();
        assert_eq!(calls.len(), 2);
        for (geometry, &size) in calls.iter().zip([16, 32].iter()) {
            assert_eq!((geometry.width, geometry.height), (size, size));
            assert_eq!((geometry.sx, geometry.sy), (200, 0));
            assert_eq!((geometry.s_width, geometry.s_height), (400, 400));
        }
        assert_eq!(favicon.size_bytes(), 6 + 16 * 2 + 3 + 3);
        assert_eq!(favicon.mime(), "image/x-icon");
        assert_eq!(favicon.file_name(), "favicon.ico");
    }

    #[test]
    fn invalid_sizes_fail_before_rendering() {
        let source = recorder(10, 10);
        let options = FaviconOptions { sizes: vec![300.0, -5.0, 0.0] };
        let error = generate_favicon(&source, &options).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn empty_source_is_rejected() {
        let source = recorder(0, 10);
        let error =
            generate_favicon(&source, &FaviconOptions::default()).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn previews_are_png_data_urls() {
        assert_eq!(png_data_url(b"\x89PNG"), "data:image/png;base64,iVBORw==");
        let source = recorder(10, 10);
        let options = FaviconOptions { sizes: vec![48.0, 16.0] };
        let favicon = generate_favicon(&source, &options).unwrap();
        let sizes: Vec<u32> =
            favicon.previews().iter().map(|preview| preview.size()).collect();
        assert_eq!(sizes, vec![16, 48]);
        assert_eq!(
            favicon.previews()[0].data_url(),
            "data:image/png;base64,EBAQ"
        );
    }
}

//===========================================================================//
