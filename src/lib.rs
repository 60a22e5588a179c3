//! A library for building multi-size favicon ICO files from PNG renderings.
//!
//! The two core pieces are [`compute_resize`], which works out how a source
//! image is sampled for a given output box under "contain" or "cover"
//! fitting, and [`build_ico_from_pngs`], which packs PNG images of several
//! square sizes into one ICO file.  [`generate_favicon`] ties them together
//! around a [`Rasterizer`], the capability that actually draws and encodes
//! pixels.
//!
//! # Example
//!
//! ```
//! use favicon_ico::{generate_favicon, FaviconOptions, RgbaImage};
//!
//! // A 40x20 opaque red source image.
//! let source = RgbaImage::from_rgba_data(40, 20, [255u8, 0, 0, 255].repeat(800));
//! let options = FaviconOptions { sizes: vec![32.0, 16.0, 16.0] };
//! let favicon = generate_favicon(&source, &options).unwrap();
//! assert_eq!(favicon.file_name(), "favicon.ico");
//! assert_eq!(favicon.previews().len(), 2);
//! assert_eq!(&favicon.data()[0..6], b"\x00\x00\x01\x00\x02\x00");
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod convert;
mod favicon;
mod geometry;
mod icondir;
mod image;
mod raster;
mod sizes;

pub use crate::convert::{resize_png, ResizeOptions, Resized};
pub use crate::favicon::{
    generate_favicon, generate_favicon_from_png, generate_favicon_parallel,
    Favicon, FaviconOptions, Preview, ICO_FILE_NAME, ICO_MIME,
};
pub use crate::geometry::{compute_resize, FitMode, ResizeGeometry};
pub use crate::icondir::{
    build_ico_from_pngs, IconDir, IconDirEntry, SizedImage, MAX_SIZE,
    MIN_SIZE,
};
pub use crate::image::RgbaImage;
pub use crate::raster::Rasterizer;
pub use crate::sizes::{normalize_sizes, DEFAULT_SIZES};
