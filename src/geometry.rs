#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

//===========================================================================//

/// How a source image is fitted into a bounding box.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FitMode {
    /// Scale down (never up) to fit within the box, preserving aspect ratio
    /// and keeping the whole source.
    #[default]
    Contain,
    /// Scale to exactly fill the box, preserving aspect ratio and cropping
    /// the excess from the longer axis.
    Cover,
}

impl FitMode {
    /// Parses `"contain"` or `"cover"`.
    pub fn from_name(name: &str) -> Option<FitMode> {
        match name {
            "contain" => Some(FitMode::Contain),
            "cover" => Some(FitMode::Cover),
            _ => None,
        }
    }

    /// Returns the lowercase name of this mode.
    pub fn name(&self) -> &'static str {
        match *self {
            FitMode::Contain => "contain",
            FitMode::Cover => "cover",
        }
    }
}

//===========================================================================//

/// The outcome of a resize calculation: the destination size, and the
/// rectangle of the source image to sample from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ResizeGeometry {
    /// Destination width, in pixels.
    pub width: u32,
    /// Destination height, in pixels.
    pub height: u32,
    /// Left edge of the source rectangle.
    pub sx: u32,
    /// Top edge of the source rectangle.
    pub sy: u32,
    /// Width of the source rectangle.
    pub s_width: u32,
    /// Height of the source rectangle.
    pub s_height: u32,
}

/// Computes how to resample a `src_width` x `src_height` image into the
/// given bounds.  A bound of `None` means "no limit" on that axis and takes
/// the source dimension.
///
/// With [`FitMode::Contain`] the whole source is kept and scaled down (never
/// up) to fit.  With [`FitMode::Cover`] the destination is exactly the
/// bounds, and the source rectangle is the largest centered region with the
/// destination's aspect ratio.
///
/// All dimensions must be nonzero; this is checked only in debug builds.
pub fn compute_resize(
    src_width: u32,
    src_height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
    fit: FitMode,
) -> ResizeGeometry {
    let max_width = max_width.unwrap_or(src_width);
    let max_height = max_height.unwrap_or(src_height);
    debug_assert!(src_width > 0 && src_height > 0);
    debug_assert!(max_width > 0 && max_height > 0);
    let (src_w, src_h) = (src_width as f64, src_height as f64);
    let (max_w, max_h) = (max_width as f64, max_height as f64);
    match fit {
        FitMode::Contain => {
            let scale = (max_w / src_w).min(max_h / src_h).min(1.0);
            ResizeGeometry {
                width: round_extent(src_w * scale),
                height: round_extent(src_h * scale),
                sx: 0,
                sy: 0,
                s_width: src_width,
                s_height: src_height,
            }
        }
        FitMode::Cover => {
            let source_aspect = src_w / src_h;
            let target_aspect = max_w / max_h;
            let (s_width, s_height) = if source_aspect > target_aspect {
                (round_extent(src_h * target_aspect), src_height)
            } else {
                (src_width, round_extent(src_w / target_aspect))
            };
            ResizeGeometry {
                width: max_width,
                height: max_height,
                sx: (src_width - s_width) / 2,
                sy: (src_height - s_height) / 2,
                s_width,
                s_height,
            }
        }
    }
}

// Rounds to the nearest whole pixel, but never below one.
fn round_extent(value: f64) -> u32 {
    value.round().max(1.0) as u32
}

//===========================================================================//


//===========================================================================//
