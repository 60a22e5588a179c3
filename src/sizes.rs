use crate::icondir::{MAX_SIZE, MIN_SIZE};
use std::collections::BTreeSet;
use std::io;

//===========================================================================//

/// The icon sizes generated when the caller doesn't ask for any in
/// particular.
pub const DEFAULT_SIZES: &[u32] = &[16, 32, 48, 64, 128, 256];

//===========================================================================//

/// Turns a list of requested icon sizes into the list the ICO builder
/// expects: whole numbers between 1 and 256, without duplicates, in
/// ascending order.
///
/// Values that are not finite, not positive, or above 256 are dropped; the
/// rest are rounded to the nearest integer, and any that round down to zero
/// are dropped too.  Returns an `InvalidInput` error if nothing is left.
pub fn normalize_sizes(requested: &[f64]) -> io::Result<Vec<u32>> {
    let sizes: BTreeSet<u32> = requested
        .iter()
        .filter(|&&size| {
            size.is_finite() && size > 0.0 && size <= MAX_SIZE as f64
        })
        .map(|size| size.round() as u32)
        .filter(|&size| size >= MIN_SIZE)
        .collect();
    if sizes.is_empty() {
        invalid_input!("choose at least one valid size (1–256)");
    }
    Ok(sizes.into_iter().collect())
}

//===========================================================================//

#[cfg(test)]
mod tests {
    use super::{normalize_sizes, DEFAULT_SIZES};
    use std::io;

    #[test]
    fn deduplicates_and_sorts() {
        let sizes = normalize_sizes(&[32.0, 16.0, 64.0, 16.0]).unwrap();
        assert_eq!(sizes, vec![16, 32, 64]);
    }

    #[test]
    fn rounds_fractional_sizes() {
        let sizes = normalize_sizes(&[15.6, 16.4, 47.5]).unwrap();
        assert_eq!(sizes, vec![16, 48]);
    }

    #[test]
    fn range_check_happens_before_rounding() {
        assert_eq!(normalize_sizes(&[256.4, 32.0]).unwrap(), vec![32]);
        assert_eq!(normalize_sizes(&[255.6]).unwrap(), vec![256]);
        assert_eq!(normalize_sizes(&[0.4, 0.6]).unwrap(), vec![1]);
        assert!(normalize_sizes(&[0.3, 256.2]).is_err());
    }

    #[test]
    fn keeps_boundary_sizes() {
        let sizes = normalize_sizes(&[256.0, 1.0]).unwrap();
        assert_eq!(sizes, vec![1, 256]);
    }

    #[test]
    fn drops_out_of_range_and_non_finite() {
        let requested =
            [f64::NAN, f64::INFINITY, -1.0, 0.2, 257.0, 48.0, 1000.0];
        assert_eq!(normalize_sizes(&requested).unwrap(), vec![48]);
    }

    #[test]
    fn rejects_empty_selection() {
        let error = normalize_sizes(&[300.0, -5.0, 0.0]).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(error.to_string(), "choose at least one valid size (1–256)");
        assert!(normalize_sizes(&[]).is_err());
    }

    #[test]
    fn default_sizes_are_already_normal() {
        let requested: Vec<f64> =
            DEFAULT_SIZES.iter().map(|&size| size as f64).collect();
        assert_eq!(normalize_sizes(&requested).unwrap(), DEFAULT_SIZES);
    }
}

//===========================================================================//
