//! The 4×4 Bayer ordered-dithering pattern.
//!
//! The WGSL shader computes the threshold with the algebraic 2×2
//! decomposition (no array indexing, for mobile GPU compatibility); the
//! direct matrix lookup here is the reference the decomposition is tested
//! against.

/// The standard 4×4 Bayer matrix, row-major, values 0–15.
pub const BAYER_4X4: [[u8; 4]; 4] = [
    [0, 8, 2, 10],
    [12, 4, 14, 6],
    [3, 11, 1, 9],
    [15, 7, 13, 5],
];

/// Threshold in `[0, 1)` for pixel `(x, y)` by direct matrix lookup.
#[must_use]
pub fn threshold_lookup(x: u32, y: u32) -> f32 {
    let row = BAYER_4X4[(y % 4) as usize];
    f32::from(row[(x % 4) as usize]) / 16.0
}

/// One 2×2 Bayer cell `[[0, 2], [3, 1]]`, written as `3r + 2c − 4rc`.
fn bayer2(row: u32, column: u32) -> u32 {
    3 * row + 2 * column - 4 * row * column
}

/// Threshold in `[0, 1)` via the recursive 2×2 decomposition; agrees with
/// [`threshold_lookup`] on every pixel.
#[must_use]
pub fn threshold_recursive(x: u32, y: u32) -> f32 {
    let x = x % 4;
    let y = y % 4;
    let fine = bayer2(y & 1, x & 1);
    let coarse = bayer2((y >> 1) & 1, (x >> 1) & 1);
    #[expect(clippy::cast_precision_loss, reason = "values are at most 15")]
    let threshold = (4 * fine + coarse) as f32;
    threshold / 16.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_matches_matrix() {
        assert_eq!(threshold_lookup(0, 0), 0.0);
        assert_eq!(threshold_lookup(1, 0), 8.0 / 16.0);
        assert_eq!(threshold_lookup(0, 1), 12.0 / 16.0);
        assert_eq!(threshold_lookup(3, 3), 5.0 / 16.0);
    }

    #[test]
    fn decomposition_agrees_on_all_sixteen_positions() {
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(
                    threshold_lookup(x, y),
                    threshold_recursive(x, y),
                    "mismatch at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn pattern_wraps_every_four_pixels() {
        assert_eq!(threshold_lookup(2, 1), threshold_lookup(6, 9));
        assert_eq!(threshold_recursive(2, 1), threshold_recursive(402, 401));
    }
}
