use serde_derive::{Deserialize, Serialize};

/// How frames are read at non-integer pixel positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampler {
    /// Closest pixel center.
    #[default]
    Nearest,
    /// Weighted sum of the four surrounding pixels.
    Bilinear,
}

/// Maps a texture coordinate in [0, 1] onto continuous pixel coordinates, so that 0 and
/// 1 land on the centers of the first and last pixels. Out of range values are clamped.
pub(crate) fn texcoord_to_pixel(s: f32, t: f32, width: usize, height: usize) -> (f32, f32) {
    let s = if s.is_finite() { num::clamp(s, 0.0, 1.0) } else { 0.0 };
    let t = if t.is_finite() { num::clamp(t, 0.0, 1.0) } else { 0.0 };
    (s * (width - 1) as f32, t * (height - 1) as f32)
}

/// Pixel `(row, col)` whose center is closest to `(x, y)`, if it lies inside the image.
pub(crate) fn nearest_pixel(x: f32, y: f32, width: usize, height: usize) -> Option<(usize, usize)> {
    let col = x.round();
    let row = y.round();
    if col >= 0.0 && row >= 0.0 && (col as usize) < width && (row as usize) < height {
        Some((row as usize, col as usize))
    } else {
        None
    }
}

/// The four taps of a bilinear read.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BilinearTaps {
    pub row0: usize,
    pub row1: usize,
    pub col0: usize,
    pub col1: usize,
    pub row_frac: f32,
    pub col_frac: f32,
}

impl BilinearTaps {
    /// `None` when `(x, y)` is outside `[0, width - 1] x [0, height - 1]`.
    pub fn new(x: f32, y: f32, width: usize, height: usize) -> Option<Self> {
        if !(x >= 0.0 && y >= 0.0 && x <= (width - 1) as f32 && y <= (height - 1) as f32) {
            return None;
        }

        let (col0, row0) = (x as usize, y as usize);
        Some(Self {
            row0,
            row1: (row0 + 1).min(height - 1),
            col0,
            col1: (col0 + 1).min(width - 1),
            row_frac: y.fract(),
            col_frac: x.fract(),
        })
    }

    pub fn blend(&self, v00: f32, v01: f32, v10: f32, v11: f32) -> f32 {
        let top = v00 * (1.0 - self.col_frac) + v01 * self.col_frac;
        let bottom = v10 * (1.0 - self.col_frac) + v11 * self.col_frac;
        top * (1.0 - self.row_frac) + bottom * self.row_frac
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::{nearest_pixel, texcoord_to_pixel, BilinearTaps};

    #[test]
    fn should_map_texcoord_corners_to_pixel_centers() {
        assert_eq!(texcoord_to_pixel(0.0, 0.0, 640, 480), (0.0, 0.0));
        assert_eq!(texcoord_to_pixel(1.0, 1.0, 640, 480), (639.0, 479.0));
        assert_eq!(texcoord_to_pixel(-0.5, 2.0, 640, 480), (0.0, 479.0));
    }

    #[test]
    fn should_round_to_nearest_pixel() {
        assert_eq!(nearest_pixel(10.4, 3.6, 640, 480), Some((4, 10)));
        assert_eq!(nearest_pixel(639.4, 0.0, 640, 480), Some((0, 639)));
        assert_eq!(nearest_pixel(639.6, 0.0, 640, 480), None);
        assert_eq!(nearest_pixel(-0.6, 0.0, 640, 480), None);
        assert_eq!(nearest_pixel(f32::NAN, 0.0, 640, 480), None);
    }

    #[test]
    fn should_blend_bilinear_taps() {
        let taps = BilinearTaps::new(1.25, 2.5, 4, 4).unwrap();
        assert_eq!((taps.row0, taps.row1, taps.col0, taps.col1), (2, 3, 1, 2));
        assert_abs_diff_eq!(taps.blend(0.0, 1.0, 2.0, 3.0), 1.25, epsilon = 1e-6);

        let edge = BilinearTaps::new(3.0, 3.0, 4, 4).unwrap();
        assert_eq!((edge.row1, edge.col1), (3, 3));
        assert!(BilinearTaps::new(3.1, 0.0, 4, 4).is_none());
    }
}
