use image::{Rgb, Rgba, RgbaImage};
use ndarray::{s, Array3};

use crate::sampling::{nearest_pixel, texcoord_to_pixel, BilinearTaps, Sampler};

/// Color used for points that have no color: fully transparent black.
pub const NO_COLOR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Color registered onto the depth camera grid, shape `(height, width, 4)`.
///
/// Each depth pixel holds the color seen by the color camera at the same 3D point, or
/// [`NO_COLOR`] when there was no depth reading or the point left the color camera view.
#[derive(Clone, Debug, PartialEq)]
pub struct AlignedColorFrame {
    rgba: Array3<u8>,
}

impl AlignedColorFrame {
    /// A frame where no pixel has color yet.
    pub(crate) fn empty(width: usize, height: usize) -> Self {
        Self {
            rgba: Array3::zeros((height, width, 4)),
        }
    }

    pub(crate) fn set(&mut self, row: usize, col: usize, rgb: Rgb<u8>) {
        for c in 0..3 {
            self.rgba[(row, col, c)] = rgb[c];
        }
        self.rgba[(row, col, 3)] = u8::MAX;
    }

    pub fn width(&self) -> usize {
        self.rgba.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.rgba.shape()[0]
    }

    pub fn pixel(&self, row: usize, col: usize) -> Option<Rgba<u8>> {
        if row < self.height() && col < self.width() {
            Some(self.pixel_unchecked(row, col))
        } else {
            None
        }
    }

    fn pixel_unchecked(&self, row: usize, col: usize) -> Rgba<u8> {
        Rgba([
            self.rgba[(row, col, 0)],
            self.rgba[(row, col, 1)],
            self.rgba[(row, col, 2)],
            self.rgba[(row, col, 3)],
        ])
    }

    pub fn has_color(&self, row: usize, col: usize) -> bool {
        self.pixel(row, col).map_or(false, |rgba| rgba[3] != 0)
    }

    /// Number of depth pixels that received a color.
    pub fn coverage(&self) -> usize {
        self.rgba
            .slice(s![.., .., 3])
            .iter()
            .filter(|alpha| **alpha != 0)
            .count()
    }

    /// Color at a texture coordinate.
    ///
    /// Bilinear reads only blend when all four taps have color, otherwise they fall back to
    /// the nearest pixel so that holes don't bleed into their neighbors.
    pub fn sample(&self, s: f32, t: f32, sampler: Sampler) -> Rgba<u8> {
        let (x, y) = texcoord_to_pixel(s, t, self.width(), self.height());
        let nearest = || {
            nearest_pixel(x, y, self.width(), self.height())
                .map(|(row, col)| self.pixel_unchecked(row, col))
                .unwrap_or(NO_COLOR)
        };

        match sampler {
            Sampler::Nearest => nearest(),
            Sampler::Bilinear => {
                let Some(taps) = BilinearTaps::new(x, y, self.width(), self.height()) else {
                    return nearest();
                };
                let corners = [
                    (taps.row0, taps.col0),
                    (taps.row0, taps.col1),
                    (taps.row1, taps.col0),
                    (taps.row1, taps.col1),
                ];
                if corners.iter().any(|(row, col)| self.rgba[(*row, *col, 3)] == 0) {
                    return nearest();
                }

                let mut rgba = [u8::MAX; 4];
                for (c, value) in rgba.iter_mut().take(3).enumerate() {
                    let [v00, v01, v10, v11] =
                        corners.map(|(row, col)| self.rgba[(row, col, c)] as f32);
                    *value = num::clamp(taps.blend(v00, v01, v10, v11).round(), 0.0, 255.0) as u8;
                }
                Rgba(rgba)
            }
        }
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            self.pixel_unchecked(y as usize, x as usize)
        })
    }
}
