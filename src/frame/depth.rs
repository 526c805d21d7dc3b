use image::{GrayImage, ImageBuffer, Luma};
use ndarray::{Array2, ArrayView2};

use crate::error::{Error, Result};
use crate::sampling::{nearest_pixel, texcoord_to_pixel, BilinearTaps, Sampler};

/// Width of the depth and color streams of a Kinect v1.
pub const SENSOR_WIDTH: usize = 640;
/// Height of the depth and color streams of a Kinect v1.
pub const SENSOR_HEIGHT: usize = 480;

/// One depth capture. Values are normalized to [0, 1], 0 meaning no reading.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthFrame {
    depth: Array2<f32>,
}

impl DepthFrame {
    /// Wraps a `(height, width)` array of depth values.
    pub fn new(depth: Array2<f32>) -> Result<Self> {
        if depth.nrows() == 0 || depth.ncols() == 0 {
            return Err(Error::invalid_parameter("depth frame must not be empty"));
        }
        Ok(Self { depth })
    }

    /// A frame without any valid reading.
    pub fn zeros(width: usize, height: usize) -> Result<Self> {
        Self::new(Array2::zeros((height, width)))
    }

    /// Converts raw sensor units into normalized depth.
    ///
    /// # Arguments
    ///
    /// * `raw` - Raw depth values, shape `(height, width)`.
    /// * `max_value` - Raw value that maps to 1.0, e.g. 2047 for 11-bit Kinect depth.
    pub fn from_raw(raw: &ArrayView2<u16>, max_value: u16) -> Result<Self> {
        if max_value == 0 {
            return Err(Error::invalid_parameter("raw depth max value must be positive"));
        }

        let scale = 1.0 / max_value as f32;
        Self::new(raw.map(|v| (*v as f32 * scale).min(1.0)))
    }

    /// Reads a 16-bit grayscale image, full range mapping to [0, 1].
    pub fn from_luma16(image: &ImageBuffer<Luma<u16>, Vec<u16>>) -> Result<Self> {
        let raw = Array2::from_shape_fn(
            (image.height() as usize, image.width() as usize),
            |(row, col)| image.get_pixel(col as u32, row as u32)[0],
        );
        Self::from_raw(&raw.view(), u16::MAX)
    }

    /// Reads an 8-bit grayscale image, full range mapping to [0, 1].
    pub fn from_luma8(image: &GrayImage) -> Result<Self> {
        Self::new(Array2::from_shape_fn(
            (image.height() as usize, image.width() as usize),
            |(row, col)| image.get_pixel(col as u32, row as u32)[0] as f32 / 255.0,
        ))
    }

    pub fn width(&self) -> usize {
        self.depth.ncols()
    }

    pub fn height(&self) -> usize {
        self.depth.nrows()
    }

    pub fn view(&self) -> ArrayView2<f32> {
        self.depth.view()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.depth.get((row, col)).copied()
    }

    /// Depth at a texture coordinate.
    ///
    /// The bilinear sampler does not blend in empty (0) pixels: if the closest tap is
    /// empty the result is 0, other empty taps take the closest tap value.
    pub fn sample(&self, s: f32, t: f32, sampler: Sampler) -> f32 {
        let (x, y) = texcoord_to_pixel(s, t, self.width(), self.height());
        match sampler {
            Sampler::Nearest => nearest_pixel(x, y, self.width(), self.height())
                .map(|(row, col)| self.depth[(row, col)])
                .unwrap_or(0.0),
            Sampler::Bilinear => BilinearTaps::new(x, y, self.width(), self.height())
                .map(|taps| self.sample_bilinear(&taps))
                .unwrap_or(0.0),
        }
    }

    fn sample_bilinear(&self, taps: &BilinearTaps) -> f32 {
        let v00 = self.depth[(taps.row0, taps.col0)];
        if v00 == 0.0 {
            return 0.0;
        }

        let or_v00 = |value: f32| if value == 0.0 { v00 } else { value };
        let v01 = or_v00(self.depth[(taps.row0, taps.col1)]);
        let v10 = or_v00(self.depth[(taps.row1, taps.col0)]);
        let v11 = or_v00(self.depth[(taps.row1, taps.col1)]);

        taps.blend(v00, v01, v10, v11)
    }

    /// Grayscale view of the frame for debugging.
    pub fn to_luma_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            let v = num::clamp(self.depth[(y as usize, x as usize)], 0.0, 1.0);
            Luma([(v * 255.0).round() as u8])
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};

    use super::DepthFrame;
    use crate::sampling::Sampler;

    #[test]
    fn should_reject_empty_frames() {
        assert!(DepthFrame::new(Array2::zeros((0, 640))).is_err());
        assert!(DepthFrame::zeros(640, 480).is_ok());
    }

    #[test]
    fn should_normalize_raw_depth() {
        let raw = array![[0u16, 1023], [2047, 4000]];
        let frame = DepthFrame::from_raw(&raw.view(), 2047).unwrap();
        assert_eq!(frame.get(0, 0), Some(0.0));
        assert_abs_diff_eq!(frame.get(0, 1).unwrap(), 1023.0 / 2047.0, epsilon = 1e-6);
        assert_eq!(frame.get(1, 0), Some(1.0));
        assert_eq!(frame.get(1, 1), Some(1.0));
        assert!(DepthFrame::from_raw(&raw.view(), 0).is_err());
    }

    #[test]
    fn should_sample_corners_with_nearest() {
        let frame = DepthFrame::new(array![[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]]).unwrap();
        assert_eq!(frame.sample(0.0, 0.0, Sampler::Nearest), 0.1);
        assert_eq!(frame.sample(1.0, 0.0, Sampler::Nearest), 0.3);
        assert_eq!(frame.sample(0.0, 1.0, Sampler::Nearest), 0.4);
        assert_eq!(frame.sample(1.0, 1.0, Sampler::Nearest), 0.6);
        assert_eq!(frame.sample(0.5, 1.0, Sampler::Nearest), 0.5);
    }

    #[test]
    fn should_not_blend_empty_depth() {
        let frame = DepthFrame::new(array![[0.4, 0.0], [0.0, 0.0]]).unwrap();
        assert_abs_diff_eq!(frame.sample(0.5, 0.5, Sampler::Bilinear), 0.4, epsilon = 1e-6);

        let frame = DepthFrame::new(array![[0.0, 0.4], [0.4, 0.4]]).unwrap();
        assert_eq!(frame.sample(0.25, 0.25, Sampler::Bilinear), 0.0);

        let frame = DepthFrame::new(array![[0.2, 0.4], [0.2, 0.4]]).unwrap();
        assert_abs_diff_eq!(frame.sample(0.5, 0.0, Sampler::Bilinear), 0.3, epsilon = 1e-6);
    }
}
