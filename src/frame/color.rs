use image::{Rgb, RgbImage};
use ndarray::{Array3, ArrayView3};

use crate::error::{Error, Result};
use crate::sampling::{nearest_pixel, texcoord_to_pixel, BilinearTaps, Sampler};

/// One color capture, shape `(height, width, 3)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorFrame {
    color: Array3<u8>,
}

impl ColorFrame {
    pub fn new(color: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = color.dim();
        if channels != 3 {
            return Err(Error::invalid_parameter(format!(
                "color frame must have 3 channels, got {channels}"
            )));
        }
        if height == 0 || width == 0 {
            return Err(Error::invalid_parameter("color frame must not be empty"));
        }
        Ok(Self { color })
    }

    /// A frame filled with a single color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self> {
        Self::new(Array3::from_shape_fn((height, width, 3), |(_, _, c)| rgb[c]))
    }

    pub fn from_rgb_image(image: &RgbImage) -> Result<Self> {
        Self::new(Array3::from_shape_fn(
            (image.height() as usize, image.width() as usize, 3),
            |(row, col, c)| image.get_pixel(col as u32, row as u32)[c],
        ))
    }

    pub fn width(&self) -> usize {
        self.color.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.color.shape()[0]
    }

    pub fn view(&self) -> ArrayView3<u8> {
        self.color.view()
    }

    /// Color at an integer pixel.
    pub fn pixel(&self, row: usize, col: usize) -> Option<Rgb<u8>> {
        if row < self.height() && col < self.width() {
            Some(self.pixel_unchecked(row, col))
        } else {
            None
        }
    }

    fn pixel_unchecked(&self, row: usize, col: usize) -> Rgb<u8> {
        Rgb([
            self.color[(row, col, 0)],
            self.color[(row, col, 1)],
            self.color[(row, col, 2)],
        ])
    }

    /// Color at continuous pixel coordinates, `x` along columns. `None` outside the frame.
    pub fn sample_pixel(&self, x: f32, y: f32, sampler: Sampler) -> Option<Rgb<u8>> {
        match sampler {
            Sampler::Nearest => nearest_pixel(x, y, self.width(), self.height())
                .map(|(row, col)| self.pixel_unchecked(row, col)),
            Sampler::Bilinear => {
                let taps = BilinearTaps::new(x, y, self.width(), self.height())?;
                let mut rgb = [0u8; 3];
                for (c, value) in rgb.iter_mut().enumerate() {
                    let v = taps.blend(
                        self.color[(taps.row0, taps.col0, c)] as f32,
                        self.color[(taps.row0, taps.col1, c)] as f32,
                        self.color[(taps.row1, taps.col0, c)] as f32,
                        self.color[(taps.row1, taps.col1, c)] as f32,
                    );
                    *value = num::clamp(v.round(), 0.0, 255.0) as u8;
                }
                Some(Rgb(rgb))
            }
        }
    }

    /// Color at a texture coordinate. Coordinates are clamped, so this always hits the frame.
    pub fn sample(&self, s: f32, t: f32, sampler: Sampler) -> Rgb<u8> {
        let (x, y) = texcoord_to_pixel(s, t, self.width(), self.height());
        self.sample_pixel(x, y, sampler)
            .unwrap_or_else(|| self.pixel_unchecked(0, 0))
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            self.pixel_unchecked(y as usize, x as usize)
        })
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use ndarray::Array3;

    use super::ColorFrame;
    use crate::sampling::Sampler;

    #[test]
    fn should_check_channels() {
        assert!(ColorFrame::new(Array3::zeros((480, 640, 4))).is_err());
        assert!(ColorFrame::new(Array3::zeros((0, 640, 3))).is_err());
        assert!(ColorFrame::new(Array3::zeros((480, 640, 3))).is_ok());
    }

    #[test]
    fn should_convert_from_and_to_image() {
        let image = RgbImage::from_fn(4, 3, |x, y| Rgb([x as u8, y as u8, 7]));
        let frame = ColorFrame::from_rgb_image(&image).unwrap();
        assert_eq!((frame.width(), frame.height()), (4, 3));
        assert_eq!(frame.pixel(2, 3), Some(Rgb([3, 2, 7])));
        assert_eq!(frame.pixel(3, 0), None);
        assert_eq!(frame.to_rgb_image(), image);
    }

    #[test]
    fn should_sample_pixels() {
        let image = RgbImage::from_fn(4, 4, |x, _| Rgb([x as u8 * 10, 0, 0]));
        let frame = ColorFrame::from_rgb_image(&image).unwrap();

        assert_eq!(frame.sample_pixel(1.4, 2.0, Sampler::Nearest), Some(Rgb([10, 0, 0])));
        assert_eq!(frame.sample_pixel(1.5, 2.0, Sampler::Bilinear), Some(Rgb([15, 0, 0])));
        assert_eq!(frame.sample_pixel(4.0, 0.0, Sampler::Nearest), None);
        assert_eq!(frame.sample_pixel(3.5, 0.0, Sampler::Bilinear), None);
        assert_eq!(frame.sample(1.0, 0.0, Sampler::Nearest), Rgb([30, 0, 0]));
    }
}
