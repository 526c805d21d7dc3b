use std::path::Path;

use image::DynamicImage;
use log::info;

use crate::error::{Error, Result};
use crate::frame::{ColorFrame, DepthFrame};
use crate::sensor::{DepthSensor, TILT_MAX_DEGREES, TILT_MIN_DEGREES};

/// Reads a grayscale depth image. 16-bit images use the full `u16` range, anything else
/// is converted to 8-bit luma.
pub fn read_depth_image<P: AsRef<Path>>(path: P) -> Result<DepthFrame> {
    match image::open(path)? {
        DynamicImage::ImageLuma16(image) => DepthFrame::from_luma16(&image),
        image => DepthFrame::from_luma8(&image.into_luma8()),
    }
}

pub fn read_color_image<P: AsRef<Path>>(path: P) -> Result<ColorFrame> {
    ColorFrame::from_rgb_image(&image::open(path)?.into_rgb8())
}

/// A sensor that serves one depth and one color frame, each reported as new once.
///
/// The tilt is only kept in memory, clamped to the Kinect motor range.
pub struct FrameFileSensor {
    depth: DepthFrame,
    color: ColorFrame,
    depth_pending: bool,
    color_pending: bool,
    tilt: f32,
}

impl FrameFileSensor {
    pub fn new(depth: DepthFrame, color: ColorFrame) -> Self {
        Self {
            depth,
            color,
            depth_pending: true,
            color_pending: true,
            tilt: 0.0,
        }
    }

    pub fn load<P: AsRef<Path>, Q: AsRef<Path>>(depth_path: P, color_path: Q) -> Result<Self> {
        let depth = read_depth_image(depth_path.as_ref())?;
        let color = read_color_image(color_path.as_ref())?;
        info!(
            "Loaded {}x{} depth from {} and {}x{} color from {}",
            depth.width(),
            depth.height(),
            depth_path.as_ref().display(),
            color.width(),
            color.height(),
            color_path.as_ref().display()
        );
        Ok(Self::new(depth, color))
    }

    /// Reports both frames as new again.
    pub fn rewind(&mut self) {
        self.depth_pending = true;
        self.color_pending = true;
    }
}

impl DepthSensor for FrameFileSensor {
    fn has_new_depth_frame(&mut self) -> bool {
        self.depth_pending
    }

    fn depth_frame(&mut self) -> Result<DepthFrame> {
        self.depth_pending = false;
        Ok(self.depth.clone())
    }

    fn has_new_color_frame(&mut self) -> bool {
        self.color_pending
    }

    fn color_frame(&mut self) -> Result<ColorFrame> {
        self.color_pending = false;
        Ok(self.color.clone())
    }

    fn tilt(&self) -> Result<f32> {
        Ok(self.tilt)
    }

    fn set_tilt(&mut self, degrees: f32) -> Result<()> {
        if !degrees.is_finite() {
            return Err(Error::sensor(format!("invalid tilt {degrees}")));
        }
        self.tilt = num::clamp(degrees, TILT_MIN_DEGREES, TILT_MAX_DEGREES);
        Ok(())
    }
}
