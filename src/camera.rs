use nalgebra::Vector3;
use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Camera intrinsic parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    /// Focal length and pixel scale in the X-axis.
    pub fx: f64,
    /// Focal length and pixel scale in the Y-axis.
    pub fy: f64,
    /// Camera X-center.
    pub cx: f64,
    /// Camera Y-center.
    pub cy: f64,
}

impl CameraIntrinsics {
    pub fn from_simple_intrinsic(fx: f64, fy: f64, cx: f64, cy: f64) -> Self {
        Self { fx, fy, cx, cy }
    }

    /// Project a 3D point into image space.
    ///
    /// # Arguments
    ///
    /// * point: The 3D point.
    ///
    /// # Returns
    ///
    /// * (x and y) coordinates.
    pub fn project(&self, point: &Vector3<f32>) -> (f32, f32) {
        (
            point[0] * self.fx as f32 / point[2] + self.cx as f32,
            point[1] * self.fy as f32 / point[2] + self.cy as f32,
        )
    }

    /// Same as [`CameraIntrinsics::project`], but returns `None` for points that are on or
    /// behind the image plane instead of dividing by their depth.
    pub fn project_in_front(&self, point: &Vector3<f32>) -> Option<(f32, f32)> {
        if !(point[2] > 0.0) {
            return None;
        }

        let (x, y) = self.project(point);
        if x.is_finite() && y.is_finite() {
            Some((x, y))
        } else {
            None
        }
    }

    pub fn backproject(&self, x: f32, y: f32, z: f32) -> Vector3<f32> {
        Vector3::new(
            (x - self.cx as f32) * z / self.fx as f32,
            (y - self.cy as f32) * z / self.fy as f32,
            z,
        )
    }

    /// Checks that the parameters describe a usable pinhole camera.
    ///
    /// # Arguments
    ///
    /// * name: Camera name used in the error message.
    pub fn validate(&self, name: &str) -> Result<()> {
        for (label, focal) in [("fx", self.fx), ("fy", self.fy)] {
            if !focal.is_finite() || focal <= 0.0 {
                return Err(Error::invalid_calibration(format!(
                    "{name} camera focal length {label} must be positive, got {focal}"
                )));
            }
        }

        for (label, center) in [("cx", self.cx), ("cy", self.cy)] {
            if !center.is_finite() {
                return Err(Error::invalid_calibration(format!(
                    "{name} camera principal point {label} must be finite, got {center}"
                )));
            }
        }

        Ok(())
    }
}
