use nalgebra::Vector3;

use crate::calibration::CalibrationParameters;
use crate::error::Result;
use crate::frame::{AlignedColorFrame, ColorFrame, DepthFrame};
use crate::sampling::Sampler;

/// Maps depth pixels into color camera pixels using a fixed calibration.
#[derive(Clone, Debug)]
pub struct Reprojector {
    calibration: CalibrationParameters,
}

impl Reprojector {
    /// Creates the reprojector, failing on malformed calibrations.
    pub fn new(calibration: CalibrationParameters) -> Result<Self> {
        calibration.validate()?;
        Ok(Self { calibration })
    }

    pub fn calibration(&self) -> &CalibrationParameters {
        &self.calibration
    }

    /// Backprojects a depth pixel into the depth camera frame.
    ///
    /// # Arguments
    ///
    /// * `row`, `col` - Depth pixel.
    /// * `depth` - Frame depth value at that pixel.
    ///
    /// # Returns
    ///
    /// * `None` when the depth value is not a valid reading (zero, negative or NaN).
    pub fn unproject(&self, row: f32, col: f32, depth: f32) -> Option<Vector3<f32>> {
        if !(depth > 0.0) || !depth.is_finite() {
            return None;
        }
        let z = depth * self.calibration.depth_scale;
        Some(self.calibration.depth.backproject(col, row, z))
    }

    /// Finds where a depth pixel lands in the color image.
    ///
    /// # Returns
    ///
    /// * `(u, v)` continuous color pixel coordinates, `u` along columns. `None` when the
    ///   depth is invalid or the point ends up on or behind the color camera plane.
    pub fn reproject(&self, row: f32, col: f32, depth: f32) -> Option<(f32, f32)> {
        let point = self.unproject(row, col, depth)?;
        let point = self.calibration.depth_to_color.transform_point(&point);
        self.calibration.color.project_in_front(&point)
    }

    /// Registers the color frame onto the depth grid.
    ///
    /// Depth pixels with no reading, or that project outside the color frame, get no color.
    pub fn align(
        &self,
        depth: &DepthFrame,
        color: &ColorFrame,
        sampler: Sampler,
    ) -> AlignedColorFrame {
        let mut aligned = AlignedColorFrame::empty(depth.width(), depth.height());
        for ((row, col), d) in depth.view().indexed_iter() {
            let Some((u, v)) = self.reproject(row as f32, col as f32, *d) else {
                continue;
            };
            if let Some(rgb) = color.sample_pixel(u, v, sampler) {
                aligned.set(row, col, rgb);
            }
        }
        aligned
    }
}
