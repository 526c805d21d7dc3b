use std::convert::TryFrom;
use std::path::Path;

use nalgebra::{Matrix3, Matrix4, Vector3};
use serde_derive::{Deserialize, Serialize};

use crate::camera::CameraIntrinsics;
use crate::error::{Error, Result};
use crate::transform::Transform;

/// Fixed optics of a depth/color sensor pair, obtained by offline calibration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CalibrationDocument", into = "CalibrationDocument")]
pub struct CalibrationParameters {
    /// Intrinsics of the depth (infrared) camera.
    pub depth: CameraIntrinsics,
    /// Intrinsics of the color camera.
    pub color: CameraIntrinsics,
    /// Maps points from the depth camera frame into the color camera frame.
    pub depth_to_color: Transform,
    /// Multiplier from depth frame values into the units of the translation.
    pub depth_scale: f32,
}

impl CalibrationParameters {
    pub fn new(
        depth: CameraIntrinsics,
        color: CameraIntrinsics,
        depth_to_color: Transform,
        depth_scale: f32,
    ) -> Result<Self> {
        let calibration = Self {
            depth,
            color,
            depth_to_color,
            depth_scale,
        };
        calibration.validate()?;
        Ok(calibration)
    }

    /// Calibration of a Kinect v1 (Nicolas Burrus' published values).
    ///
    /// The depth to color matrix is listed column-major, translation in the last column.
    pub fn kinect_v1() -> Self {
        #[rustfmt::skip]
        let depth_to_color = Matrix4::from_column_slice(&[
            9.998_462_9e-1, 1.263_535_9e-3, -1.748_723_3e-2, 0.0,
            -1.477_909_6e-3, 9.999_238_6e-1, -1.225_138e-2, 0.0,
            1.747_042_1e-2, 1.227_534_1e-2, 9.997_720_2e-1, 0.0,
            1.998_524_2e-2, -7.442_374e-4, -1.091_673_6e-2, 1.0,
        ]);

        Self {
            depth: CameraIntrinsics::from_simple_intrinsic(
                5.942_143_421_192_324_7e2,
                5.910_405_369_687_077_8e2,
                3.393_078_097_530_031_4e2,
                2.427_391_376_175_161_5e2,
            ),
            color: CameraIntrinsics::from_simple_intrinsic(
                5.292_150_809_829_329_3e2,
                5.255_639_363_005_743_7e2,
                3.289_427_202_875_925_8e2,
                2.674_806_817_187_155_7e2,
            ),
            depth_to_color: Transform::from_matrix4(&depth_to_color),
            depth_scale: 1.0,
        }
    }

    /// Both cameras share the same optics and optical center. Useful for sensors that
    /// already deliver registered depth, or for tests.
    pub fn coincident(intrinsics: CameraIntrinsics) -> Self {
        Self {
            depth: intrinsics.clone(),
            color: intrinsics,
            depth_to_color: Transform::eye(),
            depth_scale: 1.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.depth.validate("depth")?;
        self.color.validate("color")?;

        let rotation = self.depth_to_color.rotation_matrix();
        let translation = self.depth_to_color.translation();
        if rotation.iter().chain(translation.iter()).any(|v| !v.is_finite()) {
            return Err(Error::invalid_calibration(
                "depth to color transform has non-finite entries",
            ));
        }

        if !self.depth_scale.is_finite() || self.depth_scale <= 0.0 {
            return Err(Error::invalid_calibration(format!(
                "depth scale must be positive, got {}",
                self.depth_scale
            )));
        }

        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

impl Default for CalibrationParameters {
    fn default() -> Self {
        Self::kinect_v1()
    }
}

fn default_depth_scale() -> f32 {
    1.0
}

/// On-disk layout of the calibration: row-major rotation and a translation vector.
#[derive(Serialize, Deserialize, Debug)]
struct CalibrationDocument {
    depth: CameraIntrinsics,
    color: CameraIntrinsics,
    rotation: [[f32; 3]; 3],
    translation: [f32; 3],
    #[serde(default = "default_depth_scale")]
    depth_scale: f32,
}

impl TryFrom<CalibrationDocument> for CalibrationParameters {
    type Error = Error;

    fn try_from(doc: CalibrationDocument) -> Result<Self> {
        let r = doc.rotation;
        if r.iter().flatten().chain(doc.translation.iter()).any(|v| !v.is_finite()) {
            return Err(Error::invalid_calibration(
                "rotation and translation entries must be finite",
            ));
        }

        let rotation = Matrix3::new(
            r[0][0], r[0][1], r[0][2], r[1][0], r[1][1], r[1][2], r[2][0], r[2][1], r[2][2],
        );
        if (rotation.determinant() - 1.0).abs() > 1e-2 {
            return Err(Error::invalid_calibration(format!(
                "rotation is not a proper rotation matrix (determinant {})",
                rotation.determinant()
            )));
        }

        let translation = Vector3::from(doc.translation);
        CalibrationParameters::new(
            doc.depth,
            doc.color,
            Transform::from_rotation_translation(&rotation, &translation),
            doc.depth_scale,
        )
    }
}

impl From<CalibrationParameters> for CalibrationDocument {
    fn from(calibration: CalibrationParameters) -> Self {
        let m = calibration.depth_to_color.rotation_matrix();
        let t = calibration.depth_to_color.translation();
        Self {
            depth: calibration.depth,
            color: calibration.color,
            rotation: [
                [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
                [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
                [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
            ],
            translation: [t[0], t[1], t[2]],
            depth_scale: calibration.depth_scale,
        }
    }
}
