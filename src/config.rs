use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::calibration::CalibrationParameters;
use crate::colorize::AlignmentMode;
use crate::error::Result;
use crate::mesh::{DEFAULT_X_RES, DEFAULT_Y_RES};
use crate::sampling::Sampler;
use crate::threshold::ThresholdWindow;

/// Point grid resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub x_res: usize,
    pub y_res: usize,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            x_res: DEFAULT_X_RES,
            y_res: DEFAULT_Y_RES,
        }
    }
}

/// Startup configuration of [`crate::pipeline::PointCloudPipeline`]. Every field is
/// optional in JSON and falls back to the Kinect v1 setup.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub mesh: MeshConfig,
    pub alignment: AlignmentMode,
    pub sampler: Sampler,
    /// Initial depth window, before the UI sends its own.
    pub thresholds: ThresholdWindow,
    pub calibration: CalibrationParameters,
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
