pub mod calibration;
pub mod camera;
pub mod colorize;
pub mod config;
pub mod error;
pub mod frame;
pub mod io;
pub mod mesh;
pub mod pipeline;
pub mod reprojection;
pub mod sampling;
pub mod sensor;
pub mod threshold;
pub mod transform;


pub use crate::calibration::CalibrationParameters;
pub use crate::colorize::{AlignmentMode, Colorizer, PointColorizer, PointColors};
pub use crate::config::PipelineConfig;
pub use crate::error::{Error, Result};
pub use crate::frame::{AlignedColorFrame, ColorFrame, DepthFrame};
pub use crate::mesh::MeshGrid;
pub use crate::pipeline::{PointCloudPipeline, RenderPacket, ViewParameters};
pub use crate::reprojection::Reprojector;
pub use crate::sensor::DepthSensor;
pub use crate::threshold::ThresholdWindow;
