use log::{debug, info, warn};
use nalgebra::UnitQuaternion;

use crate::colorize::{ColorizedCloud, Colorizer, PointColorizer, PointColors};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::frame::{AlignedColorFrame, ColorFrame, DepthFrame};
use crate::mesh::MeshGrid;
use crate::sensor::{DepthSensor, LatestFrame};
use crate::threshold::ThresholdWindow;

/// Values the parameter UI hands over every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewParameters {
    pub thresholds: ThresholdWindow,
    /// Requested motor tilt in degrees.
    pub tilt_degrees: f32,
    pub scene_rotation: UnitQuaternion<f32>,
    pub camera_distance: f32,
}

impl Default for ViewParameters {
    fn default() -> Self {
        Self {
            thresholds: ThresholdWindow::default(),
            tilt_degrees: 0.0,
            scene_rotation: UnitQuaternion::identity(),
            camera_distance: 1000.0,
        }
    }
}

/// Which streams delivered a frame during a poll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameUpdate {
    pub depth: bool,
    pub color: bool,
}

/// Everything the draw step needs for one tick.
#[derive(Debug)]
pub struct RenderPacket<'a> {
    pub mesh: &'a MeshGrid,
    pub depth: &'a DepthFrame,
    pub color: &'a ColorFrame,
    pub aligned: Option<&'a AlignedColorFrame>,
    pub colors: &'a PointColors,
    pub thresholds: ThresholdWindow,
    pub scene_rotation: UnitQuaternion<f32>,
    pub camera_distance: f32,
    /// False when the colors of the previous tick were reused.
    pub recomputed: bool,
}

struct CachedCloud {
    depth_generation: u64,
    color_generation: u64,
    thresholds: ThresholdWindow,
    cloud: ColorizedCloud,
}

/// Frame driven point cloud: keeps the static grid, the latest frame of each stream and
/// the colors computed from them.
pub struct PointCloudPipeline {
    mesh: MeshGrid,
    colorizer: Colorizer,
    depth: LatestFrame<DepthFrame>,
    color: LatestFrame<ColorFrame>,
    cache: Option<CachedCloud>,
}

impl PointCloudPipeline {
    /// Builds the grid and the colorizer. Bad resolutions or calibrations fail here.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let mesh = MeshGrid::new(config.mesh.x_res, config.mesh.y_res)?;
        let colorizer = Colorizer::new(config.alignment, config.sampler, &config.calibration)?;
        info!(
            "Point cloud pipeline ready: {}x{} grid, {:?} alignment, {:?} sampling",
            config.mesh.x_res, config.mesh.y_res, config.alignment, config.sampler
        );
        Ok(Self::with_colorizer(mesh, colorizer))
    }

    pub fn with_colorizer(mesh: MeshGrid, colorizer: Colorizer) -> Self {
        Self {
            mesh,
            colorizer,
            depth: LatestFrame::new(),
            color: LatestFrame::new(),
            cache: None,
        }
    }

    pub fn mesh(&self) -> &MeshGrid {
        &self.mesh
    }

    pub fn colorizer(&self) -> &Colorizer {
        &self.colorizer
    }

    pub fn depth(&self) -> Option<&DepthFrame> {
        self.depth.get()
    }

    pub fn color(&self) -> Option<&ColorFrame> {
        self.color.get()
    }

    /// Fetches the frames the sensor reports as new. A failed fetch keeps the previous frame.
    pub fn poll_frames<S: DepthSensor + ?Sized>(&mut self, sensor: &mut S) -> FrameUpdate {
        let mut update = FrameUpdate::default();

        if sensor.has_new_depth_frame() {
            match sensor.depth_frame() {
                Ok(frame) => {
                    self.depth.replace(frame);
                    update.depth = true;
                }
                Err(err) => warn!("Keeping last depth frame: {err}"),
            }
        }

        if sensor.has_new_color_frame() {
            match sensor.color_frame() {
                Ok(frame) => {
                    self.color.replace(frame);
                    update.color = true;
                }
                Err(err) => warn!("Keeping last color frame: {err}"),
            }
        }

        update
    }

    /// Forwards the requested tilt when it differs from the sensor's.
    ///
    /// # Returns
    ///
    /// * Whether a new tilt was sent.
    pub fn sync_tilt<S: DepthSensor + ?Sized>(sensor: &mut S, degrees: f32) -> bool {
        let current = match sensor.tilt() {
            Ok(current) => current,
            Err(err) => {
                warn!("Can't read sensor tilt: {err}");
                return false;
            }
        };

        if (current - degrees).abs() <= f32::EPSILON {
            return false;
        }

        match sensor.set_tilt(degrees) {
            Ok(()) => {
                debug!("Tilt {current} -> {degrees} degrees");
                true
            }
            Err(err) => {
                warn!("Can't set sensor tilt to {degrees}: {err}");
                false
            }
        }
    }

    /// One render tick: poll frames, forward the tilt and refresh the colors.
    ///
    /// # Returns
    ///
    /// * `None` until at least one frame of each stream has arrived.
    pub fn tick<S: DepthSensor + ?Sized>(
        &mut self,
        sensor: &mut S,
        params: &ViewParameters,
    ) -> Option<RenderPacket<'_>> {
        self.poll_frames(sensor);
        Self::sync_tilt(sensor, params.tilt_degrees);
        self.render(params)
    }

    /// Colors the grid with the frames already held, recomputing only when a frame or the
    /// depth window changed since the last call.
    pub fn render(&mut self, params: &ViewParameters) -> Option<RenderPacket<'_>> {
        let (depth, color) = (self.depth.get()?, self.color.get()?);
        let (depth_generation, color_generation) =
            (self.depth.generation(), self.color.generation());

        let up_to_date = self.cache.as_ref().map_or(false, |cache| {
            cache.depth_generation == depth_generation
                && cache.color_generation == color_generation
                && cache.thresholds == params.thresholds
        });

        if up_to_date {
            debug!("Reusing point colors of depth #{depth_generation}, color #{color_generation}");
        } else {
            let cloud = self
                .colorizer
                .colorize(&self.mesh, depth, color, &params.thresholds);
            self.cache = Some(CachedCloud {
                depth_generation,
                color_generation,
                thresholds: params.thresholds,
                cloud,
            });
        }

        let cache = self.cache.as_ref()?;
        Some(RenderPacket {
            mesh: &self.mesh,
            depth,
            color,
            aligned: cache.cloud.aligned.as_ref(),
            colors: &cache.cloud.colors,
            thresholds: params.thresholds,
            scene_rotation: params.scene_rotation,
            camera_distance: params.camera_distance,
            recomputed: !up_to_date,
        })
    }
}
