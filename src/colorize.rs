use image::{Rgb, Rgba};
use log::debug;
use serde_derive::{Deserialize, Serialize};

use crate::calibration::CalibrationParameters;
use crate::error::Result;
use crate::frame::{AlignedColorFrame, ColorFrame, DepthFrame, NO_COLOR};
use crate::mesh::MeshGrid;
use crate::reprojection::Reprojector;
use crate::sampling::Sampler;
use crate::threshold::ThresholdWindow;

/// One RGBA color per mesh vertex, same order as the mesh. Excluded points are
/// fully transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct PointColors {
    colors: Vec<[u8; 4]>,
}

impl PointColors {
    pub fn transparent(len: usize) -> Self {
        Self {
            colors: vec![NO_COLOR.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rgba<u8>> {
        self.colors.get(index).map(|rgba| Rgba(*rgba))
    }

    /// Whether the point at `index` is drawn.
    pub fn is_visible(&self, index: usize) -> bool {
        self.colors.get(index).map_or(false, |rgba| rgba[3] != 0)
    }

    pub fn visible_count(&self) -> usize {
        self.colors.iter().filter(|rgba| rgba[3] != 0).count()
    }

    /// Colors as packed RGBA bytes for a vertex attribute buffer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    fn set(&mut self, index: usize, rgba: Rgba<u8>) {
        self.colors[index] = rgba.0;
    }
}

/// Output of one colorization pass.
#[derive(Clone, Debug)]
pub struct ColorizedCloud {
    pub colors: PointColors,
    /// Color registered onto the depth grid, when the strategy computes one.
    pub aligned: Option<AlignedColorFrame>,
}

/// Produces the per-point colors of the mesh from a depth and a color frame.
pub trait PointColorizer {
    fn colorize(
        &self,
        mesh: &MeshGrid,
        depth: &DepthFrame,
        color: &ColorFrame,
        window: &ThresholdWindow,
    ) -> ColorizedCloud;
}

fn opaque(rgb: Rgb<u8>) -> Rgba<u8> {
    let Rgb([r, g, b]) = rgb;
    Rgba([r, g, b, u8::MAX])
}

/// Assumes depth and color are pixel aligned: each vertex reads both frames at the same
/// texture coordinate, and keeps the color whenever the depth is inside the window.
#[derive(Clone, Debug, Default)]
pub struct ThresholdBlend {
    pub sampler: Sampler,
}

impl ThresholdBlend {
    pub fn new(sampler: Sampler) -> Self {
        Self { sampler }
    }
}

impl PointColorizer for ThresholdBlend {
    fn colorize(
        &self,
        mesh: &MeshGrid,
        depth: &DepthFrame,
        color: &ColorFrame,
        window: &ThresholdWindow,
    ) -> ColorizedCloud {
        let mut colors = PointColors::transparent(mesh.len());
        for index in 0..mesh.len() {
            let (s, t) = mesh.texcoord(index);
            if window.contains(depth.sample(s, t, self.sampler)) {
                colors.set(index, opaque(color.sample(s, t, self.sampler)));
            }
        }

        ColorizedCloud {
            colors,
            aligned: None,
        }
    }
}

/// Registers color onto the depth grid with the calibration first, then applies the same
/// depth window as [`ThresholdBlend`] over the registered color.
#[derive(Clone, Debug)]
pub struct ReprojectionBlend {
    pub reprojector: Reprojector,
    pub sampler: Sampler,
}

impl ReprojectionBlend {
    pub fn new(reprojector: Reprojector, sampler: Sampler) -> Self {
        Self {
            reprojector,
            sampler,
        }
    }
}

impl PointColorizer for ReprojectionBlend {
    fn colorize(
        &self,
        mesh: &MeshGrid,
        depth: &DepthFrame,
        color: &ColorFrame,
        window: &ThresholdWindow,
    ) -> ColorizedCloud {
        let aligned = self.reprojector.align(depth, color, self.sampler);
        debug!(
            "Registered {} of {} depth pixels",
            aligned.coverage(),
            depth.width() * depth.height()
        );

        let mut colors = PointColors::transparent(mesh.len());
        for index in 0..mesh.len() {
            let (s, t) = mesh.texcoord(index);
            if window.contains(depth.sample(s, t, self.sampler)) {
                colors.set(index, aligned.sample(s, t, self.sampler));
            }
        }

        ColorizedCloud {
            colors,
            aligned: Some(aligned),
        }
    }
}

/// Which colorization strategy to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Depth and color are treated as already aligned.
    #[default]
    ThresholdBlend,
    /// Full geometric registration with the calibration.
    Reprojection,
}

/// The configured strategy.
#[derive(Clone, Debug)]
pub enum Colorizer {
    ThresholdBlend(ThresholdBlend),
    Reprojection(ReprojectionBlend),
}

impl Colorizer {
    pub fn new(
        mode: AlignmentMode,
        sampler: Sampler,
        calibration: &CalibrationParameters,
    ) -> Result<Self> {
        let reprojector = Reprojector::new(calibration.clone())?;
        Ok(match mode {
            AlignmentMode::ThresholdBlend => {
                Colorizer::ThresholdBlend(ThresholdBlend::new(sampler))
            }
            AlignmentMode::Reprojection => {
                Colorizer::Reprojection(ReprojectionBlend::new(reprojector, sampler))
            }
        })
    }

    pub fn mode(&self) -> AlignmentMode {
        match self {
            Colorizer::ThresholdBlend(_) => AlignmentMode::ThresholdBlend,
            Colorizer::Reprojection(_) => AlignmentMode::Reprojection,
        }
    }
}

impl PointColorizer for Colorizer {
    fn colorize(
        &self,
        mesh: &MeshGrid,
        depth: &DepthFrame,
        color: &ColorFrame,
        window: &ThresholdWindow,
    ) -> ColorizedCloud {
        match self {
            Colorizer::ThresholdBlend(blend) => blend.colorize(mesh, depth, color, window),
            Colorizer::Reprojection(blend) => blend.colorize(mesh, depth, color, window),
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, Rgba};
    use ndarray::Array2;
    use rstest::rstest;

    use super::{AlignmentMode, Colorizer, PointColorizer, ThresholdBlend};
    use crate::calibration::CalibrationParameters;
    use crate::frame::{ColorFrame, DepthFrame, SENSOR_HEIGHT, SENSOR_WIDTH};
    use crate::mesh::MeshGrid;
    use crate::sampling::Sampler;
    use crate::threshold::ThresholdWindow;
    use crate::unit_test::{coincident_calibration, gradient_color_frame, sensor_grid};

    #[rstest]
    #[case(AlignmentMode::ThresholdBlend)]
    #[case(AlignmentMode::Reprojection)]
    fn should_exclude_everything_without_depth(
        sensor_grid: MeshGrid,
        coincident_calibration: CalibrationParameters,
        #[case] mode: AlignmentMode,
    ) {
        let colorizer = Colorizer::new(mode, Sampler::Nearest, &coincident_calibration).unwrap();
        let depth = DepthFrame::zeros(SENSOR_WIDTH, SENSOR_HEIGHT).unwrap();
        let color = gradient_color_frame();

        for window in [
            ThresholdWindow::new(0.0, 1.0),
            ThresholdWindow::new(0.0, 0.0),
            ThresholdWindow::default(),
        ] {
            let cloud = colorizer.colorize(&sensor_grid, &depth, &color, &window);
            assert_eq!(cloud.colors.len(), sensor_grid.len());
            assert_eq!(cloud.colors.visible_count(), 0);
        }
    }

    #[rstest]
    #[case(AlignmentMode::ThresholdBlend)]
    #[case(AlignmentMode::Reprojection)]
    fn should_color_points_inside_window(
        sensor_grid: MeshGrid,
        coincident_calibration: CalibrationParameters,
        #[case] mode: AlignmentMode,
    ) {
        let colorizer = Colorizer::new(mode, Sampler::Nearest, &coincident_calibration).unwrap();
        assert_eq!(colorizer.mode(), mode);

        let mut depth = Array2::<f32>::from_elem((SENSOR_HEIGHT, SENSOR_WIDTH), 0.9);
        depth[(100, 100)] = 0.4;
        let depth = DepthFrame::new(depth).unwrap();
        let color = gradient_color_frame();

        let cloud = colorizer.colorize(
            &sensor_grid,
            &depth,
            &color,
            &ThresholdWindow::new(0.3, 0.5),
        );

        // On a sensor sized grid, vertex (x, y) reads pixel (row y, col x).
        let index = 100 * SENSOR_HEIGHT + 100;
        let Rgb([r, g, b]) = color.pixel(100, 100).unwrap();
        assert_eq!(cloud.colors.get(index), Some(Rgba([r, g, b, 255])));
        assert_eq!(cloud.colors.visible_count(), 1);
        assert_eq!(cloud.aligned.is_some(), mode == AlignmentMode::Reprojection);
    }

    #[test]
    fn should_keep_buffer_size_with_dense_grid() {
        let mesh = MeshGrid::new(64, 48).unwrap();
        let depth = DepthFrame::new(Array2::from_elem((12, 16), 0.45)).unwrap();
        let color = ColorFrame::filled(16, 12, [10, 20, 30]).unwrap();

        let cloud = ThresholdBlend::new(Sampler::Bilinear).colorize(
            &mesh,
            &depth,
            &color,
            &ThresholdWindow::default(),
        );
        assert_eq!(cloud.colors.len(), mesh.len());
        assert_eq!(cloud.colors.visible_count(), mesh.len());
        assert_eq!(cloud.colors.get(0), Some(Rgba([10, 20, 30, 255])));
        assert_eq!(cloud.colors.as_bytes().len(), mesh.len() * 4);
    }

    #[test]
    fn should_reject_bad_calibration_for_any_mode() {
        let mut calibration = CalibrationParameters::kinect_v1();
        calibration.color.fx = 0.0;
        for mode in [AlignmentMode::ThresholdBlend, AlignmentMode::Reprojection] {
            assert!(Colorizer::new(mode, Sampler::Nearest, &calibration).is_err());
        }
    }
}
