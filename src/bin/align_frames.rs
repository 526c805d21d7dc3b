use std::path::PathBuf;

use clap::Parser;
use image::{Rgba, RgbaImage};
use log::info;
use rgbd_align::{
    io::FrameFileSensor, AlignmentMode, PipelineConfig, PointCloudPipeline, ThresholdWindow,
    ViewParameters,
};

#[derive(Parser)]
struct Args {
    /// Grayscale depth image (8 or 16 bit)
    depth: PathBuf,
    /// Color image
    color: PathBuf,
    /// JSON pipeline configuration
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Use full geometric registration instead of the threshold blend
    #[arg(long, short, action)]
    reproject: bool,
    /// Lower bound of the depth window
    #[arg(long)]
    lo: Option<f32>,
    /// Upper bound of the depth window
    #[arg(long)]
    hi: Option<f32>,
    /// Directory to write the previews to
    #[arg(long, short, default_value = ".")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error + 'static>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if args.reproject {
        config.alignment = AlignmentMode::Reprojection;
    }
    let thresholds = ThresholdWindow::new(
        args.lo.unwrap_or(config.thresholds.lo),
        args.hi.unwrap_or(config.thresholds.hi),
    );

    let mut sensor = FrameFileSensor::load(&args.depth, &args.color)?;
    let mut pipeline = PointCloudPipeline::new(&config)?;
    let params = ViewParameters {
        thresholds,
        ..Default::default()
    };
    let packet = pipeline
        .tick(&mut sensor, &params)
        .ok_or("sensor delivered no frames")?;

    let (x_res, y_res) = packet.mesh.resolution();
    let points = RgbaImage::from_fn(x_res as u32, y_res as u32, |x, y| {
        packet
            .colors
            .get(x as usize * y_res + y as usize)
            .unwrap_or(Rgba([0, 0, 0, 0]))
    });
    let points_path = args.output.join("points.png");
    points.save(&points_path)?;
    info!(
        "{} of {} points inside [{}, {}], written to {}",
        packet.colors.visible_count(),
        packet.colors.len(),
        thresholds.lo,
        thresholds.hi,
        points_path.display()
    );

    packet.depth.to_luma_image().save(args.output.join("depth.png"))?;
    if let Some(aligned) = packet.aligned {
        let aligned_path = args.output.join("aligned.png");
        aligned.to_rgba_image().save(&aligned_path)?;
        info!(
            "{} depth pixels registered, written to {}",
            aligned.coverage(),
            aligned_path.display()
        );
    }

    Ok(())
}
