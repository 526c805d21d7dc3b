use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::{Array2, Array3};
use rgbd_align::{
    frame::{SENSOR_HEIGHT, SENSOR_WIDTH},
    sampling::Sampler,
    AlignmentMode, CalibrationParameters, ColorFrame, Colorizer, DepthFrame, MeshGrid,
    PointColorizer, Reprojector, ThresholdWindow,
};

fn frames() -> (DepthFrame, ColorFrame) {
    let depth = DepthFrame::new(Array2::from_shape_fn(
        (SENSOR_HEIGHT, SENSOR_WIDTH),
        |(row, col)| 0.2 + 0.6 * ((row + col) % 100) as f32 / 100.0,
    ))
    .unwrap();
    let color = ColorFrame::new(Array3::from_shape_fn(
        (SENSOR_HEIGHT, SENSOR_WIDTH, 3),
        |(row, col, c)| ((row * 3 + col * 7 + c * 11) % 256) as u8,
    ))
    .unwrap();
    (depth, color)
}

fn criterion_benchmark(c: &mut Criterion) {
    let (depth, color) = frames();
    let calibration = CalibrationParameters::kinect_v1();
    let mesh = MeshGrid::new(SENSOR_WIDTH, SENSOR_HEIGHT).unwrap();
    let window = ThresholdWindow::new(0.3, 0.5);

    let reprojector = Reprojector::new(calibration.clone()).unwrap();
    c.bench_function("reprojector_align", |b| {
        b.iter(|| reprojector.align(&depth, &color, Sampler::Nearest));
    });

    for (name, mode) in [
        ("threshold_blend", AlignmentMode::ThresholdBlend),
        ("reprojection_blend", AlignmentMode::Reprojection),
    ] {
        let colorizer = Colorizer::new(mode, Sampler::Nearest, &calibration).unwrap();
        c.bench_function(name, |b| {
            b.iter(|| colorizer.colorize(&mesh, &depth, &color, &window));
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
