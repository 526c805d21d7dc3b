use criterion::{criterion_group, criterion_main, Criterion};
use rgbd_align::mesh::{MeshGrid, DEFAULT_X_RES, DEFAULT_Y_RES};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("mesh_grid_new", |b| {
        b.iter(|| MeshGrid::new(DEFAULT_X_RES, DEFAULT_Y_RES).unwrap());
    });

    let mesh = MeshGrid::new(DEFAULT_X_RES, DEFAULT_Y_RES).unwrap();
    c.bench_function("mesh_grid_vertices", |b| {
        b.iter(|| mesh.vertices());
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
