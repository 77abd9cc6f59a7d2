use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lyon_path::math::{point, Point};
use lyon_path::Path;
use msdfgen::{
    generate_msdf, generate_msdf_legacy, generate_sdf, Bitmap, ColoringConfig, DistanceMode, Projection, Shape,
};

const KAPPA: f32 = 0.552_284_8;

fn add_circle(builder: &mut lyon_path::path::Builder, center: Point, r: f32) {
    let k = KAPPA * r;
    let (cx, cy) = (center.x, center.y);
    builder.begin(point(cx + r, cy));
    builder.cubic_bezier_to(point(cx + r, cy + k), point(cx + k, cy + r), point(cx, cy + r));
    builder.cubic_bezier_to(point(cx - k, cy + r), point(cx - r, cy + k), point(cx - r, cy));
    builder.cubic_bezier_to(point(cx - r, cy - k), point(cx - k, cy - r), point(cx, cy - r));
    builder.cubic_bezier_to(point(cx + k, cy - r), point(cx + r, cy - k), point(cx + r, cy));
    builder.close();
}

/// A ring overlapped by a star, so there are corners, curves and overlaps.
fn shape() -> Shape {
    let mut builder = Path::builder();
    add_circle(&mut builder, point(32.0, 32.0), 28.0);
    add_circle(&mut builder, point(32.0, 32.0), 16.0);
    builder.begin(point(32.0, 2.0));
    for i in 1..10 {
        let angle = i as f32 * std::f32::consts::PI / 5.0;
        let r = if i % 2 == 0 { 30.0 } else { 12.0 };
        builder.line_to(point(32.0 + r * angle.sin(), 32.0 - r * angle.cos()));
    }
    builder.close();

    let mut shape = Shape::from_path_events(builder.build().iter()).unwrap();
    shape.normalize();
    shape.orient_contours();
    ColoringConfig::default().apply(&mut shape);
    shape
}

fn fields(c: &mut Criterion) {
    let shape = shape();
    let projection = Projection::default();

    c.bench_function("sdf 64x64", |b| {
        let mut bitmap = Bitmap::for_mode(64, 64, DistanceMode::True);
        b.iter(|| generate_sdf(&mut bitmap, black_box(&shape), &projection, true))
    });
    c.bench_function("msdf 64x64", |b| {
        let mut bitmap = Bitmap::for_mode(64, 64, DistanceMode::Multi);
        b.iter(|| generate_msdf(&mut bitmap, black_box(&shape), &projection, true))
    });
    c.bench_function("msdf 64x64 without overlap support", |b| {
        let mut bitmap = Bitmap::for_mode(64, 64, DistanceMode::Multi);
        b.iter(|| generate_msdf(&mut bitmap, black_box(&shape), &projection, false))
    });
    c.bench_function("legacy msdf 64x64", |b| {
        let mut bitmap = Bitmap::for_mode(64, 64, DistanceMode::Multi);
        b.iter(|| generate_msdf_legacy(&mut bitmap, black_box(&shape), &projection))
    });
}

fn coloring(c: &mut Criterion) {
    let shape = shape();
    c.bench_function("edge coloring", |b| {
        b.iter(|| {
            let mut shape = shape.clone();
            black_box(ColoringConfig::default().apply(&mut shape))
        })
    });
}

criterion_group!(benches, fields, coloring);
criterion_main!(benches);
