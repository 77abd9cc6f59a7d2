//! Renders an MSDF of a hand-drawn "A" and prints it as ASCII art.
//!
//! Run with `RUST_LOG=debug` to see the coloring and generation logs.

use lyon_path::math::{point, vector};
use lyon_path::Path;
use msdfgen::math::median;
use msdfgen::{generate, Bitmap, ColoringConfig, DistanceMode, GeneratorConfig, Projection, Shape};

const SDF_DIMENSION: usize = 32;
/// Width of the distance band around the outline, in shape units.
const RANGE: f32 = 4.0;

fn get_glyph() -> Result<Shape, msdfgen::Error> {
    let mut builder = Path::builder();
    // Outline
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(40.0, 100.0));
    builder.line_to(point(60.0, 100.0));
    builder.line_to(point(100.0, 0.0));
    builder.line_to(point(78.0, 0.0));
    builder.line_to(point(68.0, 28.0));
    builder.line_to(point(32.0, 28.0));
    builder.line_to(point(22.0, 0.0));
    builder.close();
    // Counter
    builder.begin(point(38.0, 46.0));
    builder.quadratic_bezier_to(point(50.0, 90.0), point(62.0, 46.0));
    builder.close();

    Shape::from_path_events(builder.build().iter())
}

/// Projection fitting the bounds of `shape`, plus a border of `RANGE`, into the bitmap.
fn fit(shape: &Shape) -> Projection {
    let bounds = shape.get_bounds(RANGE, 0.0, 0);
    let scale = SDF_DIMENSION as f32 / bounds.width().max(bounds.height());
    Projection::new(vector(scale, scale), vector(-bounds.left, -bounds.bottom))
}

fn main() -> Result<(), msdfgen::Error> {
    env_logger::init();

    let mut shape = get_glyph()?;
    shape.normalize();
    shape.orient_contours();
    // Print rows top to bottom
    shape.inverse_y_axis = true;
    let seed = ColoringConfig::default().apply(&mut shape);
    log::info!("colored {} edges, seed is now {}", shape.edge_count(), seed);

    let projection = fit(&shape);
    let mut bitmap = Bitmap::for_mode(SDF_DIMENSION, SDF_DIMENSION, DistanceMode::Multi);
    generate(
        &mut bitmap,
        &shape,
        &projection,
        DistanceMode::Multi,
        &GeneratorConfig::default(),
    )?;

    const SHADES: &[u8] = b" .:-=+*#%@";
    for y in 0..bitmap.height() {
        let line: String = (0..bitmap.width())
            .map(|x| {
                let px = bitmap.pixel(x, y);
                let d = (median(px[0], px[1], px[2]) / RANGE + 0.5).clamp(0.0, 1.0);
                SHADES[(d * (SHADES.len() - 1) as f32).round() as usize] as char
            })
            .collect();
        println!("{}", line);
    }
    Ok(())
}
