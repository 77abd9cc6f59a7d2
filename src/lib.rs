//! msdfgen-rs is a library for generating "MSDFs"
//! It is heavily inspired by
//! [Viktor Chlumský's `msdfgen` utility](https://github.com/Chlumsky/msdfgen/).
//! We also provide generators for regular and pseudo SDFs, and for MTSDFs
//! which carry the true distance in a fourth channel.
//!
//! The usual pipeline builds a [`Shape`] (directly from edges, or from lyon
//! path events), normalizes it, colors its edges and renders it into a
//! [`Bitmap`]:
//!
//! ```
//! use lyon_path::{math::point, Path};
//! use msdfgen::{generate, Bitmap, ColoringConfig, DistanceMode, GeneratorConfig, Projection, Shape};
//!
//! let mut builder = Path::builder();
//! builder.begin(point(1.0, 1.0));
//! builder.line_to(point(1.0, 7.0));
//! builder.line_to(point(7.0, 7.0));
//! builder.line_to(point(7.0, 1.0));
//! builder.close();
//! let path = builder.build();
//!
//! let mut shape = Shape::from_path_events(path.iter())?;
//! shape.normalize();
//! ColoringConfig::default().apply(&mut shape);
//!
//! let mut bitmap = Bitmap::for_mode(8, 8, DistanceMode::Multi);
//! generate(
//!     &mut bitmap,
//!     &shape,
//!     &Projection::default(),
//!     DistanceMode::Multi,
//!     &GeneratorConfig::default(),
//! )?;
//! # Ok::<(), msdfgen::Error>(())
//! ```

pub mod bitmap;
pub mod color;
pub mod coloring;
pub mod combiner;
pub mod contour;
pub mod equation;
pub mod error;
pub mod finder;
pub mod math;
pub mod path;
pub mod projection;
pub mod scanline;
pub mod segment;
pub mod selector;
pub mod shape;
mod utils;

use log::{debug, warn};

use self::combiner::{ContourCombiner, OverlappingContourCombiner, SimpleContourCombiner};
use self::math::Point2;
use self::selector::{
    DistanceValue, EdgeSelector, MultiAndTrueDistanceSelector, MultiDistance, MultiDistanceSelector,
    PseudoDistanceSelector, TrueDistanceSelector,
};

pub use self::bitmap::{Bitmap, DistanceMapping, DistanceMode};
pub use self::color::EdgeColor;
pub use self::coloring::{edge_coloring_simple, ColoringConfig};
pub use self::contour::Contour;
pub use self::error::{Error, Result};
pub use self::finder::ShapeDistanceFinder;
pub use self::path::PathCollector;
pub use self::projection::Projection;
pub use self::scanline::{FillRule, Scanline};
pub use self::segment::{EdgeSegment, Segment};
pub use self::shape::Shape;
pub use self::utils::{Bound, SignedDistance};

/// Options shared by the generators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Resolve contours separately so overlapping ones don't leave seams.
    /// Costs one selector per contour.
    pub overlap_support: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            overlap_support: true,
        }
    }
}

fn check_channels(output: &Bitmap, expected: usize) -> Result<()> {
    if output.channels() != expected {
        return Err(Error::ChannelMismatch {
            expected,
            actual: output.channels(),
        });
    }
    Ok(())
}

/// Fills `output` with the distance field of `shape`, as measured by the
/// selector of `C`. Pixel (x, y) samples the shape at the unprojected
/// centre (x + 0.5, y + 0.5).
pub fn generate_distance_field<C: ContourCombiner>(
    output: &mut Bitmap,
    shape: &Shape,
    projection: &Projection,
) -> Result<()> {
    check_channels(
        output,
        <<C::Selector as EdgeSelector>::Distance as DistanceValue>::CHANNELS,
    )?;

    let mut finder = ShapeDistanceFinder::<C>::new(shape);
    let (width, height) = (output.width(), output.height());
    // Alternate the row direction so consecutive queries stay close together
    let mut right_to_left = false;

    for y in 0..height {
        let row = if shape.inverse_y_axis { height - y - 1 } else { y };
        for col in 0..width {
            let x = if right_to_left { width - col - 1 } else { col };
            let p = projection.unproject(Point2::new(x as f32 + 0.5, y as f32 + 0.5));
            finder.distance(p).write_to(output.pixel_mut(x, row));
        }
        right_to_left = !right_to_left;
    }
    Ok(())
}

fn generate_with<S: EdgeSelector>(
    output: &mut Bitmap,
    shape: &Shape,
    projection: &Projection,
    overlap_support: bool,
) -> Result<()> {
    if overlap_support {
        generate_distance_field::<OverlappingContourCombiner<S>>(output, shape, projection)
    } else {
        generate_distance_field::<SimpleContourCombiner<S>>(output, shape, projection)
    }
}

/// Generates a conventional single-channel signed distance field.
pub fn generate_sdf(output: &mut Bitmap, shape: &Shape, projection: &Projection, overlap_support: bool) -> Result<()> {
    generate_with::<TrueDistanceSelector>(output, shape, projection, overlap_support)
}

/// Generates a single-channel field of signed pseudo-distances.
pub fn generate_pseudo_sdf(
    output: &mut Bitmap,
    shape: &Shape,
    projection: &Projection,
    overlap_support: bool,
) -> Result<()> {
    generate_with::<PseudoDistanceSelector>(output, shape, projection, overlap_support)
}

/// Generates a multi-channel signed distance field. The edges of `shape`
/// should be colored first.
pub fn generate_msdf(output: &mut Bitmap, shape: &Shape, projection: &Projection, overlap_support: bool) -> Result<()> {
    generate_with::<MultiDistanceSelector>(output, shape, projection, overlap_support)
}

/// Generates a multi-channel field with the true distance in the fourth channel.
pub fn generate_mtsdf(
    output: &mut Bitmap,
    shape: &Shape,
    projection: &Projection,
    overlap_support: bool,
) -> Result<()> {
    generate_with::<MultiAndTrueDistanceSelector>(output, shape, projection, overlap_support)
}

/// Generates the field selected by `mode`.
pub fn generate(
    output: &mut Bitmap,
    shape: &Shape,
    projection: &Projection,
    mode: DistanceMode,
    config: &GeneratorConfig,
) -> Result<()> {
    check_channels(output, mode.channels())?;
    if !shape.validate() {
        warn!("generating a distance field for a shape with open contours");
    }
    debug!(
        "generating {:?} field of {}x{} from {} contours, {} edges",
        mode,
        output.width(),
        output.height(),
        shape.contours.len(),
        shape.edge_count()
    );

    let overlap_support = config.overlap_support;
    match mode {
        DistanceMode::True => generate_sdf(output, shape, projection, overlap_support),
        DistanceMode::Pseudo => generate_pseudo_sdf(output, shape, projection, overlap_support),
        DistanceMode::Multi => generate_msdf(output, shape, projection, overlap_support),
        DistanceMode::MultiAndTrue => generate_mtsdf(output, shape, projection, overlap_support),
    }
}

/// Computes an SDF by checking every edge at every pixel, without edge
/// caches or contour combining.
pub fn generate_sdf_legacy(output: &mut Bitmap, shape: &Shape, projection: &Projection) -> Result<()> {
    check_channels(output, 1)?;
    let (width, height) = (output.width(), output.height());

    for y in 0..height {
        let row = if shape.inverse_y_axis { height - y - 1 } else { y };
        for x in 0..width {
            let p = projection.unproject(Point2::new(x as f32 + 0.5, y as f32 + 0.5));
            let mut min_distance = SignedDistance::default();
            for edge in shape.contours.iter().flat_map(|c| &c.edges) {
                let (distance, _) = edge.signed_distance(p);
                if distance < min_distance {
                    min_distance = distance;
                }
            }
            min_distance.distance.write_to(output.pixel_mut(x, row));
        }
    }
    Ok(())
}

/// Computes an MSDF by checking every edge at every pixel: each channel
/// takes the pseudo-distance of the nearest edge carrying it.
pub fn generate_msdf_legacy(output: &mut Bitmap, shape: &Shape, projection: &Projection) -> Result<()> {
    #[derive(Clone, Copy)]
    struct Nearest<'a> {
        distance: SignedDistance,
        edge: Option<&'a EdgeSegment>,
        param: f32,
    }

    check_channels(output, 3)?;
    let (width, height) = (output.width(), output.height());

    for y in 0..height {
        let row = if shape.inverse_y_axis { height - y - 1 } else { y };
        for x in 0..width {
            let p = projection.unproject(Point2::new(x as f32 + 0.5, y as f32 + 0.5));
            let mut channels = [Nearest {
                distance: SignedDistance::default(),
                edge: None,
                param: 0.0,
            }; 3];

            for edge in shape.contours.iter().flat_map(|c| &c.edges) {
                let (distance, param) = edge.signed_distance(p);
                for (i, nearest) in channels.iter_mut().enumerate() {
                    if edge.color.has_channel(i) && distance < nearest.distance {
                        *nearest = Nearest {
                            distance,
                            edge: Some(edge),
                            param,
                        };
                    }
                }
            }

            let [r, g, b] = channels.map(|mut nearest| {
                if let Some(edge) = nearest.edge {
                    edge.distance_to_pseudo_distance(&mut nearest.distance, p, nearest.param);
                }
                nearest.distance.distance
            });
            MultiDistance { r, g, b }.write_to(output.pixel_mut(x, row));
        }
    }
    Ok(())
}
