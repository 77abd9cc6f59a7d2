//! Mapping between shape coordinates and pixel coordinates.

use crate::math::{Point2, Vector2};

/// Translates, then scales. Applied to pixel centres by [`Projection::unproject`]
/// to find the shape point a pixel samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub scale: Vector2,
    pub translate: Vector2,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            scale: Vector2::new(1.0, 1.0),
            translate: Vector2::zero(),
        }
    }
}

impl Projection {
    pub fn new(scale: Vector2, translate: Vector2) -> Self {
        Self { scale, translate }
    }

    /// Shape coordinates to pixel coordinates.
    pub fn project(&self, coord: Point2) -> Point2 {
        Point2::new(self.project_x(coord.x), self.project_y(coord.y))
    }

    /// Pixel coordinates to shape coordinates.
    pub fn unproject(&self, coord: Point2) -> Point2 {
        Point2::new(self.unproject_x(coord.x), self.unproject_y(coord.y))
    }

    pub fn project_vector(&self, vector: Vector2) -> Vector2 {
        Vector2::new(self.scale.x * vector.x, self.scale.y * vector.y)
    }

    pub fn unproject_vector(&self, vector: Vector2) -> Vector2 {
        Vector2::new(vector.x / self.scale.x, vector.y / self.scale.y)
    }

    pub fn project_x(&self, x: f32) -> f32 {
        self.scale.x * (x + self.translate.x)
    }

    pub fn project_y(&self, y: f32) -> f32 {
        self.scale.y * (y + self.translate.y)
    }

    pub fn unproject_x(&self, x: f32) -> f32 {
        x / self.scale.x - self.translate.x
    }

    pub fn unproject_y(&self, y: f32) -> f32 {
        y / self.scale.y - self.translate.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_then_unproject() {
        let projection = Projection::new(Vector2::new(4.0, 2.0), Vector2::new(1.0, -0.5));
        let p = Point2::new(0.5, 3.0);
        let projected = projection.project(p);
        assert_eq!(projected, Point2::new(6.0, 5.0));
        assert_eq!(projection.unproject(projected), p);

        let v = Vector2::new(1.0, 1.0);
        assert_eq!(projection.project_vector(v), Vector2::new(4.0, 2.0));
        assert_eq!(projection.unproject_vector(Vector2::new(4.0, 2.0)), v);
        assert_eq!(projection.unproject_x(6.0), 0.5);
        assert_eq!(projection.unproject_y(5.0), 3.0);
    }

    #[test]
    fn default_is_identity() {
        let p = Point2::new(-2.5, 7.0);
        assert_eq!(Projection::default().project(p), p);
        assert_eq!(Projection::default().unproject(p), p);
    }
}
