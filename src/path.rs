//! Conversion of lyon paths into shapes.

use lyon_path::PathEvent;

use crate::color::EdgeColor;
use crate::contour::Contour;
use crate::error::{Error, Result};
use crate::math::Point2;
use crate::segment::EdgeSegment;
use crate::shape::Shape;

/// This is a path collector which produces a [`Shape`] from a stream of
/// path events. Every edge starts out white; run an edge coloring before
/// generating a multi-channel field.
#[derive(Clone, Debug)]
pub struct PathCollector {
    /// The start point of the current contour, if one is open
    contour_start: Option<Point2>,
    /// The current pen location
    pen: Point2,
    /// in-flight edges
    edges: Vec<EdgeSegment>,
    /// Completed contours
    contours: Vec<Contour>,
}

impl Default for PathCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl PathCollector {
    pub fn new() -> Self {
        Self {
            contour_start: None,
            pen: Point2::origin(),
            edges: Vec::new(),
            contours: Vec::new(),
        }
    }

    /// Feeds one event. Segments must start where the previous one ended.
    pub fn event(&mut self, event: PathEvent) -> Result<()> {
        match event {
            PathEvent::Begin { at } => {
                self.close();
                self.contour_start = Some(at);
                self.pen = at;
            }
            PathEvent::Line { from, to } => {
                self.check_pen(from)?;
                self.push(EdgeSegment::line(from, to, EdgeColor::WHITE));
            }
            PathEvent::Quadratic { from, ctrl, to } => {
                self.check_pen(from)?;
                self.push(EdgeSegment::quadratic(from, ctrl, to, EdgeColor::WHITE));
            }
            PathEvent::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                self.check_pen(from)?;
                self.push(EdgeSegment::cubic(from, ctrl1, ctrl2, to, EdgeColor::WHITE));
            }
            PathEvent::End { .. } => {
                if self.contour_start.is_none() {
                    return Err(Error::UnexpectedPathEvent("end outside of a sub-path"));
                }
                self.close();
            }
        }
        Ok(())
    }

    fn check_pen(&self, from: Point2) -> Result<()> {
        if self.contour_start.is_none() {
            return Err(Error::UnexpectedPathEvent("segment outside of a sub-path"));
        }
        if from != self.pen {
            return Err(Error::PathDiscontinuity {
                x: from.x,
                y: from.y,
            });
        }
        Ok(())
    }

    fn push(&mut self, edge: EdgeSegment) {
        self.pen = edge.end();
        self.edges.push(edge);
    }

    /// Ends the open contour, joining its ends with a line if needed.
    /// Sub-paths without any segment are dropped.
    fn close(&mut self) {
        let start = match self.contour_start.take() {
            Some(start) => start,
            None => return,
        };
        if self.edges.is_empty() {
            return;
        }
        if self.pen != start {
            self.edges.push(EdgeSegment::line(self.pen, start, EdgeColor::WHITE));
        }
        self.pen = start;
        let edges = std::mem::take(&mut self.edges);
        self.contours.push(Contour::from_edges(edges));
    }

    pub fn build(mut self) -> Shape {
        self.close();
        Shape::from_contours(self.contours)
    }
}

impl Shape {
    /// Builds a shape from path events, such as those of
    /// [`lyon_path::Path::iter`]. Open sub-paths are closed.
    pub fn from_path_events<I>(events: I) -> Result<Shape>
    where
        I: IntoIterator<Item = PathEvent>,
    {
        let mut collector = PathCollector::new();
        for event in events {
            collector.event(event)?;
        }
        Ok(collector.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Segment;
    use lyon_path::math::point;
    use lyon_path::Path;

    #[test]
    fn closed_path() {
        let mut builder = Path::builder();
        builder.begin(point(0.0, 0.0));
        builder.line_to(point(0.0, 2.0));
        builder.quadratic_bezier_to(point(1.0, 3.0), point(2.0, 2.0));
        builder.line_to(point(2.0, 0.0));
        builder.close();
        let path = builder.build();

        let shape = Shape::from_path_events(path.iter()).unwrap();
        assert_eq!(shape.contours.len(), 1);
        let edges = &shape.contours[0].edges;
        assert_eq!(edges.len(), 4);
        assert!(matches!(edges[1].segment, Segment::Quadratic(_)));
        assert!(edges.iter().all(|e| e.color == EdgeColor::WHITE));
        assert!(shape.validate());
    }

    #[test]
    fn open_paths_are_closed() {
        let mut builder = Path::builder();
        builder.begin(point(0.0, 0.0));
        builder.line_to(point(1.0, 0.0));
        builder.cubic_bezier_to(point(2.0, 0.0), point(2.0, 1.0), point(1.0, 1.0));
        builder.end(false);
        builder.begin(point(5.0, 5.0));
        builder.line_to(point(6.0, 5.0));
        builder.line_to(point(6.0, 6.0));
        builder.end(true);
        let path = builder.build();

        let shape = Shape::from_path_events(path.iter()).unwrap();
        assert_eq!(shape.contours.len(), 2);
        assert_eq!(shape.contours[0].edges.len(), 3);
        assert_eq!(shape.contours[1].edges.len(), 3);
        assert!(shape.validate());
    }

    #[test]
    fn empty_sub_paths_are_dropped() {
        let mut collector = PathCollector::new();
        collector.event(PathEvent::Begin { at: point(1.0, 1.0) }).unwrap();
        collector
            .event(PathEvent::End {
                last: point(1.0, 1.0),
                first: point(1.0, 1.0),
                close: true,
            })
            .unwrap();
        assert!(collector.build().contours.is_empty());
    }

    #[test]
    fn discontinuities_are_rejected() {
        let mut collector = PathCollector::new();
        collector.event(PathEvent::Begin { at: point(0.0, 0.0) }).unwrap();
        let err = collector
            .event(PathEvent::Line {
                from: point(1.0, 1.0),
                to: point(2.0, 1.0),
            })
            .unwrap_err();
        assert_eq!(err, Error::PathDiscontinuity { x: 1.0, y: 1.0 });
    }

    #[test]
    fn segments_need_a_sub_path() {
        let mut collector = PathCollector::new();
        let err = collector
            .event(PathEvent::Line {
                from: point(0.0, 0.0),
                to: point(1.0, 0.0),
            })
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedPathEvent(_)));
        let err = collector
            .event(PathEvent::End {
                last: point(0.0, 0.0),
                first: point(0.0, 0.0),
                close: false,
            })
            .unwrap_err();
        assert!(matches!(err, Error::UnexpectedPathEvent(_)));
    }
}
