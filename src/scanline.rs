//! Crossings of a horizontal line with a shape, and inside/outside queries on them.

/// A fill rule tells us how to decide whether a point is "inside" given its winding number.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum FillRule {
    /// The point is "inside" if its winding number is non-zero.
    #[default]
    NonZero,
    /// The point is "inside" if its winding number is odd.
    EvenOdd,
    /// The point is "inside" if its winding number is positive.
    Positive,
    /// The point is "inside" if its winding number is negative.
    Negative,
}

impl FillRule {
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding & 1 == 1,
            FillRule::Positive => winding > 0,
            FillRule::Negative => winding < 0,
        }
    }
}

/// A crossing of the scanline by an edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    pub x: f32,
    /// Before preprocessing: +1 for an upward edge, -1 for a downward one.
    /// Afterwards: the winding number just right of `x`.
    pub direction: i32,
}

impl Intersection {
    pub fn new(x: f32, direction: i32) -> Self {
        Self { x, direction }
    }
}

/// The sorted crossings of one horizontal line.
#[derive(Clone, Debug, Default)]
pub struct Scanline {
    intersections: Vec<Intersection>,
    /// Index found by the last query, the starting point of the next one.
    last_index: usize,
}

impl Scanline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the crossings. They may be given in any order.
    pub fn set_intersections(&mut self, intersections: Vec<Intersection>) {
        self.intersections = intersections;
        self.preprocess();
    }

    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    fn preprocess(&mut self) {
        self.last_index = 0;
        self.intersections.sort_by(|a, b| a.x.total_cmp(&b.x));
        let mut total = 0;
        for intersection in &mut self.intersections {
            total += intersection.direction;
            intersection.direction = total;
        }
    }

    /// Index of the last crossing at or left of `x`. Queries with nearby `x`
    /// values are cheap since the search starts where the previous one ended.
    fn move_to(&mut self, x: f32) -> Option<usize> {
        if self.intersections.is_empty() {
            return None;
        }
        let mut index = self.last_index;
        if x < self.intersections[index].x {
            loop {
                if index == 0 {
                    self.last_index = 0;
                    return None;
                }
                index -= 1;
                if x >= self.intersections[index].x {
                    break;
                }
            }
        } else {
            while index + 1 < self.intersections.len() && x >= self.intersections[index + 1].x {
                index += 1;
            }
        }
        self.last_index = index;
        Some(index)
    }

    /// Number of crossings left of `x`.
    pub fn count_intersections(&mut self, x: f32) -> usize {
        self.move_to(x).map_or(0, |index| index + 1)
    }

    /// Winding number at `x`.
    pub fn sum_intersections(&mut self, x: f32) -> i32 {
        self.move_to(x)
            .map_or(0, |index| self.intersections[index].direction)
    }

    /// Whether `x` is inside the shape under `fill_rule`.
    pub fn filled(&mut self, x: f32, fill_rule: FillRule) -> bool {
        fill_rule.is_inside(self.sum_intersections(x))
    }

    /// Length of the part of `[x_from, x_to]` where `a` and `b` agree on
    /// being inside or outside.
    pub fn overlap(a: &Scanline, b: &Scanline, x_from: f32, x_to: f32, fill_rule: FillRule) -> f32 {
        let mut a_cursor = Cursor::new(a, x_to);
        let mut b_cursor = Cursor::new(b, x_to);

        while a_cursor.x < x_from || b_cursor.x < x_from {
            let x_next = a_cursor.x.min(b_cursor.x);
            let advanced = a_cursor.advance(x_next, fill_rule) | b_cursor.advance(x_next, fill_rule);
            if !advanced {
                break;
            }
        }

        let mut total = 0.0;
        let mut x = x_from;
        while a_cursor.x < x_to || b_cursor.x < x_to {
            let x_next = a_cursor.x.min(b_cursor.x);
            if a_cursor.inside == b_cursor.inside {
                total += x_next - x;
            }
            let advanced = a_cursor.advance(x_next, fill_rule) | b_cursor.advance(x_next, fill_rule);
            x = x_next;
            if !advanced {
                break;
            }
        }
        if a_cursor.inside == b_cursor.inside {
            total += x_to - x;
        }
        total
    }
}

/// Walks the crossings of one scanline in x order.
struct Cursor<'a> {
    intersections: &'a [Intersection],
    index: usize,
    /// Position of the next crossing, or the end of the range when exhausted.
    x: f32,
    inside: bool,
    end: f32,
}

impl<'a> Cursor<'a> {
    fn new(scanline: &'a Scanline, end: f32) -> Self {
        let intersections = scanline.intersections();
        Self {
            intersections,
            index: 0,
            x: intersections.first().map_or(end, |i| i.x),
            inside: false,
            end,
        }
    }

    /// Steps over the next crossing if it lies at `x_next`.
    fn advance(&mut self, x_next: f32, fill_rule: FillRule) -> bool {
        if self.x != x_next || self.index >= self.intersections.len() {
            return false;
        }
        self.inside = fill_rule.is_inside(self.intersections[self.index].direction);
        self.index += 1;
        self.x = self
            .intersections
            .get(self.index)
            .map_or(self.end, |i| i.x);
        true
    }
}
