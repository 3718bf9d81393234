use std::f64::consts::PI;
use std::fmt::{self, Display, Formatter};

use roots::SimpleConvergency;
use serde::{Deserialize, Serialize};

use crate::geometry::point::{distance, Point};
use crate::geometry::SMALL;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub c: Point,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Circle { c: Point { x, y }, r }
    }

    /// Circle whose area equals `size`, centered at `c`.
    pub fn from_size(c: Point, size: f64) -> Self {
        Circle { c, r: (size / PI).sqrt() }
    }

    pub fn area(&self) -> f64 {
        self.r * self.r * PI
    }

    /// Whether `p` lies inside this circle, within the classification tolerance.
    pub fn contains(&self, p: &Point) -> bool {
        distance(&self.c, p) < self.r + SMALL
    }
}

impl Display for Circle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "C({:.3}, {:.3}, {:.3})", self.c.x, self.c.y, self.r)
    }
}

/// Area of a circular segment of a circle of radius `r`, cut off by a chord
/// at depth `width` from the circle's edge.
pub fn circular_segment_area(r: f64, width: f64) -> f64 {
    let width = width.clamp(0., 2. * r);
    r * r * (1. - width / r).acos() - (r - width) * (width * (2. * r - width)).sqrt()
}

/// Closed-form lens area of two circles with radii `r1`, `r2` whose centers
/// are `d` apart.
pub fn circle_overlap(r1: f64, r2: f64, d: f64) -> f64 {
    // no overlap
    if d >= r1 + r2 {
        return 0.;
    }
    // one circle wholly inside the other
    if d <= (r1 - r2).abs() {
        let r = r1.min(r2);
        return r * r * PI;
    }
    let w1 = r1 - (d * d - r2 * r2 + r1 * r1) / (2. * d);
    let w2 = r2 - (d * d - r1 * r1 + r2 * r2) / (2. * d);
    circular_segment_area(r1, w1) + circular_segment_area(r2, w2)
}

/// Intersection points of two circle boundaries: two in the generic case,
/// one at tangency, none when separate, nested, or sharing a center
/// (coincident centers have no isolated boundary intersections, even for
/// identical circles).
pub fn circle_circle_intersection(a: &Circle, b: &Circle) -> Vec<Point> {
    let d = distance(&a.c, &b.c);
    let (r1, r2) = (a.r, b.r);
    if d < SMALL || d > r1 + r2 || d < (r1 - r2).abs() {
        return vec![];
    }

    let t = (r1 * r1 - r2 * r2 + d * d) / (2. * d);
    let h = (r1 * r1 - t * t).max(0.).sqrt();
    let base = a.c + (b.c - a.c) * (t / d);
    if h < SMALL {
        return vec![base];
    }
    let rx = -(b.c.y - a.c.y) * (h / d);
    let ry = -(b.c.x - a.c.x) * (h / d);
    vec![
        Point { x: base.x + rx, y: base.y - ry },
        Point { x: base.x - rx, y: base.y + ry },
    ]
}

/// Center distance `d ∈ [0, r1+r2]` at which `circle_overlap(r1, r2, d)`
/// equals `overlap`. The overlap is monotonically non-increasing in `d` on
/// that interval, so the root is unique.
pub fn distance_from_intersect_area(r1: f64, r2: f64, overlap: f64) -> f64 {
    let rmin = r1.min(r2);
    // overlap already at (or past) full containment of the smaller circle
    if rmin * rmin * PI <= overlap + SMALL {
        return (r1 - r2).abs();
    }
    let f = |d: f64| circle_overlap(r1, r2, d) - overlap;
    let mut convergency = SimpleConvergency { eps: 1e-10f64, max_iter: 100 };
    roots::find_root_brent(0f64, r1 + r2, &f, &mut convergency)
        .unwrap_or_else(|_| (r1 - r2).abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_coincident() {
        assert_relative_eq!(circle_overlap(2., 2., 0.), 4. * PI, epsilon = 1e-10);
    }

    #[test]
    fn overlap_disjoint() {
        assert_eq!(circle_overlap(1., 2., 3.), 0.);
        assert_eq!(circle_overlap(1., 2., 10.), 0.);
    }

    #[test]
    fn overlap_contained() {
        assert_relative_eq!(circle_overlap(1., 3., 1.), PI, epsilon = 1e-10);
    }

    #[test]
    fn overlap_half_lens() {
        // two unit circles at distance sqrt(2): overlap = π/2 - 1
        let expected = PI / 2. - 1.;
        assert_relative_eq!(circle_overlap(1., 1., 2f64.sqrt()), expected, epsilon = 1e-10);
    }

    #[test]
    fn intersection_two_points() {
        let a = Circle::new(0., 0., 1.);
        let b = Circle::new(1., 0., 1.);
        let points = circle_circle_intersection(&a, &b);
        assert_eq!(points.len(), 2);
        for p in &points {
            assert_relative_eq!(distance(&a.c, p), 1., epsilon = 1e-10);
            assert_relative_eq!(distance(&b.c, p), 1., epsilon = 1e-10);
        }
    }

    #[test]
    fn intersection_tangent() {
        let a = Circle::new(0., 0., 1.);
        let b = Circle::new(2., 0., 1.);
        let points = circle_circle_intersection(&a, &b);
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0], Point::new(1., 0.), epsilon = 1e-10);
    }

    #[test]
    fn intersection_degenerate() {
        let a = Circle::new(0., 0., 1.);
        assert!(circle_circle_intersection(&a, &a).is_empty());
        let b = Circle::new(0., 0., 2.);
        assert!(circle_circle_intersection(&a, &b).is_empty());
        let far = Circle::new(10., 0., 1.);
        assert!(circle_circle_intersection(&a, &far).is_empty());
        for p in circle_circle_intersection(&a, &Circle::new(1e-12, 0., 1.)) {
            assert!(p.x.is_finite() && p.y.is_finite());
        }
    }

    #[test]
    fn distance_inversion_round_trip() {
        for d in [0.1, 0.5, 1.0, 1.5, 1.9] {
            let overlap = circle_overlap(1., 1., d);
            assert_relative_eq!(distance_from_intersect_area(1., 1., overlap), d, epsilon = 1e-7);
        }
        let overlap = circle_overlap(2., 3., 2.5);
        assert_relative_eq!(distance_from_intersect_area(2., 3., overlap), 2.5, epsilon = 1e-7);
    }

    #[test]
    fn distance_inversion_containment_shortcut() {
        // requested overlap exceeds the smaller circle's area
        assert_relative_eq!(distance_from_intersect_area(1., 2., PI), 1.);
        assert_relative_eq!(distance_from_intersect_area(1., 2., 2. * PI), 1.);
    }

    #[test]
    fn distance_inversion_zero_overlap() {
        let d = distance_from_intersect_area(1., 1., 0.);
        assert_relative_eq!(circle_overlap(1., 1., d), 0., epsilon = 1e-8);
        assert!(d <= 2.);
    }
}
