use std::f64::consts::PI;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::geometry::circle::{circle_circle_intersection, circular_segment_area, Circle};
use crate::geometry::point::{center, distance, Point};
use crate::geometry::SMALL;

/// One circular arc on the boundary of a multi-circle intersection region,
/// running from `p1` to `p2` along `circle`'s circumference. `width` is the
/// depth of the chord below the arc's midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub circle: Circle,
    pub p1: Point,
    pub p2: Point,
    pub width: f64,
}

/// Area and boundary description of the mutual intersection of N circles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntersectionStats {
    pub area: f64,
    pub arc_area: f64,
    pub polygon_area: f64,
    /// Boundary arcs in angular order; empty when the circles have no joint
    /// intersection, a single synthetic full-circle arc when one circle is
    /// contained in all the others.
    pub arcs: Vec<Arc>,
    /// Pairwise intersection points lying inside every circle.
    pub inner_points: Vec<Point>,
}

struct InnerPoint {
    point: Point,
    // indices of the two circles whose boundaries cross here
    parents: [usize; 2],
    angle: f64,
}

/// Area of the mutual intersection of all `circles`.
pub fn intersection_area(circles: &[Circle]) -> f64 {
    intersection_stats(circles).area
}

/// Computes the joint intersection of `circles`, walking the surviving
/// boundary arcs in clockwise order. The region area is the shoelace area of
/// the inner-point polygon plus one circular segment per boundary arc.
pub fn intersection_stats(circles: &[Circle]) -> IntersectionStats {
    let mut inner: Vec<InnerPoint> = circles
        .iter()
        .enumerate()
        .tuple_combinations()
        .flat_map(|((i, a), (j, b))| {
            circle_circle_intersection(a, b)
                .into_iter()
                .map(move |point| InnerPoint { point, parents: [i, j], angle: 0. })
        })
        .filter(|ip| circles.iter().all(|c| c.contains(&ip.point)))
        .collect();

    let mut arc_area = 0.;
    let mut polygon_area = 0.;
    let mut arcs = Vec::new();

    if inner.len() > 1 {
        // sort points clockwise around their centroid
        let c = center(&inner.iter().map(|ip| ip.point).collect::<Vec<_>>());
        for ip in inner.iter_mut() {
            ip.angle = (ip.point.x - c.x).atan2(ip.point.y - c.y);
        }
        inner.sort_by(|a, b| b.angle.total_cmp(&a.angle));

        let mut p2 = inner.len() - 1;
        for p1 in 0..inner.len() {
            let (a, b) = (&inner[p1], &inner[p2]);
            polygon_area += (b.point.x + a.point.x) * (a.point.y - b.point.y);

            let mid = (a.point + b.point) / 2.;
            let mut arc: Option<Arc> = None;
            for &parent in &a.parents {
                if !b.parents.contains(&parent) {
                    continue;
                }
                // bearing halfway along the arc from b to a on this circle
                let circle = circles[parent];
                let a1 = (a.point.x - circle.c.x).atan2(a.point.y - circle.c.y);
                let a2 = (b.point.x - circle.c.x).atan2(b.point.y - circle.c.y);
                let mut angle_diff = a2 - a1;
                if angle_diff < 0. {
                    angle_diff += 2. * PI;
                }
                let theta = a2 - angle_diff / 2.;
                let arc_mid = Point {
                    x: circle.c.x + circle.r * theta.sin(),
                    y: circle.c.y + circle.r * theta.cos(),
                };
                // clamp against FP overflow past the diameter
                let width = distance(&mid, &arc_mid).min(circle.r * 2.);
                if arc.map_or(true, |best| best.width > width) {
                    arc = Some(Arc { circle, p1: a.point, p2: b.point, width });
                }
            }
            if let Some(arc) = arc {
                arc_area += circular_segment_area(arc.circle.r, arc.width);
                arcs.push(arc);
                p2 = p1;
            }
        }
    } else if let Some(smallest) = circles.iter().min_by(|a, b| a.r.total_cmp(&b.r)) {
        // no boundary crossings: either fully disjoint, or the smallest
        // circle is contained in all the others
        let disjoint = circles
            .iter()
            .any(|c| distance(&c.c, &smallest.c) > (smallest.r - c.r).abs());
        if !disjoint {
            arc_area = smallest.r * smallest.r * PI;
            arcs.push(Arc {
                circle: *smallest,
                p1: Point { x: smallest.c.x, y: smallest.c.y + smallest.r },
                p2: Point { x: smallest.c.x - SMALL, y: smallest.c.y + smallest.r },
                width: smallest.r * 2.,
            });
        }
    }

    polygon_area /= 2.;
    IntersectionStats {
        area: arc_area + polygon_area,
        arc_area,
        polygon_area,
        arcs,
        inner_points: inner.into_iter().map(|ip| ip.point).collect(),
    }
}
