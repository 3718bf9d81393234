//! Disjoint-cluster detection, per-cluster orientation, and grid packing.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::geometry::circle::Circle;
use crate::geometry::point::{distance, Point};
use crate::geometry::SMALL;
use crate::layout::CircleRecord;

/// A circle tagged with the set it represents; the working form inside
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledCircle {
    pub set: String,
    pub circle: Circle,
}

/// Comparator used to pick which circles anchor a cluster's orientation.
pub type CircleOrder = fn(&LabeledCircle, &LabeledCircle) -> Ordering;

/// Union-find over indices into a flat circle slice. The parent array lives
/// here, not on the circles.
struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        UnionFind { parent: (0..n).collect() }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // path compression
        let mut i = i;
        while self.parent[i] != root {
            let next = self.parent[i];
            self.parent[i] = root;
            i = next;
        }
        root
    }

    fn union(&mut self, x: usize, y: usize) {
        let x_root = self.find(x);
        let y_root = self.find(y);
        self.parent[x_root] = y_root;
    }
}

/// Groups circles into maximal overlap-connected clusters.
pub fn disjoint_clusters(circles: Vec<LabeledCircle>) -> Vec<Vec<LabeledCircle>> {
    let mut union_find = UnionFind::new(circles.len());
    for ((i, a), (j, b)) in circles.iter().enumerate().tuple_combinations() {
        let max_distance = a.circle.r + b.circle.r;
        if distance(&a.circle.c, &b.circle.c) + SMALL < max_distance {
            union_find.union(j, i);
        }
    }

    let mut clusters: BTreeMap<usize, Vec<LabeledCircle>> = BTreeMap::new();
    for (i, labeled) in circles.into_iter().enumerate() {
        clusters.entry(union_find.find(i)).or_default().push(labeled);
    }
    clusters.into_values().collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

fn bounding_box(circles: &[LabeledCircle]) -> Bounds {
    let mut bounds = Bounds {
        x_min: f64::INFINITY,
        x_max: f64::NEG_INFINITY,
        y_min: f64::INFINITY,
        y_max: f64::NEG_INFINITY,
    };
    for labeled in circles {
        let Circle { c, r } = labeled.circle;
        bounds.x_min = bounds.x_min.min(c.x - r);
        bounds.x_max = bounds.x_max.max(c.x + r);
        bounds.y_min = bounds.y_min.min(c.y - r);
        bounds.y_max = bounds.y_max.max(c.y + r);
    }
    bounds
}

/// Canonicalizes one cluster in place: largest circle at the origin, second
/// largest at `orientation` from it, third-largest side of the largest pair
/// mirrored to a fixed chirality. Angles follow the bearing convention
/// (`atan2(x, y)`, clockwise from +y).
pub fn orientate_circles(circles: &mut [LabeledCircle], orientation: f64, order: Option<CircleOrder>) {
    match order {
        None => circles.sort_by(|a, b| b.circle.r.total_cmp(&a.circle.r)),
        Some(compare) => circles.sort_by(|a, b| compare(a, b)),
    }

    let Some(largest) = circles.first().map(|l| l.circle) else {
        return;
    };
    for labeled in circles.iter_mut() {
        labeled.circle.c = labeled.circle.c - largest.c;
    }

    if circles.len() == 2 {
        // a near-subset pair renders concentric; nudge the smaller one off to
        // the side so it stays visible
        let d = distance(&circles[0].circle.c, &circles[1].circle.c);
        if d < (circles[1].circle.r - circles[0].circle.r).abs() {
            circles[1].circle.c = Point {
                x: circles[0].circle.c.x + circles[0].circle.r - circles[1].circle.r - SMALL,
                y: circles[0].circle.c.y,
            };
        }
    }

    if circles.len() > 1 {
        let second = circles[1].circle.c;
        let rotation = second.x.atan2(second.y) - orientation;
        let (sin, cos) = rotation.sin_cos();
        for labeled in circles.iter_mut() {
            let Point { x, y } = labeled.circle.c;
            labeled.circle.c = Point { x: cos * x - sin * y, y: sin * x + cos * y };
        }
    }

    if circles.len() > 2 {
        let third = circles[2].circle.c;
        let mut angle = third.x.atan2(third.y) - orientation;
        while angle < 0. {
            angle += 2. * std::f64::consts::PI;
        }
        while angle > 2. * std::f64::consts::PI {
            angle -= 2. * std::f64::consts::PI;
        }
        if angle > std::f64::consts::PI {
            // reflect across the line through the two largest circles
            let slope = circles[1].circle.c.y / (SMALL + circles[1].circle.c.x);
            for labeled in circles.iter_mut() {
                let Point { x, y } = labeled.circle.c;
                let d = (x + slope * y) / (1. + slope * slope);
                labeled.circle.c = Point { x: 2. * d - x, y: 2. * d * slope - y };
            }
        }
    }
}

fn pack_cluster(
    out: &mut Vec<LabeledCircle>,
    mut cluster: Vec<LabeledCircle>,
    cluster_bounds: Bounds,
    packed_bounds: &Bounds,
    right: bool,
    bottom: bool,
    spacing: f64,
) {
    let x_offset = if right {
        packed_bounds.x_max - cluster_bounds.x_min + spacing
    } else {
        let mut offset = packed_bounds.x_max - cluster_bounds.x_max;
        let centering = cluster_bounds.width() / 2. - packed_bounds.width() / 2.;
        if centering < 0. {
            offset += centering;
        }
        offset
    };
    let y_offset = if bottom {
        packed_bounds.y_max - cluster_bounds.y_min + spacing
    } else {
        let mut offset = packed_bounds.y_max - cluster_bounds.y_max;
        let centering = cluster_bounds.height() / 2. - packed_bounds.height() / 2.;
        if centering < 0. {
            offset += centering;
        }
        offset
    };

    for mut labeled in cluster.drain(..) {
        labeled.circle.c = labeled.circle.c + Point { x: x_offset, y: y_offset };
        out.push(labeled);
    }
}

/// Orientates every disjoint cluster and packs them into a grid (up to three
/// per row: right, below, diagonal of the current bounding box). Largest
/// cluster first, by bounding-box area. Deep-copies the input.
pub fn normalize_solution(
    solution: &CircleRecord,
    orientation: f64,
    orientation_order: Option<CircleOrder>,
) -> CircleRecord {
    let circles: Vec<LabeledCircle> = solution
        .iter()
        .map(|(set, circle)| LabeledCircle { set: set.clone(), circle: *circle })
        .collect();

    let mut clusters: Vec<(Vec<LabeledCircle>, Bounds)> = disjoint_clusters(circles)
        .into_iter()
        .map(|mut cluster| {
            orientate_circles(&mut cluster, orientation, orientation_order);
            let bounds = bounding_box(&cluster);
            (cluster, bounds)
        })
        .collect();
    clusters.sort_by(|a, b| b.1.area().total_cmp(&a.1.area()));

    let mut clusters = clusters.into_iter();
    let Some((mut packed, mut packed_bounds)) = clusters.next() else {
        return BTreeMap::new();
    };
    let spacing = packed_bounds.width() / 50.;

    let mut clusters = clusters.peekable();
    while clusters.peek().is_some() {
        for (right, bottom) in [(true, false), (false, true), (true, true)] {
            let Some((cluster, bounds)) = clusters.next() else {
                break;
            };
            pack_cluster(&mut packed, cluster, bounds, &packed_bounds, right, bottom, spacing);
        }
        packed_bounds = bounding_box(&packed);
    }

    packed.into_iter().map(|l| (l.set, l.circle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn labeled(set: &str, x: f64, y: f64, r: f64) -> LabeledCircle {
        LabeledCircle { set: set.to_string(), circle: Circle::new(x, y, r) }
    }

    #[test]
    fn two_groups_detected() {
        let circles = vec![
            labeled("A", 0., 0., 1.),
            labeled("B", 1., 0., 1.),
            labeled("C", 100., 0., 1.),
        ];
        let clusters = disjoint_clusters(circles);
        assert_eq!(clusters.len(), 2);
        let mut sizes: Vec<usize> = clusters.iter().map(|c| c.len()).collect();
        sizes.sort();
        assert_eq!(sizes, vec![1, 2]);
    }

    #[test]
    fn tangent_circles_are_disjoint() {
        let circles = vec![labeled("A", 0., 0., 1.), labeled("B", 2., 0., 1.)];
        assert_eq!(disjoint_clusters(circles).len(), 2);
    }

    #[test]
    fn orientation_puts_largest_at_origin() {
        let mut circles = vec![labeled("A", 5., 5., 2.), labeled("B", 7., 5., 1.)];
        orientate_circles(&mut circles, FRAC_PI_2, None);
        assert_relative_eq!(circles[0].circle.c, Point::default(), epsilon = 1e-10);
        // second largest due "east" (orientation π/2 in bearing convention)
        assert_relative_eq!(circles[1].circle.c.x, 2., epsilon = 1e-10);
        assert_relative_eq!(circles[1].circle.c.y, 0., epsilon = 1e-10);
    }

    #[test]
    fn near_subset_pair_offset_sideways() {
        let mut circles = vec![labeled("A", 0., 0., 3.), labeled("B", 0.01, 0., 1.)];
        orientate_circles(&mut circles, FRAC_PI_2, None);
        let d = distance(&circles[0].circle.c, &circles[1].circle.c);
        assert_relative_eq!(d, 3. - 1. - SMALL, epsilon = 1e-9);
    }

    #[test]
    fn chirality_mirrors_third_circle() {
        for y in [1.5, -1.5] {
            let mut circles = vec![
                labeled("A", 0., 0., 1.2),
                labeled("B", 1.5, 0., 1.1),
                labeled("C", 0.75, y, 1.),
            ];
            orientate_circles(&mut circles, FRAC_PI_2, None);
            // the third circle always ends up on the same side
            assert!(circles[2].circle.c.y < 0.);
        }
    }

    #[test]
    fn packing_keeps_clusters_disjoint() {
        let solution: CircleRecord = [
            ("A".to_string(), Circle::new(0., 0., 2.)),
            ("B".to_string(), Circle::new(1., 0., 2.)),
            ("C".to_string(), Circle::new(500., 500., 1.)),
            ("D".to_string(), Circle::new(-500., -500., 1.5)),
        ]
        .into_iter()
        .collect();
        let normalized = normalize_solution(&solution, FRAC_PI_2, None);
        assert_eq!(normalized.len(), 4);

        // C and D stay clear of everything else
        for lone in ["C", "D"] {
            for other in ["A", "B", "C", "D"] {
                if other == lone {
                    continue;
                }
                let (a, b) = (&normalized[lone], &normalized[other]);
                assert!(distance(&a.c, &b.c) + SMALL >= a.r + b.r);
            }
        }
    }

    #[test]
    fn custom_order_controls_anchor() {
        let by_set_name: CircleOrder = |a, b| a.set.cmp(&b.set);
        let mut circles = vec![labeled("Z", 4., 0., 5.), labeled("A", 0., 0., 1.)];
        orientate_circles(&mut circles, FRAC_PI_2, Some(by_set_name));
        assert_eq!(circles[0].set, "A");
        assert_relative_eq!(circles[0].circle.c, Point::default(), epsilon = 1e-10);
    }
}
