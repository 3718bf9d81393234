//! Max-margin label anchors for overlap regions.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::geometry::circle::Circle;
use crate::geometry::intersection::intersection_stats;
use crate::geometry::point::{center, distance, Point};
use crate::geometry::SMALL;
use crate::layout::area::Area;
use crate::layout::CircleRecord;
use crate::optimization::nelder_mead::{nelder_mead, NelderMeadParams};

/// Label anchor for one area. `disjoint` marks a region with no joint
/// intersection; its point is an off-canvas sentinel and the area is not
/// visually representable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextCentre {
    pub point: Point,
    pub disjoint: bool,
}

impl TextCentre {
    fn at(point: Point) -> Self {
        TextCentre { point, disjoint: false }
    }
}

/// Signed clearance of `p`: distance inside the nearest interior boundary,
/// capped by the distance outside the nearest exterior boundary.
fn circle_margin(p: &Point, interior: &[Circle], exterior: &[Circle]) -> f64 {
    let mut margin = f64::INFINITY;
    for circle in interior {
        margin = margin.min(circle.r - distance(&circle.c, p));
    }
    for circle in exterior {
        margin = margin.min(distance(&circle.c, p) - circle.r);
    }
    margin
}

/// For each circle, the ids of circles fully containing it. Containment
/// rather than mere overlap: a containing circle never excludes a label from
/// the region, so it must not count as exterior either.
fn containing_circles(circles: &CircleRecord) -> BTreeMap<&str, Vec<&str>> {
    let mut containers: BTreeMap<&str, Vec<&str>> =
        circles.keys().map(|id| (id.as_str(), Vec::new())).collect();
    for ((a_id, a), (b_id, b)) in circles.iter().tuple_combinations() {
        let d = distance(&a.c, &b.c);
        if d + b.r <= a.r + SMALL {
            containers.entry(b_id.as_str()).or_default().push(a_id.as_str());
        } else if d + a.r <= b.r + SMALL {
            containers.entry(a_id.as_str()).or_default().push(b_id.as_str());
        }
    }
    containers
}

/// Max-margin point inside every `interior` circle and outside every
/// `exterior` circle: seeded from interior centers and half-radius offsets,
/// refined by simplex search, with a chain of degenerate-case fallbacks.
pub fn compute_text_centre(interior: &[Circle], exterior: &[Circle]) -> TextCentre {
    let mut seeds = Vec::with_capacity(interior.len() * 5);
    for circle in interior {
        let Circle { c, r } = *circle;
        seeds.push(c);
        seeds.push(Point { x: c.x + r / 2., y: c.y });
        seeds.push(Point { x: c.x - r / 2., y: c.y });
        seeds.push(Point { x: c.x, y: c.y + r / 2. });
        seeds.push(Point { x: c.x, y: c.y - r / 2. });
    }
    let Some(initial) = seeds
        .iter()
        .max_by(|a, b| {
            circle_margin(a, interior, exterior).total_cmp(&circle_margin(b, interior, exterior))
        })
        .copied()
    else {
        return TextCentre { point: Point { x: 0., y: -1000. }, disjoint: true };
    };

    let refined = nelder_mead(
        |p| -circle_margin(&Point { x: p[0], y: p[1] }, interior, exterior),
        &[initial.x, initial.y],
        &NelderMeadParams { max_iterations: 500, min_error_delta: 1e-10, ..Default::default() },
    );
    let candidate = Point { x: refined.x[0], y: refined.x[1] };

    let valid = interior.iter().all(|c| distance(&candidate, &c.c) <= c.r)
        && exterior.iter().all(|c| distance(&candidate, &c.c) >= c.r);
    if valid {
        return TextCentre::at(candidate);
    }

    if interior.len() == 1 {
        return TextCentre::at(interior[0].c);
    }
    let stats = intersection_stats(interior);
    if stats.arcs.is_empty() {
        // no joint intersection: flag rather than guess
        TextCentre { point: Point { x: 0., y: -1000. }, disjoint: true }
    } else if stats.arcs.len() == 1 {
        TextCentre::at(stats.arcs[0].circle.c)
    } else if !exterior.is_empty() {
        // the exterior constraints made the margin infeasible; retry without
        compute_text_centre(interior, &[])
    } else {
        TextCentre::at(center(&stats.arcs.iter().map(|a| a.p1).collect::<Vec<_>>()))
    }
}

/// Anchors for every requested area against the finalized circle set. Keys
/// join the area's set ids with `delimiter`.
pub fn compute_text_centres(
    circles: &CircleRecord,
    areas: &[Area],
    delimiter: &str,
) -> BTreeMap<String, TextCentre> {
    let containers = containing_circles(circles);
    let mut centres = BTreeMap::new();
    for area in areas {
        let members: BTreeSet<&str> = area.sets.iter().map(|s| s.as_str()).collect();
        let mut excluded: BTreeSet<&str> = BTreeSet::new();
        for set in &members {
            if let Some(containing) = containers.get(set) {
                excluded.extend(containing);
            }
        }

        let mut interior = Vec::new();
        let mut exterior = Vec::new();
        for (id, circle) in circles {
            if members.contains(id.as_str()) {
                interior.push(*circle);
            } else if !excluded.contains(id.as_str()) {
                exterior.push(*circle);
            }
        }

        let centre = compute_text_centre(&interior, &exterior);
        if centre.disjoint && area.size > 0. {
            warn!("area {:?} cannot be represented on screen", area.sets);
        }
        centres.insert(area.sets.join(delimiter), centre);
    }
    centres
}
