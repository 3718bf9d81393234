use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use ordered_float::OrderedFloat;

use crate::error::LayoutError;
use crate::geometry::circle::{circle_circle_intersection, distance_from_intersect_area, Circle};
use crate::geometry::point::Point;
use crate::geometry::SMALL;
use crate::layout::area::Area;
use crate::layout::loss::loss;
use crate::layout::CircleRecord;

// far off-canvas; keeps unpositioned circles out of every overlap
const UNPLACED: f64 = 1e10;

struct Overlap {
    set: String,
    size: f64,
    weight: f64,
}

/// Heuristic incremental placement: most-overlapped set first at the origin,
/// each following set at the lowest-loss candidate among axis-aligned points
/// beside its positioned neighbors and the intersections of neighbor
/// distance circles.
pub fn greedy_layout(areas: &[Area]) -> Result<CircleRecord, LayoutError> {
    let mut circles: CircleRecord = BTreeMap::new();
    let mut sizes: BTreeMap<String, f64> = BTreeMap::new();
    let mut set_overlaps: BTreeMap<String, Vec<Overlap>> = BTreeMap::new();
    for area in areas {
        if area.sets.len() == 1 {
            let set = &area.sets[0];
            circles.insert(
                set.clone(),
                Circle::from_size(Point { x: UNPLACED, y: UNPLACED }, area.size),
            );
            sizes.insert(set.clone(), area.size);
            set_overlaps.insert(set.clone(), Vec::new());
        }
    }

    let pair_areas: Vec<Area> = areas.iter().filter(|a| a.sets.len() == 2).cloned().collect();
    for area in &pair_areas {
        let (left, right) = (&area.sets[0], &area.sets[1]);
        let (Some(&left_size), Some(&right_size)) = (sizes.get(left), sizes.get(right)) else {
            return Err(LayoutError::UnknownSet {
                set: if sizes.contains_key(left) { right.clone() } else { left.clone() },
                sets: area.sets.clone(),
            });
        };
        // a full containment constrains placement by distance only; it should
        // not drive the placement order
        let weight = if area.size + SMALL >= left_size.min(right_size) { 0. } else { area.weight };
        if let Some(o) = set_overlaps.get_mut(left) {
            o.push(Overlap { set: right.clone(), size: area.size, weight });
        }
        if let Some(o) = set_overlaps.get_mut(right) {
            o.push(Overlap { set: left.clone(), size: area.size, weight });
        }
    }

    // order sets by total weighted overlap, descending
    let mut most_overlapped: Vec<(&String, f64)> = set_overlaps
        .iter()
        .map(|(set, overlaps)| (set, overlaps.iter().map(|o| o.size * o.weight).sum()))
        .collect();
    most_overlapped.sort_by(|a, b| b.1.total_cmp(&a.1));

    let Some(&(first, _)) = most_overlapped.first() else {
        return Ok(circles);
    };

    let mut positioned: BTreeSet<&String> = BTreeSet::new();
    let order: Vec<&String> = most_overlapped.iter().map(|(set, _)| *set).collect();

    if let Some(c) = circles.get_mut(first) {
        c.c = Point::default();
    }
    positioned.insert(first);

    for set in order.iter().skip(1) {
        let mut overlaps: Vec<&Overlap> = set_overlaps[*set]
            .iter()
            .filter(|o| positioned.contains(&o.set))
            .collect();
        overlaps.sort_by(|a, b| b.size.total_cmp(&a.size));
        if overlaps.is_empty() {
            // unreachable after missing-pairwise completion, but guarded
            return Err(LayoutError::MissingPairwiseOverlap { set: (*set).clone() });
        }

        let radius = circles[*set].r;
        let mut points = Vec::new();
        for (j, o1) in overlaps.iter().enumerate() {
            let neighbor = circles[&o1.set];
            let d1 = distance_from_intersect_area(radius, neighbor.r, o1.size);

            // axis-aligned candidates read best for 2-3 circle diagrams
            points.push(neighbor.c + Point { x: d1, y: 0. });
            points.push(neighbor.c + Point { x: -d1, y: 0. });
            points.push(neighbor.c + Point { x: 0., y: d1 });
            points.push(neighbor.c + Point { x: 0., y: -d1 });

            // with two positioned neighbors the position is determined
            // analytically: intersect the two distance circles
            for o2 in &overlaps[j + 1..] {
                let other = circles[&o2.set];
                let d2 = distance_from_intersect_area(radius, other.r, o2.size);
                points.extend(circle_circle_intersection(
                    &Circle { c: neighbor.c, r: d1 },
                    &Circle { c: other.c, r: d2 },
                ));
            }
        }

        let mut scored = Vec::with_capacity(points.len());
        for point in points {
            if let Some(c) = circles.get_mut(*set) {
                c.c = point;
            }
            // score against every area: n-way terms over already-positioned
            // sets discriminate, terms over unplaced circles are constant
            scored.push((OrderedFloat(loss(&circles, areas)), point));
        }
        let Some(&(best_loss, best)) = scored.iter().min_by_key(|(l, _)| *l) else {
            return Err(LayoutError::MissingPairwiseOverlap { set: (*set).clone() });
        };
        debug!("greedy: placed {} at {} (loss {})", set, best, best_loss);
        if let Some(c) = circles.get_mut(*set) {
            c.c = best;
        }
        positioned.insert(*set);
    }

    Ok(circles)
}
