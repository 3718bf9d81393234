use crate::geometry::circle::circle_overlap;
use crate::geometry::intersection::intersection_area;
use crate::geometry::point::distance;
use crate::layout::area::Area;
use crate::layout::CircleRecord;

/// Weighted squared error between achieved and target overlap areas. The
/// sole fitness criterion shared by every optimizer in the crate.
/// Single-set areas contribute nothing (their fit is fixed by radius).
pub fn loss(circles: &CircleRecord, areas: &[Area]) -> f64 {
    let mut output = 0.;
    for area in areas {
        if area.sets.len() < 2 {
            continue;
        }
        let overlap = if area.sets.len() == 2 {
            let (Some(left), Some(right)) =
                (circles.get(&area.sets[0]), circles.get(&area.sets[1]))
            else {
                continue;
            };
            circle_overlap(left.r, right.r, distance(&left.c, &right.c))
        } else {
            let members: Vec<_> = area.sets.iter().filter_map(|s| circles.get(s)).copied().collect();
            if members.len() < area.sets.len() {
                continue;
            }
            intersection_area(&members)
        };
        output += area.weight * (overlap - area.size) * (overlap - area.size);
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::circle::Circle;
    use crate::geometry::point::Point;
    use std::collections::BTreeMap;
    use std::f64::consts::PI;

    fn record(entries: &[(&str, f64, f64, f64)]) -> CircleRecord {
        entries
            .iter()
            .map(|&(id, x, y, r)| (id.to_string(), Circle { c: Point { x, y }, r }))
            .collect::<BTreeMap<_, _>>()
    }

    #[test]
    fn zero_for_perfect_layout() {
        // coincident unit circles, target overlap = full area
        let circles = record(&[("A", 0., 0., 1.), ("B", 0., 0., 1.)]);
        let areas = vec![
            Area::new(&["A"], PI),
            Area::new(&["B"], PI),
            Area::new(&["A", "B"], PI),
        ];
        assert_relative_eq!(loss(&circles, &areas), 0., epsilon = 1e-10);
    }

    #[test]
    fn weight_scales_contribution() {
        let circles = record(&[("A", 0., 0., 1.), ("B", 5., 0., 1.)]);
        let areas = vec![Area::new(&["A", "B"], 2.)];
        let weighted = vec![Area::new(&["A", "B"], 2.).with_weight(3.)];
        assert_relative_eq!(loss(&circles, &weighted), 3. * loss(&circles, &areas));
    }

    #[test]
    fn single_set_areas_ignored() {
        let circles = record(&[("A", 0., 0., 1.)]);
        let areas = vec![Area::new(&["A"], 100.)];
        assert_eq!(loss(&circles, &areas), 0.);
    }
}
