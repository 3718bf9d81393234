use log::warn;

use crate::geometry::circle::Circle;
use crate::geometry::point::Point;
use crate::layout::CircleRecord;

/// Uniformly scales and centers the layout into a `width x height` viewport
/// with `padding` on each side. One scale factor for both axes (the smaller
/// per-axis ratio) keeps circles circular. Returns a copy; a degenerate
/// bounding box (zero width or height) passes through unchanged.
pub fn scale_to_viewport(
    solution: &CircleRecord,
    width: f64,
    height: f64,
    padding: f64,
) -> CircleRecord {
    let width = width - 2. * padding;
    let height = height - 2. * padding;

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for circle in solution.values() {
        x_min = x_min.min(circle.c.x - circle.r);
        x_max = x_max.max(circle.c.x + circle.r);
        y_min = y_min.min(circle.c.y - circle.r);
        y_max = y_max.max(circle.c.y + circle.r);
    }
    if !(x_max > x_min) || !(y_max > y_min) {
        warn!("not scaling solution: degenerate bounding box");
        return solution.clone();
    }

    let x_scaling = width / (x_max - x_min);
    let y_scaling = height / (y_max - y_min);
    let scaling = x_scaling.min(y_scaling);

    // center the scaled diagram inside the viewport
    let x_offset = (width - (x_max - x_min) * scaling) / 2.;
    let y_offset = (height - (y_max - y_min) * scaling) / 2.;

    solution
        .iter()
        .map(|(set, circle)| {
            let scaled = Circle {
                c: Point {
                    x: padding + x_offset + (circle.c.x - x_min) * scaling,
                    y: padding + y_offset + (circle.c.y - y_min) * scaling,
                },
                r: circle.r * scaling,
            };
            (set.clone(), scaled)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(entries: &[(&str, f64, f64, f64)]) -> CircleRecord {
        entries
            .iter()
            .map(|&(id, x, y, r)| (id.to_string(), Circle::new(x, y, r)))
            .collect::<BTreeMap<_, _>>()
    }

    #[test]
    fn fits_and_centers() {
        let solution = record(&[("A", 0., 0., 1.), ("B", 4., 0., 1.)]);
        let scaled = scale_to_viewport(&solution, 600., 300., 10.);
        // x span 6 limits the fit: 580 / 6 per unit
        let scaling: f64 = 580. / 6.;
        assert_relative_eq!(scaled["A"].r, scaling, epsilon = 1e-9);
        // centered both ways
        let mid = (scaled["A"].c.x + scaled["B"].c.x) / 2.;
        assert_relative_eq!(mid, 300., epsilon = 1e-9);
        assert_relative_eq!(scaled["A"].c.y, 150., epsilon = 1e-9);
    }

    #[test]
    fn idempotent_on_fitted_layout() {
        let solution = record(&[("A", 0., 0., 1.), ("B", 3., 0., 1.)]);
        let once = scale_to_viewport(&solution, 500., 500., 0.);
        let twice = scale_to_viewport(&once, 500., 500., 0.);
        for set in ["A", "B"] {
            assert_relative_eq!(once[set].c.x, twice[set].c.x, epsilon = 1e-9);
            assert_relative_eq!(once[set].c.y, twice[set].c.y, epsilon = 1e-9);
            assert_relative_eq!(once[set].r, twice[set].r, epsilon = 1e-9);
        }
    }

    #[test]
    fn degenerate_bounding_box_unchanged() {
        let solution = record(&[("A", 7., 7., 0.)]);
        let scaled = scale_to_viewport(&solution, 500., 500., 10.);
        assert_eq!(scaled, solution);
        assert!(scale_to_viewport(&BTreeMap::new(), 100., 100., 0.).is_empty());
    }
}
