pub mod area;
pub mod config;
pub mod greedy;
pub mod loss;
pub mod mds;

use std::collections::BTreeMap;

use log::debug;

use crate::error::LayoutError;
use crate::geometry::circle::Circle;
use crate::geometry::point::Point;
use crate::layout::area::{add_missing_areas, validate_areas, Area};
use crate::layout::config::{Config, InitialLayout};
use crate::layout::greedy::greedy_layout;
use crate::layout::loss::loss;
use crate::layout::mds::constrained_mds_layout;
use crate::optimization::nelder_mead::{nelder_mead, NelderMeadParams};

/// Canonical layout representation: one circle per single set.
pub type CircleRecord = BTreeMap<String, Circle>;

/// MDS must beat greedy by more than this to be preferred; avoids churn from
/// floating-point noise. Empirically tuned, absolute.
pub const BEST_OF_EPSILON: f64 = 1e-8;

/// Greedy always runs; it axis-aligns better for small diagrams. From 8
/// single sets up, constrained MDS competes on loss.
fn best_initial_layout(
    areas: &[Area],
    config: &Config,
    seed: u64,
) -> Result<CircleRecord, LayoutError> {
    let initial = greedy_layout(areas)?;
    let single_sets = areas.iter().filter(|a| a.sets.len() == 1).count();
    if single_sets >= 8 {
        let constrained = constrained_mds_layout(areas, config.restarts, config.max_iterations, seed);
        let constrained_loss = loss(&constrained, areas);
        let greedy_loss = loss(&initial, areas);
        debug!("best-of: mds loss {}, greedy loss {}", constrained_loss, greedy_loss);
        if constrained_loss + BEST_OF_EPSILON < greedy_loss {
            return Ok(constrained);
        }
    }
    Ok(initial)
}

/// Solve circle positions for `areas`: validate, complete missing pairwise
/// areas, run the configured initial layout, then refine every coordinate by
/// simplex search over the loss function. Radii stay fixed throughout; this
/// refinement is what actually makes the layout area-proportional.
pub fn layout(areas: &[Area], config: &Config) -> Result<CircleRecord, LayoutError> {
    validate_areas(areas)?;
    let areas = add_missing_areas(areas);
    let seed = config.seed.unwrap_or_else(rand::random);

    let mut circles = match config.layout {
        InitialLayout::Greedy => greedy_layout(&areas)?,
        InitialLayout::Mds => {
            constrained_mds_layout(&areas, config.restarts, config.max_iterations, seed)
        }
        InitialLayout::Best => best_initial_layout(&areas, config, seed)?,
    };
    if circles.is_empty() {
        return Ok(circles);
    }

    let ids: Vec<String> = circles.keys().cloned().collect();
    let initial: Vec<f64> = ids
        .iter()
        .flat_map(|id| [circles[id].c.x, circles[id].c.y])
        .collect();

    let result = nelder_mead(
        |values| {
            let current: CircleRecord = ids
                .iter()
                .enumerate()
                .map(|(i, id)| {
                    let c = Point { x: values[2 * i], y: values[2 * i + 1] };
                    (id.clone(), Circle { c, r: circles[id].r })
                })
                .collect();
            loss(&current, &areas)
        },
        &initial,
        &NelderMeadParams { max_iterations: config.max_iterations, ..Default::default() },
    );
    debug!("refinement: loss {} after {} iterations", result.fx, result.iterations);

    for (i, id) in ids.iter().enumerate() {
        if let Some(circle) = circles.get_mut(id) {
            circle.c = Point { x: result.x[2 * i], y: result.x[2 * i + 1] };
        }
    }
    Ok(circles)
}
