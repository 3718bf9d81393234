use std::collections::BTreeMap;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::circle::{distance_from_intersect_area, Circle};
use crate::geometry::point::Point;
use crate::geometry::SMALL;
use crate::layout::area::Area;
use crate::layout::CircleRecord;
use crate::optimization::conjugate_gradient::conjugate_gradient;
use crate::optimization::vector::norm2;

/// Pairwise target distances between single sets, with a per-pair ordering
/// constraint: +1 subset (achieved distance should be <= target), -1 disjoint
/// (>= target), 0 unconstrained.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrices {
    pub distances: Vec<Vec<f64>>,
    pub constraints: Vec<Vec<i8>>,
}

pub fn distance_matrices(areas: &[Area], sets: &[&Area], setids: &BTreeMap<&str, usize>) -> DistanceMatrices {
    let n = sets.len();
    let mut distances = vec![vec![0.; n]; n];
    let mut constraints = vec![vec![0i8; n]; n];

    for area in areas.iter().filter(|a| a.sets.len() == 2) {
        let (Some(&left), Some(&right)) = (
            setids.get(area.sets[0].as_str()),
            setids.get(area.sets[1].as_str()),
        ) else {
            continue;
        };
        let r1 = (sets[left].size / std::f64::consts::PI).sqrt();
        let r2 = (sets[right].size / std::f64::consts::PI).sqrt();
        let distance = distance_from_intersect_area(r1, r2, area.size);
        distances[left][right] = distance;
        distances[right][left] = distance;

        let constraint = if area.size + SMALL >= sets[left].size.min(sets[right].size) {
            1
        } else if area.size <= SMALL {
            -1
        } else {
            0
        };
        constraints[left][right] = constraint;
        constraints[right][left] = constraint;
    }

    DistanceMatrices { distances, constraints }
}

/// Stress objective and gradient over flattened (x, y) coordinates. Pairs
/// whose subset/disjoint constraint is already satisfied in the correct
/// direction are masked out of both loss and gradient, which is how the
/// inequality constraints are enforced.
fn stress_gradient(x: &[f64], grad: &mut [f64], matrices: &DistanceMatrices) -> f64 {
    grad.fill(0.);
    let n = matrices.distances.len();
    let mut loss = 0.;
    for i in 0..n {
        let (xi, yi) = (x[2 * i], x[2 * i + 1]);
        for j in i + 1..n {
            let (xj, yj) = (x[2 * j], x[2 * j + 1]);
            let dij = matrices.distances[i][j];
            let constraint = matrices.constraints[i][j];

            let squared = (xj - xi) * (xj - xi) + (yj - yi) * (yj - yi);
            let distance = squared.sqrt();
            let delta = squared - dij * dij;

            if (constraint > 0 && distance <= dij) || (constraint < 0 && distance >= dij) {
                continue;
            }
            loss += 2. * delta * delta;

            grad[2 * i] += 4. * delta * (xi - xj);
            grad[2 * i + 1] += 4. * delta * (yi - yj);
            grad[2 * j] += 4. * delta * (xj - xi);
            grad[2 * j + 1] += 4. * delta * (yj - yi);
        }
    }
    loss
}

/// Multi-restart stress majorization with soft ordering constraints.
/// Restart initial positions come from `seed`, so a given seed reproduces a
/// run exactly; the lowest-final-stress restart wins.
pub fn constrained_mds_layout(
    areas: &[Area],
    restarts: usize,
    max_iterations: usize,
    seed: u64,
) -> CircleRecord {
    let mut sets: Vec<&Area> = Vec::new();
    let mut setids: BTreeMap<&str, usize> = BTreeMap::new();
    for area in areas.iter().filter(|a| a.sets.len() == 1) {
        setids.insert(area.sets[0].as_str(), sets.len());
        sets.push(area);
    }
    if sets.is_empty() {
        return BTreeMap::new();
    }

    let mut matrices = distance_matrices(areas, &sets, &setids);

    // precondition: keep coordinates near the unit scale of the random
    // initialization, rescale the solution afterward
    let row_norms: Vec<f64> = matrices.distances.iter().map(|row| norm2(row)).collect();
    let mut norm = norm2(&row_norms) / matrices.distances.len() as f64;
    if norm <= 0. {
        norm = 1.;
    }
    for row in matrices.distances.iter_mut() {
        for value in row.iter_mut() {
            *value /= norm;
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut best: Option<crate::optimization::OptimizeResult> = None;
    for restart in 0..restarts.max(1) {
        let initial: Vec<f64> = (0..sets.len() * 2).map(|_| rng.gen::<f64>()).collect();
        let current = conjugate_gradient(
            |x, grad| stress_gradient(x, grad, &matrices),
            &initial,
            max_iterations,
        );
        debug!("mds restart {}: stress {} ({} iterations)", restart, current.fx, current.iterations);
        if best.as_ref().map_or(true, |b| current.fx < b.fx) {
            best = Some(current);
        }
    }

    let positions = match best {
        Some(result) => result.x,
        None => vec![0.; sets.len() * 2],
    };
    sets.iter()
        .enumerate()
        .map(|(i, area)| {
            let c = Point { x: positions[2 * i] * norm, y: positions[2 * i + 1] * norm };
            (area.sets[0].clone(), Circle::from_size(c, area.size))
        })
        .collect()
}
