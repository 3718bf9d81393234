//! Derivative-free downhill-simplex minimization.

use log::debug;

use super::vector::weighted_sum;
use super::OptimizeResult;

#[derive(Debug, Clone)]
pub struct NelderMeadParams {
    pub max_iterations: usize,
    /// Multiplier perturbing non-zero coordinates when seeding the simplex.
    pub non_zero_delta: f64,
    /// Absolute perturbation for zero coordinates when seeding the simplex.
    pub zero_delta: f64,
    /// Stop when the best-to-worst objective spread falls below this...
    pub min_error_delta: f64,
    /// ...and the best two vertices are within this coordinate distance.
    pub min_tolerance: f64,
    /// Reflection coefficient.
    pub rho: f64,
    /// Expansion coefficient.
    pub chi: f64,
    /// Contraction coefficient.
    pub psi: f64,
    /// Shrink coefficient.
    pub sigma: f64,
}

impl Default for NelderMeadParams {
    fn default() -> Self {
        NelderMeadParams {
            max_iterations: 500,
            non_zero_delta: 1.05,
            zero_delta: 1e-3,
            min_error_delta: 1e-6,
            min_tolerance: 1e-5,
            rho: 1.,
            chi: 2.,
            psi: -0.5,
            sigma: 0.5,
        }
    }
}

struct Vertex {
    x: Vec<f64>,
    fx: f64,
}

fn combined(w1: f64, v1: &[f64], w2: f64, v2: &[f64]) -> Vec<f64> {
    let mut out = vec![0.; v1.len()];
    weighted_sum(&mut out, w1, v1, w2, v2);
    out
}

/// Minimize `f` from `x0` by Nelder-Mead direct search. Degrades gracefully:
/// when no move improves the simplex it shrinks toward the incumbent, so the
/// result is never worse than the best state visited.
pub fn nelder_mead<F: FnMut(&[f64]) -> f64>(
    mut f: F,
    x0: &[f64],
    params: &NelderMeadParams,
) -> OptimizeResult {
    let n = x0.len();
    if n == 0 {
        let fx = f(x0);
        return OptimizeResult { x: vec![], fx, iterations: 0 };
    }

    let mut simplex: Vec<Vertex> = Vec::with_capacity(n + 1);
    let fx0 = f(x0);
    simplex.push(Vertex { x: x0.to_vec(), fx: fx0 });
    for i in 0..n {
        let mut x = x0.to_vec();
        x[i] = if x[i] != 0. { x[i] * params.non_zero_delta } else { params.zero_delta };
        let fx = f(&x);
        simplex.push(Vertex { x, fx });
    }

    let mut iterations = 0;
    for iteration in 0..params.max_iterations {
        iterations = iteration + 1;
        simplex.sort_by(|a, b| a.fx.total_cmp(&b.fx));

        let mut max_diff = 0f64;
        for i in 0..n {
            max_diff = max_diff.max((simplex[0].x[i] - simplex[1].x[i]).abs());
        }
        if (simplex[0].fx - simplex[n].fx).abs() < params.min_error_delta
            && max_diff < params.min_tolerance
        {
            break;
        }

        // centroid of every vertex but the worst
        let mut centroid = vec![0.; n];
        for vertex in &simplex[..n] {
            for (c, x) in centroid.iter_mut().zip(&vertex.x) {
                *c += x / n as f64;
            }
        }

        let worst = &simplex[n];
        let reflected_x = combined(1. + params.rho, &centroid, -params.rho, &worst.x);
        let reflected_fx = f(&reflected_x);

        if reflected_fx < simplex[0].fx {
            // best seen so far: try expanding further
            let expanded_x = combined(1. + params.chi, &centroid, -params.chi, &worst.x);
            let expanded_fx = f(&expanded_x);
            simplex[n] = if expanded_fx < reflected_fx {
                Vertex { x: expanded_x, fx: expanded_fx }
            } else {
                Vertex { x: reflected_x, fx: reflected_fx }
            };
        } else if reflected_fx >= simplex[n - 1].fx {
            let mut should_shrink = false;
            if reflected_fx > worst.fx {
                // inside contraction
                let contracted_x = combined(1. + params.psi, &centroid, -params.psi, &worst.x);
                let contracted_fx = f(&contracted_x);
                if contracted_fx < worst.fx {
                    simplex[n] = Vertex { x: contracted_x, fx: contracted_fx };
                } else {
                    should_shrink = true;
                }
            } else {
                // outside contraction
                let contracted_x = combined(
                    1. - params.psi * params.rho,
                    &centroid,
                    params.psi * params.rho,
                    &worst.x,
                );
                let contracted_fx = f(&contracted_x);
                if contracted_fx < reflected_fx {
                    simplex[n] = Vertex { x: contracted_x, fx: contracted_fx };
                } else {
                    should_shrink = true;
                }
            }

            if should_shrink {
                if params.sigma >= 1. {
                    break;
                }
                let best = simplex[0].x.clone();
                for vertex in simplex.iter_mut().skip(1) {
                    let x = combined(1. - params.sigma, &best, params.sigma, &vertex.x);
                    let fx = f(&x);
                    *vertex = Vertex { x, fx };
                }
            }
        } else {
            simplex[n] = Vertex { x: reflected_x, fx: reflected_fx };
        }
    }

    simplex.sort_by(|a, b| a.fx.total_cmp(&b.fx));
    let best = simplex.swap_remove(0);
    debug!("nelder-mead: fx {} after {} iterations", best.fx, iterations);
    OptimizeResult { x: best.x, fx: best.fx, iterations }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimizes_quadratic() {
        let result = nelder_mead(
            |x| (x[0] - 3.) * (x[0] - 3.) + (x[1] + 1.) * (x[1] + 1.),
            &[0., 0.],
            &NelderMeadParams::default(),
        );
        assert_relative_eq!(result.x[0], 3., epsilon = 1e-3);
        assert_relative_eq!(result.x[1], -1., epsilon = 1e-3);
        assert!(result.fx < 1e-6);
    }

    #[test]
    fn minimizes_rosenbrock() {
        let result = nelder_mead(
            |x| {
                let (a, b) = (x[0], x[1]);
                (1. - a) * (1. - a) + 100. * (b - a * a) * (b - a * a)
            },
            &[-1.2, 1.],
            &NelderMeadParams { max_iterations: 2000, ..Default::default() },
        );
        assert_relative_eq!(result.x[0], 1., epsilon = 1e-2);
        assert_relative_eq!(result.x[1], 1., epsilon = 1e-2);
    }

    #[test]
    fn empty_input() {
        let result = nelder_mead(|_| 7., &[], &NelderMeadParams::default());
        assert_eq!(result.fx, 7.);
        assert!(result.x.is_empty());
    }
}
