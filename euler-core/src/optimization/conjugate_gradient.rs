//! Nonlinear conjugate-gradient minimization (Polak-Ribiere) with a Wolfe
//! line search. The objective writes its gradient into a caller-provided
//! buffer and returns the loss.

use log::debug;

use super::vector::{dot, norm2, weighted_sum};
use super::OptimizeResult;

const C1: f64 = 1e-6;
const C2: f64 = 0.1;
const GRADIENT_TOLERANCE: f64 = 1e-5;

struct State {
    x: Vec<f64>,
    fx: f64,
    fxprime: Vec<f64>,
}

#[allow(clippy::too_many_arguments)]
fn zoom<F: FnMut(&[f64], &mut [f64]) -> f64>(
    f: &mut F,
    pk: &[f64],
    current: &State,
    next: &mut State,
    mut a_lo: f64,
    mut a_high: f64,
    mut phi_lo: f64,
    phi0: f64,
    phi_prime0: f64,
) -> f64 {
    for _ in 0..16 {
        let a = (a_lo + a_high) / 2.;
        weighted_sum(&mut next.x, 1., &current.x, a, pk);
        next.fx = f(&next.x, &mut next.fxprime);
        let phi = next.fx;
        let phi_prime = dot(&next.fxprime, pk);

        if phi > phi0 + C1 * a * phi_prime0 || phi >= phi_lo {
            a_high = a;
        } else {
            if phi_prime.abs() <= -C2 * phi_prime0 {
                return a;
            }
            if phi_prime * (a_high - a_lo) >= 0. {
                a_high = a_lo;
            }
            a_lo = a;
            phi_lo = phi;
        }
    }
    0.
}

fn wolfe_line_search<F: FnMut(&[f64], &mut [f64]) -> f64>(
    f: &mut F,
    pk: &[f64],
    current: &State,
    next: &mut State,
    initial_step: f64,
) -> f64 {
    let phi0 = current.fx;
    let phi_prime0 = dot(&current.fxprime, pk);
    let mut phi_old = phi0;
    let mut a = if initial_step > 0. { initial_step } else { 1. };
    let mut a_prev = 0.;

    for iteration in 0..10 {
        weighted_sum(&mut next.x, 1., &current.x, a, pk);
        next.fx = f(&next.x, &mut next.fxprime);
        let phi = next.fx;
        let phi_prime = dot(&next.fxprime, pk);
        if phi > phi0 + C1 * a * phi_prime0 || (iteration > 0 && phi >= phi_old) {
            return zoom(f, pk, current, next, a_prev, a, phi_old, phi0, phi_prime0);
        }
        if phi_prime.abs() <= -C2 * phi_prime0 {
            return a;
        }
        if phi_prime >= 0. {
            return zoom(f, pk, current, next, a, a_prev, phi, phi0, phi_prime0);
        }
        phi_old = phi;
        a_prev = a;
        a *= 2.;
    }
    a
}

/// Minimize `f` from `initial`. Falls back to steepest descent whenever the
/// line search fails to satisfy the Wolfe conditions, so a stalled search
/// returns the best state reached rather than diverging.
pub fn conjugate_gradient<F: FnMut(&[f64], &mut [f64]) -> f64>(
    mut f: F,
    initial: &[f64],
    max_iterations: usize,
) -> OptimizeResult {
    let n = initial.len();
    let mut current = State { x: initial.to_vec(), fx: 0., fxprime: vec![0.; n] };
    let mut next = State { x: initial.to_vec(), fx: 0., fxprime: vec![0.; n] };
    let mut yk = vec![0.; n];

    current.fx = f(&current.x, &mut current.fxprime);
    let mut pk: Vec<f64> = current.fxprime.iter().map(|g| -g).collect();

    let mut a = 1.;
    let mut iterations = 0;
    for iteration in 0..max_iterations {
        iterations = iteration + 1;
        a = wolfe_line_search(&mut f, &pk, &current, &mut next, a);
        if a == 0. {
            // line search failed; restart along steepest descent
            for (p, g) in pk.iter_mut().zip(&current.fxprime) {
                *p = -g;
            }
        } else {
            weighted_sum(&mut yk, 1., &next.fxprime, -1., &current.fxprime);
            let delta_k = dot(&current.fxprime, &current.fxprime);
            let beta_k = (dot(&yk, &next.fxprime) / delta_k).max(0.);
            for (p, g) in pk.iter_mut().zip(&next.fxprime) {
                *p = beta_k * *p - g;
            }
            std::mem::swap(&mut current, &mut next);
        }

        if norm2(&current.fxprime) <= GRADIENT_TOLERANCE {
            break;
        }
    }

    debug!("conjugate-gradient: fx {} after {} iterations", current.fx, iterations);
    OptimizeResult { x: current.x, fx: current.fx, iterations }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic(x: &[f64], grad: &mut [f64]) -> f64 {
        grad[0] = 2. * (x[0] - 3.);
        grad[1] = 2. * (x[1] + 1.);
        (x[0] - 3.) * (x[0] - 3.) + (x[1] + 1.) * (x[1] + 1.)
    }

    #[test]
    fn minimizes_quadratic() {
        let result = conjugate_gradient(quadratic, &[0., 0.], 100);
        assert_relative_eq!(result.x[0], 3., epsilon = 1e-4);
        assert_relative_eq!(result.x[1], -1., epsilon = 1e-4);
    }

    #[test]
    fn minimizes_rosenbrock() {
        let result = conjugate_gradient(
            |x, grad| {
                let (a, b) = (x[0], x[1]);
                grad[0] = -2. * (1. - a) - 400. * a * (b - a * a);
                grad[1] = 200. * (b - a * a);
                (1. - a) * (1. - a) + 100. * (b - a * a) * (b - a * a)
            },
            &[-1.2, 1.],
            1000,
        );
        assert_relative_eq!(result.x[0], 1., epsilon = 1e-2);
        assert_relative_eq!(result.x[1], 1., epsilon = 1e-2);
    }

    #[test]
    fn already_at_minimum() {
        let result = conjugate_gradient(quadratic, &[3., -1.], 100);
        assert_relative_eq!(result.fx, 0., epsilon = 1e-12);
    }
}
