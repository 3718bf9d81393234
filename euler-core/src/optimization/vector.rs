//! Small dense-vector helpers shared by the optimizers.

pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn norm2(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// `out = w1 * v1 + w2 * v2`, element-wise.
pub fn weighted_sum(out: &mut [f64], w1: f64, v1: &[f64], w2: f64, v2: &[f64]) {
    for i in 0..out.len() {
        out[i] = w1 * v1[i] + w2 * v2[i];
    }
}
