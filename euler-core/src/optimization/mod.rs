pub mod conjugate_gradient;
pub mod nelder_mead;
pub mod vector;

use serde::{Deserialize, Serialize};

/// Final state of an optimizer run. Returned explicitly rather than
/// accumulated through a side channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResult {
    pub x: Vec<f64>,
    pub fx: f64,
    pub iterations: usize,
}
