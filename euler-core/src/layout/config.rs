use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::analysis::cluster::CircleOrder;

/// Which initial-layout heuristic seeds the global refinement.
/// `Best` is a meta-strategy composing the other two, not a third algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialLayout {
    Greedy,
    Mds,
    #[default]
    Best,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub layout: InitialLayout,
    /// Random restarts for the constrained-MDS heuristic.
    pub restarts: usize,
    /// Iteration cap shared by the refinement simplex and the MDS gradient
    /// descent.
    pub max_iterations: usize,
    /// PRNG seed for MDS restart positions; `None` draws a fresh one. The
    /// same seed reproduces a layout exactly.
    pub seed: Option<u64>,
    /// Angle (radians) from the largest to the second-largest circle after
    /// normalization.
    pub orientation: f64,
    /// Custom circle ordering for orientation; by-radius-descending when
    /// `None`.
    pub orientation_order: Option<CircleOrder>,
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    /// Joiner for composite area keys in text-centre / region maps.
    pub set_id_delimiter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            layout: InitialLayout::Best,
            restarts: 10,
            max_iterations: 500,
            seed: None,
            orientation: FRAC_PI_2,
            orientation_order: None,
            width: 600.,
            height: 350.,
            padding: 15.,
            set_id_delimiter: ",".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_tags() {
        assert_eq!(serde_json::from_str::<InitialLayout>(r#""greedy""#).unwrap(), InitialLayout::Greedy);
        assert_eq!(serde_json::from_str::<InitialLayout>(r#""mds""#).unwrap(), InitialLayout::Mds);
        assert_eq!(InitialLayout::default(), InitialLayout::Best);
    }
}
