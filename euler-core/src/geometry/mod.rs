pub mod circle;
pub mod intersection;
pub mod point;

/// Absolute tolerance for containment / disjointness classification.
/// Empirically tuned against floating-point layout noise; does not scale
/// with circle radii.
pub const SMALL: f64 = 1e-10;
