//! Layout engine for area-proportional Euler and Venn diagrams.
//!
//! Given per-set and per-intersection target areas, the engine positions one
//! circle per set so that achieved overlap areas match the targets, then
//! normalizes, scales, and annotates the result for rendering. [`solve`] runs
//! the whole pipeline; the stages are also usable on their own.

#[cfg_attr(not(test), allow(unused_imports))]
#[macro_use]
extern crate approx;

pub mod analysis;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod optimization;

pub use analysis::cluster::{disjoint_clusters, normalize_solution, CircleOrder, LabeledCircle};
pub use analysis::regions::{region_shape, RegionShape};
pub use analysis::scale::scale_to_viewport;
pub use analysis::text_centre::{compute_text_centre, compute_text_centres, TextCentre};
pub use diagram::{solve, Diagram};
pub use error::LayoutError;
pub use geometry::circle::Circle;
pub use geometry::point::Point;
pub use layout::area::Area;
pub use layout::config::{Config, InitialLayout};
pub use layout::{layout, CircleRecord};
