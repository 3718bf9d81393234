//! Full pipeline: layout, normalization, viewport fit, label anchors, and
//! region boundaries in one call.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::cluster::normalize_solution;
use crate::analysis::regions::{region_shape, RegionShape};
use crate::analysis::scale::scale_to_viewport;
use crate::analysis::text_centre::{compute_text_centres, TextCentre};
use crate::error::LayoutError;
use crate::layout::area::Area;
use crate::layout::config::Config;
use crate::layout::{layout, CircleRecord};

/// Everything the rendering layer consumes. Keys of `text_centres` and
/// `regions` are set ids joined with the configured delimiter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub circles: CircleRecord,
    pub text_centres: BTreeMap<String, TextCentre>,
    pub regions: BTreeMap<String, RegionShape>,
}

/// Lays out `areas`, separates and orientates disjoint clusters, fits the
/// viewport, and derives a label anchor and region boundary per area.
pub fn solve(areas: &[Area], config: &Config) -> Result<Diagram, LayoutError> {
    let solution = layout(areas, config)?;
    let normalized = normalize_solution(&solution, config.orientation, config.orientation_order);
    let circles = scale_to_viewport(&normalized, config.width, config.height, config.padding);

    let text_centres = compute_text_centres(&circles, areas, &config.set_id_delimiter);
    let regions = areas
        .iter()
        .map(|area| {
            (
                area.sets.join(&config.set_id_delimiter),
                region_shape(&circles, &area.sets),
            )
        })
        .collect();

    Ok(Diagram { circles, text_centres, regions })
}
