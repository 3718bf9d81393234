use serde::{Deserialize, Serialize};

use crate::geometry::circle::Circle;
use crate::geometry::intersection::{intersection_stats, Arc};
use crate::layout::CircleRecord;

/// Boundary description of one area's region, ready for the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RegionShape {
    /// The region is exactly one circle.
    Circle { circle: Circle },
    /// Boundary arcs of a multi-circle intersection; empty when the sets do
    /// not jointly intersect (the region is not representable).
    Arcs { arcs: Vec<Arc> },
}

/// Region boundary for the given set combination against a finalized layout.
pub fn region_shape(circles: &CircleRecord, sets: &[String]) -> RegionShape {
    let members: Vec<Circle> = sets.iter().filter_map(|s| circles.get(s)).copied().collect();
    if members.len() == 1 && sets.len() == 1 {
        RegionShape::Circle { circle: members[0] }
    } else {
        RegionShape::Arcs { arcs: intersection_stats(&members).arcs }
    }
}
