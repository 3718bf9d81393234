use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

/// One observation: a set (or set combination) and its desired size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub sets: Vec<String>,
    pub size: f64,
    /// Multiplier on this area's contribution to the loss.
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

fn default_weight() -> f64 {
    1.
}

impl Area {
    pub fn new(sets: &[&str], size: f64) -> Self {
        Area {
            sets: sets.iter().map(|s| s.to_string()).collect(),
            size,
            weight: 1.,
            label: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }
}

/// Reject malformed input before any layout runs: negative sizes, empty set
/// lists, duplicate ids within one area, and combination areas referencing a
/// set that has no single-set area.
pub fn validate_areas(areas: &[Area]) -> Result<(), LayoutError> {
    let singles: BTreeSet<&str> = areas
        .iter()
        .filter(|a| a.sets.len() == 1)
        .map(|a| a.sets[0].as_str())
        .collect();

    for area in areas {
        if area.sets.is_empty() {
            return Err(LayoutError::EmptySetList);
        }
        if area.size < 0. {
            return Err(LayoutError::NegativeSize { sets: area.sets.clone(), size: area.size });
        }
        let mut seen = BTreeSet::new();
        for set in &area.sets {
            if !seen.insert(set.as_str()) {
                return Err(LayoutError::DuplicateSet {
                    set: set.clone(),
                    sets: area.sets.clone(),
                });
            }
            if area.sets.len() > 1 && !singles.contains(set.as_str()) {
                return Err(LayoutError::UnknownSet {
                    set: set.clone(),
                    sets: area.sets.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Every pair of single sets with no explicit 2-way area defaults to
/// disjoint: append a zero-size pairwise area for it. Ids are visited in
/// lexicographic order so the completion is deterministic. The input is not
/// mutated.
pub fn add_missing_areas(areas: &[Area]) -> Vec<Area> {
    let mut out = areas.to_vec();

    let ids: BTreeSet<&str> = areas
        .iter()
        .filter(|a| a.sets.len() == 1)
        .map(|a| a.sets[0].as_str())
        .collect();
    let pairs: BTreeSet<(&str, &str)> = areas
        .iter()
        .filter(|a| a.sets.len() == 2)
        .flat_map(|a| {
            let (x, y) = (a.sets[0].as_str(), a.sets[1].as_str());
            [(x, y), (y, x)]
        })
        .collect();

    for (a, b) in ids.iter().tuple_combinations() {
        if !pairs.contains(&(a, b)) {
            out.push(Area::new(&[a, b], 0.));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_adds_each_missing_pair_once() {
        let areas = vec![
            Area::new(&["A"], 10.),
            Area::new(&["B"], 10.),
            Area::new(&["C"], 10.),
            Area::new(&["A", "B"], 2.),
        ];
        let completed = add_missing_areas(&areas);
        assert_eq!(completed.len(), 6);

        let added: Vec<&Area> = completed[4..].iter().collect();
        assert_eq!(added[0].sets, vec!["A", "C"]);
        assert_eq!(added[1].sets, vec!["B", "C"]);
        for area in added {
            assert_eq!(area.size, 0.);
        }
        // input untouched
        assert_eq!(areas.len(), 4);
    }

    #[test]
    fn completion_noop_when_fully_specified() {
        let areas = vec![
            Area::new(&["A"], 10.),
            Area::new(&["B"], 10.),
            Area::new(&["B", "A"], 2.),
        ];
        assert_eq!(add_missing_areas(&areas).len(), 3);
    }

    #[test]
    fn validate_rejects_negative_size() {
        let areas = vec![Area::new(&["A"], -1.)];
        assert!(matches!(
            validate_areas(&areas),
            Err(LayoutError::NegativeSize { .. })
        ));
    }

    #[test]
    fn validate_rejects_unknown_set() {
        let areas = vec![Area::new(&["A"], 1.), Area::new(&["A", "B"], 0.5)];
        assert!(matches!(
            validate_areas(&areas),
            Err(LayoutError::UnknownSet { ref set, .. }) if set == "B"
        ));
    }

    #[test]
    fn validate_rejects_duplicates_and_empty() {
        assert!(matches!(
            validate_areas(&[Area::new(&[], 1.)]),
            Err(LayoutError::EmptySetList)
        ));
        assert!(matches!(
            validate_areas(&[Area::new(&["A"], 1.), Area::new(&["A", "A"], 1.)]),
            Err(LayoutError::DuplicateSet { .. })
        ));
    }

    #[test]
    fn serde_defaults_weight() {
        let area: Area = serde_json::from_str(r#"{"sets": ["A", "B"], "size": 3.0}"#).unwrap();
        assert_eq!(area.weight, 1.);
        assert_eq!(area.label, None);
    }
}
