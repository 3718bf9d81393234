#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("negative size {size} for area {sets:?}")]
    NegativeSize { sets: Vec<String>, size: f64 },

    #[error("area has an empty set list")]
    EmptySetList,

    #[error("duplicate set {set:?} within area {sets:?}")]
    DuplicateSet { set: String, sets: Vec<String> },

    #[error("area {sets:?} references set {set:?} with no single-set area")]
    UnknownSet { set: String, sets: Vec<String> },

    #[error("missing pairwise overlap information for set {set:?}")]
    MissingPairwiseOverlap { set: String },
}
