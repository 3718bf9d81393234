pub mod cluster;
pub mod regions;
pub mod scale;
pub mod text_centre;
