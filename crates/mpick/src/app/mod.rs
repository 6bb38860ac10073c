//! Application layer: the host seam, root resolution, collectors, and the picker.

pub mod host;
pub mod picker;
pub mod root;
pub mod sources;
