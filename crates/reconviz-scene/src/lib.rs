#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Cluster tree layout and discovery.
pub mod cluster;

/// Per-cluster display colors.
pub mod color;

/// Scene event emission.
pub mod emit;

/// Camera pose geometry.
pub mod pose;
