#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Point cloud container for sparse reconstructions.
pub mod cloud;

/// Readers for the COLMAP sparse text format.
pub mod colmap;
