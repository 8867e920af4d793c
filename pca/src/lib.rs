//! Principal component analysis over dense numeric tables.
//!
//! The pipeline is three pure operations: [`dataset::load`] parses a
//! comma-separated numeric file into a [`linalg::Matrix`], [`pca::fit`]
//! derives the principal axes, and [`pca::project`] changes basis onto
//! them. Nothing is mutated after creation and nothing persists.

pub mod dataset;
pub mod linalg;
pub mod pca;

pub use dataset::load;
pub use pca::{fit, project, Pca};
