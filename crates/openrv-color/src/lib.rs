//! OpenRV Color - non-destructive exposure and display transforms.
//!
//! The session owns a [`ColorState`]; the renderer turns it into a
//! [`ColorPipeline`] and runs displayed pixels through it. Source pixels are
//! never modified.

pub mod exposure;
pub mod pipeline;

pub use exposure::{apply_exposure, ColorState};
pub use pipeline::{ColorOp, ColorPipeline};
pub use openrv_core::TransferFunction;
