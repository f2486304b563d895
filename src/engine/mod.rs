//! Engine construction and the classification pipeline.

mod builder;
mod pipeline;

pub use builder::{Vordr, VordrBuilder};
pub use pipeline::StanceEngine;
