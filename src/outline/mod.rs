mod classifier;
mod config;
mod error;
mod features;
mod hierarchy;
mod normalize;
mod pipeline;
mod stats;
#[cfg(test)]
mod tests;
mod title;

pub use config::{OutlineConfig, ScoreWeights};
pub use error::OutlineError;
pub use pipeline::{OutlinePipeline, OutlineResult};
