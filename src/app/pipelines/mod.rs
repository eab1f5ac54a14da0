pub mod scout_pipeline;

pub use scout_pipeline::{build_adapters, ScoutPipeline};
