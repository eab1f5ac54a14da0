pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{ListingAdapter, ListingProfile, LocalStorage, PlacesApiAdapter};
pub use app::pipelines::ScoutPipeline;
pub use config::ScoutConfig;
pub use crate::core::{engine::ScoutEngine, scoring::ScoringEngine};
pub use utils::error::{Result, ScoutError};
