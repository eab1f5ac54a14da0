pub mod analysis;
pub mod discovery;
pub mod engine;
pub mod export;
pub mod fetcher;
pub mod normalize;
pub mod pacing;
pub mod scoring;

pub use crate::domain::model::{Business, RawListing, ScoreResult, ScoredBusiness};
pub use crate::domain::ports::{PacingPolicy, Pipeline, SourceAdapter, Storage};
pub use crate::utils::error::Result;
