use crate::core::analysis::AnalysisReport;
use crate::core::discovery::DiscoveryRun;
use crate::domain::model::{Business, RawListing};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// One external source of business listings.
///
/// Implementations return at most `max_results` records. A listing that cannot
/// be extracted is dropped and logged by the adapter; only failures affecting
/// the whole request (transport, unusable response) come back as `Err`.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &str;

    async fn search(
        &self,
        query: &str,
        location: &str,
        max_results: usize,
    ) -> Result<Vec<RawListing>>;
}

/// Decides how long to wait before the next outbound request.
pub trait PacingPolicy: Send + Sync {
    fn next_delay(&self) -> Duration;
}

/// The stages of a scouting run. `ScoutEngine` drives them in order.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn discover(&self) -> Result<DiscoveryRun>;
    async fn analyze(&self, businesses: Vec<Business>) -> Result<AnalysisReport>;
    async fn load_businesses(&self, businesses: &[Business]) -> Result<String>;
    async fn load_scored(&self, report: &AnalysisReport) -> Result<String>;
    async fn read_businesses(&self, path: &str) -> Result<Vec<Business>>;
}
