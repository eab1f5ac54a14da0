use crate::adapters::listing::{ListingAdapter, ListingProfile};
use crate::adapters::places_api::{PlacesApiAdapter, DEFAULT_DETAILS_URL, DEFAULT_SEARCH_URL};
use crate::config::toml_config::{OutputConfig, ScoutConfig};
use crate::core::analysis::{AnalysisReport, LeadAnalyzer};
use crate::core::discovery::{DiscoveryOrchestrator, DiscoveryRun};
use crate::core::export::{businesses_from_csv, businesses_to_csv, scored_to_csv};
use crate::core::fetcher::WebsiteFetcher;
use crate::core::pacing::{FixedDelay, RandomDelay};
use crate::core::scoring::ScoringEngine;
use crate::domain::model::{Business, DiscoveryJob};
use crate::domain::ports::{Pipeline, SourceAdapter, Storage};
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::delay_from_secs;
use std::time::Duration;

pub struct ScoutPipeline<S: Storage> {
    storage: S,
    jobs: Vec<DiscoveryJob>,
    orchestrator: DiscoveryOrchestrator,
    analyzer: LeadAnalyzer,
    output: OutputConfig,
}

impl<S: Storage> ScoutPipeline<S> {
    pub fn new(
        storage: S,
        jobs: Vec<DiscoveryJob>,
        orchestrator: DiscoveryOrchestrator,
        analyzer: LeadAnalyzer,
        output: OutputConfig,
    ) -> Self {
        Self {
            storage,
            jobs,
            orchestrator,
            analyzer,
            output,
        }
    }

    /// Wires sources, pacing, fetcher and scoring from a validated configuration.
    pub fn from_config(storage: S, config: &ScoutConfig) -> Result<Self> {
        let adapters = build_adapters(config)?;
        let orchestrator = DiscoveryOrchestrator::new(
            adapters,
            Box::new(RandomDelay::new(
                delay_from_secs("pacing.min_delay_secs", config.pacing.min_delay_secs)?,
                delay_from_secs("pacing.max_delay_secs", config.pacing.max_delay_secs)?,
            )),
            config.run.location.clone(),
        )?;

        let analyzer = LeadAnalyzer::new(
            WebsiteFetcher::new(Duration::from_secs(config.fetcher.timeout_secs))?,
            ScoringEngine::new(config.scoring.clone()),
            Box::new(FixedDelay(delay_from_secs(
                "pacing.analysis_delay_secs",
                config.pacing.analysis_delay_secs,
            )?)),
        );

        Ok(Self::new(
            storage,
            config.jobs.clone(),
            orchestrator,
            analyzer,
            config.output.clone(),
        ))
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn jobs(&self) -> &[DiscoveryJob] {
        &self.jobs
    }
}

/// One adapter per enabled source, in the configured order. A `[[listings]]`
/// entry takes precedence over a built-in profile of the same name.
pub fn build_adapters(config: &ScoutConfig) -> Result<Vec<Box<dyn SourceAdapter>>> {
    let mut adapters: Vec<Box<dyn SourceAdapter>> = Vec::new();

    for source in &config.run.sources {
        if source == "places" {
            let api_key = config
                .resolve_api_key()
                .ok_or_else(|| ScoutError::MissingConfigError {
                    field: "places.api_key".to_string(),
                })?;
            let mut adapter = PlacesApiAdapter::new(&api_key)?.with_endpoints(
                config
                    .places
                    .search_url
                    .as_deref()
                    .unwrap_or(DEFAULT_SEARCH_URL),
                config
                    .places
                    .details_url
                    .as_deref()
                    .unwrap_or(DEFAULT_DETAILS_URL),
            )?;
            if let Some(secs) = config.places.page_delay_secs {
                adapter = adapter.with_page_delay(delay_from_secs("places.page_delay_secs", secs)?);
            }
            adapters.push(Box::new(adapter));
            continue;
        }

        let profile = config
            .custom_profile(source)
            .cloned()
            .or_else(|| ListingProfile::builtin(source))
            .ok_or_else(|| ScoutError::InvalidConfigValueError {
                field: "run.sources".to_string(),
                value: source.clone(),
                reason: "No listing profile with this name".to_string(),
            })?;
        adapters.push(Box::new(ListingAdapter::new(profile)?));
    }

    Ok(adapters)
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for ScoutPipeline<S> {
    async fn discover(&self) -> Result<DiscoveryRun> {
        tracing::info!(
            "🔍 Discovering {} categories in {} via {}",
            self.jobs.len(),
            self.orchestrator.location(),
            self.orchestrator.source_names().join(", ")
        );
        Ok(self.orchestrator.run(&self.jobs).await)
    }

    async fn analyze(&self, businesses: Vec<Business>) -> Result<AnalysisReport> {
        Ok(self.analyzer.analyze_all(businesses).await)
    }

    async fn load_businesses(&self, businesses: &[Business]) -> Result<String> {
        let data = businesses_to_csv(businesses)?;
        self.storage
            .write_file(&self.output.businesses_file, &data)
            .await?;
        Ok(format!("{}/{}", self.output.path, self.output.businesses_file))
    }

    async fn load_scored(&self, report: &AnalysisReport) -> Result<String> {
        let data = scored_to_csv(&report.scored)?;
        self.storage.write_file(&self.output.scored_file, &data).await?;
        Ok(format!("{}/{}", self.output.path, self.output.scored_file))
    }

    async fn read_businesses(&self, path: &str) -> Result<Vec<Business>> {
        let data = self.storage.read_file(path).await?;
        businesses_from_csv(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;

    fn config(toml: &str) -> ScoutConfig {
        ScoutConfig::from_toml_str(toml).unwrap()
    }

    #[test]
    fn test_builds_listing_adapters_in_order() {
        let config = config("[run]\nsources = [\"golden_pages\", \"yell\"]");
        let adapters = build_adapters(&config).unwrap();
        let names: Vec<&str> = adapters.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["goldenpages.ie", "yell.ie"]);
    }

    #[test]
    fn test_places_with_explicit_key() {
        let config = config("[run]\nsources = [\"places\"]\n[places]\napi_key = \"k-123\"");
        let adapters = build_adapters(&config).unwrap();
        assert_eq!(adapters[0].name(), "google_places_api");
    }

    #[test]
    fn test_places_placeholder_key_rejected() {
        let config = config("[places]\napi_key = \"YOUR_API_KEY_HERE\"");
        let err = build_adapters(&config).err().unwrap();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unvalidated_delays_are_errors() {
        let storage = LocalStorage::new("./unused".to_string());
        let huge = config("[run]\nsources = [\"yell\"]\n[pacing]\nmax_delay_secs = 1e20");
        let err = ScoutPipeline::from_config(storage.clone(), &huge).err().unwrap();
        assert!(err.is_fatal());

        let infinite = config("[places]\napi_key = \"k-123\"\npage_delay_secs = inf");
        let err = build_adapters(&infinite).err().unwrap();
        assert!(err.is_fatal());

        let sane = config("[run]\nsources = [\"yell\"]\n[pacing]\nmin_delay_secs = 0.0\nmax_delay_secs = 0.0");
        assert!(ScoutPipeline::from_config(storage, &sane).is_ok());
    }

    #[test]
    fn test_custom_profile_overrides_builtin() {
        let config = config(
            r#"
[run]
sources = ["yell"]

[[listings]]
source = "yell"
base_url = "http://127.0.0.1:9"
path_template = "/s/{query}/{location}"
containers = ["div.card"]
name = [{ selector = "h2" }]
"#,
        );
        let adapters = build_adapters(&config).unwrap();
        assert_eq!(adapters.len(), 1);
        assert_eq!(adapters[0].name(), "yell");
    }
}
