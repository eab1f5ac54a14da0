use crate::adapters::listing::ListingProfile;
use crate::core::scoring::ScoringConfig;
use crate::domain::model::DiscoveryJob;
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{
    validate_delay_bounds, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default = "default_jobs")]
    pub jobs: Vec<DiscoveryJob>,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub listings: Vec<ListingProfile>,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub location: String,
    /// Enabled sources: "places", a built-in listing profile ("yell",
    /// "golden_pages") or the `source` of a `[[listings]]` entry.
    pub sources: Vec<String>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            run: RunConfig::default(),
            jobs: default_jobs(),
            pacing: PacingConfig::default(),
            places: PlacesConfig::default(),
            listings: Vec::new(),
            fetcher: FetcherConfig::default(),
            scoring: ScoringConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            location: "Dublin, Ireland".to_string(),
            sources: vec!["places".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
    /// Pause between website fetches during analysis.
    pub analysis_delay_secs: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: 3.0,
            max_delay_secs: 6.0,
            analysis_delay_secs: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlacesConfig {
    pub api_key: Option<String>,
    pub search_url: Option<String>,
    pub details_url: Option<String>,
    pub page_delay_secs: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub businesses_file: String,
    pub scored_file: String,
    /// How many top candidates to print after analysis.
    pub top_candidates: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./data".to_string(),
            businesses_file: "businesses.csv".to_string(),
            scored_file: "scored_leads.csv".to_string(),
            top_candidates: 5,
        }
    }
}

fn default_jobs() -> Vec<DiscoveryJob> {
    [
        ("restaurants", 15),
        ("dentists", 10),
        ("plumbers", 10),
        ("cafes", 10),
        ("hotels", 10),
        ("electricians", 10),
        ("solicitors", 10),
        ("accountants", 10),
        ("hairdressers", 10),
        ("builders", 10),
    ]
    .into_iter()
    .map(|(category, max)| DiscoveryJob::new(category, max))
    .collect()
}

impl ScoutConfig {
    /// Built-in defaults: the standard job list against the places source.
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScoutError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScoutError::InvalidConfigValueError {
            field: "toml_parsing".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    /// Explicit key first, then `GOOGLE_MAPS_API_KEY`. An unresolved `${...}`
    /// placeholder counts as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.places
            .api_key
            .as_ref()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && !k.starts_with("${"))
            .or_else(|| std::env::var(crate::adapters::places_api::API_KEY_ENV).ok())
    }

    pub fn custom_profile(&self, source: &str) -> Option<&ListingProfile> {
        self.listings.iter().find(|p| p.source == source)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("run.location", &self.run.location)?;
        if self.run.sources.is_empty() {
            return Err(ScoutError::MissingConfigError {
                field: "run.sources".to_string(),
            });
        }
        for source in &self.run.sources {
            let known = source == "places"
                || ListingProfile::builtin(source).is_some()
                || self.custom_profile(source).is_some();
            if !known {
                return Err(ScoutError::InvalidConfigValueError {
                    field: "run.sources".to_string(),
                    value: source.clone(),
                    reason: "Unknown source. Use places, yell, golden_pages or a [[listings]] source"
                        .to_string(),
                });
            }
        }

        if self.jobs.is_empty() {
            return Err(ScoutError::MissingConfigError {
                field: "jobs".to_string(),
            });
        }
        for job in &self.jobs {
            validate_non_empty_string("jobs.category", &job.category)?;
            validate_positive_number("jobs.max_results", job.max_results, 1)?;
        }

        validate_delay_bounds("pacing", self.pacing.min_delay_secs, self.pacing.max_delay_secs)?;
        validate_delay_bounds(
            "pacing.analysis_delay_secs",
            self.pacing.analysis_delay_secs,
            self.pacing.analysis_delay_secs,
        )?;

        if let Some(secs) = self.places.page_delay_secs {
            validate_delay_bounds("places.page_delay_secs", secs, secs)?;
        }
        if let Some(url) = &self.places.search_url {
            validate_url("places.search_url", url)?;
        }
        if let Some(url) = &self.places.details_url {
            validate_url("places.details_url", url)?;
        }

        for profile in &self.listings {
            profile.validate()?;
        }

        validate_positive_number("fetcher.timeout_secs", self.fetcher.timeout_secs as usize, 1)?;
        validate_range("scoring.alt_text_ratio", self.scoring.alt_text_ratio, 0.0, 1.0)?;
        validate_range("scoring.min_contact_signals", self.scoring.min_contact_signals, 1, 5)?;
        validate_range(
            "scoring.recent_copyright_years",
            self.scoring.recent_copyright_years,
            0,
            100,
        )?;
        validate_range(
            "scoring.needs_website_threshold",
            self.scoring.needs_website_threshold,
            0,
            30,
        )?;

        validate_path("output.path", &self.output.path)?;
        validate_non_empty_string("output.businesses_file", &self.output.businesses_file)?;
        validate_non_empty_string("output.scored_file", &self.output.scored_file)?;

        Ok(())
    }
}

impl Validate for ScoutConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
