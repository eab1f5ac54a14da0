use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker some sources (and older exports) use in place of an empty website.
pub const NO_WEBSITE: &str = "NO_WEBSITE";

pub const UNKNOWN_NAME: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    Dentist,
    Plumber,
    Cafe,
    Hotel,
    Electrician,
    Doctor,
    Lawyer,
    Accountant,
    Hairdresser,
    Builder,
    Retail,
    Other,
}

impl Category {
    /// Taxonomy order; also the priority order used when inferring a category.
    pub const ALL: [Category; 13] = [
        Category::Restaurant,
        Category::Dentist,
        Category::Plumber,
        Category::Cafe,
        Category::Hotel,
        Category::Electrician,
        Category::Doctor,
        Category::Lawyer,
        Category::Accountant,
        Category::Hairdresser,
        Category::Builder,
        Category::Retail,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::Dentist => "dentist",
            Category::Plumber => "plumber",
            Category::Cafe => "cafe",
            Category::Hotel => "hotel",
            Category::Electrician => "electrician",
            Category::Doctor => "doctor",
            Category::Lawyer => "lawyer",
            Category::Accountant => "accountant",
            Category::Hairdresser => "hairdresser",
            Category::Builder => "builder",
            Category::Retail => "retail",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a source described the kind of business before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawCategory {
    /// Provider type tags, e.g. `["dental_clinic", "health"]`.
    Types(Vec<String>),
    /// Free-form label, usually the search term the listing was found under.
    Label(String),
    #[default]
    Missing,
}

/// Partially-filled record as produced by a source adapter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub name: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub category: RawCategory,
    pub location: Option<String>,
    pub source: String,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub name: String,
    pub address: String,
    pub website: String,
    pub phone: String,
    pub category: Category,
    pub location: String,
    pub source: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub reviews: Option<u64>,
    #[serde(default)]
    pub place_id: Option<String>,
}

impl Business {
    pub fn has_website(&self) -> bool {
        let website = self.website.trim();
        !website.is_empty() && website != NO_WEBSITE
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u32,
    pub has_website: bool,
    pub needs_website: bool,
    pub details: Vec<String>,
    pub url: Option<String>,
}

impl ScoreResult {
    pub fn details_joined(&self) -> String {
        self.details.join(" | ")
    }

    /// Rebuilds the score from the `+N` suffixes in `details`.
    pub fn points_from_details(&self) -> u32 {
        self.details
            .iter()
            .filter_map(|d| d.rsplit_once(": +"))
            .filter_map(|(_, points)| points.trim().parse::<u32>().ok())
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredBusiness {
    pub business: Business,
    pub result: ScoreResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryJob {
    pub category: String,
    pub max_results: usize,
}

impl DiscoveryJob {
    pub fn new(category: impl Into<String>, max_results: usize) -> Self {
        Self {
            category: category.into(),
            max_results,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Pending,
    Running,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub job: DiscoveryJob,
    pub state: JobState,
    pub found: usize,
    pub failures: Vec<String>,
}
