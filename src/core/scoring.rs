//! Website quality rubric.
//!
//! Rules are evaluated in a fixed order, each contributing a fixed number of
//! points at most once. The markup is lower-cased once up front and every
//! textual check runs against that copy.
//!
//! | # | Rule | Points |
//! |---|------|--------|
//! | 1 | URL uses `https://` | 2 |
//! | 2 | viewport meta marker | 3 |
//! | 3 | modern front-end framework token | 3 |
//! | 4 | legacy technology (informational) | 0 |
//! | 5 | copyright year within the recency window | 3 |
//! | 6 | image alt-text ratio above threshold | 2 |
//! | 7 | enough distinct contact signals | 2 |
//! | 8 | social media link | 2 |
//! | 9 | CSS framework / font service | 3 |

use crate::core::fetcher::FetchError;
use crate::domain::model::ScoreResult;
use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const MAX_SCORE: u32 = 30;

const MODERN_FRAMEWORKS: &[&str] = &["react", "vue", "angular", "next.js", "nuxt.js", "svelte"];
const LEGACY_TECH: &[&str] = &["jquery", "flash", "marquee", "<table> for layout", "frameset"];
const SOCIAL_DOMAINS: &[&str] = &["facebook.com", "twitter.com", "instagram.com", "linkedin.com"];
const CSS_INDICATORS: &[&str] = &["bootstrap", "tailwind", "material", "font-awesome", "google-fonts"];

// ASCII digits only: a year written in another script is skipped, not parsed.
static COPYRIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"copyright.*?([0-9]{4})").expect("copyright pattern is valid"));

static CONTACT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"contact.*?form",
        r"@.*?\.(com|ie|eu)",
        r"phone",
        r"tel:",
        r"email",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("contact pattern is valid"))
    .collect()
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    /// Share of `<img` tags that must carry `alt=` (strictly greater than).
    pub alt_text_ratio: f64,
    /// Distinct contact patterns required for the contact rule.
    pub min_contact_signals: usize,
    /// Scores below this flag the business as needing a website.
    pub needs_website_threshold: u32,
    /// A copyright year counts as recent when `year >= current - recent_copyright_years`.
    pub recent_copyright_years: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alt_text_ratio: 0.5,
            min_contact_signals: 2,
            needs_website_threshold: 15,
            recent_copyright_years: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Https,
    Viewport,
    ModernFramework,
    LegacyTech,
    RecentCopyright,
    ImageAltText,
    ContactInfo,
    SocialMedia,
    CssFramework,
}

impl Rule {
    pub const ORDER: [Rule; 9] = [
        Rule::Https,
        Rule::Viewport,
        Rule::ModernFramework,
        Rule::LegacyTech,
        Rule::RecentCopyright,
        Rule::ImageAltText,
        Rule::ContactInfo,
        Rule::SocialMedia,
        Rule::CssFramework,
    ];

    pub fn points(&self) -> u32 {
        match self {
            Rule::Https => 2,
            Rule::Viewport => 3,
            Rule::ModernFramework => 3,
            Rule::LegacyTech => 0,
            Rule::RecentCopyright => 3,
            Rule::ImageAltText => 2,
            Rule::ContactInfo => 2,
            Rule::SocialMedia => 2,
            Rule::CssFramework => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rule::Https => "HTTPS/SSL",
            Rule::Viewport => "Mobile viewport",
            Rule::ModernFramework => "Modern framework",
            Rule::LegacyTech => "Old tech found",
            Rule::RecentCopyright => "Recent copyright",
            Rule::ImageAltText => "Good image alt text",
            Rule::ContactInfo => "Contact info present",
            Rule::SocialMedia => "Social media links",
            Rule::CssFramework => "CSS framework",
        }
    }
}

/// Outcome of a single rule: `None` when it did not fire, otherwise an
/// optional note that goes in parentheses after the label.
type RuleHit = Option<Option<String>>;

#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores fetched markup against the current calendar year.
    pub fn score_html(&self, html: &str, url: &str) -> ScoreResult {
        self.score_html_at(html, url, chrono::Local::now().year())
    }

    /// Scores fetched markup as if evaluated in `current_year`.
    pub fn score_html_at(&self, html: &str, url: &str, current_year: i32) -> ScoreResult {
        let page = html.to_lowercase();
        let mut total = 0u32;
        let mut details = Vec::new();

        for rule in Rule::ORDER {
            if let Some(note) = self.evaluate(rule, &page, url, current_year) {
                let points = rule.points();
                total += points;
                match note {
                    Some(note) => details.push(format!("{} ({}): +{}", rule.label(), note, points)),
                    None => details.push(format!("{}: +{}", rule.label(), points)),
                }
            }
        }

        let score = total.min(MAX_SCORE);
        ScoreResult {
            score,
            has_website: true,
            needs_website: score < self.config.needs_website_threshold,
            details,
            url: Some(url.to_string()),
        }
    }

    /// Result for a business whose website could not be used for scoring.
    pub fn unusable(&self, url: &str, error: &FetchError) -> ScoreResult {
        let url = url.trim();
        ScoreResult {
            score: 0,
            has_website: false,
            needs_website: true,
            details: vec![error.diagnostic()],
            url: if url.is_empty() {
                None
            } else {
                Some(url.to_string())
            },
        }
    }

    /// Combines a fetch outcome with the rubric.
    pub fn score_fetch(&self, url: &str, fetched: &Result<String, FetchError>) -> ScoreResult {
        match fetched {
            Ok(html) => self.score_html(html, url),
            Err(e) => self.unusable(url, e),
        }
    }

    fn evaluate(&self, rule: Rule, page: &str, url: &str, current_year: i32) -> RuleHit {
        match rule {
            Rule::Https => url.starts_with("https://").then_some(None),
            Rule::Viewport => page.contains("viewport").then_some(None),
            Rule::ModernFramework => contains_any(page, MODERN_FRAMEWORKS).then_some(None),
            Rule::LegacyTech => {
                let found: Vec<&str> = LEGACY_TECH
                    .iter()
                    .copied()
                    .filter(|tech| page.contains(tech))
                    .collect();
                (!found.is_empty()).then(|| Some(found.join(", ")))
            }
            Rule::RecentCopyright => {
                let year: i32 = COPYRIGHT_RE
                    .captures(page)
                    .and_then(|caps| caps.get(1))
                    .and_then(|m| m.as_str().parse().ok())?;
                (year >= current_year.saturating_sub(self.config.recent_copyright_years))
                    .then(|| Some(year.to_string()))
            }
            Rule::ImageAltText => {
                let images = page.matches("<img").count();
                if images == 0 {
                    return None;
                }
                let with_alt = page.matches("alt=").count();
                (with_alt as f64 / images as f64 > self.config.alt_text_ratio).then_some(None)
            }
            Rule::ContactInfo => {
                let signals = CONTACT_PATTERNS.iter().filter(|re| re.is_match(page)).count();
                (signals >= self.config.min_contact_signals).then_some(None)
            }
            Rule::SocialMedia => contains_any(page, SOCIAL_DOMAINS).then_some(None),
            Rule::CssFramework => contains_any(page, CSS_INDICATORS).then_some(None),
        }
    }
}

fn contains_any(page: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| page.contains(needle))
}
