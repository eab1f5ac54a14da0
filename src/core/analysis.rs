use crate::core::fetcher::{is_usable_url, FetchError, WebsiteFetcher};
use crate::core::pacing::pause;
use crate::core::scoring::ScoringEngine;
use crate::domain::model::{Business, ScoreResult, ScoredBusiness};
use crate::domain::ports::PacingPolicy;
use serde::Serialize;

/// Fetches and scores the website of each discovered business, one at a time.
pub struct LeadAnalyzer {
    fetcher: WebsiteFetcher,
    engine: ScoringEngine,
    pacer: Box<dyn PacingPolicy>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub total: usize,
    pub with_website: usize,
    pub needs_website: usize,
    pub fetch_failures: usize,
    pub mean_score: f64,
}

#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub scored: Vec<ScoredBusiness>,
    pub fetch_failures: usize,
}

impl AnalysisReport {
    pub fn summary(&self) -> AnalysisSummary {
        let total = self.scored.len();
        let with_website = self.scored.iter().filter(|s| s.result.has_website).count();
        let needs_website = self.scored.iter().filter(|s| s.result.needs_website).count();
        let mean_score = if total > 0 {
            self.scored.iter().map(|s| s.result.score as f64).sum::<f64>() / total as f64
        } else {
            0.0
        };

        AnalysisSummary {
            total,
            with_website,
            needs_website,
            fetch_failures: self.fetch_failures,
            mean_score,
        }
    }

    /// Businesses needing a website, weakest score first.
    pub fn top_candidates(&self, limit: usize) -> Vec<&ScoredBusiness> {
        let mut candidates: Vec<&ScoredBusiness> = self
            .scored
            .iter()
            .filter(|s| s.result.needs_website)
            .collect();
        candidates.sort_by_key(|s| s.result.score);
        candidates.truncate(limit);
        candidates
    }
}

impl LeadAnalyzer {
    pub fn new(fetcher: WebsiteFetcher, engine: ScoringEngine, pacer: Box<dyn PacingPolicy>) -> Self {
        Self {
            fetcher,
            engine,
            pacer,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub async fn analyze(&self, business: &Business) -> ScoreResult {
        let url = business.website.trim();
        let fetched = self.fetcher.fetch(url).await;

        match &fetched {
            Err(FetchError::NoWebsite) => {
                tracing::debug!("{} has no usable website", business.name)
            }
            Err(e) if e.is_transport() => {
                tracing::warn!("  Error analyzing {}: {}", url, e)
            }
            Err(e) => tracing::error!("  Unexpected error analyzing {}: {}", url, e),
            Ok(_) => {}
        }

        self.engine.score_fetch(url, &fetched)
    }

    pub async fn analyze_all(&self, businesses: Vec<Business>) -> AnalysisReport {
        let total = businesses.len();
        let mut scored = Vec::with_capacity(total);
        let mut fetch_failures = 0;
        let mut fetched_before = false;

        for (index, business) in businesses.into_iter().enumerate() {
            tracing::info!("{}/{}: {}", index + 1, total, business.name);

            let will_fetch = is_usable_url(&business.website);
            if will_fetch && fetched_before {
                pause(self.pacer.as_ref()).await;
            }
            fetched_before |= will_fetch;

            let result = self.analyze(&business).await;
            if will_fetch && !result.has_website {
                fetch_failures += 1;
            }
            scored.push(ScoredBusiness { business, result });
        }

        AnalysisReport {
            scored,
            fetch_failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetcher::DEFAULT_TIMEOUT;
    use crate::core::pacing::NoDelay;
    use crate::domain::model::Category;

    fn business(name: &str, website: &str) -> Business {
        Business {
            name: name.to_string(),
            address: String::new(),
            website: website.to_string(),
            phone: String::new(),
            category: Category::Restaurant,
            location: "Dublin, Ireland".to_string(),
            source: "test".to_string(),
            rating: None,
            reviews: None,
            place_id: None,
        }
    }

    fn scored(score: u32, has_website: bool) -> ScoredBusiness {
        ScoredBusiness {
            business: business("x", ""),
            result: ScoreResult {
                score,
                has_website,
                needs_website: !has_website || score < 15,
                details: vec![],
                url: None,
            },
        }
    }

    #[tokio::test]
    async fn test_missing_website_is_scored_without_request() {
        let analyzer = LeadAnalyzer::new(
            WebsiteFetcher::new(DEFAULT_TIMEOUT).unwrap(),
            ScoringEngine::default(),
            Box::new(NoDelay),
        );

        let report = analyzer
            .analyze_all(vec![business("A", ""), business("B", "NO_WEBSITE")])
            .await;

        assert_eq!(report.scored.len(), 2);
        assert_eq!(report.fetch_failures, 0);
        for entry in &report.scored {
            assert_eq!(entry.result.score, 0);
            assert!(!entry.result.has_website);
            assert!(entry.result.needs_website);
        }
    }

    #[test]
    fn test_summary_and_candidates() {
        let report = AnalysisReport {
            scored: vec![scored(20, true), scored(9, true), scored(0, false), scored(14, true)],
            fetch_failures: 1,
        };

        let summary = report.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.with_website, 3);
        assert_eq!(summary.needs_website, 3);
        assert!((summary.mean_score - 10.75).abs() < 1e-9);

        let top: Vec<u32> = report.top_candidates(2).iter().map(|s| s.result.score).collect();
        assert_eq!(top, vec![0, 9]);
    }

    #[test]
    fn test_empty_report_summary() {
        let report = AnalysisReport {
            scored: vec![],
            fetch_failures: 0,
        };
        assert_eq!(report.summary().mean_score, 0.0);
        assert!(report.top_candidates(5).is_empty());
    }
}
