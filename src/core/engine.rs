use crate::core::analysis::{AnalysisReport, AnalysisSummary};
use crate::core::discovery::DiscoverySummary;
use crate::domain::model::Business;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

pub struct ScoutEngine<P: Pipeline> {
    pipeline: P,
}

#[derive(Debug, Clone)]
pub struct DiscoverOutcome {
    pub summary: DiscoverySummary,
    pub businesses_path: String,
}

#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    pub summary: AnalysisSummary,
    pub report: AnalysisReport,
    pub scored_path: String,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub discovery: DiscoverOutcome,
    pub analysis: ScoreOutcome,
}

impl<P: Pipeline> ScoutEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn discover(&self) -> Result<DiscoverOutcome> {
        Ok(self.discover_and_save().await?.0)
    }

    /// Scores businesses previously saved to `input` (relative to the storage root).
    pub async fn score(&self, input: &str) -> Result<ScoreOutcome> {
        let businesses = self.pipeline.read_businesses(input).await?;
        tracing::info!("📥 Loaded {} businesses from {}", businesses.len(), input);
        self.analyze_and_save(businesses).await
    }

    pub async fn run(&self) -> Result<RunOutcome> {
        tracing::info!("🚀 Starting lead scouting run");
        let (discovery, businesses) = self.discover_and_save().await?;
        let analysis = self.analyze_and_save(businesses).await?;
        Ok(RunOutcome {
            discovery,
            analysis,
        })
    }

    async fn discover_and_save(&self) -> Result<(DiscoverOutcome, Vec<Business>)> {
        let run = self.pipeline.discover().await?;
        let summary = run.summary();
        tracing::info!(
            "✅ Discovery complete: {} businesses, {} with website ({:.1}%)",
            summary.total,
            summary.with_website,
            summary.website_percentage
        );
        if summary.failed_searches > 0 {
            tracing::warn!("⚠️ {} searches failed", summary.failed_searches);
        }

        let businesses_path = self.pipeline.load_businesses(&run.businesses).await?;
        tracing::info!("📁 Businesses saved to: {}", businesses_path);

        Ok((
            DiscoverOutcome {
                summary,
                businesses_path,
            },
            run.businesses,
        ))
    }

    async fn analyze_and_save(&self, businesses: Vec<Business>) -> Result<ScoreOutcome> {
        tracing::info!("🔬 Analyzing {} businesses", businesses.len());
        let report = self.pipeline.analyze(businesses).await?;
        let summary = report.summary();
        tracing::info!(
            "✅ Analysis complete: {} need a website, mean score {:.1}",
            summary.needs_website,
            summary.mean_score
        );

        let scored_path = self.pipeline.load_scored(&report).await?;
        tracing::info!("📁 Scored leads saved to: {}", scored_path);

        Ok(ScoreOutcome {
            summary,
            report,
            scored_path,
        })
    }
}
