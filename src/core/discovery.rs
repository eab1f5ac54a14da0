use crate::core::normalize::normalize;
use crate::core::pacing::pause;
use crate::domain::model::{Business, DiscoveryJob, JobReport, JobState};
use crate::domain::ports::{PacingPolicy, SourceAdapter};
use crate::utils::error::{Result, ScoutError};
use serde::Serialize;

/// Runs discovery jobs one after another across every configured source.
pub struct DiscoveryOrchestrator {
    adapters: Vec<Box<dyn SourceAdapter>>,
    pacer: Box<dyn PacingPolicy>,
    location: String,
}

#[derive(Debug, Clone)]
pub struct DiscoveryRun {
    pub businesses: Vec<Business>,
    pub jobs: Vec<JobReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscoverySummary {
    pub total: usize,
    pub with_website: usize,
    pub without_website: usize,
    pub website_percentage: f64,
    pub jobs_run: usize,
    pub failed_searches: usize,
}

impl DiscoveryRun {
    pub fn summary(&self) -> DiscoverySummary {
        let total = self.businesses.len();
        let with_website = self.businesses.iter().filter(|b| b.has_website()).count();
        let website_percentage = if total > 0 {
            with_website as f64 / total as f64 * 100.0
        } else {
            0.0
        };

        DiscoverySummary {
            total,
            with_website,
            without_website: total - with_website,
            website_percentage,
            jobs_run: self
                .jobs
                .iter()
                .filter(|j| j.state == JobState::Done)
                .count(),
            failed_searches: self.jobs.iter().map(|j| j.failures.len()).sum(),
        }
    }
}

impl DiscoveryOrchestrator {
    pub fn new(
        adapters: Vec<Box<dyn SourceAdapter>>,
        pacer: Box<dyn PacingPolicy>,
        location: impl Into<String>,
    ) -> Result<Self> {
        if adapters.is_empty() {
            return Err(ScoutError::config("At least one source must be enabled"));
        }
        Ok(Self {
            adapters,
            pacer,
            location: location.into(),
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Executes every job in order. A failing source only empties its own
    /// contribution to the job; the run always completes.
    pub async fn run(&self, jobs: &[DiscoveryJob]) -> DiscoveryRun {
        let mut reports: Vec<JobReport> = jobs
            .iter()
            .map(|job| JobReport {
                job: job.clone(),
                state: JobState::Pending,
                found: 0,
                failures: Vec::new(),
            })
            .collect();

        let mut businesses = Vec::new();
        let mut first_request = true;
        let total_jobs = reports.len();

        for (index, report) in reports.iter_mut().enumerate() {
            report.state = JobState::Running;
            tracing::info!(
                "📊 Job {}/{}: {} ({} businesses)",
                index + 1,
                total_jobs,
                report.job.category,
                report.job.max_results
            );

            let mut job_businesses: Vec<Business> = Vec::new();
            for adapter in &self.adapters {
                let remaining = report.job.max_results.saturating_sub(job_businesses.len());
                if remaining == 0 {
                    break;
                }

                if !first_request {
                    pause(self.pacer.as_ref()).await;
                }
                first_request = false;

                match adapter
                    .search(&report.job.category, &self.location, remaining)
                    .await
                {
                    Ok(raw) => {
                        job_businesses.extend(raw.into_iter().take(remaining).map(normalize));
                    }
                    Err(e) => {
                        tracing::error!(
                            "❌ {} failed for '{}': {}",
                            adapter.name(),
                            report.job.category,
                            e
                        );
                        report.failures.push(format!("{}: {}", adapter.name(), e));
                    }
                }
            }

            report.found = job_businesses.len();
            report.state = JobState::Done;
            tracing::info!(
                "   Found: {} businesses, total so far: {}",
                report.found,
                businesses.len() + report.found
            );
            businesses.extend(job_businesses);
        }

        DiscoveryRun {
            businesses,
            jobs: reports,
        }
    }
}
