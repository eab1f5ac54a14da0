use clap::Parser;
use lead_scout::core::analysis::AnalysisReport;
use lead_scout::utils::error::{ErrorSeverity, ScoutError};
use lead_scout::utils::logger;
use lead_scout::{CliConfig, Command, LocalStorage, ScoutEngine, ScoutPipeline};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting lead-scout CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match cli.load_scout_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let storage = LocalStorage::new(config.output.path.clone());
    let pipeline = match ScoutPipeline::from_config(storage, &config) {
        Ok(pipeline) => pipeline,
        Err(e) => exit_with(e),
    };
    let engine = ScoutEngine::new(pipeline);
    let top = config.output.top_candidates;

    match cli.command() {
        Command::Discover => match engine.discover().await {
            Ok(outcome) => {
                let s = &outcome.summary;
                println!("✅ Discovery complete");
                println!(
                    "   {} businesses, {} with website ({:.1}%), {} without",
                    s.total, s.with_website, s.website_percentage, s.without_website
                );
                if s.failed_searches > 0 {
                    println!("   ⚠️ {} searches failed", s.failed_searches);
                }
                println!("📁 Output saved to: {}", outcome.businesses_path);
            }
            Err(e) => exit_with(e),
        },
        Command::Score { input } => match engine.score(&input).await {
            Ok(outcome) => {
                print_analysis(&outcome.report, top);
                println!("📁 Output saved to: {}", outcome.scored_path);
            }
            Err(e) => exit_with(e),
        },
        Command::Run => match engine.run().await {
            Ok(outcome) => {
                let d = &outcome.discovery.summary;
                println!(
                    "✅ Found {} businesses, {} with website ({:.1}%)",
                    d.total, d.with_website, d.website_percentage
                );
                print_analysis(&outcome.analysis.report, top);
                println!("📁 Businesses: {}", outcome.discovery.businesses_path);
                println!("📁 Scored leads: {}", outcome.analysis.scored_path);
            }
            Err(e) => exit_with(e),
        },
    }

    Ok(())
}

fn print_analysis(report: &AnalysisReport, top: usize) {
    let summary = report.summary();
    println!("✅ Analysis complete");
    println!("   Total businesses: {}", summary.total);
    println!("   With website: {}", summary.with_website);
    println!("   Need website: {}", summary.needs_website);
    println!("   Unreachable websites: {}", summary.fetch_failures);
    println!("   Mean score: {:.1}/30", summary.mean_score);

    let candidates = report.top_candidates(top);
    if !candidates.is_empty() {
        println!("🎯 Top candidates:");
        for entry in candidates {
            println!(
                "   {} ({}) - {}/30 - {}",
                entry.business.name,
                entry.business.category,
                entry.result.score,
                entry.result.details_joined()
            );
        }
    }
}

fn exit_with(e: ScoutError) -> ! {
    tracing::error!(
        "❌ Lead scouting failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
