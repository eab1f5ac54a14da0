use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. Verbosity only raises this crate's level.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "lead_scout=debug,info"
    } else {
        "lead_scout=info,warn"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Human-readable progress lines for interactive runs.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .without_time()
                .compact(),
        )
        .init();
}

/// Line-delimited JSON logs for unattended runs (cron, CI), selected by
/// `--json-logs`. Each event carries its target and timestamp.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .flatten_event(true),
        )
        .init();
}
