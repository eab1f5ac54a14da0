use crate::config::toml_config::ScoutConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "lead-scout")]
#[command(about = "Find local businesses and score how badly they need a new website")]
pub struct CliConfig {
    #[arg(long, short, global = true, help = "Path to a TOML run configuration")]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Directory the CSV files are written to")]
    pub output_path: Option<String>,

    #[arg(long, global = true)]
    pub location: Option<String>,

    #[arg(long, global = true, value_delimiter = ',', help = "Sources to query, e.g. places,yell")]
    pub sources: Vec<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run discovery only and write the businesses CSV
    Discover,
    /// Score the websites of businesses read from a CSV file
    Score {
        #[arg(long, help = "Businesses CSV, relative to the output path")]
        input: String,
    },
    /// Discover, save, analyse and save the scored leads
    Run,
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }

    /// Loads the TOML file when given (built-in defaults otherwise) and applies
    /// the command-line overrides on top.
    pub fn load_scout_config(&self) -> Result<ScoutConfig> {
        let mut config = match &self.config {
            Some(path) => ScoutConfig::from_file(path)?,
            None => ScoutConfig::standard(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ScoutConfig) {
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if let Some(location) = &self.location {
            config.run.location = location.clone();
        }
        if !self.sources.is_empty() {
            config.run.sources = self.sources.clone();
        }
    }
}
