// Batch pipeline: load -> clean -> three independent analyses -> summary.
//
// The cleaned table is produced once and then only borrowed, so the three
// analyses cannot observe each other's work.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::analysis::clean::{self, CleaningStats};
use crate::analysis::offense_defense::{self, OffenseDefenseSummary};
use crate::analysis::star_influence::{self, StarSummary};
use crate::analysis::three_point::{self, ThreePointSummary};
use crate::analysis::AnalysisError;
use crate::config::{self, Config, ConfigError};
use crate::data::table::{self, LoadError, SeasonTable};
use crate::output::{self, OutputDir, OutputError};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

// ---------------------------------------------------------------------------
// Step reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CleaningReport {
    pub stats: CleaningStats,
    pub saved_to: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThreePointReport {
    pub summary: ThreePointSummary,
    pub seasons: usize,
    pub team_seasons: usize,
    pub saved_to: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StarReport {
    pub summary: StarSummary,
    pub saved_to: PathBuf,
}

/// Everything one run produced, in step order.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub generated_at: DateTime<Utc>,
    pub input: String,
    pub cleaning: CleaningReport,
    pub three_point: ThreePointReport,
    pub offense_defense: OffenseDefenseSummary,
    pub star_influence: StarReport,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

pub struct Pipeline {
    config: Config,
    output: OutputDir,
}

impl Pipeline {
    /// Validate `config` and prepare the output directory.
    pub fn new(config: Config) -> Result<Self, PipelineError> {
        config::validate(&config)?;
        let output = OutputDir::prepare(Path::new(&config.output.directory))?;
        Ok(Pipeline { config, output })
    }

    pub fn output_dir(&self) -> &Path {
        self.output.root()
    }

    /// Read the configured input CSV.
    pub fn load(&self) -> Result<SeasonTable, PipelineError> {
        let path = Path::new(&self.config.data_paths.input);
        let table = table::load_table(path)?;
        info!("Loaded {} rows from {}", table.len(), path.display());
        Ok(table)
    }

    /// Clean the raw table and persist the result.
    pub fn clean(&self, raw: SeasonTable) -> Result<(SeasonTable, CleaningReport), PipelineError> {
        let (cleaned, stats) = clean::clean(raw, self.config.cleaning.min_season);
        if cleaned.is_empty() {
            return Err(AnalysisError::EmptyDataset { stage: "cleaning" }.into());
        }
        let saved_to = self.output.write_cleaned(&cleaned)?;
        Ok((cleaned, CleaningReport { stats, saved_to }))
    }

    pub fn three_point(&self, table: &SeasonTable) -> Result<ThreePointReport, PipelineError> {
        let analysis = three_point::analyze(table);
        let saved_to = vec![
            self.output
                .write_rows(output::THREE_POINT_ROWS_FILE, &analysis.rows)?,
            self.output
                .write_rows(output::THREE_POINT_TREND_FILE, &analysis.trend)?,
            self.output
                .write_rows(output::TEAM_SEASON_3PT_FILE, &analysis.team_seasons)?,
        ];
        Ok(ThreePointReport {
            summary: analysis.summary,
            seasons: analysis.trend.len(),
            team_seasons: analysis.team_seasons.len(),
            saved_to,
        })
    }

    pub fn offense_defense(&self, table: &SeasonTable) -> OffenseDefenseSummary {
        offense_defense::analyze(table)
    }

    pub fn star_influence(&self, table: &SeasonTable) -> Result<StarReport, PipelineError> {
        let result = star_influence::analyze(table)?;
        let saved_to = self.output.write_rows(output::STAR_FILE, &result.top)?;
        Ok(StarReport {
            summary: result.summary,
            saved_to,
        })
    }

    /// Run every step in order and write the JSON summary.
    pub fn run(&self) -> Result<PipelineReport, PipelineError> {
        let raw = self.load()?;
        let (cleaned, cleaning) = self.clean(raw)?;

        let three_point = self.three_point(&cleaned)?;
        let offense_defense = self.offense_defense(&cleaned);
        let star_influence = self.star_influence(&cleaned)?;

        let report = PipelineReport {
            generated_at: Utc::now(),
            input: self.config.data_paths.input.clone(),
            cleaning,
            three_point,
            offense_defense,
            star_influence,
        };
        let summary_path = self.output.write_json(output::SUMMARY_FILE, &report)?;
        info!("Run summary written to {}", summary_path.display());

        Ok(report)
    }
}
