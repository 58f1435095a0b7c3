// Analysis stages: cleaning followed by three independent descriptive
// analyses over the cleaned table.

pub mod clean;
pub mod offense_defense;
pub mod star_influence;
pub mod three_point;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("{stage}: no rows left to analyse")]
    EmptyDataset { stage: &'static str },
}
