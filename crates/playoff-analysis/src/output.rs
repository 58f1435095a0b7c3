// Flat-file output: derived CSV tables and the JSON run summary.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::data::schema::CHAMPION;
use crate::data::table::SeasonTable;

pub const CLEANED_FILE: &str = "states_dataframe_clean.csv";
pub const THREE_POINT_ROWS_FILE: &str = "three_point_data.csv";
pub const THREE_POINT_TREND_FILE: &str = "three_point_trend_team.csv";
pub const TEAM_SEASON_3PT_FILE: &str = "yearly_team_3pt_pct_champions.csv";
pub const STAR_FILE: &str = "star_player_influence.csv";
pub const SUMMARY_FILE: &str = "analysis_summary.json";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error writing {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Output directory
// ---------------------------------------------------------------------------

/// A validated, existing output directory.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Create the directory (and parents) if needed.
    pub fn prepare(root: &Path) -> Result<Self, OutputError> {
        std::fs::create_dir_all(root).map_err(|e| OutputError::CreateDir {
            path: root.display().to_string(),
            source: e,
        })?;
        Ok(OutputDir {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn writer(&self, name: &str) -> Result<(csv::Writer<std::fs::File>, PathBuf), OutputError> {
        let path = self.file(name);
        let writer = csv::Writer::from_path(&path).map_err(|e| OutputError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok((writer, path))
    }

    /// Write serializable rows with a header derived from the row type.
    pub fn write_rows<T: Serialize>(&self, name: &str, rows: &[T]) -> Result<PathBuf, OutputError> {
        let (mut writer, path) = self.writer(name)?;
        let csv_err = |e: csv::Error| OutputError::Csv {
            path: path.display().to_string(),
            source: e,
        };
        for row in rows {
            writer.serialize(row).map_err(csv_err)?;
        }
        writer.flush().map_err(|e| OutputError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        info!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(path)
    }

    /// Write the cleaned table: every input column plus the champion flag.
    pub fn write_cleaned(&self, table: &SeasonTable) -> Result<PathBuf, OutputError> {
        let (mut writer, path) = self.writer(CLEANED_FILE)?;
        let csv_err = |e: csv::Error| OutputError::Csv {
            path: path.display().to_string(),
            source: e,
        };

        writer
            .write_record(table.headers.iter().chain(std::iter::once(CHAMPION)))
            .map_err(csv_err)?;
        for row in &table.rows {
            let flag = if row.champion { "true" } else { "false" };
            writer
                .write_record(row.raw.iter().chain(std::iter::once(flag)))
                .map_err(csv_err)?;
        }
        writer.flush().map_err(|e| OutputError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        info!("Wrote cleaned table ({} rows) to {}", table.len(), path.display());
        Ok(path)
    }

    /// Write a pretty-printed JSON document.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, OutputError> {
        let path = self.file(name);
        let json = serde_json::to_string_pretty(value).map_err(|e| OutputError::Json {
            path: path.display().to_string(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| OutputError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::clean::clean;
    use crate::data::champions::FIRST_SEASON;
    use crate::data::table::{load_from_reader, load_table};
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("playoff_output_{name}"));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[derive(Serialize)]
    struct Row {
        season: i32,
        #[serde(rename = "Percentage")]
        pct: Option<f64>,
    }

    #[test]
    fn prepare_creates_nested_directory() {
        let dir = scratch_dir("nested").join("a/b");
        let out = OutputDir::prepare(&dir).unwrap();
        assert!(out.root().is_dir());
    }

    #[test]
    fn rows_written_with_header_and_empty_missing_values() {
        let out = OutputDir::prepare(&scratch_dir("rows")).unwrap();
        let rows = [
            Row {
                season: 1996,
                pct: Some(0.5),
            },
            Row {
                season: 1997,
                pct: None,
            },
        ];
        let path = out.write_rows("rows.csv", &rows).unwrap();
        let text = fs::read_to_string(path).unwrap();
        assert_eq!(text, "season,Percentage\n1996,0.5\n1997,\n");
    }

    #[test]
    fn cleaned_table_reloads_identically() {
        let csv_data = "\
pos,player,season,team_id,mp_per_g,fg3_per_g,fg3a_per_g,fg3_pct,ts_pct,per,bpm,obpm,dbpm,ws
SG,Michael Jordan,1996.0,CHI,37.7,1.4,3.2,0.427,0.582,29.4,11.6,8.9,2.7,20.4
C,Patrick Ewing,1996,NYK,36.6,0.1,0.3,0.143,0.542,22.5,3.3,1.9,1.4,9.5";
        let (cleaned, _) = clean(load_from_reader(csv_data.as_bytes(), "test").unwrap(), FIRST_SEASON);

        let out = OutputDir::prepare(&scratch_dir("cleaned")).unwrap();
        let path = out.write_cleaned(&cleaned).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("pos,player,season,team_id,"));
        assert!(text.contains("SG,Michael Jordan,1996,CHI,"));
        assert!(text.lines().next().unwrap().ends_with(",ws,champion"));

        let (again, stats) = clean(load_table(&path).unwrap(), FIRST_SEASON);
        assert_eq!(again, cleaned);
        assert_eq!(stats.output_rows, 2);
    }

    #[test]
    fn json_written() {
        let out = OutputDir::prepare(&scratch_dir("json")).unwrap();
        let path = out
            .write_json("summary.json", &serde_json::json!({ "stars": 3 }))
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["stars"], 3);
    }
}
