// Cleaning: champion annotation, key validation, and the season floor.

use serde::Serialize;
use tracing::{debug, info};

use crate::data::champions;
use crate::data::table::SeasonTable;

/// Row accounting for one cleaning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleaningStats {
    pub input_rows: usize,
    /// Rows dropped for a missing team or season.
    pub missing_keys: usize,
    /// Rows dropped for falling before the season floor.
    pub before_min_season: usize,
    pub output_rows: usize,
    pub champion_rows: usize,
}

/// Clean `table` in place and return it.
///
/// 1. Flag each row whose team won the title that season.
/// 2. Drop rows with a missing team or season.
/// 3. Keep only seasons at or after `min_season`.
///
/// Season cells are rewritten as plain integers so a persisted table reloads
/// to the same values. Seasons outside the champion lookup are kept with the
/// flag unset.
pub fn clean(mut table: SeasonTable, min_season: i32) -> (SeasonTable, CleaningStats) {
    let input_rows = table.len();
    let season_col = table.columns.season;

    for row in &mut table.rows {
        row.champion = match row.key() {
            Some((season, team)) => champions::is_champion(team, season),
            None => false,
        };
        if let Some(season) = row.season {
            let year = season.to_string();
            row.raw = row
                .raw
                .iter()
                .enumerate()
                .map(|(i, cell)| if i == season_col { year.as_str() } else { cell })
                .collect();
        }
    }

    table.rows.retain(|row| row.key().is_some());
    let missing_keys = input_rows - table.len();

    table
        .rows
        .retain(|row| row.season.is_some_and(|season| season >= min_season));
    let before_min_season = input_rows - missing_keys - table.len();

    let champion_rows = table.rows.iter().filter(|row| row.champion).count();
    debug!("{champion_rows} champion rows after cleaning");

    let stats = CleaningStats {
        input_rows,
        missing_keys,
        before_min_season,
        output_rows: table.len(),
        champion_rows,
    };
    info!(
        "Cleaned table: {} -> {} rows ({} missing team/season, {} before {})",
        stats.input_rows, stats.output_rows, stats.missing_keys, stats.before_min_season, min_season
    );

    (table, stats)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
