// Three-point shooting: league trend per season, team-season efficiency,
// correlations, and the high-volume shooter comparison.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::data::table::SeasonTable;
use crate::stats::{mean, median, pearson, round_to};

// ---------------------------------------------------------------------------
// Output rows
// ---------------------------------------------------------------------------

/// Per-row 3PT projection with missing values filled as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreePointRow {
    pub player: String,
    pub season: i32,
    pub fg3_per_g: f64,
    pub fg3a_per_g: f64,
    pub fg3_pct: f64,
    pub champion: bool,
}

/// League-wide 3PT volume for one season.
///
/// Makes and attempts are sums of per-game averages, so `percentage` is an
/// approximation of the true attempt-weighted rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonTrend {
    pub season: i32,
    #[serde(rename = "Makes")]
    pub makes: f64,
    #[serde(rename = "Attempts")]
    pub attempts: f64,
    /// `None` when the season has no attempts.
    #[serde(rename = "Percentage")]
    pub percentage: Option<f64>,
}

/// 3PT volume and accuracy for one team in one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSeason {
    pub season: i32,
    pub team_id: String,
    #[serde(rename = "Attempts")]
    pub attempts: f64,
    /// Mean of the players' 3P%, `None` when no player has one.
    #[serde(rename = "Percentage")]
    pub percentage: Option<f64>,
    #[serde(rename = "Champion")]
    pub champion: bool,
}

/// Headline 3PT statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreePointSummary {
    /// corr(3PT makes per game, win shares), 4 decimals.
    pub makes_vs_ws: Option<f64>,
    /// corr(TS%, 3P%), 4 decimals.
    pub ts_vs_3p: Option<f64>,
    /// Median attempts per game; rows strictly above it are high volume.
    pub high_volume_threshold: Option<f64>,
    pub high_volume_rows: usize,
    /// Mean 3P% of high-volume shooters on champion teams, 3 decimals.
    pub high_volume_champion_pct: Option<f64>,
    /// Mean 3P% of high-volume shooters on other teams, 3 decimals.
    pub high_volume_non_champion_pct: Option<f64>,
}

/// Everything the three-point stage produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ThreePointAnalysis {
    pub rows: Vec<ThreePointRow>,
    pub trend: Vec<SeasonTrend>,
    pub team_seasons: Vec<TeamSeason>,
    pub summary: ThreePointSummary,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TeamAccumulator {
    attempts: f64,
    pct: Vec<f64>,
    champion: bool,
}

/// Per-row projection; rows without a season are skipped.
pub fn project_rows(table: &SeasonTable) -> Vec<ThreePointRow> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            Some(ThreePointRow {
                player: row.player.clone().unwrap_or_default(),
                season: row.season?,
                fg3_per_g: row.fg3_per_g.unwrap_or(0.0),
                fg3a_per_g: row.fg3a_per_g.unwrap_or(0.0),
                fg3_pct: row.fg3_pct.unwrap_or(0.0),
                champion: row.champion,
            })
        })
        .collect()
}

/// League totals per season, ordered by season.
pub fn season_trend(rows: &[ThreePointRow]) -> Vec<SeasonTrend> {
    let mut by_season: BTreeMap<i32, (f64, f64)> = BTreeMap::new();
    for row in rows {
        let entry = by_season.entry(row.season).or_default();
        entry.0 += row.fg3_per_g;
        entry.1 += row.fg3a_per_g;
    }
    by_season
        .into_iter()
        .map(|(season, (makes, attempts))| SeasonTrend {
            season,
            makes,
            attempts,
            percentage: (attempts > 0.0).then(|| makes / attempts),
        })
        .collect()
}

/// Team-season aggregates, ordered by season then team.
///
/// Missing attempts are skipped in the sum and missing percentages are
/// skipped in the mean.
pub fn team_seasons(table: &SeasonTable) -> Vec<TeamSeason> {
    let mut groups: BTreeMap<(i32, String), TeamAccumulator> = BTreeMap::new();
    for row in &table.rows {
        let Some((season, team)) = row.key() else {
            continue;
        };
        let acc = groups.entry((season, team.to_string())).or_default();
        acc.attempts += row.fg3a_per_g.unwrap_or(0.0);
        acc.pct.extend(row.fg3_pct);
        acc.champion |= row.champion;
    }
    groups
        .into_iter()
        .map(|((season, team_id), acc)| TeamSeason {
            season,
            team_id,
            attempts: acc.attempts,
            percentage: mean(&acc.pct),
            champion: acc.champion,
        })
        .collect()
}

fn filled(values: impl Iterator<Item = Option<f64>>) -> Vec<f64> {
    values.map(|v| v.unwrap_or(0.0)).collect()
}

/// Run the full three-point stage over a cleaned table.
pub fn analyze(table: &SeasonTable) -> ThreePointAnalysis {
    let rows = project_rows(table);
    let trend = season_trend(&rows);
    let team_seasons = team_seasons(table);

    let makes = filled(table.rows.iter().map(|r| r.fg3_per_g));
    let ws = filled(table.rows.iter().map(|r| r.ws));
    let ts = filled(table.rows.iter().map(|r| r.ts_pct));
    let pct = filled(table.rows.iter().map(|r| r.fg3_pct));
    let makes_vs_ws = pearson(&makes, &ws).map(|r| round_to(r, 4));
    let ts_vs_3p = pearson(&ts, &pct).map(|r| round_to(r, 4));

    let attempts: Vec<f64> = rows.iter().map(|r| r.fg3a_per_g).collect();
    let threshold = median(&attempts);
    let high_volume: Vec<&ThreePointRow> = match threshold {
        Some(t) => rows.iter().filter(|r| r.fg3a_per_g > t).collect(),
        None => Vec::new(),
    };
    debug!(
        "High-volume threshold {:?}: {} of {} rows",
        threshold,
        high_volume.len(),
        rows.len()
    );
    let split_mean = |champion: bool| {
        let pct: Vec<f64> = high_volume
            .iter()
            .filter(|r| r.champion == champion)
            .map(|r| r.fg3_pct)
            .collect();
        mean(&pct).map(|m| round_to(m, 3))
    };

    let summary = ThreePointSummary {
        makes_vs_ws,
        ts_vs_3p,
        high_volume_threshold: threshold,
        high_volume_rows: high_volume.len(),
        high_volume_champion_pct: split_mean(true),
        high_volume_non_champion_pct: split_mean(false),
    };
    info!(
        "Three-point analysis: {} seasons, {} team-seasons",
        trend.len(),
        team_seasons.len()
    );

    ThreePointAnalysis {
        rows,
        trend,
        team_seasons,
        summary,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
