// Star player influence: composite z-score of PER, BPM and WS, the top
// player per team-season, and how often those stars won the title.

use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::AnalysisError;
use crate::data::table::SeasonTable;
use crate::stats::{mean, round_to, zscores};

/// A fully populated row of the star projection.
#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    season: i32,
    team_id: String,
    player: String,
    mp_per_g: f64,
    per: f64,
    bpm: f64,
    ws: f64,
    champion: bool,
}

/// The top composite player of one team-season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarRow {
    pub season: i32,
    pub team_id: String,
    pub player: String,
    pub mp_per_g: f64,
    pub per: f64,
    pub bpm: f64,
    pub ws: f64,
    pub champion: bool,
    pub per_z: f64,
    pub bpm_z: f64,
    pub ws_z: f64,
    #[serde(rename = "Composite")]
    pub composite: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarSummary {
    /// Team-seasons with a selected star.
    pub stars: usize,
    /// Share of stars whose team won the title, 3 decimals.
    pub championship_rate: f64,
    /// Mean composite of champion-team stars, 3 decimals.
    pub champion_avg_composite: Option<f64>,
    /// Mean composite of the remaining stars, 3 decimals.
    pub non_champion_avg_composite: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StarInfluence {
    pub top: Vec<StarRow>,
    pub summary: StarSummary,
}

/// Strict projection: any missing field drops the row.
fn candidates(table: &SeasonTable) -> Vec<Candidate> {
    table
        .rows
        .iter()
        .filter_map(|row| {
            Some(Candidate {
                season: row.season?,
                team_id: row.team_id.clone()?,
                player: row.player.clone()?,
                mp_per_g: row.mp_per_g?,
                per: row.per?,
                bpm: row.bpm?,
                ws: row.ws?,
                champion: row.champion,
            })
        })
        .collect()
}

/// Score every candidate and keep the highest composite per team-season.
///
/// Scores are z-scored over the whole filtered population, so a stat with
/// zero variance contributes 0 for everyone. Ties keep the earlier row.
pub fn select_stars(table: &SeasonTable) -> Result<Vec<StarRow>, AnalysisError> {
    let pool = candidates(table);
    if pool.is_empty() {
        return Err(AnalysisError::EmptyDataset {
            stage: "star influence",
        });
    }
    debug!(
        "Star pool: {} of {} rows fully populated",
        pool.len(),
        table.len()
    );

    let per_z = zscores(&pool.iter().map(|c| c.per).collect::<Vec<_>>());
    let bpm_z = zscores(&pool.iter().map(|c| c.bpm).collect::<Vec<_>>());
    let ws_z = zscores(&pool.iter().map(|c| c.ws).collect::<Vec<_>>());

    let mut scored: Vec<StarRow> = pool
        .into_iter()
        .enumerate()
        .map(|(i, c)| StarRow {
            season: c.season,
            team_id: c.team_id,
            player: c.player,
            mp_per_g: c.mp_per_g,
            per: c.per,
            bpm: c.bpm,
            ws: c.ws,
            champion: c.champion,
            per_z: per_z[i],
            bpm_z: bpm_z[i],
            ws_z: ws_z[i],
            composite: (per_z[i] + bpm_z[i] + ws_z[i]) / 3.0,
        })
        .collect();

    // Stable sort keeps original order among equal composites.
    scored.sort_by(|a, b| {
        a.season
            .cmp(&b.season)
            .then_with(|| a.team_id.cmp(&b.team_id))
            .then_with(|| b.composite.total_cmp(&a.composite))
    });
    scored.dedup_by(|later, first| later.season == first.season && later.team_id == first.team_id);

    Ok(scored)
}

fn summarize(top: &[StarRow]) -> StarSummary {
    let composites = |champion: bool| -> Vec<f64> {
        top.iter()
            .filter(|s| s.champion == champion)
            .map(|s| s.composite)
            .collect()
    };
    let champ = composites(true);
    let non_champ = composites(false);

    let championship_rate = if top.is_empty() {
        0.0
    } else {
        round_to(champ.len() as f64 / top.len() as f64, 3)
    };

    StarSummary {
        stars: top.len(),
        championship_rate,
        champion_avg_composite: mean(&champ).map(|m| round_to(m, 3)),
        non_champion_avg_composite: mean(&non_champ).map(|m| round_to(m, 3)),
    }
}

/// Run the star influence stage over a cleaned table.
pub fn analyze(table: &SeasonTable) -> Result<StarInfluence, AnalysisError> {
    let top = select_stars(table)?;
    let summary = summarize(&top);
    info!(
        "Star influence: {} stars, championship rate {}",
        summary.stars, summary.championship_rate
    );
    Ok(StarInfluence { top, summary })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::clean::clean;
    use crate::data::champions::FIRST_SEASON;
    use crate::data::table::load_from_reader;

    const HEADER: &str =
        "player,season,team_id,mp_per_g,fg3_per_g,fg3a_per_g,fg3_pct,ts_pct,per,bpm,obpm,dbpm,ws";

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn cleaned(body: &str) -> SeasonTable {
        let csv_data = format!("{HEADER}\n{body}");
        let raw = load_from_reader(csv_data.as_bytes(), "test").unwrap();
        clean(raw, FIRST_SEASON).0
    }

    /// Two teams, one season, three players each.
    fn two_teams() -> SeasonTable {
        cleaned(
            "Hakeem Olajuwon,1995,HOU,38.9,0.1,0.3,0.188,0.563,25.2,6.9,3.6,3.3,11.3\n\
             Clyde Drexler,1995,HOU,34.8,1.6,4.4,0.357,0.566,21.1,5.6,4.3,1.3,7.1\n\
             Robert Horry,1995,HOU,32.1,1.2,3.4,0.373,0.541,13.6,2.4,0.7,1.7,4.8\n\
             Shaquille O'Neal,1995,ORL,37.0,0.0,0.0,,0.605,29.3,6.7,4.2,2.5,14.0\n\
             Penny Hardaway,1995,ORL,37.7,1.0,3.1,0.342,0.575,23.1,6.0,4.4,1.6,11.8\n\
             Nick Anderson,1995,ORL,34.2,2.2,5.5,0.415,0.567,16.5,3.1,2.6,0.5,7.8",
        )
    }

    #[test]
    fn top_player_per_team_is_highest_composite() {
        let top = select_stars(&two_teams()).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].team_id, "HOU");
        assert_eq!(top[0].player, "Hakeem Olajuwon");
        assert!(top[0].champion);
        assert_eq!(top[1].team_id, "ORL");
        assert_eq!(top[1].player, "Shaquille O'Neal");
        assert!(!top[1].champion);
    }

    #[test]
    fn composite_is_mean_of_zscores() {
        let top = select_stars(&two_teams()).unwrap();
        for star in &top {
            let expected = (star.per_z + star.bpm_z + star.ws_z) / 3.0;
            assert!(approx_eq(star.composite, expected, 1e-12));
        }
    }

    #[test]
    fn ties_resolve_to_first_row() {
        let table = cleaned(
            "First,2001,LAL,30,0,0,0,0.5,20,5,3,2,8\n\
             Second,2001,LAL,30,0,0,0,0.5,20,5,3,2,8\n\
             Other,2001,PHI,30,0,0,0,0.5,10,1,1,0,2",
        );
        let top = select_stars(&table).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].player, "First");
    }

    #[test]
    fn rows_with_missing_values_dropped() {
        let table = cleaned(
            "Starter,2001,LAL,30,0,0,0,0.5,20,5,3,2,8\n\
             Ghost,2001,LAL,30,0,0,0,0.5,40,,3,2,20",
        );
        let top = select_stars(&table).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].player, "Starter");
    }

    #[test]
    fn zero_variance_gives_zero_scores() {
        let table = cleaned(
            "A,2001,LAL,30,0,0,0,0.5,15,2,1,1,4\n\
             B,2001,PHI,30,0,0,0,0.5,15,2,1,1,4",
        );
        let top = select_stars(&table).unwrap();
        assert!(top.iter().all(|s| s.composite == 0.0 && s.per_z == 0.0));
    }

    #[test]
    fn empty_projection_is_named_error() {
        let table = cleaned("A,2001,LAL,,0,0,0,0.5,15,2,1,1,4");
        assert_eq!(
            select_stars(&table).unwrap_err(),
            AnalysisError::EmptyDataset {
                stage: "star influence"
            }
        );
    }

    #[test]
    fn summary_rates_and_means() {
        let result = analyze(&two_teams()).unwrap();
        let summary = &result.summary;
        assert_eq!(summary.stars, 2);
        assert_eq!(summary.championship_rate, 0.5);
        let champ = result.top[0].composite;
        let other = result.top[1].composite;
        assert_eq!(summary.champion_avg_composite, Some(round_to(champ, 3)));
        assert_eq!(summary.non_champion_avg_composite, Some(round_to(other, 3)));
    }

    #[test]
    fn output_ordered_by_season_then_team() {
        let table = cleaned(
            "A,2002,SAC,30,0,0,0,0.5,15,2,1,1,4\n\
             B,2001,PHI,30,0,0,0,0.5,18,3,1,2,6\n\
             C,2001,LAL,30,0,0,0,0.5,25,6,4,2,12",
        );
        let top = select_stars(&table).unwrap();
        let keys: Vec<(i32, &str)> = top.iter().map(|s| (s.season, s.team_id.as_str())).collect();
        assert_eq!(keys, vec![(2001, "LAL"), (2001, "PHI"), (2002, "SAC")]);
    }
}
