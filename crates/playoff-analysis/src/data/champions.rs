// Static season -> NBA champion lookup.

/// First season covered by the champion table.
pub const FIRST_SEASON: i32 = 1992;

/// Champion team identifiers, one per season starting at `FIRST_SEASON`.
const CHAMPIONS: [&str; 31] = [
    "CHI", "CHI", "HOU", "HOU", "CHI", "CHI", "CHI", // 1992-1998
    "SAS", "LAL", "LAL", "LAL", "SAS", "DET", "SAS", "MIA", // 1999-2006
    "SAS", "BOS", "LAL", "LAL", "DAL", "MIA", "MIA", "SAS", // 2007-2014
    "GSW", "CLE", "GSW", "GSW", "TOR", "LAL", "MIL", "GSW", // 2015-2022
];

/// Last season covered by the champion table.
pub const LAST_SEASON: i32 = FIRST_SEASON + CHAMPIONS.len() as i32 - 1;

/// Returns the champion team identifier for `season`, or `None` when the
/// season is outside the table.
pub fn champion_for(season: i32) -> Option<&'static str> {
    let offset = usize::try_from(season.checked_sub(FIRST_SEASON)?).ok()?;
    CHAMPIONS.get(offset).copied()
}

/// Whether `team_id` won the title in `season`.
///
/// Team identifiers are compared trimmed and case-insensitively. Seasons
/// missing from the table never produce a champion.
pub fn is_champion(team_id: &str, season: i32) -> bool {
    champion_for(season).is_some_and(|champ| team_id.trim().eq_ignore_ascii_case(champ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_1992_through_2022() {
        assert_eq!(LAST_SEASON, 2022);
        assert_eq!(champion_for(1992), Some("CHI"));
        assert_eq!(champion_for(2022), Some("GSW"));
    }

    #[test]
    fn bulls_three_peaks() {
        for season in [1992, 1993, 1996, 1997, 1998] {
            assert!(is_champion("CHI", season), "CHI should win {season}");
        }
        assert!(!is_champion("CHI", 1994));
        assert!(!is_champion("CHI", 1995));
    }

    #[test]
    fn spot_check_later_seasons() {
        assert_eq!(champion_for(2004), Some("DET"));
        assert_eq!(champion_for(2011), Some("DAL"));
        assert_eq!(champion_for(2016), Some("CLE"));
        assert_eq!(champion_for(2019), Some("TOR"));
        assert_eq!(champion_for(2021), Some("MIL"));
    }

    #[test]
    fn seasons_outside_table_have_no_champion() {
        assert_eq!(champion_for(1991), None);
        assert_eq!(champion_for(2023), None);
        assert_eq!(champion_for(i32::MIN), None);
        assert!(!is_champion("GSW", 2023));
    }

    #[test]
    fn team_comparison_is_trimmed_and_case_insensitive() {
        assert!(is_champion(" chi ", 1996));
        assert!(is_champion("Lal", 2020));
        assert!(!is_champion("", 1996));
    }
}
