//! Stats pipeline over the snapshot directory.
//!
//! files -> parsed games -> collection maxima -> notable flags
//!       -> places/margins -> newest-first order -> streaks

use tracing::{info, warn};

use crate::calculate::{aggregate, flag_notable, CollectionMaxima, NotableRules};
use crate::config::{AppConfig, ConfigError};
use crate::models::Game;
use crate::normalize::PlayerAliases;
use crate::parse::parse_game;
use crate::storage::{DataDir, StorageError};

/// Lookup tables built once at startup and shared by every scan.
#[derive(Debug, Clone, Default)]
pub struct StatsContext {
    pub aliases: PlayerAliases,
    pub collections: Vec<String>,
    pub rules: NotableRules,
}

impl StatsContext {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let aliases = config.player_aliases()?;
        if aliases.is_empty() {
            warn!("No player aliases configured; names are used as written");
        } else {
            info!("Loaded {} player aliases", aliases.len());
        }

        Ok(Self {
            aliases,
            collections: config.notable.collections.clone(),
            rules: (&config.notable).into(),
        })
    }
}

/// A file that was left out of the batch.
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: String,
}

/// Result of one full scan.
#[derive(Debug)]
pub struct ScanReport {
    /// Newest first
    pub games: Vec<Game>,
    pub maxima: CollectionMaxima,
    pub skipped: Vec<SkippedFile>,
}

/// Parse every snapshot, then run the batch-wide passes.
///
/// A file that cannot be read or parsed is logged and skipped; only a
/// missing or unreadable directory fails the scan.
pub fn scan(data: &DataDir, ctx: &StatsContext) -> Result<ScanReport, StorageError> {
    let files = data.list_snapshots()?;
    info!("Scanning {} snapshots in {}", files.len(), data.path.display());

    let mut games = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();

    for path in &files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let parsed = data
            .read_snapshot(path)
            .map_err(|e| e.to_string())
            .and_then(|html| {
                parse_game(&file_name, path, &html, &ctx.aliases).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(game) => games.push(game),
            Err(reason) => {
                warn!("Skipping {}: {}", file_name, reason);
                skipped.push(SkippedFile { file_name, reason });
            }
        }
    }

    let maxima = CollectionMaxima::from_games(&games, &ctx.collections);
    flag_notable(&mut games, &maxima, &ctx.rules);
    aggregate(&mut games);

    info!("Processed {} games ({} skipped)", games.len(), skipped.len());

    Ok(ScanReport {
        games,
        maxima,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::fixtures::{document, vp_section, Row};
    use std::path::Path;

    fn row(name: &'static str, score: i32) -> Row<'static> {
        Row {
            name,
            corps: &["Ecoline"],
            tr: 30,
            greenery: 5,
            city: 5,
            vp: 10,
            score,
            mc: 10,
            timer: "30:00",
            actions: 50,
        }
    }

    fn write(dir: &Path, name: &str, winner: &'static str, loser: &'static str, tail: &str) {
        let html = document(&[row(winner, 90).html(false), row(loser, 75).html(false)], false, tail);
        std::fs::write(dir.join(name), html).unwrap();
    }

    fn context() -> StatsContext {
        StatsContext::from_config(&AppConfig::default()).unwrap()
    }

    #[test]
    fn test_single_game_scenario() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "01-15-2024-a.html", "Vic", "Amy", "");

        let report = scan(&DataDir::new(tmp.path().to_path_buf()), &context()).unwrap();
        assert_eq!(report.games.len(), 1);

        let game = &report.games[0];
        assert_eq!(game.date_of_game.to_rfc3339(), "2024-01-15T06:00:00+00:00");
        assert_eq!(game.player_count, 2);
        assert_eq!(game.players.names().collect::<Vec<_>>(), vec!["Victor", "Amy"]);
        assert_eq!(game.players.get("Victor").unwrap().final_score, Some(90));
        assert_eq!(game.players.get("Amy").unwrap().final_score, Some(75));
        assert_eq!(
            game.players.get("Victor").unwrap().ahead_by.map(|a| a.score),
            Some(15)
        );
        assert_eq!(game.players.get("Amy").unwrap().game_place, 2);
        assert_eq!(game.streak_count, 1);
    }

    #[test]
    fn test_consecutive_wins_scenario() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "01-15-2024-a.html", "Vic", "Amy", "");
        write(tmp.path(), "01-16-2024-a.html", "VicVic", "Ming", "");

        let report = scan(&DataDir::new(tmp.path().to_path_buf()), &context()).unwrap();
        assert_eq!(report.games.len(), 2);
        assert_eq!(report.games[0].file_name, "01-16-2024-a.html");
        assert_eq!(report.games[0].streak_count, 2);
        assert_eq!(report.games[1].file_name, "01-15-2024-a.html");
        assert_eq!(report.games[1].streak_count, 1);
    }

    #[test]
    fn test_bad_files_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "01-15-2024-a.html", "Vic", "Amy", "");
        write(tmp.path(), "data.html", "Vic", "Amy", "");
        let broken = format!(
            r#"{}<div class="game-end-column-text">orphan</div>"#,
            vp_section(&[("3", "Fish")])
        );
        write(tmp.path(), "01-17-2024-a.html", "Amy", "Vic", &broken);

        let report = scan(&DataDir::new(tmp.path().to_path_buf()), &context()).unwrap();
        assert_eq!(report.games.len(), 1);

        let mut skipped: Vec<&str> = report.skipped.iter().map(|s| s.file_name.as_str()).collect();
        skipped.sort();
        assert_eq!(skipped, vec!["01-17-2024-a.html", "data.html"]);
    }

    #[test]
    fn test_notable_flags_across_files() {
        let tmp = tempfile::tempdir().unwrap();
        let small = format!("{}{}", vp_section(&[("4", "Birds")]), vp_section(&[]));
        let big = format!("{}{}", vp_section(&[("12", "Birds")]), vp_section(&[]));
        write(tmp.path(), "01-15-2024-a.html", "Vic", "Amy", &small);
        write(tmp.path(), "01-16-2024-a.html", "Vic", "Amy", &big);

        let report = scan(&DataDir::new(tmp.path().to_path_buf()), &context()).unwrap();
        assert_eq!(report.maxima.get("Birds"), Some(12));

        let newest = &report.games[0].players.get("Victor").unwrap().vp_cards[0];
        assert!(newest.is_notable && newest.is_top);
        let oldest = &report.games[1].players.get("Victor").unwrap().vp_cards[0];
        assert!(!oldest.is_notable);
    }

    #[test]
    fn test_context_from_config() {
        let ctx = context();
        assert!(!ctx.aliases.is_empty());
        assert_eq!(ctx.aliases.canonical("VicVic"), "Victor");
        assert_eq!(ctx.rules.window, 5);
        assert!(ctx.collections.iter().any(|c| c == "Tardigrades"));

        let mut bare = AppConfig::default();
        bare.players.clear();
        assert_eq!(StatsContext::from_config(&bare).unwrap().aliases.len(), 0);
    }

    #[test]
    fn test_missing_directory_fails() {
        let data = DataDir::new(std::path::PathBuf::from("/no/such/dir"));
        assert!(scan(&data, &context()).is_err());
    }
}
