//! Game-result snapshot parsing.
//!
//! Turns one saved end-of-game HTML page into a [`Game`]:
//! - **results_table**: the per-player score table
//! - **vp_breakdown**: per-player VP card, milestone and award sections
//! - **filename**: game date from the `MM-DD-YYYY-seq.html` naming scheme
//!
//! The page format belongs to the game server. Class names are matched
//! exactly; when they change, fields come back empty rather than failing.

pub mod filename;
pub mod results_table;
pub mod vp_breakdown;

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Game, PlayerData, Players};
use crate::normalize::PlayerAliases;

/// Errors that fail a whole snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Filename '{0}' does not start with a MM-DD-YYYY date")]
    InvalidFileDate(String),

    #[error(
        "VP section {section}: {vp_count} values and {text_count} labels, but only {pairs} pairs"
    )]
    VpPairMismatch {
        section: usize,
        vp_count: usize,
        text_count: usize,
        pairs: usize,
    },
}

/// Parse an integer the way a lenient form reader would: optional leading
/// whitespace and sign, then digits; anything after the digits is ignored.
pub fn parse_leading_int(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let n: i32 = rest[..end].parse().ok()?;
    Some(if negative { -n } else { n })
}

fn game_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"logs\?id=(.*?)&amp;full=true""#).unwrap())
}

/// Server game id from the "Download game log" link.
pub fn extract_game_id(html: &str) -> Option<String> {
    game_id_re()
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Number of generations played: highest generation indicator + 1.
pub fn count_generations(document: &Html) -> u32 {
    let gen_sel = Selector::parse("div.log-gen-indicator").unwrap();

    let highest = document
        .select(&gen_sel)
        .filter_map(|el| parse_leading_int(&el.text().collect::<String>()))
        .filter(|g| *g > 0)
        .max()
        .unwrap_or(0);

    highest as u32 + 1
}

/// Parse one snapshot into a game with players in finishing order.
///
/// Streaks, places and margins are left for the batch aggregation.
pub fn parse_game(
    file_name: &str,
    path: &Path,
    html: &str,
    aliases: &PlayerAliases,
) -> Result<Game, ParseError> {
    let date_of_game = filename::game_date(file_name)?;
    let document = Html::parse_document(html);

    let table = results_table::parse_results(&document, html);
    let mut players = Players::new();
    for row in table.rows {
        let key = aliases.canonical(&row.display_name);
        // A repeated identity keeps its first position and display name.
        let entry = players.entry_or_insert(&key, PlayerData::new(row.display_name.clone()));
        *entry = PlayerData {
            display_name: std::mem::take(&mut entry.display_name),
            ..row
        };
    }
    debug!(
        "{}: {} players, {} raw rows",
        file_name,
        players.len(),
        table.raw_rows.len()
    );

    let id = extract_game_id(html).unwrap_or_default();

    // Sections follow table order; nothing in a section names its player.
    let sections = vp_breakdown::parse_sections(html, aliases, &id)?;
    if sections.len() != players.len() {
        warn!(
            "{}: {} VP sections for {} players, matching by position",
            file_name,
            sections.len(),
            players.len()
        );
    }
    for (i, section) in sections.into_iter().enumerate() {
        let Some(player) = players.nth_mut(i) else {
            break;
        };
        player.vp_cards = section.vp_cards;
        player.milestones = section.milestones;
        player.awards = section.awards;
    }

    Ok(Game {
        id,
        date_of_game,
        generations: count_generations(&document),
        player_count: players.len(),
        players,
        streak_count: 0,
        file_name: file_name.to_string(),
        url: format!("file://{}", path.display()),
    })
}
