//! Cross-game records for the dashboard summary.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::notable::{notable_collection_records, NotableCollectionRecord};
use crate::models::Game;

/// A winning victory-point total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpWin {
    pub player: String,
    pub vp: i32,
    pub game_id: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    pub name: String,
    pub count: u32,
}

/// One player's results across the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub name: String,
    pub plays: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub average_corporations: f64,

    /// Mean winning margin in points, 0 without a recorded margin
    pub average_lead: f64,
    pub max_streak: u32,
    pub last_win_id: Option<String>,
    pub last_win: Option<DateTime<Utc>>,
}

/// How often an award was placed in, and by whom.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardTally {
    pub name: String,
    pub total: u32,

    /// Share of all games, 0.0 to 1.0
    pub percent: f64,
    pub by_player: BTreeMap<String, u32>,
    pub most_placed_by: Option<NamedCount>,
}

/// Plays and wins for a corporation, whether started or merged in.
///
/// `main_*` count only games where it was the starting corporation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporationStats {
    pub name: String,
    pub plays: u32,
    pub wins: u32,
    pub main_plays: u32,
    pub main_wins: u32,
    pub win_rate: f64,
}

/// Games bucketed by how many corporations the winner held.
///
/// `plays` counts every seat in those games.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorporationCountTally {
    pub corporations: usize,
    pub wins: u32,
    pub plays: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Records {
    pub total_games: usize,
    pub lowest_vp_win: Option<VpWin>,
    pub highest_vp_win: Option<VpWin>,
    pub longest_streak: Option<NamedCount>,
    pub player_stats: Vec<PlayerStats>,
    pub awards: Vec<AwardTally>,
    /// Winner -> loser -> games
    pub match_ups: BTreeMap<String, BTreeMap<String, u32>>,
    pub corporations: Vec<CorporationStats>,
    pub wins_by_corporation_count: Vec<CorporationCountTally>,
    pub notable_collections: Vec<NotableCollectionRecord>,
}

impl Records {
    /// Summarize an aggregated, flagged batch (newest first).
    pub fn from_games(games: &[Game]) -> Self {
        Self {
            total_games: games.len(),
            lowest_vp_win: vp_win(games, |candidate, best| candidate < best),
            highest_vp_win: vp_win(games, |candidate, best| candidate > best),
            longest_streak: longest_streak(games),
            player_stats: player_stats(games),
            awards: award_tallies(games),
            match_ups: match_ups(games),
            corporations: corporation_stats(games),
            wins_by_corporation_count: wins_by_corporation_count(games),
            notable_collections: notable_collection_records(games),
        }
    }
}

fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole)
    }
}

/// First winner whose VP beats every earlier one under `better`.
fn vp_win(games: &[Game], better: impl Fn(i32, i32) -> bool) -> Option<VpWin> {
    let mut best: Option<VpWin> = None;

    for game in games {
        let Some((name, winner)) = game.players.winner() else {
            continue;
        };
        let Some(vp) = winner.victory_points else {
            continue;
        };
        if best.as_ref().map_or(true, |b| better(vp, b.vp)) {
            best = Some(VpWin {
                player: name.to_string(),
                vp,
                game_id: game.id.clone(),
                file_name: game.file_name.clone(),
            });
        }
    }

    best
}

fn longest_streak(games: &[Game]) -> Option<NamedCount> {
    games
        .iter()
        .filter(|g| g.streak_count > 0)
        .filter_map(|g| {
            g.winner_name().map(|name| NamedCount {
                name: name.to_string(),
                count: g.streak_count,
            })
        })
        .fold(None, |best: Option<NamedCount>, c| match best {
            Some(b) if b.count >= c.count => Some(b),
            _ => Some(c),
        })
}

#[derive(Default)]
struct PlayerTotals {
    plays: u32,
    wins: u32,
    corporations: usize,
    lead_sum: i64,
    lead_count: u32,
    max_streak: u32,
    last_win: Option<(DateTime<Utc>, String)>,
}

/// Per-player table, best win rate first; ties keep first-seen order.
fn player_stats(games: &[Game]) -> Vec<PlayerStats> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, PlayerTotals> = HashMap::new();

    for game in games {
        for (place, (name, data)) in game.players.iter().enumerate() {
            let t = totals.entry(name.to_string()).or_insert_with(|| {
                order.push(name.to_string());
                PlayerTotals::default()
            });

            t.plays += 1;
            t.corporations += data.corporations.len();

            if place == 0 {
                t.wins += 1;
                t.max_streak = t.max_streak.max(game.streak_count);
                if let Some(lead) = data.ahead_by {
                    t.lead_sum += i64::from(lead.score);
                    t.lead_count += 1;
                }
                let newer = t
                    .last_win
                    .as_ref()
                    .map_or(true, |(date, _)| game.date_of_game > *date);
                if newer {
                    t.last_win = Some((game.date_of_game, game.id.clone()));
                }
            }
        }
    }

    let mut stats: Vec<PlayerStats> = order
        .into_iter()
        .filter_map(|name| {
            let t = totals.remove(&name)?;
            let (last_win, last_win_id) = match t.last_win {
                Some((date, id)) => (Some(date), Some(id)),
                None => (None, None),
            };
            Some(PlayerStats {
                win_rate: ratio(t.wins, t.plays),
                average_corporations: if t.plays == 0 {
                    0.0
                } else {
                    t.corporations as f64 / f64::from(t.plays)
                },
                average_lead: if t.lead_count == 0 {
                    0.0
                } else {
                    t.lead_sum as f64 / f64::from(t.lead_count)
                },
                name,
                plays: t.plays,
                wins: t.wins,
                max_streak: t.max_streak,
                last_win_id,
                last_win,
            })
        })
        .collect();

    stats.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));
    stats
}

fn award_tallies(games: &[Game]) -> Vec<AwardTally> {
    // award -> players in first-placed order, with counts
    let mut by_award: HashMap<String, Vec<(String, u32)>> = HashMap::new();

    for game in games {
        for (player, data) in game.players.iter() {
            for award in &data.awards {
                let seen = by_award.entry(award.name.clone()).or_default();
                match seen.iter_mut().find(|(name, _)| name == player) {
                    Some((_, count)) => *count += 1,
                    None => seen.push((player.to_string(), 1)),
                }
            }
        }
    }

    let total_games = u32::try_from(games.len()).unwrap_or(u32::MAX);

    let mut tallies: Vec<AwardTally> = by_award
        .into_iter()
        .map(|(name, seen)| {
            let total = seen.iter().map(|(_, count)| count).sum();
            let most_placed_by = seen
                .iter()
                .fold(None, |best: Option<NamedCount>, (player, count)| match best {
                    Some(b) if b.count >= *count => Some(b),
                    _ => Some(NamedCount {
                        name: player.clone(),
                        count: *count,
                    }),
                });
            AwardTally {
                name,
                total,
                percent: ratio(total, total_games),
                by_player: seen.into_iter().collect(),
                most_placed_by,
            }
        })
        .collect();

    tallies.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    tallies
}

fn match_ups(games: &[Game]) -> BTreeMap<String, BTreeMap<String, u32>> {
    let mut out: BTreeMap<String, BTreeMap<String, u32>> = BTreeMap::new();

    for game in games {
        let Some(winner) = game.winner_name() else {
            continue;
        };
        let row = out.entry(winner.to_string()).or_default();
        for loser in game.players.names().skip(1) {
            *row.entry(loser.to_string()).or_insert(0) += 1;
        }
    }

    out
}

fn corporation_stats(games: &[Game]) -> Vec<CorporationStats> {
    let mut by_name: HashMap<String, CorporationStats> = HashMap::new();

    for game in games {
        for (place, (_, data)) in game.players.iter().enumerate() {
            for (slot, corp) in data.corporations.iter().enumerate() {
                let stats = by_name.entry(corp.clone()).or_insert_with(|| CorporationStats {
                    name: corp.clone(),
                    plays: 0,
                    wins: 0,
                    main_plays: 0,
                    main_wins: 0,
                    win_rate: 0.0,
                });
                let won = place == 0;
                let main = slot == 0;

                stats.plays += 1;
                stats.wins += u32::from(won);
                stats.main_plays += u32::from(main);
                stats.main_wins += u32::from(won && main);
            }
        }
    }

    let mut out: Vec<CorporationStats> = by_name
        .into_values()
        .map(|mut stats| {
            stats.win_rate = ratio(stats.wins, stats.plays);
            stats
        })
        .collect();
    out.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| a.plays.cmp(&b.plays))
            .then_with(|| a.name.cmp(&b.name))
    });
    out
}

fn wins_by_corporation_count(games: &[Game]) -> Vec<CorporationCountTally> {
    let mut buckets: BTreeMap<usize, (u32, u32)> = BTreeMap::new();

    for game in games {
        let Some((_, winner)) = game.players.winner() else {
            continue;
        };
        let (wins, plays) = buckets.entry(winner.corporations.len()).or_default();
        *wins += 1;
        *plays += u32::try_from(game.players.len()).unwrap_or(u32::MAX);
    }

    buckets
        .into_iter()
        .map(|(corporations, (wins, plays))| CorporationCountTally {
            corporations,
            wins,
            plays,
            win_rate: ratio(wins, plays),
        })
        .collect()
}
