//! Per-game derived fields and cross-game win streaks.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{AheadBy, Game};

/// Set `gamePlace` for every player and the winner's lead over second.
///
/// No lead is recorded for single-player games, when either side is
/// missing a score or mega-credit value, or when the difference overflows.
pub fn assign_places_and_margin(game: &mut Game) {
    let ahead_by = match (game.players.nth(0), game.players.nth(1)) {
        (Some((_, winner)), Some((_, second))) => match (
            winner.final_score,
            second.final_score,
            winner.mega_credits,
            second.mega_credits,
        ) {
            (Some(ws), Some(ss), Some(wm), Some(sm)) => {
                match (ws.checked_sub(ss), wm.checked_sub(sm)) {
                    (Some(score), Some(mega_credits)) => Some(AheadBy {
                        score,
                        mega_credits,
                    }),
                    _ => None,
                }
            }
            _ => None,
        },
        _ => None,
    };

    for (place, (_, player)) in game.players.iter_mut().enumerate() {
        player.game_place = place as u32 + 1;
    }

    if let Some(winner) = game.players.nth_mut(0) {
        winner.ahead_by = ahead_by;
    }
}

/// Newest first; same-day games by filename sequence token, highest first.
pub fn compare_newest_first(a: &Game, b: &Game) -> Ordering {
    b.date_of_game
        .cmp(&a.date_of_game)
        .then_with(|| b.sequence_token().cmp(a.sequence_token()))
}

pub fn sort_newest_first(games: &mut [Game]) {
    games.sort_by(compare_newest_first);
}

/// Fill `streakCount` for games sorted newest first.
///
/// Walks oldest to newest. Each participant's run resets unless they won;
/// a game's streak is its winner's run including that game.
pub fn compute_streaks(games: &mut [Game]) {
    let mut runs: HashMap<String, u32> = HashMap::new();

    for game in games.iter_mut().rev() {
        let Some(winner) = game.winner_name().map(str::to_string) else {
            game.streak_count = 0;
            continue;
        };

        for name in game.players.names() {
            let run = runs.entry(name.to_string()).or_insert(0);
            *run = if name == winner { *run + 1 } else { 0 };
        }

        game.streak_count = runs.get(&winner).copied().unwrap_or(0);
    }
}

/// Places, margins, ordering and streaks for a parsed batch.
pub fn aggregate(games: &mut [Game]) {
    for game in games.iter_mut() {
        assign_places_and_margin(game);
    }
    sort_newest_first(games);
    compute_streaks(games);
}
