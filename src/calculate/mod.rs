//! Statistics calculation over a parsed batch of games.
//!
//! - **notable**: per-collection VP maxima and notability flags
//! - **aggregate**: places, winner margin, ordering and win streaks
//! - **records**: dashboard summary records (players, awards, corporations)

pub mod aggregate;
pub mod notable;
pub mod records;

pub use aggregate::aggregate;
pub use notable::{
    flag_notable, notable_collection_records, CollectionMaxima, NotableCollectionRecord,
    NotableRules,
};
pub use records::{CorporationCountTally, CorporationStats, PlayerStats, Records};

/// Game builders for calculation tests.
#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::{Game, PlayerData, Players, VpCard};
    use crate::parse::filename::game_date;

    /// A game whose players finished in the given (name, score, mc) order.
    pub fn game(file_name: &str, results: &[(&str, i32, i32)]) -> Game {
        let mut players = Players::new();
        for (name, score, mc) in results {
            let p = players.entry_or_insert(name, PlayerData::new(*name));
            p.final_score = Some(*score);
            p.mega_credits = Some(*mc);
        }

        Game {
            id: file_name.trim_end_matches(".html").to_string(),
            date_of_game: game_date(file_name).unwrap(),
            generations: 10,
            player_count: players.len(),
            players,
            streak_count: 0,
            file_name: file_name.to_string(),
            url: format!("file:///data/{}", file_name),
        }
    }

    /// A one-player game holding the given VP cards.
    pub fn game_with_cards(file_name: &str, cards: Vec<VpCard>) -> Game {
        let mut g = game(file_name, &[("Solo", 50, 0)]);
        if let Some(p) = g.players.nth_mut(0) {
            p.vp_cards = cards;
        }
        g
    }
}
