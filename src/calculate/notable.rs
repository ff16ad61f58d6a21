//! Notable VP collections.
//!
//! A collection card (Birds, Fish, ...) is notable relative to the best
//! score any player reached with it across the whole batch. Maxima are
//! folded over every game first, then every card is flagged against them.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::NotableConfig;
use crate::models::{Game, VpCardType};

/// Best notable score for one collection and who set it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotableCollectionRecord {
    pub collection: String,
    pub vp: i32,
    pub player: String,
    pub game_id: String,
    pub date_of_game: DateTime<Utc>,
}

/// Collection name -> highest VP across the batch (0 when never scored).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionMaxima(HashMap<String, i32>);

impl CollectionMaxima {
    pub fn from_games(games: &[Game], collections: &[String]) -> Self {
        let start: HashMap<String, i32> = collections.iter().map(|c| (c.clone(), 0)).collect();

        let maxima = games
            .iter()
            .flat_map(|game| game.players.iter())
            .flat_map(|(_, player)| player.vp_cards.iter())
            .fold(start, |mut acc, card| {
                if let (Some(best), Some(vp)) = (acc.get_mut(&card.card_name), card.vp) {
                    *best = (*best).max(vp);
                }
                acc
            });

        Self(maxima)
    }

    pub fn get(&self, collection: &str) -> Option<i32> {
        self.0.get(collection).copied()
    }

}

/// Thresholds for flagging a collection card.
#[derive(Debug, Clone)]
pub struct NotableRules {
    pub window: i32,
    pub exception: String,
}

impl Default for NotableRules {
    fn default() -> Self {
        (&NotableConfig::default()).into()
    }
}

impl From<&NotableConfig> for NotableRules {
    fn from(config: &NotableConfig) -> Self {
        Self {
            window: config.window,
            exception: config.exception.clone(),
        }
    }
}

impl NotableRules {
    /// Within `window` of the max, and above 2 VP (above 0 for the exception card).
    pub fn is_notable(&self, card_name: &str, vp: i32, max: i32) -> bool {
        let floor = if card_name == self.exception { 0 } else { 2 };
        vp >= max - self.window && vp > floor
    }
}

/// Flag notable collection cards and tag milestone/award entries.
pub fn flag_notable(games: &mut [Game], maxima: &CollectionMaxima, rules: &NotableRules) {
    let cards = games
        .iter_mut()
        .flat_map(|game| game.players.iter_mut())
        .flat_map(|(_, player)| player.vp_cards.iter_mut());

    for card in cards {
        if let (Some(max), Some(vp)) = (maxima.get(&card.card_name), card.vp) {
            if rules.is_notable(&card.card_name, vp, max) {
                card.is_notable = true;
                card.is_top = vp == max;
            }
        }

        if card.card_name.contains("milestone") {
            card.vp_type = Some(VpCardType::Milestone);
        }
        if card.card_name.contains("1st place") {
            card.vp_type = Some(VpCardType::Award);
        }
    }
}

/// Record holder per collection among flagged cards, by collection name.
///
/// Games are walked in the given order; the first card to reach a
/// collection's best score keeps the record.
pub fn notable_collection_records(games: &[Game]) -> Vec<NotableCollectionRecord> {
    let records = games
        .iter()
        .flat_map(|game| {
            game.players.iter().flat_map(move |(name, player)| {
                player.vp_cards.iter().map(move |card| (game, name, card))
            })
        })
        .filter(|(_, _, card)| card.is_notable)
        .fold(
            BTreeMap::<String, NotableCollectionRecord>::new(),
            |mut acc, (game, name, card)| {
                let Some(vp) = card.vp else {
                    return acc;
                };
                let beaten = acc.get(&card.card_name).map_or(true, |best| vp > best.vp);
                if beaten {
                    acc.insert(
                        card.card_name.clone(),
                        NotableCollectionRecord {
                            collection: card.card_name.clone(),
                            vp,
                            player: name.to_string(),
                            game_id: game.id.clone(),
                            date_of_game: game.date_of_game,
                        },
                    );
                }
                acc
            },
        );

    records.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::test_support::game_with_cards;
    use crate::models::VpCard;

    fn collections() -> Vec<String> {
        ["Birds", "Fish", "Tardigrades"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn cards(list: &[(&str, i32)]) -> Vec<VpCard> {
        list.iter()
            .map(|(name, vp)| VpCard::new(Some(*vp), *name))
            .collect()
    }

    #[test]
    fn test_maxima_fold_over_batch() {
        let games = vec![
            game_with_cards("01-01-2024-a.html", cards(&[("Birds", 4), ("Fish", 3)])),
            game_with_cards("01-02-2024-a.html", cards(&[("Birds", 9), ("Ants", 40)])),
        ];
        let maxima = CollectionMaxima::from_games(&games, &collections());

        assert_eq!(maxima.get("Birds"), Some(9));
        assert_eq!(maxima.get("Fish"), Some(3));
        assert_eq!(maxima.get("Tardigrades"), Some(0));
        assert_eq!(maxima.get("Ants"), None);
    }

    #[test]
    fn test_is_notable_rule() {
        let rules = NotableRules::default();
        assert!(rules.is_notable("Birds", 9, 9));
        assert!(rules.is_notable("Birds", 4, 9));
        assert!(!rules.is_notable("Birds", 3, 9));
        assert!(!rules.is_notable("Birds", 2, 2));
        assert!(rules.is_notable("Tardigrades", 1, 2));
        assert!(!rules.is_notable("Tardigrades", 0, 0));
    }

    #[test]
    fn test_flagging_uses_global_max() {
        let mut games = vec![
            game_with_cards(
                "01-01-2024-a.html",
                cards(&[("Birds", 5), ("Fish", 2), ("Tardigrades", 1)]),
            ),
            game_with_cards("01-02-2024-a.html", cards(&[("Birds", 10)])),
        ];
        let maxima = CollectionMaxima::from_games(&games, &collections());
        flag_notable(&mut games, &maxima, &NotableRules::default());

        let first = &games[0].players.nth(0).unwrap().1.vp_cards;
        // 5 >= 10 - 5
        assert!(first[0].is_notable);
        assert!(!first[0].is_top);
        // Fish max is 2, but 2 VP is below the floor
        assert!(!first[1].is_notable);
        assert!(!first[1].is_top);
        // Exception card counts from 1 VP
        assert!(first[2].is_notable);
        assert!(first[2].is_top);

        let second = &games[1].players.nth(0).unwrap().1.vp_cards;
        assert!(second[0].is_notable);
        assert!(second[0].is_top);
    }

    #[test]
    fn test_vp_type_tagging() {
        let mut games = vec![game_with_cards(
            "01-01-2024-a.html",
            cards(&[
                ("Claimed Mayor milestone", 5),
                ("1st place for Banker award (funded by Amy)", 5),
                ("2nd place for Miner award (funded by Amy)", 2),
            ]),
        )];
        let maxima = CollectionMaxima::from_games(&games, &collections());
        flag_notable(&mut games, &maxima, &NotableRules::default());

        let c = &games[0].players.nth(0).unwrap().1.vp_cards;
        assert_eq!(c[0].vp_type, Some(VpCardType::Milestone));
        assert_eq!(c[1].vp_type, Some(VpCardType::Award));
        assert_eq!(c[2].vp_type, None);
        assert!(!c[0].is_notable);
    }

    #[test]
    fn test_collection_records_keep_first_holder() {
        let mut games = vec![
            game_with_cards("01-03-2024-a.html", cards(&[("Fish", 7), ("Birds", 4)])),
            game_with_cards("01-02-2024-a.html", cards(&[("Fish", 7)])),
            game_with_cards("01-01-2024-a.html", cards(&[("Birds", 8), ("Fish", 1)])),
        ];
        games[0].id = "newest".to_string();
        games[2].id = "oldest".to_string();
        let maxima = CollectionMaxima::from_games(&games, &collections());
        flag_notable(&mut games, &maxima, &NotableRules::default());

        let records = notable_collection_records(&games);
        let names: Vec<&str> = records.iter().map(|r| r.collection.as_str()).collect();
        assert_eq!(names, vec!["Birds", "Fish"]);

        assert_eq!(records[0].vp, 8);
        assert_eq!(records[0].game_id, "oldest");
        assert_eq!(records[0].player, "Solo");

        assert_eq!(records[1].vp, 7);
        assert_eq!(records[1].game_id, "newest");
        assert_eq!(records[1].date_of_game, games[0].date_of_game);
    }
}
