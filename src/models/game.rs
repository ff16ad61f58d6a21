//! Game and per-player result models.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::{Award, Milestone, VpCard};

/// Elapsed clock time a player used over the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Timer {
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
        }
    }

    /// Parse "MM:SS" or "H:MM:SS".
    ///
    /// Any other shape, or a non-numeric part, yields a zero timer.
    pub fn parse(s: &str) -> Self {
        let parts: Option<Vec<u32>> = s
            .trim()
            .split(':')
            .map(|p| p.trim().parse::<u32>().ok())
            .collect();

        match parts.as_deref() {
            Some([minutes, seconds]) => Self::new(0, *minutes, *seconds),
            Some([hours, minutes, seconds]) => Self::new(*hours, *minutes, *seconds),
            _ => {
                tracing::debug!("Unrecognized timer value '{}'", s);
                Self::default()
            }
        }
    }
}

/// Winner's lead over second place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AheadBy {
    pub score: i32,
    pub mega_credits: i32,
}

/// One player's outcome within a game.
///
/// Numeric columns that fail to parse stay `None` and serialize as `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerData {
    pub display_name: String,
    pub final_score: Option<i32>,
    pub terraforming_rating: Option<i32>,
    pub greenery_points: Option<i32>,
    pub city_points: Option<i32>,
    pub victory_points: Option<i32>,
    pub mega_credits: Option<i32>,
    pub timer: Timer,
    pub actions_taken: Option<i32>,

    /// First entry is the starting corporation, the rest were merged in
    pub corporations: Vec<String>,
    pub vp_cards: Vec<VpCard>,
    pub milestones: Vec<Milestone>,
    pub awards: Vec<Award>,

    /// 1-indexed finishing place
    pub game_place: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ahead_by: Option<AheadBy>,
}

impl PlayerData {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Default::default()
        }
    }
}

/// Canonical player name -> result, kept in finishing order.
///
/// Serializes as a JSON object whose key order is the finishing order.
#[derive(Debug, Clone, Default)]
pub struct Players(Vec<(String, PlayerData)>);

impl Players {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&PlayerData> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    /// Entry for `name`, appended at the end if not already present.
    pub fn entry_or_insert(&mut self, name: &str, data: PlayerData) -> &mut PlayerData {
        let idx = match self.0.iter().position(|(n, _)| n == name) {
            Some(i) => i,
            None => {
                self.0.push((name.to_string(), data));
                self.0.len() - 1
            }
        };
        &mut self.0[idx].1
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PlayerData)> {
        self.0.iter().map(|(n, p)| (n.as_str(), p))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut PlayerData)> {
        self.0.iter_mut().map(|(n, p)| (n.as_str(), p))
    }

    /// Player at finishing position `index` (0 = winner).
    pub fn nth(&self, index: usize) -> Option<(&str, &PlayerData)> {
        self.0.get(index).map(|(n, p)| (n.as_str(), p))
    }

    pub fn nth_mut(&mut self, index: usize) -> Option<&mut PlayerData> {
        self.0.get_mut(index).map(|(_, p)| p)
    }

    pub fn winner(&self) -> Option<(&str, &PlayerData)> {
        self.nth(0)
    }
}

impl Serialize for Players {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, player) in &self.0 {
            map.serialize_entry(name, player)?;
        }
        map.end()
    }
}

/// One saved game-result snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    /// Server game id from the log download link, empty if absent
    pub id: String,
    pub date_of_game: DateTime<Utc>,
    pub generations: u32,
    pub player_count: usize,
    pub players: Players,

    /// Consecutive wins by this game's winner, ending at this game
    pub streak_count: u32,
    pub file_name: String,
    pub url: String,
}

impl Game {
    /// Ordering token from the filename ("01-15-2024-b.html" -> "b.html").
    pub fn sequence_token(&self) -> &str {
        self.file_name.split('-').nth(3).unwrap_or("0")
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.players.winner().map(|(name, _)| name)
    }
}
