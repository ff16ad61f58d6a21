//! Victory-point breakdown entries.

use serde::{Deserialize, Serialize};

/// What kind of scoring source a VP entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VpCardType {
    Milestone,
    Award,
}

/// One line of a player's end-of-game VP breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VpCard {
    pub vp: Option<i32>,
    pub card_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vp_type: Option<VpCardType>,
    #[serde(default)]
    pub is_notable: bool,
    #[serde(default)]
    pub is_top: bool,
}

impl VpCard {
    pub fn new(vp: Option<i32>, card_name: impl Into<String>) -> Self {
        Self {
            vp,
            card_name: card_name.into(),
            vp_type: None,
            is_notable: false,
            is_top: false,
        }
    }
}

/// A claimed milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Empty when the label did not name a milestone
    pub name: String,
    pub points: u32,
    pub game_id: String,
}

/// A placement in a funded award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub place: u32,
    pub name: String,
    pub points: u32,
    /// Canonical name of the player who funded it
    pub funded_by: String,
}
