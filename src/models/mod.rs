//! Core data models for game results.

mod game;
mod vp_card;

pub use game::*;
pub use vp_card::*;
