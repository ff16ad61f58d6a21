//! # Terra Stats
//!
//! Game statistics for a regular Terraforming Mars group, built from saved
//! end-of-game pages.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (games, player results, VP cards)
//! - **normalize**: Player alias resolution
//! - **parse**: Snapshot HTML extraction (results table, VP breakdown, filename)
//! - **calculate**: Notable cards, places, streaks and records
//! - **pipeline**: Directory scan tying parse and calculate together
//! - **storage**: Snapshot directory operations
//! - **fetch**: Snapshot downloading
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod parse;
pub mod pipeline;
pub mod storage;

pub use models::*;
