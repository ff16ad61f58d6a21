//! Player name normalization.
//!
//! Maps raw display names and aliases to canonical player names. The lookup
//! is built once from the configured roster; unknown names pass through.

use std::collections::{BTreeMap, HashMap};

use thiserror::Error;

/// The same alias was configured for two canonical players.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Alias '{alias}' is configured for both '{first}' and '{second}'")]
pub struct DuplicateAlias {
    pub alias: String,
    pub first: String,
    pub second: String,
}

/// Reverse lookup from lowercase alias to canonical player name.
#[derive(Debug, Clone, Default)]
pub struct PlayerAliases {
    by_alias: HashMap<String, String>,
}

impl PlayerAliases {
    /// Build the lookup from a canonical-name -> aliases table.
    ///
    /// Each canonical name is an alias of itself.
    pub fn new(table: &BTreeMap<String, Vec<String>>) -> Result<Self, DuplicateAlias> {
        let mut by_alias: HashMap<String, String> = HashMap::new();

        for (canonical, aliases) in table {
            for alias in std::iter::once(canonical).chain(aliases.iter()) {
                let key = alias.to_lowercase();
                match by_alias.get(&key) {
                    Some(existing) if existing != canonical => {
                        return Err(DuplicateAlias {
                            alias: alias.clone(),
                            first: existing.clone(),
                            second: canonical.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        by_alias.insert(key, canonical.clone());
                    }
                }
            }
        }

        Ok(Self { by_alias })
    }

    /// Canonical name for `raw`, or `raw` itself when it is not a known alias.
    pub fn canonical(&self, raw: &str) -> String {
        self.by_alias
            .get(&raw.to_lowercase())
            .cloned()
            .unwrap_or_else(|| raw.to_string())
    }

    /// Number of known aliases (canonical names included).
    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}
