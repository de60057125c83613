//! Move/type effectiveness rules as data.
//!
//! The rule set is a plain map of move name to defender-type multipliers so
//! new matchups can ship as JSON without touching code.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct EffectivenessTable {
    // keys are normalized on insert; see `normalize`
    rules: HashMap<String, HashMap<String, f32>>,
}

// Manual impl so every loading path normalizes keys through
// `insert_rule`; a derived map would store raw keys that the
// normalized lookups could never match.
impl<'de> Deserialize<'de> for EffectivenessTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: HashMap<String, HashMap<String, f32>> = HashMap::deserialize(deserializer)?;
        let mut table = Self::new();
        for (move_name, type_rules) in raw {
            for (type_name, multiplier) in type_rules {
                table.insert_rule(&move_name, &type_name, multiplier);
            }
        }
        Ok(table)
    }
}

impl EffectivenessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rule set from JSON of the shape
    /// `{"flamethrower": {"grass": 2.0, "water": 0.5}}`.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse effectiveness table JSON")
    }

    pub fn insert_rule(&mut self, move_name: &str, type_name: &str, multiplier: f32) {
        self.rules
            .entry(normalize(move_name))
            .or_default()
            .insert(normalize(type_name), multiplier);
    }

    /// Multiplier for a move against a defender's type tags, 1.0 when no
    /// rule matches. When several of the defender's types carry rules for
    /// the same move, the lowest multiplier wins (resistances dominate),
    /// which matches how the demo rule set resolves dual-typed defenders.
    pub fn multiplier(&self, move_name: &str, defender_types: &[String]) -> f32 {
        let Some(type_rules) = self.rules.get(&normalize(move_name)) else {
            return 1.0;
        };
        defender_types
            .iter()
            .filter_map(|t| type_rules.get(&normalize(t)).copied())
            .reduce(f32::min)
            .unwrap_or(1.0)
    }
}

static DEFAULT_TABLE: Lazy<EffectivenessTable> = Lazy::new(|| {
    let mut table = EffectivenessTable::new();
    table.insert_rule("Thunderbolt", "water", 2.0);
    table.insert_rule("Flamethrower", "grass", 2.0);
    table.insert_rule("Flamethrower", "water", 0.5);
    table
});

/// The built-in demo rule set.
pub fn default_table() -> &'static EffectivenessTable {
    &DEFAULT_TABLE
}

fn normalize(name: &str) -> String {
    name.to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}
