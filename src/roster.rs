//! Loading combatants from PokeAPI-shaped JSON.
//!
//! Only the slice of the API payload the battle layer needs is mirrored
//! here: id, name, type tags, and the base stat array. Stats are matched
//! by name, not array position.

use crate::model::{Combatant, Stats};
use anyhow::{anyhow, Context, Result};
use rand::rngs::SmallRng;
use rand::Rng;
use serde::Deserialize;
use std::path::Path;

/// Fixed demo move pool; a loaded combatant knows a 2-4 move prefix of it.
pub const MOVE_POOL: [&str; 4] = ["Tackle", "Quick Attack", "Thunderbolt", "Flamethrower"];

#[derive(Debug, Deserialize)]
pub struct ApiPokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
}

#[derive(Debug, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub type_ref: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct StatSlot {
    pub base_stat: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RosterFile {
    pub player: ApiPokemon,
    pub opponent: ApiPokemon,
}

pub fn load_roster(path: &Path) -> Result<RosterFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file at {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

/// Build a full-health combatant from an API record. The RNG decides how
/// many moves from the pool it gets.
pub fn combatant_from_api(api: &ApiPokemon, rng: &mut SmallRng) -> Result<Combatant> {
    let stats = Stats {
        hp: base_stat(api, "hp")?,
        attack: base_stat(api, "attack")?,
        defense: base_stat(api, "defense")?,
        speed: base_stat(api, "speed")?,
    };
    let types = api
        .types
        .iter()
        .map(|slot| slot.type_ref.name.clone())
        .collect();
    let move_count = rng.gen_range(2..=MOVE_POOL.len());
    let moves = MOVE_POOL[..move_count]
        .iter()
        .map(|m| m.to_string())
        .collect();
    Ok(Combatant::new(api.id, api.name.clone(), types, stats, moves))
}

fn base_stat(api: &ApiPokemon, name: &str) -> Result<u32> {
    api.stats
        .iter()
        .find(|slot| slot.stat.name == name)
        .map(|slot| slot.base_stat)
        .ok_or_else(|| anyhow!("Stat '{}' missing for '{}'", name, api.name))
}

/// Up to `count` distinct ids sampled from an inclusive id range, for
/// showing a spread of a generation's roster.
pub fn sample_generation(
    first_id: u32,
    last_id: u32,
    count: usize,
    rng: &mut SmallRng,
) -> Vec<u32> {
    if last_id < first_id {
        return Vec::new();
    }
    let span = (last_id - first_id) as usize + 1;
    let target = count.min(span);
    let mut ids: Vec<u32> = Vec::with_capacity(target);
    let mut attempts = 0;
    while ids.len() < target && attempts < target * 20 {
        let id = rng.gen_range(first_id..=last_id);
        if !ids.contains(&id) {
            ids.push(id);
        }
        attempts += 1;
    }
    ids
}
