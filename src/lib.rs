//! Logic core for a Pokémon companion toolkit: a turn-based battle
//! resolver with data-driven effectiveness rules, PokeAPI-shaped roster
//! loading, and shiny-hunt odds.
//!
//! The main entry point for driving battles is [`engine::BattleEngine`].

pub mod ai;
pub mod battle;
pub mod effectiveness;
pub mod engine;
pub mod model;
pub mod roster;
pub mod shiny;

/// Commonly used exports for external consumers.
pub mod prelude {
    pub use crate::ai::{MovePolicy, RandomPolicy};
    pub use crate::battle::{
        compute_damage, first_mover, roll_damage, BattleError, BattleSession, MoveOutcome, Phase,
    };
    pub use crate::effectiveness::{default_table, EffectivenessTable};
    pub use crate::engine::{BattleEngine, MoveReport, TurnTicket};
    pub use crate::model::{Combatant, Side, Stats};
}
