//! Session driver wrapping the resolver with a seeded RNG and an
//! automated opponent.
//!
//! UI layers typically delay the opponent's reply behind a timer, which
//! risks a late callback hitting a session that was reset in the
//! meantime. That contract is a [`TurnTicket`] here: one is issued
//! whenever the opponent gains the turn, every state change invalidates
//! all outstanding tickets, and a stale ticket is rejected instead of
//! mutating a session it no longer belongs to.

use crate::ai::{MovePolicy, RandomPolicy};
use crate::battle::{BattleError, BattleSession, MoveOutcome, Phase};
use crate::effectiveness::{default_table, EffectivenessTable};
use crate::model::{Combatant, Side};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Permission for one automated opponent turn. Single use and not
/// clonable; it dies with the state it was issued against.
#[derive(Debug)]
pub struct TurnTicket {
    serial: u64,
}

/// Result of a player move, with a ticket when the opponent may now act.
#[derive(Debug)]
pub struct MoveReport {
    pub outcome: MoveOutcome,
    pub opponent_turn: Option<TurnTicket>,
}

pub struct BattleEngine {
    session: BattleSession,
    table: EffectivenessTable,
    policy: Box<dyn MovePolicy>,
    rng: SmallRng,
    serial: u64,
}

impl BattleEngine {
    pub fn new(player: Combatant, opponent: Combatant, seed: u64) -> Self {
        Self {
            session: BattleSession::new(player, opponent),
            table: default_table().clone(),
            policy: Box::new(RandomPolicy::new(seed.wrapping_add(1))),
            rng: SmallRng::seed_from_u64(seed),
            serial: 0,
        }
    }

    /// Replace the built-in effectiveness rules.
    pub fn with_table(mut self, table: EffectivenessTable) -> Self {
        self.table = table;
        self
    }

    pub fn with_policy(mut self, policy: Box<dyn MovePolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn session(&self) -> &BattleSession {
        &self.session
    }

    /// Start the battle; returns a ticket when the opponent moves first.
    pub fn start(&mut self) -> Result<Option<TurnTicket>, BattleError> {
        self.session.start()?;
        self.serial += 1;
        Ok(self.opponent_ticket())
    }

    pub fn player_move(&mut self, move_name: &str) -> Result<MoveReport, BattleError> {
        let outcome =
            self.session
                .apply_move(Side::Player, move_name, &self.table, &mut self.rng)?;
        self.serial += 1;
        Ok(MoveReport {
            outcome,
            opponent_turn: self.opponent_ticket(),
        })
    }

    /// Resolve the automated opponent's move. The ticket must have been
    /// issued by the most recent state change.
    pub fn opponent_turn(&mut self, ticket: TurnTicket) -> Result<MoveReport, BattleError> {
        if ticket.serial != self.serial {
            return Err(BattleError::StaleTicket);
        }
        let move_name = self
            .policy
            .choose_move(self.session.opponent())
            .ok_or(BattleError::NoMoves)?;
        let outcome =
            self.session
                .apply_move(Side::Opponent, &move_name, &self.table, &mut self.rng)?;
        self.serial += 1;
        Ok(MoveReport {
            outcome,
            opponent_turn: None,
        })
    }

    /// Reset the session; all outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.session.reset();
        self.serial += 1;
    }

    /// Run the battle to completion with both sides on the random policy,
    /// up to `max_turns` resolved moves. Returns the winner, if any.
    pub fn run_auto(&mut self, max_turns: usize) -> Result<Option<Side>, BattleError> {
        if matches!(self.session.phase(), Phase::NotStarted) {
            self.session.start()?;
            self.serial += 1;
        }
        for _ in 0..max_turns {
            let Some(side) = self.session.turn() else {
                break;
            };
            let move_name = self
                .policy
                .choose_move(self.session.combatant(side))
                .ok_or(BattleError::NoMoves)?;
            self.session
                .apply_move(side, &move_name, &self.table, &mut self.rng)?;
            self.serial += 1;
        }
        Ok(self.session.winner())
    }

    fn opponent_ticket(&self) -> Option<TurnTicket> {
        match self.session.turn() {
            Some(Side::Opponent) => Some(TurnTicket {
                serial: self.serial,
            }),
            _ => None,
        }
    }
}
