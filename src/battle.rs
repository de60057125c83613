//! Turn-based battle resolution.
//!
//! A [`BattleSession`] moves through `NotStarted -> Active -> Finished` and
//! owns the two combatants plus an append-only log of what happened. All
//! randomness comes in through an explicit factor or a caller-supplied RNG
//! so outcomes can be pinned in tests.

use crate::effectiveness::EffectivenessTable;
use crate::model::{Combatant, Side};
use rand::rngs::SmallRng;
use rand::Rng;
use thiserror::Error;

/// Half-open range the damage roll is drawn from.
pub const RANDOM_FACTOR_MIN: f32 = 0.8;
pub const RANDOM_FACTOR_MAX: f32 = 1.2;

// Flavor-text thresholds. Keyed on raw damage, not on the table
// multiplier; the mismatch is intentional and part of the log format.
const SUPER_EFFECTIVE_OVER: u32 = 25;
const NOT_VERY_EFFECTIVE_UNDER: u32 = 15;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum BattleError {
    #[error("battle is not active")]
    NotActive,
    #[error("battle has already started")]
    AlreadyStarted,
    #[error("a fainted combatant cannot enter battle")]
    FaintedCombatant,
    #[error("it is not that side's turn")]
    OutOfTurn,
    #[error("attacker does not know the move '{0}'")]
    UnknownMove(String),
    #[error("combatant has no usable moves")]
    NoMoves,
    #[error("opponent turn ticket is stale")]
    StaleTicket,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    NotStarted,
    Active { turn: Side },
    Finished { winner: Side },
}

/// Result of one resolved move.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MoveOutcome {
    pub damage: u32,
    pub winner: Option<Side>,
}

/// Whoever is at least as fast moves first; ties go to the player.
pub fn first_mover(player: &Combatant, opponent: &Combatant) -> Side {
    if player.stats.speed >= opponent.stats.speed {
        Side::Player
    } else {
        Side::Opponent
    }
}

/// Damage for one move with a fixed random factor.
///
/// `base = floor(attack / defense * 25)` with defense clamped to at least 1,
/// scaled by the random factor and the table multiplier, floored, and never
/// below 1.
pub fn compute_damage(
    attacker: &Combatant,
    defender: &Combatant,
    move_name: &str,
    table: &EffectivenessTable,
    random_factor: f32,
) -> u32 {
    let attack = attacker.stats.attack as f32;
    let defense = defender.stats.defense.max(1) as f32;
    let base = (attack / defense * 25.0).floor();
    let multiplier = table.multiplier(move_name, &defender.types);
    let damage = (base * random_factor * multiplier).floor();
    if damage < 1.0 {
        1
    } else {
        damage as u32
    }
}

/// Damage for one move with the factor drawn from `[0.8, 1.2)`.
pub fn roll_damage(
    attacker: &Combatant,
    defender: &Combatant,
    move_name: &str,
    table: &EffectivenessTable,
    rng: &mut SmallRng,
) -> u32 {
    let factor = rng.gen_range(RANDOM_FACTOR_MIN..RANDOM_FACTOR_MAX);
    compute_damage(attacker, defender, move_name, table, factor)
}

#[derive(Clone, Debug)]
pub struct BattleSession {
    player: Combatant,
    opponent: Combatant,
    phase: Phase,
    log: Vec<String>,
}

impl BattleSession {
    pub fn new(player: Combatant, opponent: Combatant) -> Self {
        Self {
            player,
            opponent,
            phase: Phase::NotStarted,
            log: Vec::new(),
        }
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn opponent(&self) -> &Combatant {
        &self.opponent
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Active { .. })
    }

    /// Side that may act next, if the battle is active.
    pub fn turn(&self) -> Option<Side> {
        match self.phase {
            Phase::Active { turn } => Some(turn),
            _ => None,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            Phase::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    /// Begin the battle, handing the first turn to the faster side.
    pub fn start(&mut self) -> Result<Side, BattleError> {
        if !matches!(self.phase, Phase::NotStarted) {
            return Err(BattleError::AlreadyStarted);
        }
        if self.player.is_fainted() || self.opponent.is_fainted() {
            return Err(BattleError::FaintedCombatant);
        }
        let first = first_mover(&self.player, &self.opponent);
        self.phase = Phase::Active { turn: first };
        self.log.push(format!(
            "{} vs {} - Battle Start!",
            self.player.name, self.opponent.name
        ));
        Ok(first)
    }

    /// Resolve one move for `side`: compute damage, apply it, log it, and
    /// either finish the battle or pass the turn.
    pub fn apply_move(
        &mut self,
        side: Side,
        move_name: &str,
        table: &EffectivenessTable,
        rng: &mut SmallRng,
    ) -> Result<MoveOutcome, BattleError> {
        let turn = self.turn().ok_or(BattleError::NotActive)?;
        if side != turn {
            return Err(BattleError::OutOfTurn);
        }
        if !self.combatant(side).knows_move(move_name) {
            return Err(BattleError::UnknownMove(move_name.to_string()));
        }

        let attacker_name = self.combatant(side).name.clone();
        let damage = {
            let (attacker, defender) = self.pair(side);
            roll_damage(attacker, defender, move_name, table, rng)
        };
        let defender = match side {
            Side::Player => &mut self.opponent,
            Side::Opponent => &mut self.player,
        };
        defender.take_damage(damage);
        let fainted = defender.is_fainted();
        let defender_name = defender.name.clone();

        let mut line = format!("{attacker_name} used {move_name}! Dealt {damage} damage.");
        if damage > SUPER_EFFECTIVE_OVER {
            line.push_str(" It's super effective!");
        } else if damage < NOT_VERY_EFFECTIVE_UNDER {
            line.push_str(" It's not very effective...");
        }
        self.log.push(line);

        if fainted {
            self.log.push(format!("{defender_name} fainted!"));
            self.phase = Phase::Finished { winner: side };
            Ok(MoveOutcome {
                damage,
                winner: Some(side),
            })
        } else {
            self.phase = Phase::Active {
                turn: side.opposite(),
            };
            Ok(MoveOutcome {
                damage,
                winner: None,
            })
        }
    }

    /// Restore both combatants to full health, clear the log and winner,
    /// and return to `NotStarted`. Valid from any phase.
    pub fn reset(&mut self) {
        self.player.restore();
        self.opponent.restore();
        self.log.clear();
        self.phase = Phase::NotStarted;
    }

    fn pair(&self, side: Side) -> (&Combatant, &Combatant) {
        match side {
            Side::Player => (&self.player, &self.opponent),
            Side::Opponent => (&self.opponent, &self.player),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effectiveness::default_table;
    use crate::model::Stats;
    use rand::SeedableRng;

    fn make_combatant(name: &str, attack: u32, defense: u32, hp: u32, speed: u32) -> Combatant {
        Combatant::new(
            1,
            name,
            vec!["normal".to_string()],
            Stats {
                hp,
                attack,
                defense,
                speed,
            },
            vec!["Tackle".to_string(), "Quick Attack".to_string()],
        )
    }

    #[test]
    fn base_damage_matches_formula() {
        let attacker = make_combatant("a", 100, 50, 100, 50);
        let defender = make_combatant("d", 50, 50, 40, 50);
        let damage = compute_damage(&attacker, &defender, "Tackle", default_table(), 1.0);
        assert_eq!(damage, 50);
    }

    #[test]
    fn damage_never_below_one() {
        let attacker = make_combatant("a", 1, 50, 100, 50);
        let defender = make_combatant("d", 50, 300, 100, 50);
        let damage = compute_damage(&attacker, &defender, "Tackle", default_table(), 0.8);
        assert_eq!(damage, 1);
    }

    #[test]
    fn zero_defense_is_treated_as_one() {
        let attacker = make_combatant("a", 10, 50, 100, 50);
        let defender = make_combatant("d", 50, 0, 100, 50);
        let damage = compute_damage(&attacker, &defender, "Tackle", default_table(), 1.0);
        assert_eq!(damage, 250);
    }

    #[test]
    fn effectiveness_multiplier_applies() {
        let attacker = Combatant::new(
            6,
            "charizard",
            vec!["fire".to_string()],
            Stats {
                hp: 78,
                attack: 100,
                defense: 78,
                speed: 100,
            },
            vec!["Flamethrower".to_string()],
        );
        let defender = Combatant::new(
            9,
            "blastoise",
            vec!["water".to_string()],
            Stats {
                hp: 79,
                attack: 83,
                defense: 50,
                speed: 78,
            },
            vec!["Tackle".to_string()],
        );
        let damage = compute_damage(&attacker, &defender, "Flamethrower", default_table(), 1.0);
        // base 50, halved against water
        assert_eq!(damage, 25);
    }

    #[test]
    fn ties_on_speed_favor_the_player() {
        let player = make_combatant("p", 50, 50, 100, 70);
        let opponent = make_combatant("o", 50, 50, 100, 70);
        assert_eq!(first_mover(&player, &opponent), Side::Player);
    }

    #[test]
    fn faster_side_moves_first() {
        let player = make_combatant("p", 50, 50, 100, 60);
        let opponent = make_combatant("o", 50, 50, 100, 90);
        assert_eq!(first_mover(&player, &opponent), Side::Opponent);
    }

    #[test]
    fn apply_move_rejected_before_start() {
        let mut session = default_pair();
        let mut rng = SmallRng::seed_from_u64(0);
        let result = session.apply_move(Side::Player, "Tackle", default_table(), &mut rng);
        assert_eq!(result, Err(BattleError::NotActive));
        assert!(session.log_lines().is_empty());
    }

    #[test]
    fn out_of_turn_move_is_rejected_without_mutation() {
        let mut session = default_pair();
        session.start().expect("fresh session starts");
        let waiting = session.turn().expect("active").opposite();
        let hp_before = (session.player().current_hp, session.opponent().current_hp);
        let mut rng = SmallRng::seed_from_u64(0);
        let result = session.apply_move(waiting, "Tackle", default_table(), &mut rng);
        assert_eq!(result, Err(BattleError::OutOfTurn));
        assert_eq!(
            (session.player().current_hp, session.opponent().current_hp),
            hp_before
        );
    }

    #[test]
    fn unknown_move_is_rejected() {
        let mut session = default_pair();
        session.start().expect("fresh session starts");
        let mover = session.turn().expect("active");
        let mut rng = SmallRng::seed_from_u64(0);
        let result = session.apply_move(mover, "Hyper Beam", default_table(), &mut rng);
        assert_eq!(
            result,
            Err(BattleError::UnknownMove("Hyper Beam".to_string()))
        );
    }

    #[test]
    fn lethal_move_finishes_the_session() {
        // base damage 50, minimum roll 40: always enough against 40 HP
        let player = make_combatant("p", 100, 50, 100, 90);
        let opponent = make_combatant("o", 50, 50, 40, 50);
        let mut session = BattleSession::new(player, opponent);
        session.start().expect("fresh session starts");
        let mut rng = SmallRng::seed_from_u64(3);
        let outcome = session
            .apply_move(Side::Player, "Tackle", default_table(), &mut rng)
            .expect("player holds the turn");
        assert_eq!(outcome.winner, Some(Side::Player));
        assert_eq!(session.winner(), Some(Side::Player));
        assert!(!session.is_active());
        assert_eq!(session.opponent().current_hp, 0);
        let last = session.log_lines().last().expect("faint line");
        assert_eq!(last, "o fainted!");
    }

    #[test]
    fn finished_session_rejects_further_moves() {
        let player = make_combatant("p", 100, 50, 100, 90);
        let opponent = make_combatant("o", 50, 50, 40, 50);
        let mut session = BattleSession::new(player, opponent);
        session.start().expect("fresh session starts");
        let mut rng = SmallRng::seed_from_u64(3);
        session
            .apply_move(Side::Player, "Tackle", default_table(), &mut rng)
            .expect("lethal move");
        let log_len = session.log_lines().len();
        let result = session.apply_move(Side::Opponent, "Tackle", default_table(), &mut rng);
        assert_eq!(result, Err(BattleError::NotActive));
        assert_eq!(session.log_lines().len(), log_len);
    }

    #[test]
    fn turn_flips_when_the_defender_survives() {
        let mut session = default_pair();
        session.start().expect("fresh session starts");
        let mover = session.turn().expect("active");
        let mut rng = SmallRng::seed_from_u64(11);
        let outcome = session
            .apply_move(mover, "Tackle", default_table(), &mut rng)
            .expect("mover holds the turn");
        assert_eq!(outcome.winner, None);
        assert_eq!(session.turn(), Some(mover.opposite()));
    }

    #[test]
    fn reset_returns_to_not_started() {
        let mut session = default_pair();
        session.start().expect("fresh session starts");
        let mover = session.turn().expect("active");
        let mut rng = SmallRng::seed_from_u64(5);
        session
            .apply_move(mover, "Tackle", default_table(), &mut rng)
            .expect("first move");
        session.reset();
        assert_eq!(session.phase(), Phase::NotStarted);
        assert!(session.log_lines().is_empty());
        assert_eq!(session.winner(), None);
        assert_eq!(session.player().current_hp, session.player().max_hp);
        assert_eq!(session.opponent().current_hp, session.opponent().max_hp);
    }

    #[test]
    fn double_start_is_rejected() {
        let mut session = default_pair();
        session.start().expect("fresh session starts");
        assert_eq!(session.start(), Err(BattleError::AlreadyStarted));
    }

    #[test]
    fn heavy_hits_read_as_super_effective() {
        // base 100, minimum roll 80: always above the flavor threshold
        let player = make_combatant("p", 200, 50, 400, 90);
        let opponent = make_combatant("o", 50, 50, 400, 50);
        let mut session = BattleSession::new(player, opponent);
        session.start().expect("fresh session starts");
        let mut rng = SmallRng::seed_from_u64(9);
        session
            .apply_move(Side::Player, "Tackle", default_table(), &mut rng)
            .expect("player holds the turn");
        let line = session.log_lines().last().expect("move line");
        assert!(line.ends_with("It's super effective!"), "line: {line}");
    }

    #[test]
    fn weak_hits_read_as_not_very_effective() {
        // base 10, maximum roll just under 12: always below the threshold
        let player = make_combatant("p", 20, 50, 400, 90);
        let opponent = make_combatant("o", 50, 50, 400, 50);
        let mut session = BattleSession::new(player, opponent);
        session.start().expect("fresh session starts");
        let mut rng = SmallRng::seed_from_u64(9);
        session
            .apply_move(Side::Player, "Tackle", default_table(), &mut rng)
            .expect("player holds the turn");
        let line = session.log_lines().last().expect("move line");
        assert!(line.ends_with("It's not very effective..."), "line: {line}");
    }

    fn default_pair() -> BattleSession {
        let player = make_combatant("p", 60, 50, 200, 90);
        let opponent = make_combatant("o", 60, 50, 200, 50);
        BattleSession::new(player, opponent)
    }
}
