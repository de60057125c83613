use crate::model::Combatant;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Picks the next move for an automated combatant.
pub trait MovePolicy {
    fn choose_move(&mut self, combatant: &Combatant) -> Option<String>;
}

/// Uniform random choice over the combatant's move list.
pub struct RandomPolicy {
    rng: SmallRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MovePolicy for RandomPolicy {
    fn choose_move(&mut self, combatant: &Combatant) -> Option<String> {
        combatant.moves.choose(&mut self.rng).cloned()
    }
}
