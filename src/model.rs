use serde::Deserialize;

/// Which side of the battle a combatant or action belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

/// One side's Pokémon record, tracking current versus maximum health.
#[derive(Clone, Debug)]
pub struct Combatant {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Stats,
    pub current_hp: u32,
    pub max_hp: u32,
    pub moves: Vec<String>,
}

impl Combatant {
    /// Build a combatant at full health.
    pub fn new(
        id: u32,
        name: impl Into<String>,
        types: Vec<String>,
        stats: Stats,
        moves: Vec<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            types,
            current_hp: stats.hp,
            max_hp: stats.hp,
            stats,
            moves,
        }
    }

    pub fn take_damage(&mut self, damage: u32) {
        self.current_hp = self.current_hp.saturating_sub(damage);
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn restore(&mut self) {
        self.current_hp = self.max_hp;
    }

    pub fn knows_move(&self, name: &str) -> bool {
        self.moves.iter().any(|m| m.eq_ignore_ascii_case(name))
    }
}
