//! Shiny-hunt odds math.
//!
//! Each hunting method is a flat per-encounter denominator; the cumulative
//! chance after `n` attempts is `1 - ((d - 1) / d)^n`. Tracking state lives
//! on the device driving the hunt, never here.

/// A hunting method and its per-encounter odds denominator.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Method {
    pub name: &'static str,
    pub denominator: u32,
}

pub const METHODS: &[Method] = &[
    Method { name: "Random Encounter", denominator: 4096 },
    Method { name: "Masuda Method", denominator: 683 },
    Method { name: "Shiny Charm", denominator: 1365 },
    Method { name: "Masuda + Charm", denominator: 512 },
    Method { name: "Chain Fishing", denominator: 100 },
    Method { name: "Friend Safari", denominator: 512 },
    Method { name: "Radar Chain", denominator: 99 },
    Method { name: "SOS Chain", denominator: 273 },
];

pub fn method_by_name(name: &str) -> Option<&'static Method> {
    METHODS
        .iter()
        .find(|method| method.name.eq_ignore_ascii_case(name))
}

/// Chance of at least one shiny in `attempts` encounters at `1/denominator`
/// odds, as a fraction in `[0, 1]`.
pub fn cumulative_chance(denominator: u32, attempts: u32) -> f64 {
    if denominator <= 1 {
        return if attempts == 0 { 0.0 } else { 1.0 };
    }
    let miss = (denominator as f64 - 1.0) / denominator as f64;
    1.0 - miss.powf(attempts as f64)
}

/// One ongoing hunt: a target species, a method, and an encounter count.
#[derive(Clone, Debug)]
pub struct Hunt {
    pub target: String,
    pub method: Method,
    pub attempts: u32,
}

impl Hunt {
    pub fn new(target: impl Into<String>, method: Method) -> Self {
        Self {
            target: target.into(),
            method,
            attempts: 0,
        }
    }

    pub fn record_encounter(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    pub fn chance_so_far(&self) -> f64 {
        cumulative_chance(self.method.denominator, self.attempts)
    }
}
