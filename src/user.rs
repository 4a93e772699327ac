use std::fmt::Display;

use rand::{rngs::StdRng, Rng};

/// A simulated client device. Positions are drawn once per episode (at
/// `reset`) and never move within an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct UserEquipment {
    pub x: f64,
    pub y: f64,
}

impl UserEquipment {
    pub fn new_random(width: f64, height: f64, rng: &mut StdRng) -> UserEquipment {
        UserEquipment {
            x: rng.gen_range(0.0..width),
            y: rng.gen_range(0.0..height),
        }
    }
}

impl Display for UserEquipment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "User at: ({:.1}, {:.1})", self.x, self.y)
    }
}
