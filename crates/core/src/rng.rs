//! RNG module - random sources for tile spawning
//!
//! The engine never rolls dice itself: it asks a [`SpawnSource`] which empty cell to fill and
//! which value to put there. Two sources ship with the crate:
//!
//! - [`SimpleRng`]: seedable LCG, uniform cell choice, 2 (90%) or 4 (10%)
//! - [`ScriptedSpawns`]: replays a fixed list of spawns for reproducible scenarios

use std::collections::VecDeque;

use crate::types::{Position, MIN_TILE_VALUE, SPAWN_FOUR_PER_MILLE};

/// Decides where and what the engine spawns
pub trait SpawnSource {
    /// Pick one of `empty` (never empty when called) and return its index.
    fn pick_cell(&mut self, empty: &[Position]) -> usize;

    /// Value of the tile about to be spawned (2 or 4).
    fn pick_value(&mut self) -> u64;
}

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // High bits of an LCG are far better distributed than the low ones.
        (((self.next_u32() >> 16) as u64 * max as u64) >> 16) as u32
    }

}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SpawnSource for SimpleRng {
    fn pick_cell(&mut self, empty: &[Position]) -> usize {
        self.next_range(empty.len() as u32) as usize
    }

    fn pick_value(&mut self) -> u64 {
        if self.next_range(1000) < SPAWN_FOUR_PER_MILLE {
            MIN_TILE_VALUE * 2
        } else {
            MIN_TILE_VALUE
        }
    }
}

/// Replays queued `(position, value)` spawns in order.
///
/// When the queued position is already occupied, or the queue has run dry, the first empty
/// cell receives a 2.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSpawns {
    queue: VecDeque<(Position, u64)>,
    pending_value: Option<u64>,
}

impl ScriptedSpawns {
    pub fn new(spawns: impl IntoIterator<Item = (Position, u64)>) -> Self {
        Self {
            queue: spawns.into_iter().collect(),
            pending_value: None,
        }
    }

    /// Spawns not yet consumed
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl SpawnSource for ScriptedSpawns {
    fn pick_cell(&mut self, empty: &[Position]) -> usize {
        match self.queue.pop_front() {
            Some((pos, value)) => match empty.iter().position(|p| *p == pos) {
                Some(idx) => {
                    self.pending_value = Some(value);
                    idx
                }
                None => {
                    self.pending_value = None;
                    0
                }
            },
            None => {
                self.pending_value = None;
                0
            }
        }
    }

    fn pick_value(&mut self) -> u64 {
        self.pending_value.take().unwrap_or(MIN_TILE_VALUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        let v1 = rng1.next_u32();
        let v2 = rng2.next_u32();
        assert_ne!(v1, v2);
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for max in 1..=64 {
            for _ in 0..50 {
                assert!(rng.next_range(max) < max);
            }
        }
    }

    #[test]
    fn test_spawn_values_are_roughly_one_in_ten_fours() {
        let mut rng = SimpleRng::new(2024);
        let mut fours = 0;
        for _ in 0..10_000 {
            match rng.pick_value() {
                2 => {}
                4 => fours += 1,
                other => panic!("unexpected spawn value {}", other),
            }
        }
        assert!((700..1300).contains(&fours), "fours = {}", fours);
    }

    #[test]
    fn test_scripted_spawns_follow_queue() {
        let empty = [Position::new(0, 0), Position::new(2, 3), Position::new(3, 3)];
        let mut spawns = ScriptedSpawns::new([(Position::new(2, 3), 4)]);

        assert_eq!(spawns.pick_cell(&empty), 1);
        assert_eq!(spawns.pick_value(), 4);
        assert_eq!(spawns.remaining(), 0);

        // Exhausted queue falls back to the first empty cell and a 2.
        assert_eq!(spawns.pick_cell(&empty), 0);
        assert_eq!(spawns.pick_value(), 2);
    }

    #[test]
    fn test_scripted_spawn_on_occupied_cell_falls_back() {
        let empty = [Position::new(1, 1)];
        let mut spawns = ScriptedSpawns::new([(Position::new(0, 0), 4)]);
        assert_eq!(spawns.pick_cell(&empty), 0);
        assert_eq!(spawns.pick_value(), 2);
        assert_eq!(spawns.remaining(), 0);
    }
}
