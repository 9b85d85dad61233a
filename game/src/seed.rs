use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Where shape-draw seeds come from. The session never reads entropy itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "mode")]
pub enum Seeder {
    /// `base + wall-clock millis + slot`. Varies between runs.
    Clock { base: f64 },
    /// `base + next`, with `next` bumped on every draw. Reproducible.
    Counter { base: f64, next: u64 },
}

impl Seeder {
    pub fn clock(base: f64) -> Self {
        Seeder::Clock { base }
    }

    pub fn counter(base: f64) -> Self {
        Seeder::Counter { base, next: 0 }
    }

    pub fn next_seed(&mut self, slot: usize) -> f64 {
        match self {
            Seeder::Clock { base } => {
                let millis = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_millis() as f64)
                    .unwrap_or_default();
                *base + millis + slot as f64
            }
            Seeder::Counter { base, next } => {
                let seed = *base + *next as f64;
                *next = next.wrapping_add(1);
                seed
            }
        }
    }
}
