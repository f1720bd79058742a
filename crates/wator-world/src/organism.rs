//! Organism state.

use serde::{Deserialize, Serialize};
use wator_core::Species;

/// Species-specific state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrganismKind {
    Fish,
    /// `health` counts down the ticks left before starvation
    Shark { health: u32 },
}

/// An organism occupying one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organism {
    pub kind: OrganismKind,
    pub age: u64,
    /// Tick at which this organism last acted; `None` until its first tick
    pub last_processed_tick: Option<u64>,
}

impl Organism {
    pub fn fish() -> Self {
        Self {
            kind: OrganismKind::Fish,
            age: 0,
            last_processed_tick: None,
        }
    }

    pub fn shark(health: u32) -> Self {
        Self {
            kind: OrganismKind::Shark { health },
            age: 0,
            last_processed_tick: None,
        }
    }

    /// Offspring born during `tick`; it does not act again until the next tick
    pub fn newborn(parent: &Organism, tick: u64, shark_health: u32) -> Self {
        let kind = match parent.kind {
            OrganismKind::Fish => OrganismKind::Fish,
            OrganismKind::Shark { .. } => OrganismKind::Shark {
                health: shark_health,
            },
        };

        Self {
            kind,
            age: 0,
            last_processed_tick: Some(tick),
        }
    }

    pub fn with_age(mut self, age: u64) -> Self {
        self.age = age;
        self
    }

    pub fn species(&self) -> Species {
        match self.kind {
            OrganismKind::Fish => Species::Fish,
            OrganismKind::Shark { .. } => Species::Shark,
        }
    }

    pub fn is_fish(&self) -> bool {
        matches!(self.kind, OrganismKind::Fish)
    }

    pub fn is_shark(&self) -> bool {
        matches!(self.kind, OrganismKind::Shark { .. })
    }

    pub fn health(&self) -> Option<u32> {
        match self.kind {
            OrganismKind::Fish => None,
            OrganismKind::Shark { health } => Some(health),
        }
    }

    pub fn processed_in(&self, tick: u64) -> bool {
        self.last_processed_tick == Some(tick)
    }

    /// Mark as handled for `tick` and grow one tick older
    pub fn tick(&mut self, tick: u64) {
        self.last_processed_tick = Some(tick);
        self.age += 1;
    }

    /// Breeding is due when the age is a positive multiple of `interval`
    pub fn breeding_due(&self, interval: u64) -> bool {
        self.age > 0 && self.age % interval == 0
    }

    /// Lose one point of health; returns true when the shark has starved.
    /// Fish never starve.
    pub fn hunger(&mut self) -> bool {
        match &mut self.kind {
            OrganismKind::Fish => false,
            OrganismKind::Shark { health } => {
                *health = health.saturating_sub(1);
                *health == 0
            }
        }
    }

    pub fn feed(&mut self, max_health: u32) {
        if let OrganismKind::Shark { health } = &mut self.kind {
            *health = max_health;
        }
    }
}
