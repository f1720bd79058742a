//! Population counts and per-tick event tallies.

use crate::Species;
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// What happened to the population during one tick (or a run of ticks)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvents {
    pub fish_born: u64,
    pub sharks_born: u64,
    pub fish_eaten: u64,
    pub sharks_starved: u64,
    /// Fish removed because no neighbouring cell was free
    pub fish_stranded: u64,
}

impl TickEvents {
    pub fn births(&self) -> u64 {
        self.fish_born + self.sharks_born
    }

    pub fn deaths(&self) -> u64 {
        self.fish_eaten + self.sharks_starved + self.fish_stranded
    }
}

impl AddAssign for TickEvents {
    fn add_assign(&mut self, other: Self) {
        self.fish_born += other.fish_born;
        self.sharks_born += other.sharks_born;
        self.fish_eaten += other.fish_eaten;
        self.sharks_starved += other.sharks_starved;
        self.fish_stranded += other.fish_stranded;
    }
}

/// Live population at the end of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub tick: u64,
    pub fish: usize,
    pub sharks: usize,
}

impl Census {
    pub fn population(&self) -> usize {
        self.fish + self.sharks
    }

    pub fn count(&self, species: Species) -> usize {
        match species {
            Species::Fish => self.fish,
            Species::Shark => self.sharks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.population() == 0
    }
}

/// Census series over a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PopulationHistory {
    samples: Vec<Census>,
}

impl PopulationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, census: Census) {
        self.samples.push(census);
    }

    pub fn latest(&self) -> Option<&Census> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Census] {
        &self.samples
    }

    pub fn peak_fish(&self) -> usize {
        self.samples.iter().map(|c| c.fish).max().unwrap_or(0)
    }

    pub fn peak_sharks(&self) -> usize {
        self.samples.iter().map(|c| c.sharks).max().unwrap_or(0)
    }

    /// First recorded tick at which `species` had died out, if it ever did
    pub fn extinction_tick(&self, species: Species) -> Option<u64> {
        self.samples
            .iter()
            .find(|c| c.count(species) == 0)
            .map(|c| c.tick)
    }
}
