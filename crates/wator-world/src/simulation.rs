//! Simulation engine for running the ocean.

use crate::grid::Grid;
use crate::organism::{Organism, OrganismKind};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, event, info, instrument, trace, Level};
use wator_core::{
    Census, Direction, Error, PopulationConfig, PopulationHistory, Position, Result, RunConfig,
    Species, StrandedFish, TickEvents,
};

/// Grid, configuration and random source for one run.
///
/// Each call to [`Simulation::step`] applies the update rule to every
/// organism present at the start of the tick exactly once, scanning cells in
/// row-major order and mutating the single grid in place.
pub struct Simulation {
    grid: Grid,
    config: RunConfig,
    rng: ChaCha8Rng,
    tick: u64,
}

impl Simulation {
    /// Build a world with the configured population on random distinct cells
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = Grid::from_config(&config, &mut rng);

        info!(
            width = config.world.width,
            height = config.world.height,
            fish = config.population.initial_fish,
            sharks = config.population.initial_sharks,
            seed = config.seed,
            "World initialized"
        );

        Ok(Self {
            grid,
            config,
            rng,
            tick: 0,
        })
    }

    /// Start from a hand-built grid.
    ///
    /// The grid is the source of truth for the starting population: the
    /// `population` section of `config` is replaced with the fish and shark
    /// counts found on the grid before validation, so
    /// [`Simulation::config`] reports what was actually placed.
    pub fn with_grid(mut config: RunConfig, grid: Grid) -> Result<Self> {
        if grid.width != config.world.width || grid.height != config.world.height {
            return Err(Error::Configuration(format!(
                "grid is {}x{} but configuration expects {}x{}",
                grid.width, grid.height, config.world.width, config.world.height
            )));
        }

        config.population = PopulationConfig {
            initial_fish: grid.count(Species::Fish),
            initial_sharks: grid.count(Species::Shark),
        };
        config.validate()?;

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self {
            grid,
            config,
            rng,
            tick: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Last completed tick; 0 before the first step
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Organism> {
        self.grid.cell_at(x, y)
    }

    pub fn census(&self) -> Census {
        Census {
            tick: self.tick,
            fish: self.grid.count(Species::Fish),
            sharks: self.grid.count(Species::Shark),
        }
    }

    /// Run the simulation for the configured number of ticks, stopping early
    /// once the ocean is empty
    #[instrument(skip(self), fields(num_ticks = self.config.num_ticks, seed = self.config.seed))]
    pub fn run(&mut self) -> RunReport {
        info!("Starting simulation for {} ticks", self.config.num_ticks);

        let mut history = PopulationHistory::new();
        history.record(self.census());

        let mut totals = TickEvents::default();
        let mut ticks_run = 0;

        for _ in 0..self.config.num_ticks {
            if self.grid.occupied() == 0 {
                info!(tick = self.tick, "Ocean is empty, stopping early");
                break;
            }

            totals += self.step();
            ticks_run += 1;
            history.record(self.census());
        }

        let report = RunReport {
            seed: self.config.seed,
            ticks_run,
            final_census: self.census(),
            totals,
            history,
        };
        self.emit_run_summary(&report);
        report
    }

    /// Advance the world by one tick
    pub fn step(&mut self) -> TickEvents {
        self.tick += 1;
        let tick = self.tick;
        let mut events = TickEvents::default();

        for index in 0..self.grid.capacity() {
            let pos = self.grid.index_to_pos(index);

            // Skip empty cells and anything that already acted this tick
            // (newborns, or organisms that moved ahead of the scan).
            let kind = match self.grid.get_mut(pos) {
                Some(organism) if !organism.processed_in(tick) => {
                    organism.tick(tick);
                    organism.kind
                }
                _ => continue,
            };

            match kind {
                OrganismKind::Fish => self.move_fish(pos, tick, &mut events),
                OrganismKind::Shark { .. } => self.move_shark(pos, tick, &mut events),
            }
        }

        let interval = self.config.report_interval;
        if interval > 0 && tick % interval == 0 {
            self.emit_population_census(&events);
        }

        events
    }

    fn move_fish(&mut self, pos: Position, tick: u64, events: &mut TickEvents) {
        let start = self.rng.gen_range(0..Direction::COUNT);

        match self.first_neighbor(pos, start, |cell| cell.is_none()) {
            Some(dest) => {
                self.grid.relocate(pos, dest);
                self.breed(pos, dest, tick, events);
            }
            None => match self.config.rules.stranded_fish {
                StrandedFish::Dies => {
                    self.grid.clear(pos);
                    events.fish_stranded += 1;
                    trace!(tick, x = pos.x, y = pos.y, "Fish stranded with no free neighbour");
                }
                StrandedFish::Stays => {}
            },
        }
    }

    fn move_shark(&mut self, pos: Position, tick: u64, events: &mut TickEvents) {
        let starved = match self.grid.get_mut(pos) {
            Some(shark) => shark.hunger(),
            None => return,
        };

        if starved {
            self.grid.clear(pos);
            events.sharks_starved += 1;
            trace!(tick, x = pos.x, y = pos.y, "Shark starved");
            return;
        }

        // One random start serves both the hunt and the fallback move.
        let start = self.rng.gen_range(0..Direction::COUNT);

        if let Some(prey) =
            self.first_neighbor(pos, start, |cell| cell.map_or(false, Organism::is_fish))
        {
            self.grid.relocate(pos, prey);
            if let Some(shark) = self.grid.get_mut(prey) {
                shark.feed(self.config.life.shark_starvation);
            }
            events.fish_eaten += 1;
            trace!(tick, x = prey.x, y = prey.y, "Shark ate a fish");
            self.breed(pos, prey, tick, events);
        } else if let Some(dest) = self.first_neighbor(pos, start, |cell| cell.is_none()) {
            self.grid.relocate(pos, dest);
            self.breed(pos, dest, tick, events);
        }
    }

    /// Walk the four neighbours in rotation order from `start` and return
    /// the first whose contents satisfy `accept`
    fn first_neighbor<F>(&self, pos: Position, start: usize, accept: F) -> Option<Position>
    where
        F: Fn(Option<&Organism>) -> bool,
    {
        Direction::rotation(start)
            .into_iter()
            .map(|direction| self.grid.neighbor(pos, direction))
            .find(|&neighbor| accept(self.grid.get(neighbor)))
    }

    /// After a parent moved from `origin` to `dest`, leave a newborn in the
    /// vacated cell when the parent's breeding interval has come round
    fn breed(&mut self, origin: Position, dest: Position, tick: u64, events: &mut TickEvents) {
        let parent = match self.grid.get(dest) {
            Some(parent) => *parent,
            None => return,
        };

        let life = &self.config.life;
        let interval = match parent.kind {
            OrganismKind::Fish => life.fish_breed_interval,
            OrganismKind::Shark { .. } => life.shark_breed_interval,
        };

        if !parent.breeding_due(interval) {
            return;
        }

        self.grid
            .place(origin, Organism::newborn(&parent, tick, life.shark_starvation));

        match parent.kind {
            OrganismKind::Fish => events.fish_born += 1,
            OrganismKind::Shark { .. } => events.sharks_born += 1,
        }

        trace!(
            tick,
            species = %parent.species(),
            parent_age = parent.age,
            x = origin.x,
            y = origin.y,
            "Organism reproduced"
        );
    }

    fn emit_population_census(&self, events: &TickEvents) {
        let census = self.census();

        info!(
            event = "population_census",
            tick = census.tick,
            fish = census.fish,
            sharks = census.sharks,
            fish_born = events.fish_born,
            sharks_born = events.sharks_born,
            fish_eaten = events.fish_eaten,
            sharks_starved = events.sharks_starved,
            fish_stranded = events.fish_stranded,
            "Population census"
        );

        event!(
            Level::DEBUG,
            gauge_name = "population_total",
            gauge_value = census.population(),
            tick = census.tick,
            "Population gauge"
        );
    }

    fn emit_run_summary(&self, report: &RunReport) {
        info!(
            event = "run_summary",
            ticks_run = report.ticks_run,
            final_fish = report.final_census.fish,
            final_sharks = report.final_census.sharks,
            peak_fish = report.history.peak_fish(),
            peak_sharks = report.history.peak_sharks(),
            fish_born = report.totals.fish_born,
            sharks_born = report.totals.sharks_born,
            fish_eaten = report.totals.fish_eaten,
            sharks_starved = report.totals.sharks_starved,
            fish_stranded = report.totals.fish_stranded,
            "Run complete"
        );

        for species in [Species::Fish, Species::Shark] {
            if let Some(tick) = report.history.extinction_tick(species) {
                debug!(%species, tick, "Species went extinct");
            }
        }
    }
}

/// Outcome of [`Simulation::run`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: u64,
    pub ticks_run: u64,
    pub final_census: Census,
    pub totals: TickEvents,
    pub history: PopulationHistory,
}
