//! 2D grid for the world.

use crate::organism::Organism;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use wator_core::{Direction, Position, RunConfig, Species};

/// A 2D toroidal grid where each cell holds at most one organism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Option<Organism>>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width * height) as usize;
        Self {
            width,
            height,
            cells: vec![None; size],
        }
    }

    /// Create a grid with the configured population on distinct random cells.
    ///
    /// The caller validates that the population fits.
    pub fn from_config(config: &RunConfig, rng: &mut ChaCha8Rng) -> Self {
        let mut grid = Self::new(config.world.width, config.world.height);

        let mut positions: Vec<Position> = grid.positions().collect();
        positions.shuffle(rng);

        let fish = config.population.initial_fish;
        let sharks = config.population.initial_sharks;
        let mut free = positions.into_iter();

        for pos in free.by_ref().take(fish) {
            grid.place(pos, Organism::fish());
        }
        for pos in free.take(sharks) {
            grid.place(pos, Organism::shark(config.life.shark_starvation));
        }

        grid
    }

    /// Occupant of the cell at `(x, y)`; any integer coordinates are valid
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&Organism> {
        self.get(Position::new(x, y))
    }

    /// Get the occupant at position (with toroidal wrapping)
    pub fn get(&self, pos: Position) -> Option<&Organism> {
        let index = self.pos_to_index(pos);
        self.cells[index].as_ref()
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Organism> {
        let index = self.pos_to_index(pos);
        self.cells[index].as_mut()
    }

    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.get(pos).is_none()
    }

    /// Set the cell unconditionally, replacing any occupant
    pub fn place(&mut self, pos: Position, organism: Organism) {
        let index = self.pos_to_index(pos);
        self.cells[index] = Some(organism);
    }

    /// Empty the cell, returning whatever lived there
    pub fn clear(&mut self, pos: Position) -> Option<Organism> {
        let index = self.pos_to_index(pos);
        self.cells[index].take()
    }

    /// Move the occupant of `from` into `to`, leaving `from` empty.
    /// Anything already at `to` is returned.
    pub fn relocate(&mut self, from: Position, to: Position) -> Option<Organism> {
        match self.clear(from) {
            Some(organism) => {
                let displaced = self.clear(to);
                self.place(to, organism);
                displaced
            }
            None => None,
        }
    }

    /// North, South, East and West neighbours, wrapped onto the torus
    pub fn adjacent(&self, pos: Position) -> [Position; 4] {
        Direction::all().map(|direction| self.neighbor(pos, direction))
    }

    pub fn neighbor(&self, pos: Position, direction: Direction) -> Position {
        pos.wrap(self.width, self.height)
            .step(direction, self.width, self.height)
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn count(&self, species: Species) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|organism| organism.species() == species)
            .count()
    }

    fn pos_to_index(&self, pos: Position) -> usize {
        let wrapped = pos.wrap(self.width, self.height);
        (wrapped.y * self.width + wrapped.x) as usize
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Iterator over all positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over occupied cells with positions
    pub fn organisms(&self) -> impl Iterator<Item = (Position, &Organism)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_ref().map(|org| (self.index_to_pos(i), org)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use wator_core::PopulationConfig;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 8);
        assert_eq!(grid.width, 10);
        assert_eq!(grid.height, 8);
        assert_eq!(grid.capacity(), 80);
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_toroidal_lookup() {
        let mut grid = Grid::new(10, 10);
        grid.place(Position::new(9, 9), Organism::fish());

        // Should wrap to (9, 9)
        assert!(grid.cell_at(-1, -1).is_some());
        assert!(grid.cell_at(19, 29).is_some());
        assert!(grid.cell_at(0, 0).is_none());
    }

    #[test]
    fn test_adjacent_wraps_corners() {
        let grid = Grid::new(5, 4);

        let adj = grid.adjacent(Position::new(0, 0));
        assert_eq!(
            adj,
            [
                Position::new(0, 3),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(4, 0),
            ]
        );

        let adj = grid.adjacent(Position::new(4, 3));
        assert_eq!(
            adj,
            [
                Position::new(4, 2),
                Position::new(4, 0),
                Position::new(0, 3),
                Position::new(3, 3),
            ]
        );
    }

    #[test]
    fn test_place_clear_relocate() {
        let mut grid = Grid::new(4, 4);
        let a = Position::new(1, 1);
        let b = Position::new(2, 1);

        grid.place(a, Organism::shark(5));
        grid.place(b, Organism::fish());
        assert_eq!(grid.occupied(), 2);

        let eaten = grid.relocate(a, b);
        assert_eq!(eaten.map(|o| o.species()), Some(Species::Fish));
        assert!(grid.is_empty_at(a));
        assert_eq!(grid.get(b).map(|o| o.species()), Some(Species::Shark));
        assert_eq!(grid.occupied(), 1);

        assert!(grid.clear(b).is_some());
        assert!(grid.clear(b).is_none());
        assert_eq!(grid.occupied(), 0);

        // Moving out of an empty cell does nothing
        assert!(grid.relocate(a, b).is_none());
        assert_eq!(grid.occupied(), 0);
    }

    #[test]
    fn test_grid_from_config() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = RunConfig {
            population: PopulationConfig {
                initial_fish: 30,
                initial_sharks: 10,
            },
            ..Default::default()
        };

        let grid = Grid::from_config(&config, &mut rng);
        assert_eq!(grid.count(Species::Fish), 30);
        assert_eq!(grid.count(Species::Shark), 10);
        assert_eq!(grid.occupied(), 40);

        for (_, organism) in grid.organisms() {
            assert_eq!(organism.age, 0);
            if let Some(health) = organism.health() {
                assert_eq!(health, config.life.shark_starvation);
            }
        }
    }

    #[test]
    fn test_from_config_can_fill_every_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut config = RunConfig::default();
        config.world.width = 3;
        config.world.height = 3;
        config.population = PopulationConfig {
            initial_fish: 5,
            initial_sharks: 4,
        };

        let grid = Grid::from_config(&config, &mut rng);
        assert_eq!(grid.occupied(), 9);
    }

    #[test]
    fn test_organisms_iterates_row_major() {
        let mut grid = Grid::new(3, 3);
        grid.place(Position::new(2, 0), Organism::fish());
        grid.place(Position::new(0, 1), Organism::fish());
        grid.place(Position::new(1, 2), Organism::shark(1));

        let positions: Vec<Position> = grid.organisms().map(|(pos, _)| pos).collect();
        assert_eq!(
            positions,
            vec![Position::new(2, 0), Position::new(0, 1), Position::new(1, 2)]
        );
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn adjacent_cells_are_one_wrapped_step_away(
                width in 1i32..40,
                height in 1i32..40,
                x in -100i32..100,
                y in -100i32..100
            ) {
                let grid = Grid::new(width, height);
                let [north, south, east, west] = grid.adjacent(Position::new(x, y));
                let origin = Position::new(x, y).wrap(width, height);

                prop_assert_eq!(north, Position::new(origin.x, (origin.y - 1 + height) % height));
                prop_assert_eq!(south, Position::new(origin.x, (origin.y + 1) % height));
                prop_assert_eq!(east, Position::new((origin.x + 1) % width, origin.y));
                prop_assert_eq!(west, Position::new((origin.x - 1 + width) % width, origin.y));
            }
        }
    }
}
