use super::*;

/// Purely random placement. The same seed and config always produce the same layout.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generator seeded from the thread-local RNG.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        let size = (config.grid_size, config.grid_size);
        let total_cells = config.total_cells();

        // optimize for full boards
        if config.num_bombs >= total_cells {
            if config.num_bombs > total_cells {
                log::warn!(
                    "Minefield already full, generated anyway, requested {} but only fits {}",
                    config.num_bombs,
                    total_cells
                );
            }
            return MineLayout::from_counted_mask(
                Array2::from_elem(size.to_nd_index(), true),
                total_cells,
            );
        }

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        let mut mines_placed = 0;
        let mut rng = SmallRng::seed_from_u64(self.seed);

        while mines_placed < config.num_bombs {
            let coords: Coord2 = (
                rng.random_range(0..config.grid_size),
                rng.random_range(0..config.grid_size),
            );
            let cell = &mut mine_mask[coords.to_nd_index()];
            if *cell {
                log::trace!("Mine already placed at {:?}, drawing again", coords);
                continue;
            }
            *cell = true;
            mines_placed += 1;
        }

        log::debug!(
            "Generated {}x{} minefield with {} mines from seed {}",
            config.grid_size,
            config.grid_size,
            mines_placed,
            self.seed
        );
        MineLayout::from_counted_mask(mine_mask, mines_placed)
    }
}
