use hashbrown::HashSet;
use rand::prelude::*;

use super::*;

/// Uniform generator anchored to the first-clicked tile.
///
/// Samples coordinates uniformly and rejects repeats and the start tile
/// until the requested number of distinct bombs is placed, so the first
/// click of a game never detonates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    start: Ix2,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, start: Ix2) -> Self {
        Self { seed, start }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Minefield {
        let (size_x, size_y) = config.size;
        let total_tiles = config.total_tiles();

        let bombs = if config.bombs >= total_tiles {
            log::warn!(
                "Cannot keep start tile safe, requested {} bombs but only {} fit",
                config.bombs,
                total_tiles - 1
            );
            total_tiles - 1
        } else {
            config.bombs
        };

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut chosen: HashSet<Ix2> = HashSet::with_capacity(bombs as usize);
        while (chosen.len() as Ax) < bombs {
            let coords = (rng.random_range(0..size_x), rng.random_range(0..size_y));
            if coords == self.start {
                continue;
            }
            chosen.insert(coords);
        }

        log::debug!("Placed {} bombs away from {:?}", chosen.len(), self.start);
        Minefield::from_bomb_set(config.size, chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(seed: u64, start: Ix2) -> Minefield {
        RandomMinefieldGenerator::new(seed, start).generate(Difficulty::Beginner.config())
    }

    #[test]
    fn start_tile_is_never_a_bomb() {
        for seed in 0..64 {
            let minefield = generate(seed, (4, 4));
            assert!(!minefield.contains_bomb((4, 4)), "seed {}", seed);
        }
    }

    #[test]
    fn bomb_count_is_exact() {
        for seed in 0..16 {
            assert_eq!(generate(seed, (0, 0)).bomb_count(), 10, "seed {}", seed);
        }
    }

    #[test]
    fn counts_match_brute_force() {
        let minefield = generate(7, (4, 4));
        for x in 0..9 {
            for y in 0..9 {
                let expected = iter_neighbors((x, y), (9, 9))
                    .filter(|&neighbor| minefield.contains_bomb(neighbor))
                    .count() as u8;
                match minefield.count_at((x, y)) {
                    Some(count) => {
                        assert!(!minefield.contains_bomb((x, y)));
                        assert!(count > 0);
                        assert_eq!(count, expected);
                    }
                    None => assert!(minefield.contains_bomb((x, y)) || expected == 0),
                }
            }
        }
    }

    #[test]
    fn same_seed_reproduces_the_layout() {
        let first = generate(42, (1, 1));
        let second = generate(42, (1, 1));
        assert_eq!(first, second);
    }

    #[test]
    fn nearly_full_board_still_terminates() {
        let config = GameConfig::new((4, 4), 15);
        let minefield = RandomMinefieldGenerator::new(3, (2, 2)).generate(config);
        assert_eq!(minefield.bomb_count(), 15);
        assert!(!minefield.contains_bomb((2, 2)));
    }
}
