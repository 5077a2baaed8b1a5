use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use stats::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod stats;
mod tile;
mod types;

/// Named difficulty tiers, each fixing the board size, bomb count, and score
/// multiplier. Harder tiers reward faster wins with larger multipliers.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Difficulty {
    Trivial,
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Trivial => "trivial",
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Trivial => GameConfig::new_unchecked((9, 9), 3, 1.0),
            Self::Beginner => GameConfig::new_unchecked((9, 9), 10, 100.0),
            Self::Intermediate => GameConfig::new_unchecked((16, 16), 40, 1_000.0),
            Self::Expert => GameConfig::new_unchecked((30, 16), 99, 10_000.0),
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Beginner
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Ix2,
    pub bombs: Ax,
    pub multiplier: f64,
}

impl GameConfig {
    pub const fn new_unchecked(size: Ix2, bombs: Ax, multiplier: f64) -> Self {
        Self {
            size,
            bombs,
            multiplier,
        }
    }

    /// Custom board configuration. The bomb count is capped at one less than
    /// the tile count, so the tile kept safe on the first click always
    /// exists.
    pub fn new((size_x, size_y): Ix2, bombs: Ax) -> Self {
        let size_x = size_x.clamp(1, Ix::MAX);
        let size_y = size_y.clamp(1, Ix::MAX);
        let max_bombs = mult(size_x, size_y).saturating_sub(1).max(1);
        if bombs > max_bombs {
            log::warn!("Requested {} bombs, capped at {}", bombs, max_bombs);
        }
        let bombs = bombs.clamp(1, max_bombs);
        Self::new_unchecked((size_x, size_y), bombs, 1.0)
    }

    pub const fn total_tiles(&self) -> Ax {
        mult(self.size.0, self.size.1)
    }
}

/// Bomb layout plus the derived adjacency counts for one board.
///
/// The count map only has entries for non-bomb tiles with at least one
/// adjacent bomb; tiles absent from both collections are blank and never stop
/// a flood fill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    size: Ix2,
    bombs: HashSet<Ix2>,
    #[serde(with = "crate::types::coord_map_serde")]
    counts: HashMap<Ix2, u8>,
}

impl Minefield {
    /// Builds a layout from explicit bomb coordinates. At least one safe
    /// tile must remain.
    pub fn from_bomb_coords(size: Ix2, bomb_coords: &[Ix2]) -> Result<Self> {
        let mut bombs = HashSet::with_capacity(bomb_coords.len());
        for &coords in bomb_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            bombs.insert(coords);
        }
        if bombs.len() >= usize::from(mult(size.0, size.1)) {
            return Err(GameError::TooManyBombs);
        }
        Ok(Self::from_bomb_set(size, bombs))
    }

    pub(crate) fn from_bomb_set(size: Ix2, bombs: HashSet<Ix2>) -> Self {
        let mut counts: HashMap<Ix2, u8> = HashMap::new();
        for &bomb in &bombs {
            for neighbor in iter_neighbors(bomb, size) {
                *counts.entry(neighbor).or_insert(0) += 1;
            }
        }
        // counts accumulated onto bomb tiles are dropped, the map only
        // describes numbered tiles
        counts.retain(|coords, _| !bombs.contains(coords));
        Self {
            size,
            bombs,
            counts,
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size, self.bomb_count(), 1.0)
    }

    pub fn size(&self) -> Ix2 {
        self.size
    }

    pub fn bomb_count(&self) -> Ax {
        self.bombs.len() as Ax
    }

    pub fn safe_count(&self) -> Ax {
        self.total_tiles() - self.bomb_count()
    }

    pub fn total_tiles(&self) -> Ax {
        mult(self.size.0, self.size.1)
    }

    pub fn contains_bomb(&self, coords: Ix2) -> bool {
        self.bombs.contains(&coords)
    }

    /// Number of adjacent bombs, or `None` for bomb tiles and blank tiles.
    pub fn count_at(&self, coords: Ix2) -> Option<u8> {
        self.counts.get(&coords).copied()
    }

    pub fn bombs(&self) -> impl Iterator<Item = Ix2> + '_ {
        self.bombs.iter().copied()
    }

    pub fn counts(&self) -> &HashMap<Ix2, u8> {
        &self.counts
    }
}

/// Outcome of marking a tile
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    MarkChanged,
}

impl FlagOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::MarkChanged => true,
        }
    }
}

/// Outcome of opening a tile
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OpenOutcome {
    NoChange,
    Safe,
    Explode,
    Win,
}

impl OpenOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        use OpenOutcome::*;
        match self {
            NoChange => false,
            Safe => true,
            Explode => true,
            Win => true,
        }
    }
}
