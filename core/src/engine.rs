use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Playing -> Win
/// - Playing -> Lose
///
/// Both end states are terminal; only an explicit [`Game::reset`] starts a
/// new round.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    Win,
    Lose,
}

impl GameState {
    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Playing
    }
}

/// Represents a game from start to finish.
///
/// The board starts all-covered with no bombs; the layout is generated on
/// the first click of either kind, anchored so the clicked tile is safe.
/// Click handlers are total: out-of-range tiles, finished games, and
/// interactions with missing or protected tiles all report
/// [`OpenOutcome::NoChange`] / [`FlagOutcome::NoChange`] instead of failing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game<S: Scoreboard = ()> {
    config: GameConfig,
    name: String,
    seed: u64,
    minefield: Option<Minefield>,
    #[serde(with = "crate::types::coord_map_serde")]
    covered: HashMap<Ix2, Cover>,
    flags: HashSet<Ix2>,
    state: GameState,
    playtime: f64,
    detonated: Option<Ix2>,
    scoreboard: S,
}

impl Game {
    /// Creates a game with the given preset difficulty, which fixes the
    /// board size, bomb count, and score multiplier.
    pub fn new(difficulty: Difficulty, seed: u64) -> Game {
        Self::from_config(difficulty.config(), difficulty.label().to_owned(), seed)
    }

    /// Creates a game with a custom board size and bomb count. The bomb
    /// count is capped so at least one safe tile remains.
    pub fn custom(size: Ix2, bombs: Ax, seed: u64) -> Game {
        let config = GameConfig::new(size, bombs);
        let name = format!(
            "custom:{}x{}-{}",
            config.size.0, config.size.1, config.bombs
        );
        Self::from_config(config, name, seed)
    }

    /// Creates a game from a caller-built configuration, for hosts that
    /// define their own tiers with a score multiplier.
    pub fn with_config(config: GameConfig, seed: u64) -> Game {
        let name = format!(
            "custom:{}x{}-{}",
            config.size.0, config.size.1, config.bombs
        );
        Self::from_config(config, name, seed)
    }

    /// Creates a game over a pre-built bomb layout, skipping deferred
    /// generation entirely.
    pub fn with_minefield(minefield: Minefield) -> Game {
        let config = minefield.game_config();
        let name = format!(
            "custom:{}x{}-{}",
            config.size.0, config.size.1, config.bombs
        );
        let mut game = Self::from_config(config, name, 0);
        game.minefield = Some(minefield);
        game
    }

    fn from_config(config: GameConfig, name: String, seed: u64) -> Game {
        let mut game = Game {
            config,
            name,
            seed,
            minefield: None,
            covered: HashMap::with_capacity(usize::from(config.total_tiles())),
            flags: HashSet::new(),
            state: GameState::Playing,
            playtime: 0.0,
            detonated: None,
            scoreboard: (),
        };
        game.cover_all();
        game
    }
}

impl<S: Scoreboard> Game<S> {
    /// Replaces the scoreboard collaborator that win records are reported
    /// to.
    pub fn with_scoreboard<S2: Scoreboard>(self, scoreboard: S2) -> Game<S2> {
        Game {
            config: self.config,
            name: self.name,
            seed: self.seed,
            minefield: self.minefield,
            covered: self.covered,
            flags: self.flags,
            state: self.state,
            playtime: self.playtime,
            detonated: self.detonated,
            scoreboard,
        }
    }

    pub fn scoreboard(&self) -> &S {
        &self.scoreboard
    }

    pub fn cur_state(&self) -> GameState {
        self.state
    }

    pub fn ended(&self) -> bool {
        self.state.is_final()
    }

    pub fn size(&self) -> Ix2 {
        self.config.size
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the bomb layout has been generated yet.
    pub fn is_generated(&self) -> bool {
        self.minefield.is_some()
    }

    /// Bomb count fixed at construction; also the flag budget.
    pub fn total_bombs(&self) -> Ax {
        self.config.bombs
    }

    /// Flags still available to be placed, zero once the budget is spent.
    pub fn available_flags(&self) -> Ax {
        self.config.bombs.saturating_sub(self.flags.len() as Ax)
    }

    /// How many bombs have not been flagged yet
    pub fn mines_left(&self) -> isize {
        (self.config.bombs as isize) - (self.flags.len() as isize)
    }

    /// Map of every still-covered tile to its cover state. Opened tiles are
    /// absent.
    pub fn covered(&self) -> &HashMap<Ix2, Cover> {
        &self.covered
    }

    pub fn cover_at(&self, coords: Ix2) -> Option<Cover> {
        self.covered.get(&coords).copied()
    }

    /// Tiles currently marked with a flag. Question marks are not included.
    pub fn flags(&self) -> &HashSet<Ix2> {
        &self.flags
    }

    /// Number of adjacent bombs at `coords`, `None` for blank and bomb
    /// tiles, or before generation.
    pub fn count_at(&self, coords: Ix2) -> Option<u8> {
        self.minefield.as_ref().and_then(|m| m.count_at(coords))
    }

    /// All numbered tiles, hidden ones included; empty before generation.
    pub fn numbers(&self) -> impl Iterator<Item = (Ix2, u8)> + '_ {
        self.minefield
            .iter()
            .flat_map(|m| m.counts().iter().map(|(&coords, &count)| (coords, count)))
    }

    /// Whether `coords` holds a bomb. Meant for disclosure rendering after
    /// the game is lost; always false before generation.
    pub fn is_bomb(&self, coords: Ix2) -> bool {
        self.minefield
            .as_ref()
            .is_some_and(|m| m.contains_bomb(coords))
    }

    /// The bomb that ended the game, if it was lost.
    pub fn detonated(&self) -> Option<Ix2> {
        self.detonated
    }

    /// Accumulates host-driven play time. Ignored until the board has been
    /// generated and frozen once the game ends.
    pub fn tick(&mut self, dt: f64) {
        if self.minefield.is_some() && !self.state.is_final() {
            self.playtime += dt;
        }
    }

    pub fn playtime_secs(&self) -> f64 {
        self.playtime
    }

    /// Score for the current playtime, rewarding faster games. Only
    /// meaningful once the game is won.
    pub fn score(&self) -> f64 {
        self.config.multiplier / self.playtime
    }

    /// Opens a covered tile, flood-filling through blank regions. Flagged
    /// tiles are protected from opening; bombs end the game.
    pub fn handle_left_click(&mut self, location: Ix2) -> OpenOutcome {
        use OpenOutcome::*;

        if !in_bounds(location, self.config.size) {
            return NoChange;
        }
        self.ensure_generated(location);
        if self.state.is_final() {
            return NoChange;
        }
        if !self.covered.contains_key(&location) || self.flags.contains(&location) {
            return NoChange;
        }

        if self.is_bomb(location) {
            self.explode(location);
            return Explode;
        }

        self.uncover(location);

        let bomb_count = self.minefield.as_ref().map_or(0, |m| m.bomb_count());
        if self.covered.len() == usize::from(bomb_count) {
            self.finish_win();
            Win
        } else {
            Safe
        }
    }

    /// Rotates the mark on a covered tile: closed tiles gain a flag while
    /// the budget allows (a question mark otherwise), flags turn into
    /// question marks, question marks are cleared. A question mark never
    /// turns into a flag directly.
    pub fn handle_right_click(&mut self, location: Ix2) -> FlagOutcome {
        use FlagOutcome::*;

        if !in_bounds(location, self.config.size) {
            return NoChange;
        }
        self.ensure_generated(location);
        if self.state.is_final() {
            return NoChange;
        }

        let available = self.available_flags();
        let Some(cover) = self.covered.get_mut(&location) else {
            return NoChange;
        };
        match *cover {
            Cover::Flag => {
                *cover = Cover::Question;
                self.flags.remove(&location);
            }
            Cover::Question => {
                *cover = Cover::Closed;
            }
            Cover::Closed if available > 0 => {
                *cover = Cover::Flag;
                self.flags.insert(location);
            }
            Cover::Closed => {
                *cover = Cover::Question;
            }
            Cover::IncorrectFlag => return NoChange,
        }
        MarkChanged
    }

    /// Clears the board back to all-covered with generation deferred again.
    /// The board size, bomb count, and score multiplier are retained; the
    /// next first click lays out a fresh minefield from `seed`.
    pub fn reset(&mut self, seed: u64) {
        self.seed = seed;
        self.minefield = None;
        self.covered.clear();
        self.flags.clear();
        self.state = GameState::Playing;
        self.playtime = 0.0;
        self.detonated = None;
        self.cover_all();
    }

    fn cover_all(&mut self) {
        let (size_x, size_y) = self.config.size;
        for x in 0..size_x {
            for y in 0..size_y {
                self.covered.insert((x, y), Cover::Closed);
            }
        }
    }

    fn ensure_generated(&mut self, origin: Ix2) {
        if self.minefield.is_none() {
            let generator = RandomMinefieldGenerator::new(self.seed, origin);
            self.minefield = Some(generator.generate(self.config));
        }
    }

    /// Opens `origin` and flood-fills through the connected blank region up
    /// to its numbered border. Tiles are removed from the covered map before
    /// their neighbors are enqueued, so each tile is opened at most once and
    /// the fill always terminates.
    fn uncover(&mut self, origin: Ix2) {
        let Some(minefield) = &self.minefield else {
            return;
        };
        let bounds = self.config.size;

        self.covered.remove(&origin);
        self.flags.remove(&origin);
        log::debug!("Open tile at {:?}, count: {:?}", origin, minefield.count_at(origin));

        let mut to_visit = VecDeque::from([origin]);
        while let Some(coords) = to_visit.pop_front() {
            if minefield.count_at(coords).is_some() {
                // numbered tile, the fill stops here
                continue;
            }
            for neighbor in iter_neighbors(coords, bounds) {
                if self.covered.remove(&neighbor).is_some() {
                    self.flags.remove(&neighbor);
                    log::trace!("Flood opened tile at {:?}", neighbor);
                    to_visit.push_back(neighbor);
                }
            }
        }
    }

    /// Lose processing: discloses every covered unflagged bomb and marks
    /// flags sitting on safe tiles as incorrect.
    fn explode(&mut self, location: Ix2) {
        self.state = GameState::Lose;
        self.detonated = Some(location);
        log::debug!("Bomb detonated at {:?}", location);

        let Some(minefield) = &self.minefield else {
            return;
        };
        for bomb in minefield.bombs() {
            if !self.flags.contains(&bomb) {
                self.covered.remove(&bomb);
            }
        }
        for (&coords, cover) in self.covered.iter_mut() {
            if cover.is_flag() && !minefield.contains_bomb(coords) {
                *cover = Cover::IncorrectFlag;
            }
        }
    }

    /// Win processing: every still-covered tile is a bomb, so flag the ones
    /// the player had not marked yet and report the score.
    fn finish_win(&mut self) {
        self.state = GameState::Win;
        for (&coords, cover) in self.covered.iter_mut() {
            if !cover.is_flag() {
                *cover = Cover::Flag;
                self.flags.insert(coords);
            }
        }

        let stat = GameStat {
            name: self.name.clone(),
            playtime_secs: self.playtime,
            score: self.score(),
        };
        log::debug!("Won {} in {}s, score {}", stat.name, stat.playtime_secs, stat.score);
        self.scoreboard.add_score(stat);
    }
}
