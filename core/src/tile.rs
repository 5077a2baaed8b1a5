use serde::{Deserialize, Serialize};

/// Player-visible state of a tile that has not been opened yet. Opened tiles
/// are removed from the covered map entirely, so they never carry one of
/// these.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cover {
    Closed,
    Flag,
    Question,
    /// A flag sitting on a safe tile, disclosed when the game is lost. Never
    /// present while the game is still in progress.
    IncorrectFlag,
}

impl Cover {
    pub const fn is_flag(self) -> bool {
        matches!(self, Self::Flag)
    }

    /// Whether the tile carries a player mark of either kind.
    pub const fn is_marked(self) -> bool {
        use Cover::*;
        match self {
            Closed => false,
            Flag => true,
            Question => true,
            IncorrectFlag => true,
        }
    }
}

impl Default for Cover {
    fn default() -> Self {
        Self::Closed
    }
}
