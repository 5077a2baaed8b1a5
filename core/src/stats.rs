use serde::{Deserialize, Serialize};

/// Record for one finished game, reported to the scoreboard when it is won.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameStat {
    pub name: String,
    pub playtime_secs: f64,
    pub score: f64,
}

/// Collaborator that collects one [`GameStat`] per won game and serves a
/// ranked list back to menus.
pub trait Scoreboard {
    fn add_score(&mut self, stat: GameStat);
}

/// Sink for hosts that do not keep scores.
impl Scoreboard for () {
    fn add_score(&mut self, _stat: GameStat) {}
}

/// In-memory scoreboard, ranked by descending score.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreList {
    scores: Vec<GameStat>,
}

impl ScoreList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ranked(&self) -> &[GameStat] {
        &self.scores
    }
}

impl Scoreboard for ScoreList {
    fn add_score(&mut self, stat: GameStat) {
        // earlier entries win ties, so newer equal scores rank below
        let at = self
            .scores
            .partition_point(|other| other.score >= stat.score);
        self.scores.insert(at, stat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(name: &str, score: f64) -> GameStat {
        GameStat {
            name: name.to_owned(),
            playtime_secs: 10.0,
            score,
        }
    }

    #[test]
    fn scores_are_ranked_descending() {
        let mut list = ScoreList::new();
        list.add_score(stat("a", 2.0));
        list.add_score(stat("b", 8.0));
        list.add_score(stat("c", 4.0));

        let names: Vec<_> = list.ranked().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);
    }

    #[test]
    fn ties_keep_earlier_entries_first() {
        let mut list = ScoreList::new();
        list.add_score(stat("first", 5.0));
        list.add_score(stat("second", 5.0));

        let names: Vec<_> = list.ranked().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
