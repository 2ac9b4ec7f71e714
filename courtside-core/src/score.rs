//! Recorded game scores and their interpretation as rating results

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::player::PlayerId;
use crate::schedule::{TeamSide, TEAM_SIZE};

/// Scores entered for one court in one rotation (best-of-N supported)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameScore {
    /// 1-based court number
    pub court: usize,
    /// 1-based rotation number
    pub rotation: usize,
    pub team1: Vec<PlayerId>,
    pub team2: Vec<PlayerId>,
    /// Per game: (team1 points, team2 points)
    pub games: Vec<(u32, u32)>,
}

impl GameScore {
    pub fn new(
        court: usize,
        rotation: usize,
        team1: Vec<PlayerId>,
        team2: Vec<PlayerId>,
        games: Vec<(u32, u32)>,
    ) -> Self {
        Self {
            court,
            rotation,
            team1,
            team2,
            games,
        }
    }

    /// Build from the two score columns as entered in a score sheet
    pub fn from_columns(
        court: usize,
        rotation: usize,
        team1: Vec<PlayerId>,
        team2: Vec<PlayerId>,
        team1_scores: &[u32],
        team2_scores: &[u32],
    ) -> Result<Self> {
        if team1_scores.len() != team2_scores.len() {
            return Err(Error::MalformedScoreBatch(format!(
                "court {} rotation {}: {} team1 scores but {} team2 scores",
                court,
                rotation,
                team1_scores.len(),
                team2_scores.len()
            )));
        }
        let games = team1_scores
            .iter()
            .copied()
            .zip(team2_scores.iter().copied())
            .collect();
        Ok(Self::new(court, rotation, team1, team2, games))
    }

    /// Check both rosters are proper doubles teams with four distinct players
    pub fn validate(&self) -> Result<()> {
        if self.team1.len() != TEAM_SIZE || self.team2.len() != TEAM_SIZE {
            return Err(Error::MalformedScoreBatch(format!(
                "court {} rotation {}: expected {} vs {} players, got {} vs {}",
                self.court,
                self.rotation,
                TEAM_SIZE,
                TEAM_SIZE,
                self.team1.len(),
                self.team2.len()
            )));
        }
        let all: Vec<&PlayerId> = self.team1.iter().chain(self.team2.iter()).collect();
        for (i, player) in all.iter().enumerate() {
            if all[i + 1..].contains(player) {
                return Err(Error::MalformedScoreBatch(format!(
                    "court {} rotation {}: {} listed twice",
                    self.court, self.rotation, player
                )));
            }
        }
        Ok(())
    }

    pub fn team(&self, side: TeamSide) -> &[PlayerId] {
        match side {
            TeamSide::Team1 => &self.team1,
            TeamSide::Team2 => &self.team2,
        }
    }

    /// Side a player played on, if any
    pub fn side_of(&self, player: &PlayerId) -> Option<TeamSide> {
        if self.team1.contains(player) {
            Some(TeamSide::Team1)
        } else if self.team2.contains(player) {
            Some(TeamSide::Team2)
        } else {
            None
        }
    }

    /// Fraction of games won by `side` (ties count half).
    ///
    /// No games recorded is treated as a 0.5 tie.
    pub fn result_for(&self, side: TeamSide) -> f64 {
        if self.games.is_empty() {
            return 0.5;
        }

        let points: f64 = self
            .games
            .iter()
            .map(|&(t1, t2)| {
                let (own, other) = match side {
                    TeamSide::Team1 => (t1, t2),
                    TeamSide::Team2 => (t2, t1),
                };
                match own.cmp(&other) {
                    std::cmp::Ordering::Greater => 1.0,
                    std::cmp::Ordering::Equal => 0.5,
                    std::cmp::Ordering::Less => 0.0,
                }
            })
            .sum();

        points / self.games.len() as f64
    }
}

/// Scores for a session, keyed by (rotation, court).
///
/// Submitting again for the same court and rotation replaces the earlier entry.
#[derive(Clone, Debug, Default)]
pub struct ScoreBook {
    scores: BTreeMap<(usize, usize), GameScore>,
}

impl ScoreBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a score, returning the one it replaced
    pub fn submit(&mut self, score: GameScore) -> Result<Option<GameScore>> {
        score.validate()?;
        let key = (score.rotation, score.court);
        let replaced = self.scores.insert(key, score);
        if replaced.is_some() {
            tracing::debug!("Replaced score for rotation {} court {}", key.0, key.1);
        }
        Ok(replaced)
    }

    pub fn get(&self, rotation: usize, court: usize) -> Option<&GameScore> {
        self.scores.get(&(rotation, court))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Scores ordered by rotation, then court
    pub fn scores(&self) -> impl Iterator<Item = &GameScore> {
        self.scores.values()
    }

    pub fn into_scores(self) -> Vec<GameScore> {
        self.scores.into_values().collect()
    }
}

/// Load a list of game scores from a JSON file into a score book
pub fn load_scores(path: &Path) -> anyhow::Result<ScoreBook> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scores: {}", path.display()))?;
    let scores: Vec<GameScore> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scores: {}", path.display()))?;

    let mut book = ScoreBook::new();
    for score in scores {
        book.submit(score)?;
    }
    Ok(book)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(a: &str, b: &str) -> Vec<PlayerId> {
        vec![PlayerId::from(a), PlayerId::from(b)]
    }

    #[test]
    fn test_split_best_of_two_is_a_tie() {
        let score = GameScore::from_columns(1, 1, team("a", "b"), team("c", "d"), &[11, 9], &[9, 11])
            .unwrap();
        assert_eq!(score.result_for(TeamSide::Team1), 0.5);
        assert_eq!(score.result_for(TeamSide::Team2), 0.5);
    }

    #[test]
    fn test_single_win() {
        let score = GameScore::new(1, 1, team("a", "b"), team("c", "d"), vec![(11, 4)]);
        assert_eq!(score.result_for(TeamSide::Team1), 1.0);
        assert_eq!(score.result_for(TeamSide::Team2), 0.0);
    }

    #[test]
    fn test_best_of_three_fraction() {
        let score = GameScore::new(1, 1, team("a", "b"), team("c", "d"), vec![(11, 4), (8, 11), (11, 9)]);
        let r = score.result_for(TeamSide::Team1);
        assert!((r - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_tied_game_and_empty_games() {
        let tied = GameScore::new(1, 1, team("a", "b"), team("c", "d"), vec![(10, 10)]);
        assert_eq!(tied.result_for(TeamSide::Team1), 0.5);

        let empty = GameScore::new(1, 1, team("a", "b"), team("c", "d"), vec![]);
        assert_eq!(empty.result_for(TeamSide::Team1), 0.5);
        assert_eq!(empty.result_for(TeamSide::Team2), 0.5);
    }

    #[test]
    fn test_mismatched_columns_rejected() {
        let err = GameScore::from_columns(2, 3, team("a", "b"), team("c", "d"), &[11], &[9, 11])
            .unwrap_err();
        assert!(matches!(err, Error::MalformedScoreBatch(_)));
    }

    #[test]
    fn test_validate_rosters() {
        let short = GameScore::new(1, 1, vec![PlayerId::from("a")], team("c", "d"), vec![(11, 2)]);
        assert!(matches!(short.validate(), Err(Error::MalformedScoreBatch(_))));

        let repeated = GameScore::new(1, 1, team("a", "b"), team("b", "d"), vec![(11, 2)]);
        assert!(matches!(repeated.validate(), Err(Error::MalformedScoreBatch(_))));

        let ok = GameScore::new(1, 1, team("a", "b"), team("c", "d"), vec![(11, 2)]);
        assert!(ok.validate().is_ok());
        assert_eq!(ok.side_of(&PlayerId::from("d")), Some(TeamSide::Team2));
        assert_eq!(ok.side_of(&PlayerId::from("x")), None);
    }

    #[test]
    fn test_score_book_replaces_resubmission() {
        let mut book = ScoreBook::new();
        let first = GameScore::new(1, 2, team("a", "b"), team("c", "d"), vec![(11, 2)]);
        let second = GameScore::new(1, 2, team("a", "b"), team("c", "d"), vec![(2, 11)]);

        assert!(book.submit(first.clone()).unwrap().is_none());
        assert_eq!(book.submit(second.clone()).unwrap(), Some(first));
        assert_eq!(book.len(), 1);
        assert_eq!(book.get(2, 1), Some(&second));
    }

    #[test]
    fn test_score_book_orders_by_rotation_then_court() {
        let mut book = ScoreBook::new();
        book.submit(GameScore::new(2, 1, team("a", "b"), team("c", "d"), vec![])).unwrap();
        book.submit(GameScore::new(1, 2, team("a", "b"), team("c", "d"), vec![])).unwrap();
        book.submit(GameScore::new(1, 1, team("e", "f"), team("g", "h"), vec![])).unwrap();

        let keys: Vec<(usize, usize)> = book.scores().map(|s| (s.rotation, s.court)).collect();
        assert_eq!(keys, vec![(1, 1), (1, 2), (2, 1)]);
    }
}
