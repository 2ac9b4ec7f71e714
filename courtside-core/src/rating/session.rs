//! Session rating - turn a session's doubles scores into per-player batches
//!
//! Level 1 - Orchestration

use rustc_hash::FxHashMap;

use super::glicko::{OpponentResult, RatingEngine, RatingUpdate};
use crate::error::{Error, Result};
use crate::player::{Player, PlayerId};
use crate::schedule::TeamSide;
use crate::score::GameScore;

/// Effective rating of a doubles team
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TeamRating {
    pub rating: f64,
    pub confidence: f64,
}

impl TeamRating {
    /// Arithmetic mean of two partners
    pub fn mean(a: &Player, b: &Player) -> Self {
        Self {
            rating: (a.rating + b.rating) / 2.0,
            confidence: (a.confidence + b.confidence) / 2.0,
        }
    }
}

/// Rate every player who appears in `scores`.
///
/// Each player gets one result per recorded court, scored against the mean
/// of the opposing pair. All results use the ratings from before this batch.
/// Updates come back in roster order; players without games are left out.
pub fn rate_session<'a, I>(
    roster: &[Player],
    scores: I,
    engine: &RatingEngine,
) -> Result<Vec<RatingUpdate>>
where
    I: IntoIterator<Item = &'a GameScore>,
{
    let index: FxHashMap<&PlayerId, usize> = roster
        .iter()
        .enumerate()
        .map(|(i, p)| (&p.id, i))
        .collect();
    let mut batches: Vec<Vec<OpponentResult>> = vec![Vec::new(); roster.len()];
    let mut score_count = 0;

    for score in scores {
        score.validate()?;
        let team1 = lookup_team(&index, score, TeamSide::Team1)?;
        let team2 = lookup_team(&index, score, TeamSide::Team2)?;

        for (side, own, opposing) in [
            (TeamSide::Team1, team1, team2),
            (TeamSide::Team2, team2, team1),
        ] {
            let team = TeamRating::mean(&roster[opposing[0]], &roster[opposing[1]]);
            let result = score.result_for(side);
            for i in own {
                batches[i].push(OpponentResult::new(result, team.rating, team.confidence));
            }
        }
        score_count += 1;
    }

    let mut updates = Vec::new();
    for (player, batch) in roster.iter().zip(&batches) {
        if batch.is_empty() {
            continue;
        }
        updates.push(engine.rate(player, batch)?);
    }

    tracing::info!(
        "Rated {} players from {} court scores",
        updates.len(),
        score_count
    );

    Ok(updates)
}

/// Resolve both players of one side to roster positions
fn lookup_team(
    index: &FxHashMap<&PlayerId, usize>,
    score: &GameScore,
    side: TeamSide,
) -> Result<[usize; 2]> {
    let team = score.team(side);
    let find = |id: &PlayerId| {
        index.get(id).copied().ok_or_else(|| {
            Error::MalformedScoreBatch(format!(
                "court {} rotation {}: {} is not on the roster",
                score.court, score.rotation, id
            ))
        })
    };
    Ok([find(&team[0])?, find(&team[1])?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::ScoreBook;

    fn roster() -> Vec<Player> {
        vec![
            Player::guest("a").with_rating(5.0, 0.5, 0.06),
            Player::guest("b").with_rating(3.0, 0.3, 0.06),
            Player::guest("c"),
            Player::guest("d"),
            Player::guest("idle"),
        ]
    }

    fn team(x: &str, y: &str) -> Vec<PlayerId> {
        vec![PlayerId::from(x), PlayerId::from(y)]
    }

    #[test]
    fn test_team_rating_is_mean() {
        let r = roster();
        let team = TeamRating::mean(&r[0], &r[1]);
        assert_eq!(team.rating, 4.0);
        assert!((team.confidence - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_rate_session_updates_players_in_roster_order() {
        let r = roster();
        let mut book = ScoreBook::new();
        book.submit(GameScore::new(1, 1, team("c", "a"), team("b", "d"), vec![(11, 5)]))
            .unwrap();

        let updates = rate_session(&r, book.scores(), &RatingEngine::default()).unwrap();
        let names: Vec<&str> = updates.iter().map(|u| u.player.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);

        assert!(updates[0].rating > 5.0);
        assert!(updates[1].rating < 3.0);
        assert!(updates[2].rating > 4.0);
        assert!(updates[3].rating < 4.0);
        assert!(updates.iter().all(|u| u.total_games == 1));
    }

    #[test]
    fn test_total_games_counts_courts_not_rallies() {
        let r = roster();
        let scores = vec![
            GameScore::new(1, 1, team("a", "b"), team("c", "d"), vec![(11, 9), (9, 11), (11, 3)]),
            GameScore::new(1, 2, team("a", "c"), team("b", "d"), vec![(11, 9)]),
        ];
        let updates = rate_session(&r, &scores, &RatingEngine::default()).unwrap();
        assert!(updates.iter().all(|u| u.total_games == 2));
    }

    #[test]
    fn test_unknown_player_is_malformed() {
        let r = roster();
        let scores = vec![GameScore::new(1, 1, team("a", "b"), team("c", "ghost"), vec![(11, 9)])];
        let err = rate_session(&r, &scores, &RatingEngine::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedScoreBatch(_)));
    }

    #[test]
    fn test_no_scores_no_updates() {
        let r = roster();
        let updates = rate_session(&r, &Vec::<GameScore>::new(), &RatingEngine::default()).unwrap();
        assert!(updates.is_empty());
    }
}
