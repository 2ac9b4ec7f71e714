//! Courts, rotations and schedules

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Players per court (two teams of two)
pub const PLAYERS_PER_COURT: usize = 4;

/// Players per team
pub const TEAM_SIZE: usize = 2;

/// Side of a court
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    Team1,
    Team2,
}

impl TeamSide {
    pub fn opposite(self) -> Self {
        match self {
            TeamSide::Team1 => TeamSide::Team2,
            TeamSide::Team2 => TeamSide::Team1,
        }
    }
}

/// One court: two teams of two
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    pub team1: [PlayerId; TEAM_SIZE],
    pub team2: [PlayerId; TEAM_SIZE],
}

impl Court {
    pub fn new(team1: [PlayerId; TEAM_SIZE], team2: [PlayerId; TEAM_SIZE]) -> Self {
        Self { team1, team2 }
    }

    /// Build a court from four players: first two vs last two
    pub fn from_four(players: [PlayerId; PLAYERS_PER_COURT]) -> Self {
        let [a, b, c, d] = players;
        Self::new([a, b], [c, d])
    }

    pub fn team(&self, side: TeamSide) -> &[PlayerId; TEAM_SIZE] {
        match side {
            TeamSide::Team1 => &self.team1,
            TeamSide::Team2 => &self.team2,
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut [PlayerId; TEAM_SIZE] {
        match side {
            TeamSide::Team1 => &mut self.team1,
            TeamSide::Team2 => &mut self.team2,
        }
    }

    /// All four players, team1 first
    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.team1.iter().chain(self.team2.iter())
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.players().any(|p| p == player)
    }

    /// First player appearing more than once on this court
    pub fn duplicate_player(&self) -> Option<&PlayerId> {
        let players: Vec<&PlayerId> = self.players().collect();
        players
            .iter()
            .enumerate()
            .find(|&(i, p)| players[i + 1..].contains(p))
            .map(|(_, p)| *p)
    }
}

/// Where a player sits within a rotation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Resting { index: usize },
    OnCourt { court: usize, team: TeamSide, seat: usize },
}

/// One round of play
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Identifier assigned by the persistence layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// 1-based round number
    pub number: usize,
    pub courts: Vec<Court>,
    pub resting: Vec<PlayerId>,
    #[serde(default)]
    pub manually_modified: bool,
}

impl Rotation {
    pub fn new(number: usize, courts: Vec<Court>, resting: Vec<PlayerId>) -> Self {
        Self {
            id: None,
            number,
            courts,
            resting,
            manually_modified: false,
        }
    }

    /// Court players (court order) followed by resters
    pub fn players(&self) -> impl Iterator<Item = &PlayerId> {
        self.courts
            .iter()
            .flat_map(|c| c.players())
            .chain(self.resting.iter())
    }

    pub fn player_count(&self) -> usize {
        self.courts.len() * PLAYERS_PER_COURT + self.resting.len()
    }

    pub fn is_resting(&self, player: &PlayerId) -> bool {
        self.resting.contains(player)
    }

    /// True when courts and resters cover `roster` exactly once
    pub fn check_partition(&self, roster: &[PlayerId]) -> bool {
        let mut seen: Vec<&PlayerId> = self.players().collect();
        let mut expected: Vec<&PlayerId> = roster.iter().collect();
        seen.sort();
        expected.sort();
        seen == expected
    }
}

/// Kind of generated schedule
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleKind {
    #[default]
    RoundRobin,
    /// Single rotation, random pairing, no history
    KingOfTheCourt,
}

/// Ordered sequence of rotations for a session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub kind: ScheduleKind,
    pub rotations: Vec<Rotation>,
}

impl Schedule {
    pub fn new(kind: ScheduleKind, rotations: Vec<Rotation>) -> Self {
        Self { kind, rotations }
    }

    /// Find a rotation by its round number
    pub fn rotation(&self, number: usize) -> Option<&Rotation> {
        self.rotations.iter().find(|r| r.number == number)
    }

    /// Number of rounds each player sat out
    pub fn rest_counts(&self) -> BTreeMap<PlayerId, usize> {
        let mut counts = BTreeMap::new();
        for rotation in &self.rotations {
            for player in rotation.players() {
                counts.entry(player.clone()).or_insert(0);
            }
            for player in &rotation.resting {
                *counts.entry(player.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Number of rounds each pair of players shared a team, keyed by ordered pair
    pub fn partnership_counts(&self) -> BTreeMap<(PlayerId, PlayerId), usize> {
        let mut counts = BTreeMap::new();
        for court in self.rotations.iter().flat_map(|r| r.courts.iter()) {
            for [a, b] in [&court.team1, &court.team2] {
                let key = if a <= b {
                    (a.clone(), b.clone())
                } else {
                    (b.clone(), a.clone())
                };
                *counts.entry(key).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Highest number of times any pair shared a team
    pub fn max_partnership_repeats(&self) -> usize {
        self.partnership_counts().values().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::from(*n)).collect()
    }

    fn court(names: [&str; 4]) -> Court {
        Court::from_four(names.map(PlayerId::from))
    }

    #[test]
    fn test_court_from_four() {
        let c = court(["a", "b", "c", "d"]);
        assert_eq!(c.team(TeamSide::Team1), &[PlayerId::from("a"), PlayerId::from("b")]);
        assert_eq!(c.team(TeamSide::Team2), &[PlayerId::from("c"), PlayerId::from("d")]);
        assert!(c.contains(&PlayerId::from("d")));
        assert!(!c.contains(&PlayerId::from("e")));
        assert!(c.duplicate_player().is_none());
    }

    #[test]
    fn test_court_duplicate_detection() {
        let c = court(["a", "b", "c", "a"]);
        assert_eq!(c.duplicate_player(), Some(&PlayerId::from("a")));
    }

    #[test]
    fn test_check_partition() {
        let rotation = Rotation::new(1, vec![court(["a", "b", "c", "d"])], ids(&["e"]));
        assert!(rotation.check_partition(&ids(&["e", "d", "c", "b", "a"])));
        assert!(!rotation.check_partition(&ids(&["a", "b", "c", "d"])));
        assert!(!rotation.check_partition(&ids(&["a", "b", "c", "d", "e", "f"])));
        assert_eq!(rotation.player_count(), 5);
    }

    #[test]
    fn test_check_partition_rejects_duplicates() {
        let rotation = Rotation::new(1, vec![court(["a", "b", "c", "d"])], ids(&["a"]));
        assert!(!rotation.check_partition(&ids(&["a", "b", "c", "d", "e"])));
    }

    #[test]
    fn test_schedule_summaries() {
        let schedule = Schedule::new(
            ScheduleKind::RoundRobin,
            vec![
                Rotation::new(1, vec![court(["a", "b", "c", "d"])], ids(&["e"])),
                Rotation::new(2, vec![court(["b", "a", "e", "c"])], ids(&["d"])),
            ],
        );

        let rests = schedule.rest_counts();
        assert_eq!(rests[&PlayerId::from("a")], 0);
        assert_eq!(rests[&PlayerId::from("d")], 1);
        assert_eq!(rests[&PlayerId::from("e")], 1);

        let partners = schedule.partnership_counts();
        assert_eq!(partners[&(PlayerId::from("a"), PlayerId::from("b"))], 2);
        assert_eq!(schedule.max_partnership_repeats(), 2);
        assert_eq!(schedule.rotation(2).map(|r| r.number), Some(2));
        assert!(schedule.rotation(3).is_none());
    }

    #[test]
    fn test_team_side_opposite() {
        assert_eq!(TeamSide::Team1.opposite(), TeamSide::Team2);
        assert_eq!(TeamSide::Team2.opposite(), TeamSide::Team1);
    }
}
