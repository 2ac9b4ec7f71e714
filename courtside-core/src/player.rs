//! Players, identities and roster loading

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Lowest public rating
pub const MIN_RATING: f64 = 1.0;

/// Highest public rating
pub const MAX_RATING: f64 = 8.0;

/// Rating given to new and guest players
pub const DEFAULT_RATING: f64 = 4.0;

/// Volatility given to new and guest players
pub const DEFAULT_VOLATILITY: f64 = 0.06;

/// Player identity (name or external id)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for PlayerId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

/// A club member or guest with their current skill estimate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    #[serde(default)]
    pub gender: Gender,
    /// Public rating, within [`MIN_RATING`, `MAX_RATING`]
    #[serde(default = "default_rating")]
    pub rating: f64,
    /// 0.0 (unknown) to 1.0 (certain)
    #[serde(default)]
    pub confidence: f64,
    #[serde(default = "default_volatility")]
    pub volatility: f64,
    #[serde(default)]
    pub total_games: u32,
}

fn default_rating() -> f64 {
    DEFAULT_RATING
}

fn default_volatility() -> f64 {
    DEFAULT_VOLATILITY
}

impl Player {
    /// Create a player with default rating values
    pub fn guest(name: impl Into<String>) -> Self {
        Self {
            id: PlayerId::new(name),
            gender: Gender::Unspecified,
            rating: DEFAULT_RATING,
            confidence: 0.0,
            volatility: DEFAULT_VOLATILITY,
            total_games: 0,
        }
    }

    /// Set the rating fields
    pub fn with_rating(mut self, rating: f64, confidence: f64, volatility: f64) -> Self {
        self.rating = rating;
        self.confidence = confidence;
        self.volatility = volatility;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_total_games(mut self, total_games: u32) -> Self {
        self.total_games = total_games;
        self
    }
}

/// A roster line: either a bare guest name or a full player record
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum RosterEntry {
    Name(String),
    Player(Player),
}

impl From<RosterEntry> for Player {
    fn from(entry: RosterEntry) -> Self {
        match entry {
            RosterEntry::Name(name) => Player::guest(name),
            RosterEntry::Player(player) => player,
        }
    }
}

/// Identifiers of a roster, in roster order
pub fn roster_ids(players: &[Player]) -> Vec<PlayerId> {
    players.iter().map(|p| p.id.clone()).collect()
}

/// Parse a roster from JSON (array of names and/or player objects)
pub fn parse_roster(content: &str) -> anyhow::Result<Vec<Player>> {
    let entries: Vec<RosterEntry> = serde_json::from_str(content)?;
    Ok(entries.into_iter().map(Player::from).collect())
}

/// Load a roster from a JSON file
pub fn load_roster(path: &Path) -> anyhow::Result<Vec<Player>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster: {}", path.display()))?;
    parse_roster(&content).with_context(|| format!("Failed to parse roster: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_defaults() {
        let p = Player::guest("Ana");
        assert_eq!(p.id, PlayerId::from("Ana"));
        assert_eq!(p.rating, DEFAULT_RATING);
        assert_eq!(p.confidence, 0.0);
        assert_eq!(p.total_games, 0);
    }

    #[test]
    fn test_parse_mixed_roster() {
        let json = r#"[
            "Guest One",
            {"id": "Ben", "gender": "male", "rating": 5.5, "confidence": 0.4, "volatility": 0.05, "total_games": 12},
            {"id": "Cleo"}
        ]"#;
        let roster = parse_roster(json).unwrap();

        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0], Player::guest("Guest One"));
        assert_eq!(roster[1].gender, Gender::Male);
        assert_eq!(roster[1].rating, 5.5);
        assert_eq!(roster[1].total_games, 12);
        assert_eq!(roster[2].rating, DEFAULT_RATING);
        assert_eq!(roster[2].volatility, DEFAULT_VOLATILITY);
    }

    #[test]
    fn test_player_id_serializes_as_string() {
        let json = serde_json::to_string(&PlayerId::from("Dee")).unwrap();
        assert_eq!(json, "\"Dee\"");
    }

    #[test]
    fn test_roster_ids_preserve_order() {
        let roster = vec![Player::guest("b"), Player::guest("a")];
        assert_eq!(roster_ids(&roster), vec![PlayerId::from("b"), PlayerId::from("a")]);
    }
}
