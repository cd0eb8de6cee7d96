//! Player identification, per-player data storage, and the session roster.
//!
//! ## PlayerId
//!
//! Type-safe index into the roster's join order. Player names are opaque,
//! case-sensitive strings; the engine works with `PlayerId` internally and
//! only resolves names at the API boundary.
//!
//! ## PlayerMap
//!
//! Per-player data storage backed by `Vec` for O(1) access, indexed by
//! `PlayerId`.
//!
//! ## Roster
//!
//! Ordered, duplicate-free list of joined player names (join order drives
//! leader rotation).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use super::error::GameError;

/// Fewest players a session can start with.
pub const MIN_PLAYERS: usize = 5;

/// Most players a session can hold.
pub const MAX_PLAYERS: usize = 10;

/// Player identifier: the 0-based join-order position within the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw roster index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a roster of `player_count` players.
    ///
    /// ```
    /// use hidden_quest::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(5).collect();
    /// assert_eq!(players.len(), 5);
    /// assert_eq!(players[4], PlayerId::new(4));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// The next player in join order, wrapping around the roster.
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        Self(((self.index() + 1) % player_count) as u8)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use hidden_quest::core::{PlayerId, PlayerMap};
///
/// let mut votes: PlayerMap<Option<bool>> = PlayerMap::with_default(5);
/// votes[PlayerId::new(2)] = Some(true);
/// assert_eq!(votes[PlayerId::new(2)], Some(true));
/// assert_eq!(votes[PlayerId::new(0)], None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= MAX_PLAYERS, "At most 10 players supported");

        let data = (0..player_count as u8)
            .map(|i| factory(PlayerId(i)))
            .collect();

        Self { data }
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

/// Ordered list of joined players.
///
/// Names are unique and case-sensitive. A player's `PlayerId` is their
/// position in join order and never changes once assigned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a player, preserving join order.
    ///
    /// Fails with `RosterFull` at ten players, `AlreadyJoined` on a duplicate name.
    pub fn add(&mut self, name: impl Into<String>) -> Result<PlayerId, GameError> {
        let name = name.into();
        if self.names.len() >= MAX_PLAYERS {
            return Err(GameError::RosterFull { max: MAX_PLAYERS });
        }
        if self.contains(&name) {
            return Err(GameError::AlreadyJoined(name));
        }

        self.names.push(name);
        Ok(PlayerId((self.names.len() - 1) as u8))
    }

    /// Number of joined players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check whether a name has joined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Look up a player's ID by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<PlayerId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| PlayerId(i as u8))
    }

    /// Look up a player's ID by name, failing with `UnknownPlayer`.
    pub fn resolve(&self, name: &str) -> Result<PlayerId, GameError> {
        self.find(name)
            .ok_or_else(|| GameError::UnknownPlayer(name.to_string()))
    }

    /// Get a player's name.
    ///
    /// Panics if `player` is not on this roster.
    #[must_use]
    pub fn name(&self, player: PlayerId) -> &str {
        &self.names[player.index()]
    }

    /// All names in join order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over all player IDs in join order.
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.names.len())
    }

    /// Resolve a list of IDs to a comma-separated list of names.
    #[must_use]
    pub fn list(&self, players: &[PlayerId]) -> String {
        players
            .iter()
            .map(|&p| self.name(p))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
