//! Persistence contract and the in-memory store backing the binary and tests.
//!
//! The core never owns storage state: every operation goes through the
//! `TournamentStore` trait. Saves are version-checked so concurrent
//! read-modify-write sequences on the same tournament surface a conflict
//! instead of corrupting the roster.

use crate::models::{
    Match, MatchId, MatchStatus, Tournament, TournamentError, TournamentFilter, TournamentId,
    User, UserId,
};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Store-level failures, distinguishable as missing-record vs transient.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("version conflict: record changed since load")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Lift a store failure to the operation-level error, naming the record
    /// that was being loaded.
    pub fn missing(self, what: &str) -> TournamentError {
        match self {
            StoreError::NotFound => TournamentError::NotFound(what.to_string()),
            StoreError::Conflict => TournamentError::Conflict(
                "record changed concurrently, retry the operation".to_string(),
            ),
            StoreError::Unavailable(reason) => TournamentError::Storage(reason),
        }
    }
}

/// The read/write contract the core requires from its persistence collaborator.
pub trait TournamentStore: Send + Sync {
    fn load_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError>;
    /// Version-checked save: rejects with `Conflict` when the stored version
    /// moved since the caller loaded the record; bumps the version and
    /// returns the stored copy on success.
    fn save_tournament(&self, tournament: &Tournament) -> Result<Tournament, StoreError>;
    fn delete_tournament(&self, id: TournamentId) -> Result<(), StoreError>;
    /// Filtered listing, newest first, offset/limit paginated. Returns the
    /// page and the unpaginated total.
    fn list_tournaments(
        &self,
        filter: &TournamentFilter,
    ) -> Result<(Vec<Tournament>, usize), StoreError>;

    fn load_user(&self, id: UserId) -> Result<User, StoreError>;
    fn save_user(&self, user: &User) -> Result<(), StoreError>;

    fn load_match(&self, id: MatchId) -> Result<Match, StoreError>;
    fn save_match(&self, game: &Match) -> Result<(), StoreError>;
    fn bulk_save_matches(&self, matches: &[Match]) -> Result<(), StoreError>;
    /// Atomic bracket commit: the generated matches and the tournament's
    /// flag/status update land together or not at all.
    fn save_tournament_with_matches(
        &self,
        tournament: &Tournament,
        matches: &[Match],
    ) -> Result<Tournament, StoreError>;
    /// Matches of one tournament, ordered by round then bracket position.
    fn matches_for_tournament(&self, id: TournamentId) -> Result<Vec<Match>, StoreError>;
    fn list_matches(&self, status: Option<MatchStatus>) -> Result<Vec<Match>, StoreError>;
    fn count_matches(
        &self,
        tournament_id: TournamentId,
        status: Option<MatchStatus>,
    ) -> Result<usize, StoreError>;
}

#[derive(Default)]
struct Tables {
    tournaments: HashMap<TournamentId, Tournament>,
    users: HashMap<UserId, User>,
    matches: HashMap<MatchId, Match>,
}

/// In-memory store: one lock over all tables, which makes the bracket commit
/// trivially atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("store lock poisoned".to_string())
}

/// Version check + insert, shared by the two tournament save paths.
fn store_tournament(tables: &mut Tables, tournament: &Tournament) -> Result<Tournament, StoreError> {
    if let Some(stored) = tables.tournaments.get(&tournament.id) {
        if stored.version != tournament.version {
            return Err(StoreError::Conflict);
        }
    }
    let mut saved = tournament.clone();
    saved.version += 1;
    tables.tournaments.insert(saved.id, saved.clone());
    Ok(saved)
}

impl TournamentStore for MemoryStore {
    fn load_tournament(&self, id: TournamentId) -> Result<Tournament, StoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        tables.tournaments.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn save_tournament(&self, tournament: &Tournament) -> Result<Tournament, StoreError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        store_tournament(&mut tables, tournament)
    }

    fn delete_tournament(&self, id: TournamentId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables.tournaments.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    fn list_tournaments(
        &self,
        filter: &TournamentFilter,
    ) -> Result<(Vec<Tournament>, usize), StoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        let mut matching: Vec<Tournament> = tables
            .tournaments
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len();
        let page: Vec<Tournament> = matching
            .into_iter()
            .skip(filter.offset())
            .take(filter.limit)
            .collect();
        Ok((page, total))
    }

    fn load_user(&self, id: UserId) -> Result<User, StoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        tables.users.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn save_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables.users.insert(user.id, user.clone());
        Ok(())
    }

    fn load_match(&self, id: MatchId) -> Result<Match, StoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        tables.matches.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    fn save_match(&self, game: &Match) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables.matches.insert(game.id, game.clone());
        Ok(())
    }

    fn bulk_save_matches(&self, matches: &[Match]) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        for m in matches {
            tables.matches.insert(m.id, m.clone());
        }
        Ok(())
    }

    fn save_tournament_with_matches(
        &self,
        tournament: &Tournament,
        matches: &[Match],
    ) -> Result<Tournament, StoreError> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        // Version check happens before any match is inserted, so a losing
        // racer leaves no partial bracket behind.
        let saved = store_tournament(&mut tables, tournament)?;
        for m in matches {
            tables.matches.insert(m.id, m.clone());
        }
        Ok(saved)
    }

    fn matches_for_tournament(&self, id: TournamentId) -> Result<Vec<Match>, StoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        let mut matches: Vec<Match> = tables
            .matches
            .values()
            .filter(|m| m.tournament_id == Some(id))
            .cloned()
            .collect();
        matches.sort_by_key(|m| (m.round, m.bracket_position));
        Ok(matches)
    }

    fn list_matches(&self, status: Option<MatchStatus>) -> Result<Vec<Match>, StoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        let mut matches: Vec<Match> = tables
            .matches
            .values()
            .filter(|m| status.map_or(true, |s| m.status == s))
            .cloned()
            .collect();
        matches.sort_by_key(|m| m.created_at);
        Ok(matches)
    }

    fn count_matches(
        &self,
        tournament_id: TournamentId,
        status: Option<MatchStatus>,
    ) -> Result<usize, StoreError> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .matches
            .values()
            .filter(|m| m.tournament_id == Some(tournament_id))
            .filter(|m| status.map_or(true, |s| m.status == s))
            .count())
    }
}
