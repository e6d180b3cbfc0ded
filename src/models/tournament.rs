//! Tournament entity: status/type enums, roster invariants, creation and patch payloads.

use crate::models::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during tournament and match operations.
///
/// Every failure carries a human-readable reason so the transport layer can
/// map the kind to a status code and still show something useful.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// A referenced tournament, user, or match does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The actor is not allowed to perform this operation (creator-only).
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// The operation is not legal in the current lifecycle state, or violates
    /// a capacity/date invariant.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Duplicate join, or a concurrent write clashed on save.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The tournament type has no bracket generation algorithm.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// The persistent store failed transiently; the caller may retry.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Lifecycle status. Moves forward only (Full ⇄ Open is the one reversible
/// edge, driven by roster changes); Completed and Cancelled are terminal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Created, no participants yet.
    #[default]
    Draft,
    /// Registration open.
    Open,
    /// Roster at capacity; ready for bracket generation.
    Full,
    /// Bracket generated, matches being played.
    InProgress,
    /// Finished; winner may be set.
    Completed,
    /// Abandoned before completion.
    Cancelled,
}

impl TournamentStatus {
    /// No further transitions are permitted from a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, TournamentStatus::Completed | TournamentStatus::Cancelled)
    }

    /// Central state graph: is `self -> to` a legal one-step transition?
    pub fn can_transition(self, to: TournamentStatus) -> bool {
        use TournamentStatus::*;
        matches!(
            (self, to),
            (Draft, Open)
                | (Open, Full)
                | (Full, Open)
                | (Full, InProgress)
                | (InProgress, Completed)
                | (Draft, Cancelled)
                | (Open, Cancelled)
                | (Full, Cancelled)
                | (InProgress, Cancelled)
        )
    }
}

/// Bracket format. Only single elimination has a generation algorithm.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentType {
    #[default]
    SingleElimination,
    DoubleElimination,
    RoundRobin,
}

/// Tournament name length bounds (chars).
pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 100;
/// Description length bound (chars).
pub const DESCRIPTION_MAX_LEN: usize = 1000;
/// Roster capacity bounds.
pub const MIN_MAX_PARTICIPANTS: u32 = 2;
pub const MAX_MAX_PARTICIPANTS: u32 = 64;
pub const DEFAULT_MAX_PARTICIPANTS: u32 = 8;

/// A tournament: roster, lifecycle status, and bracket flag.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub description: Option<String>,
    pub status: TournamentStatus,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    pub max_participants: u32,
    /// Derived from the roster; kept equal to `participants.len()`.
    pub current_participants: u32,
    /// The roster: user ids, unique, insertion order preserved.
    pub participants: Vec<UserId>,
    pub registration_start: Option<DateTime<Utc>>,
    pub registration_end: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_public: bool,
    /// One-way flag: never goes back to false once set.
    pub bracket_generated: bool,
    /// Immutable owner reference.
    pub creator_id: UserId,
    /// Set only once the tournament is completed.
    pub winner_id: Option<UserId>,
    pub created_at: DateTime<Utc>,
    /// Optimistic-concurrency counter, bumped by the store on every save.
    pub version: u64,
}

impl Tournament {
    /// Create a new Draft tournament from a validated payload.
    pub fn new(new: NewTournament, creator_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name.trim().to_string(),
            description: new.description,
            status: TournamentStatus::Draft,
            kind: new.kind,
            max_participants: new.max_participants,
            current_participants: 0,
            participants: Vec::new(),
            registration_start: new.registration_start,
            registration_end: new.registration_end,
            start_date: new.start_date,
            end_date: new.end_date,
            is_public: new.is_public,
            bracket_generated: false,
            creator_id,
            winner_id: None,
            created_at: now,
            version: 0,
        }
    }

    /// Registration is open when the tournament is still Draft/Open, `now` is
    /// inside the registration window (when bounds are set), and the roster
    /// is below capacity. Draft counts as open so the first join moves the
    /// tournament to Open.
    pub fn is_registration_open(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, TournamentStatus::Draft | TournamentStatus::Open)
            && self.registration_start.map_or(true, |start| start <= now)
            && self.registration_end.map_or(true, |end| end >= now)
            && !self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.current_participants >= self.max_participants
    }

    /// Bracket generation is allowed only on a Full roster of at least 2 that
    /// has not been generated yet.
    pub fn can_start(&self) -> bool {
        self.status == TournamentStatus::Full
            && self.current_participants >= 2
            && !self.bracket_generated
    }

    /// Add a user to the roster and advance the status accordingly.
    pub fn join(&mut self, user_id: UserId, now: DateTime<Utc>) -> Result<(), TournamentError> {
        if !self.is_registration_open(now) {
            let reason = if self.is_full() && !self.status.is_terminal() {
                "tournament is full"
            } else {
                "registration is not open"
            };
            return Err(TournamentError::InvalidState(reason.to_string()));
        }
        if self.participants.contains(&user_id) {
            return Err(TournamentError::Conflict(
                "already registered for this tournament".to_string(),
            ));
        }
        self.participants.push(user_id);
        self.current_participants = self.participants.len() as u32;
        if self.is_full() {
            self.status = TournamentStatus::Full;
        } else if self.status == TournamentStatus::Draft {
            self.status = TournamentStatus::Open;
        }
        Ok(())
    }

    /// Remove a user from the roster, reopening a Full tournament and
    /// reverting to Draft when the roster empties.
    pub fn leave(&mut self, user_id: UserId) -> Result<(), TournamentError> {
        if self.status == TournamentStatus::InProgress || self.status.is_terminal() {
            return Err(TournamentError::InvalidState(
                "cannot leave a tournament that has started".to_string(),
            ));
        }
        let idx = self
            .participants
            .iter()
            .position(|p| *p == user_id)
            .ok_or_else(|| TournamentError::NotFound("participant".to_string()))?;
        self.participants.remove(idx);
        self.current_participants = self.participants.len() as u32;
        if self.status == TournamentStatus::Full {
            self.status = TournamentStatus::Open;
        }
        if self.participants.is_empty() && self.status == TournamentStatus::Open {
            self.status = TournamentStatus::Draft;
        }
        Ok(())
    }

    /// Validate and apply an administrative patch. Guards live here,
    /// not duplicated per endpoint.
    pub fn apply_patch(&mut self, patch: &TournamentPatch) -> Result<(), TournamentError> {
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(description) = &patch.description {
            validate_description(description)?;
        }
        if let Some(max) = patch.max_participants {
            validate_max_participants(max)?;
            if max < self.current_participants {
                return Err(TournamentError::InvalidState(
                    "max participants cannot drop below the current roster size".to_string(),
                ));
            }
        }
        let registration_start = patch.registration_start.or(self.registration_start);
        let registration_end = patch.registration_end.or(self.registration_end);
        let start_date = patch.start_date.or(self.start_date);
        validate_date_order(registration_start, registration_end, start_date)?;

        let next_status = patch.status.unwrap_or(self.status);
        if next_status != self.status {
            if !self.status.can_transition(next_status) {
                return Err(TournamentError::InvalidState(format!(
                    "cannot move from {:?} to {:?}",
                    self.status, next_status
                )));
            }
            if self.status == TournamentStatus::InProgress
                && next_status != TournamentStatus::Completed
            {
                return Err(TournamentError::InvalidState(
                    "an in-progress tournament can only be completed".to_string(),
                ));
            }
        }
        if let Some(winner) = patch.winner_id {
            if next_status != TournamentStatus::Completed {
                return Err(TournamentError::InvalidState(
                    "winner can only be set on a completed tournament".to_string(),
                ));
            }
            if !self.participants.contains(&winner) {
                return Err(TournamentError::InvalidState(
                    "winner must be a tournament participant".to_string(),
                ));
            }
        }

        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(max) = patch.max_participants {
            self.max_participants = max;
        }
        if patch.registration_start.is_some() {
            self.registration_start = patch.registration_start;
        }
        if patch.registration_end.is_some() {
            self.registration_end = patch.registration_end;
        }
        if patch.start_date.is_some() {
            self.start_date = patch.start_date;
        }
        if patch.end_date.is_some() {
            self.end_date = patch.end_date;
        }
        if let Some(is_public) = patch.is_public {
            self.is_public = is_public;
        }
        self.status = next_status;
        if patch.winner_id.is_some() {
            self.winner_id = patch.winner_id;
        }
        Ok(())
    }
}

/// Payload for creating a tournament. Validated before the entity is built.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: TournamentType,
    #[serde(default = "default_max_participants")]
    pub max_participants: u32,
    #[serde(default)]
    pub registration_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub registration_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

fn default_max_participants() -> u32 {
    DEFAULT_MAX_PARTICIPANTS
}

fn default_is_public() -> bool {
    true
}

impl NewTournament {
    /// Shape validation: lengths, capacity range, and date ordering.
    /// Registration may not start in the past.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), TournamentError> {
        validate_name(&self.name)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        validate_max_participants(self.max_participants)?;
        if let Some(start) = self.registration_start {
            if start < now {
                return Err(TournamentError::InvalidState(
                    "registration cannot start in the past".to_string(),
                ));
            }
        }
        validate_date_order(self.registration_start, self.registration_end, self.start_date)
    }
}

/// Administrative patch: exactly the fields a creator may change.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TournamentPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<TournamentType>,
    pub max_participants: Option<u32>,
    pub registration_start: Option<DateTime<Utc>>,
    pub registration_end: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_public: Option<bool>,
    pub status: Option<TournamentStatus>,
    pub winner_id: Option<UserId>,
}

/// Listing filter with offset/limit pagination (`limit=10, page=1` defaults).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentFilter {
    #[serde(default)]
    pub status: Option<TournamentStatus>,
    #[serde(default, rename = "type")]
    pub kind: Option<TournamentType>,
    #[serde(default)]
    pub is_public: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_limit() -> usize {
    10
}

fn default_page() -> usize {
    1
}

impl Default for TournamentFilter {
    fn default() -> Self {
        Self {
            status: None,
            kind: None,
            is_public: None,
            limit: default_limit(),
            page: default_page(),
        }
    }
}

impl TournamentFilter {
    pub fn matches(&self, t: &Tournament) -> bool {
        self.status.map_or(true, |s| t.status == s)
            && self.kind.map_or(true, |k| t.kind == k)
            && self.is_public.map_or(true, |p| t.is_public == p)
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.limit
    }
}

/// One page of tournaments plus the unpaginated total.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentPage {
    pub tournaments: Vec<Tournament>,
    pub total: usize,
}

fn validate_name(name: &str) -> Result<(), TournamentError> {
    let len = name.trim().chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(TournamentError::InvalidState(format!(
            "name must be {NAME_MIN_LEN}-{NAME_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), TournamentError> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(TournamentError::InvalidState(format!(
            "description cannot exceed {DESCRIPTION_MAX_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_max_participants(max: u32) -> Result<(), TournamentError> {
    if !(MIN_MAX_PARTICIPANTS..=MAX_MAX_PARTICIPANTS).contains(&max) {
        return Err(TournamentError::InvalidState(format!(
            "max participants must be between {MIN_MAX_PARTICIPANTS} and {MAX_MAX_PARTICIPANTS}"
        )));
    }
    Ok(())
}

fn validate_date_order(
    registration_start: Option<DateTime<Utc>>,
    registration_end: Option<DateTime<Utc>>,
    start_date: Option<DateTime<Utc>>,
) -> Result<(), TournamentError> {
    if let (Some(start), Some(end)) = (registration_start, registration_end) {
        if end <= start {
            return Err(TournamentError::InvalidState(
                "registration must end after it starts".to_string(),
            ));
        }
    }
    if let (Some(end), Some(start_date)) = (registration_end, start_date) {
        if start_date <= end {
            return Err(TournamentError::InvalidState(
                "tournament must start after registration ends".to_string(),
            ));
        }
    }
    Ok(())
}
