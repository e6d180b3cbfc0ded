//! Match: a single head-to-head game, inside a bracket or standalone.

use crate::models::tournament::{TournamentError, TournamentId};
use crate::models::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Highest score a player can reach in one match.
pub const MAX_SCORE: u32 = 11;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Active,
    Finished,
    Cancelled,
}

/// A single match. Players are optional until assigned (TBD slots, byes);
/// `tournament_id` is None for matches played outside a tournament.
/// Matches are never deleted: finished ones are the historical record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub player1: Option<UserId>,
    pub player2: Option<UserId>,
    pub player1_score: u32,
    pub player2_score: u32,
    pub status: MatchStatus,
    pub tournament_id: Option<TournamentId>,
    /// 1-based bracket round; None outside a tournament.
    pub round: Option<u32>,
    /// 0-based slot within the round. The winner of position P in round R
    /// feeds position P/2 in round R+1.
    pub bracket_position: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Match {
    /// A standalone pending match between two known players.
    pub fn new(player1: UserId, player2: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            player1: Some(player1),
            player2: Some(player2),
            player1_score: 0,
            player2_score: 0,
            status: MatchStatus::Pending,
            tournament_id: None,
            round: None,
            bracket_position: None,
            created_at: now,
            finished_at: None,
        }
    }

    /// A pending bracket match at a round/position slot.
    pub fn bracket(
        player1: UserId,
        player2: UserId,
        tournament_id: TournamentId,
        round: u32,
        bracket_position: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            tournament_id: Some(tournament_id),
            round: Some(round),
            bracket_position: Some(bracket_position),
            ..Self::new(player1, player2, now)
        }
    }

    /// A walkover: the lone participant of an odd roster advances without an
    /// opponent. Created already finished so it never waits for a result.
    pub fn bye(
        player: UserId,
        tournament_id: TournamentId,
        round: u32,
        bracket_position: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            player1: Some(player),
            player2: None,
            player1_score: 0,
            player2_score: 0,
            status: MatchStatus::Finished,
            tournament_id: Some(tournament_id),
            round: Some(round),
            bracket_position: Some(bracket_position),
            created_at: now,
            finished_at: Some(now),
        }
    }

    /// Record the final score. Scores on a finished match are immutable.
    pub fn finish(
        &mut self,
        player1_score: u32,
        player2_score: u32,
        now: DateTime<Utc>,
    ) -> Result<(), TournamentError> {
        match self.status {
            MatchStatus::Finished => {
                return Err(TournamentError::InvalidState(
                    "match is already finished".to_string(),
                ))
            }
            MatchStatus::Cancelled => {
                return Err(TournamentError::InvalidState(
                    "match was cancelled".to_string(),
                ))
            }
            MatchStatus::Pending | MatchStatus::Active => {}
        }
        if player1_score > MAX_SCORE || player2_score > MAX_SCORE {
            return Err(TournamentError::InvalidState(format!(
                "scores must be between 0 and {MAX_SCORE}"
            )));
        }
        self.player1_score = player1_score;
        self.player2_score = player2_score;
        self.status = MatchStatus::Finished;
        self.finished_at = Some(now);
        Ok(())
    }
}
