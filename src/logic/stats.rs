//! Read-side facade: participant listing and progress aggregation.

use crate::models::{
    Match, MatchStatus, TournamentError, TournamentId, TournamentStatus, User,
};
use crate::store::TournamentStore;
use serde::{Deserialize, Serialize};

/// Condensed tournament view for the stats response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub participants: u32,
    pub max_participants: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentProgress {
    pub completed_matches: usize,
    pub total_matches: usize,
    /// Rounded percentage; 0 when no matches exist.
    pub percent_complete: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentStats {
    pub tournament: TournamentSummary,
    pub progress: TournamentProgress,
}

/// Progress aggregation for one tournament. Read-only; the only failure mode
/// is a missing tournament id.
pub fn tournament_stats<S: TournamentStore>(
    store: &S,
    id: TournamentId,
) -> Result<TournamentStats, TournamentError> {
    let tournament = store.load_tournament(id).map_err(|e| e.missing("tournament"))?;
    let completed_matches = store
        .count_matches(id, Some(MatchStatus::Finished))
        .map_err(|e| e.missing("match"))?;
    let total_matches = store.count_matches(id, None).map_err(|e| e.missing("match"))?;
    let percent_complete = if total_matches > 0 {
        ((completed_matches as f64 / total_matches as f64) * 100.0).round() as u32
    } else {
        0
    };
    Ok(TournamentStats {
        tournament: TournamentSummary {
            id: tournament.id,
            name: tournament.name,
            status: tournament.status,
            participants: tournament.current_participants,
            max_participants: tournament.max_participants,
        },
        progress: TournamentProgress {
            completed_matches,
            total_matches,
            percent_complete,
        },
    })
}

/// The roster resolved to full user records, in join order.
pub fn tournament_participants<S: TournamentStore>(
    store: &S,
    id: TournamentId,
) -> Result<Vec<User>, TournamentError> {
    let tournament = store.load_tournament(id).map_err(|e| e.missing("tournament"))?;
    tournament
        .participants
        .iter()
        .map(|&user_id| store.load_user(user_id).map_err(|e| e.missing("user")))
        .collect()
}

/// All matches of a tournament, ordered by round then bracket position.
pub fn matches_for_tournament<S: TournamentStore>(
    store: &S,
    id: TournamentId,
) -> Result<Vec<Match>, TournamentError> {
    store.load_tournament(id).map_err(|e| e.missing("tournament"))?;
    store.matches_for_tournament(id).map_err(|e| e.missing("match"))
}
