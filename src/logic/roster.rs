//! Roster manager: join/leave with capacity and window invariants.

use crate::models::{Tournament, TournamentError, TournamentId, UserId};
use crate::store::TournamentStore;
use chrono::Utc;

/// Register a user for a tournament. The roster invariants (window open,
/// capacity, uniqueness) and the status advance live on the entity; this op
/// adds the load/save discipline. A racing join loses the version check on
/// save and surfaces `Conflict`.
pub fn join_tournament<S: TournamentStore>(
    store: &S,
    tournament_id: TournamentId,
    user_id: UserId,
) -> Result<Tournament, TournamentError> {
    let mut tournament = store
        .load_tournament(tournament_id)
        .map_err(|e| e.missing("tournament"))?;
    store.load_user(user_id).map_err(|e| e.missing("user"))?;
    tournament.join(user_id, Utc::now())?;
    store
        .save_tournament(&tournament)
        .map_err(|e| e.missing("tournament"))
}

/// Remove a user from a tournament roster.
pub fn leave_tournament<S: TournamentStore>(
    store: &S,
    tournament_id: TournamentId,
    user_id: UserId,
) -> Result<Tournament, TournamentError> {
    let mut tournament = store
        .load_tournament(tournament_id)
        .map_err(|e| e.missing("tournament"))?;
    tournament.leave(user_id)?;
    store
        .save_tournament(&tournament)
        .map_err(|e| e.missing("tournament"))
}
