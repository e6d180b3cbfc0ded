//! Tournament CRUD and the administrative guards around it.

use crate::models::{
    NewTournament, Tournament, TournamentError, TournamentFilter, TournamentId, TournamentPage,
    TournamentPatch, TournamentStatus, UserId,
};
use crate::store::TournamentStore;
use chrono::Utc;

/// Ownership guard shared by every creator-only operation.
pub(crate) fn require_creator(
    tournament: &Tournament,
    actor_id: UserId,
    action: &str,
) -> Result<(), TournamentError> {
    if tournament.creator_id != actor_id {
        return Err(TournamentError::Forbidden(format!(
            "only the creator can {action} this tournament"
        )));
    }
    Ok(())
}

/// Create a tournament in Draft owned by `creator_id`.
pub fn create_tournament<S: TournamentStore>(
    store: &S,
    new: NewTournament,
    creator_id: UserId,
) -> Result<Tournament, TournamentError> {
    store.load_user(creator_id).map_err(|e| e.missing("creator"))?;
    let now = Utc::now();
    new.validate(now)?;
    let tournament = Tournament::new(new, creator_id, now);
    store
        .save_tournament(&tournament)
        .map_err(|e| e.missing("tournament"))
}

pub fn get_tournament<S: TournamentStore>(
    store: &S,
    id: TournamentId,
) -> Result<Tournament, TournamentError> {
    store.load_tournament(id).map_err(|e| e.missing("tournament"))
}

/// Filtered listing, newest first, with the unpaginated total.
pub fn list_tournaments<S: TournamentStore>(
    store: &S,
    filter: &TournamentFilter,
) -> Result<TournamentPage, TournamentError> {
    let (tournaments, total) = store
        .list_tournaments(filter)
        .map_err(|e| e.missing("tournament"))?;
    Ok(TournamentPage { tournaments, total })
}

/// Apply an administrative patch (creator only). Patch validation, including
/// the status transition guards, lives on the entity.
pub fn update_tournament<S: TournamentStore>(
    store: &S,
    id: TournamentId,
    patch: &TournamentPatch,
    actor_id: UserId,
) -> Result<Tournament, TournamentError> {
    let mut tournament = get_tournament(store, id)?;
    require_creator(&tournament, actor_id, "update")?;
    if let Some(winner) = patch.winner_id {
        store.load_user(winner).map_err(|e| e.missing("winner"))?;
    }
    tournament.apply_patch(patch)?;
    store
        .save_tournament(&tournament)
        .map_err(|e| e.missing("tournament"))
}

/// Delete a tournament (creator only). Only Draft and Open records may go;
/// anything further along is history.
pub fn delete_tournament<S: TournamentStore>(
    store: &S,
    id: TournamentId,
    actor_id: UserId,
) -> Result<(), TournamentError> {
    let tournament = get_tournament(store, id)?;
    require_creator(&tournament, actor_id, "delete")?;
    if !matches!(
        tournament.status,
        TournamentStatus::Draft | TournamentStatus::Open
    ) {
        return Err(TournamentError::InvalidState(
            "only draft or open tournaments can be deleted".to_string(),
        ));
    }
    store.delete_tournament(id).map_err(|e| e.missing("tournament"))
}
