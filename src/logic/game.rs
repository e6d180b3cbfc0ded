//! Match operations: standalone matches and score reporting.

use crate::models::{Match, MatchId, MatchStatus, TournamentError, UserId};
use crate::store::TournamentStore;
use chrono::Utc;

/// Create a pending match between two existing users, outside any tournament.
pub fn create_match<S: TournamentStore>(
    store: &S,
    player1_id: UserId,
    player2_id: UserId,
) -> Result<Match, TournamentError> {
    store.load_user(player1_id).map_err(|e| e.missing("player 1"))?;
    store.load_user(player2_id).map_err(|e| e.missing("player 2"))?;
    let game = Match::new(player1_id, player2_id, Utc::now());
    store.save_match(&game).map_err(|e| e.missing("match"))?;
    Ok(game)
}

pub fn get_match<S: TournamentStore>(store: &S, id: MatchId) -> Result<Match, TournamentError> {
    store.load_match(id).map_err(|e| e.missing("match"))
}

pub fn list_matches<S: TournamentStore>(
    store: &S,
    status: Option<MatchStatus>,
) -> Result<Vec<Match>, TournamentError> {
    store.list_matches(status).map_err(|e| e.missing("match"))
}

/// Report the final score of a match. Finished scores are immutable, so a
/// second report fails.
pub fn finish_match<S: TournamentStore>(
    store: &S,
    id: MatchId,
    player1_score: u32,
    player2_score: u32,
) -> Result<Match, TournamentError> {
    let mut game = get_match(store, id)?;
    game.finish(player1_score, player2_score, Utc::now())?;
    store.save_match(&game).map_err(|e| e.missing("match"))?;
    Ok(game)
}
