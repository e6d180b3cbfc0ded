//! Bracket generator: turn a finalized roster into the first round of matches.

use crate::logic::lifecycle::require_creator;
use crate::models::{
    Match, Tournament, TournamentError, TournamentId, TournamentStatus, TournamentType, UserId,
};
use crate::store::TournamentStore;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

/// Generate round 1 for a Full tournament (creator only) and move it to
/// InProgress. The match inserts and the tournament flag/status update are
/// committed through one atomic store call, so a failure leaves neither
/// visible.
///
/// The rng is injected: the binary passes `thread_rng`, tests a seeded
/// `StdRng` so pairings are reproducible.
pub fn generate_brackets<S: TournamentStore, R: Rng>(
    store: &S,
    tournament_id: TournamentId,
    actor_id: UserId,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    let mut tournament = store
        .load_tournament(tournament_id)
        .map_err(|e| e.missing("tournament"))?;
    require_creator(&tournament, actor_id, "generate brackets for")?;
    if tournament.bracket_generated {
        return Err(TournamentError::InvalidState(
            "brackets have already been generated".to_string(),
        ));
    }
    if !tournament.can_start() {
        return Err(TournamentError::InvalidState(
            "tournament must be full with at least 2 participants to start".to_string(),
        ));
    }

    let matches = match tournament.kind {
        TournamentType::SingleElimination => {
            first_round_matches(&tournament.participants, tournament.id, rng, Utc::now())
        }
        TournamentType::DoubleElimination | TournamentType::RoundRobin => {
            return Err(TournamentError::Unsupported(
                "no bracket generation for this tournament type yet".to_string(),
            ))
        }
    };

    tournament.bracket_generated = true;
    tournament.status = TournamentStatus::InProgress;
    store
        .save_tournament_with_matches(&tournament, &matches)
        .map_err(|e| e.missing("tournament"))
}

/// Single-elimination round 1: uniform shuffle, then pair consecutive
/// entries; pair k sits at bracket position k. An odd roster leaves one
/// participant without an opponent, who receives a bye (a finished walkover
/// match) instead of being dropped.
pub fn first_round_matches<R: Rng>(
    participants: &[UserId],
    tournament_id: TournamentId,
    rng: &mut R,
    now: DateTime<Utc>,
) -> Vec<Match> {
    let mut seeded: Vec<UserId> = participants.to_vec();
    seeded.shuffle(rng);

    let mut matches = Vec::with_capacity((seeded.len() + 1) / 2);
    for (position, pair) in seeded.chunks(2).enumerate() {
        let position = position as u32;
        let m = if let [p1, p2] = pair {
            Match::bracket(*p1, *p2, tournament_id, 1, position, now)
        } else {
            Match::bye(pair[0], tournament_id, 1, position, now)
        };
        matches.push(m);
    }
    matches
}
