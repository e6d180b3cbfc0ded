//! Data structures for the tournament service: tournaments, matches, users.

mod game;
mod tournament;
mod user;

pub use game::{Match, MatchId, MatchStatus, MAX_SCORE};
pub use tournament::{
    NewTournament, Tournament, TournamentError, TournamentFilter, TournamentId, TournamentPage,
    TournamentPatch, TournamentStatus, TournamentType, DEFAULT_MAX_PARTICIPANTS,
    DESCRIPTION_MAX_LEN, MAX_MAX_PARTICIPANTS, MIN_MAX_PARTICIPANTS, NAME_MAX_LEN, NAME_MIN_LEN,
};
pub use user::{User, UserId};
