//! Pong tournament service: library with models, lifecycle logic, and the
//! persistence contract. The REST transport lives in `src/bin/web.rs`.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    create_match, create_tournament, delete_tournament, finish_match, first_round_matches,
    generate_brackets, get_match, get_tournament, join_tournament, leave_tournament, list_matches,
    list_tournaments, matches_for_tournament, tournament_participants, tournament_stats,
    update_tournament, TournamentProgress, TournamentStats, TournamentSummary,
};
pub use models::{
    Match, MatchId, MatchStatus, NewTournament, Tournament, TournamentError, TournamentFilter,
    TournamentId, TournamentPage, TournamentPatch, TournamentStatus, TournamentType, User, UserId,
};
pub use store::{MemoryStore, StoreError, TournamentStore};
