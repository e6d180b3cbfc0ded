//! Tournament business logic: lifecycle, roster, brackets, matches, stats.

mod bracket;
mod game;
mod lifecycle;
mod roster;
mod stats;

pub use bracket::{first_round_matches, generate_brackets};
pub use game::{create_match, finish_match, get_match, list_matches};
pub use lifecycle::{
    create_tournament, delete_tournament, get_tournament, list_tournaments, update_tournament,
};
pub use roster::{join_tournament, leave_tournament};
pub use stats::{
    matches_for_tournament, tournament_participants, tournament_stats, TournamentProgress,
    TournamentStats, TournamentSummary,
};
