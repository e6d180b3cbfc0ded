//! Integration tests for match operations and the stats facade.

use chrono::Utc;
use pong_tournament::{
    create_match, create_tournament, finish_match, generate_brackets, get_match, join_tournament,
    list_matches, tournament_participants, tournament_stats, MatchStatus, MemoryStore,
    NewTournament, TournamentError, TournamentStore, TournamentType, User, UserId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn store_with_users(n: usize) -> (MemoryStore, Vec<UserId>) {
    let store = MemoryStore::new();
    let users: Vec<UserId> = (0..n)
        .map(|i| {
            let user = User::new(format!("player{i}"), Utc::now());
            store.save_user(&user).unwrap();
            user.id
        })
        .collect();
    (store, users)
}

fn pong_cup(max_participants: u32) -> NewTournament {
    NewTournament {
        name: "Pong Cup".to_string(),
        description: None,
        kind: TournamentType::SingleElimination,
        max_participants,
        registration_start: None,
        registration_end: None,
        start_date: None,
        end_date: None,
        is_public: true,
    }
}

#[test]
fn standalone_match_create_and_finish() {
    let (store, users) = store_with_users(2);
    let m = create_match(&store, users[0], users[1]).unwrap();
    assert_eq!(m.status, MatchStatus::Pending);
    assert_eq!(m.tournament_id, None);

    let m = finish_match(&store, m.id, 11, 7).unwrap();
    assert_eq!(m.status, MatchStatus::Finished);
    assert_eq!((m.player1_score, m.player2_score), (11, 7));
    assert!(m.finished_at.is_some());
}

#[test]
fn finished_scores_are_immutable() {
    let (store, users) = store_with_users(2);
    let m = create_match(&store, users[0], users[1]).unwrap();
    finish_match(&store, m.id, 11, 3).unwrap();

    assert!(matches!(
        finish_match(&store, m.id, 0, 11),
        Err(TournamentError::InvalidState(_))
    ));
    let m = get_match(&store, m.id).unwrap();
    assert_eq!((m.player1_score, m.player2_score), (11, 3));
}

#[test]
fn scores_are_range_checked() {
    let (store, users) = store_with_users(2);
    let m = create_match(&store, users[0], users[1]).unwrap();
    assert!(matches!(
        finish_match(&store, m.id, 12, 0),
        Err(TournamentError::InvalidState(_))
    ));
    assert_eq!(get_match(&store, m.id).unwrap().status, MatchStatus::Pending);
}

#[test]
fn match_creation_requires_known_players() {
    let (store, users) = store_with_users(1);
    assert!(matches!(
        create_match(&store, users[0], Uuid::new_v4()),
        Err(TournamentError::NotFound(_))
    ));
    assert!(matches!(
        get_match(&store, Uuid::new_v4()),
        Err(TournamentError::NotFound(_))
    ));
}

#[test]
fn listing_filters_by_status() {
    let (store, users) = store_with_users(2);
    let first = create_match(&store, users[0], users[1]).unwrap();
    create_match(&store, users[1], users[0]).unwrap();
    finish_match(&store, first.id, 11, 9).unwrap();

    assert_eq!(list_matches(&store, None).unwrap().len(), 2);
    let finished = list_matches(&store, Some(MatchStatus::Finished)).unwrap();
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].id, first.id);
}

#[test]
fn stats_track_completion_percentage() {
    let (store, users) = store_with_users(4);
    let t = create_tournament(&store, pong_cup(4), users[0]).unwrap();

    // No matches yet: 0%, not a division error.
    let stats = tournament_stats(&store, t.id).unwrap();
    assert_eq!(stats.progress.total_matches, 0);
    assert_eq!(stats.progress.percent_complete, 0);

    for &user in &users {
        join_tournament(&store, t.id, user).unwrap();
    }
    generate_brackets(&store, t.id, users[0], &mut StdRng::seed_from_u64(11)).unwrap();

    let stats = tournament_stats(&store, t.id).unwrap();
    assert_eq!(stats.progress.total_matches, 2);
    assert_eq!(stats.progress.completed_matches, 0);
    assert_eq!(stats.progress.percent_complete, 0);
    assert_eq!(stats.tournament.participants, 4);

    let bracket = store.matches_for_tournament(t.id).unwrap();
    finish_match(&store, bracket[0].id, 11, 5).unwrap();
    let stats = tournament_stats(&store, t.id).unwrap();
    assert_eq!(stats.progress.completed_matches, 1);
    assert_eq!(stats.progress.percent_complete, 50);

    finish_match(&store, bracket[1].id, 8, 11).unwrap();
    let stats = tournament_stats(&store, t.id).unwrap();
    assert_eq!(stats.progress.percent_complete, 100);
}

#[test]
fn stats_for_a_missing_tournament_is_not_found() {
    let store = MemoryStore::new();
    assert!(matches!(
        tournament_stats(&store, Uuid::new_v4()),
        Err(TournamentError::NotFound(_))
    ));
}

#[test]
fn participants_resolve_to_users_in_join_order() {
    let (store, users) = store_with_users(3);
    let t = create_tournament(&store, pong_cup(8), users[0]).unwrap();
    join_tournament(&store, t.id, users[1]).unwrap();
    join_tournament(&store, t.id, users[0]).unwrap();

    let roster = tournament_participants(&store, t.id).unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].id, users[1]);
    assert_eq!(roster[1].id, users[0]);
}
