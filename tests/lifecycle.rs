//! Integration tests for the lifecycle state machine and administrative guards.

use chrono::{Duration, Utc};
use pong_tournament::{
    create_tournament, delete_tournament, generate_brackets, get_tournament, join_tournament,
    list_tournaments, update_tournament, MemoryStore, NewTournament, TournamentError,
    TournamentFilter, TournamentPatch, TournamentStatus, TournamentType, User, UserId,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn store_with_users(n: usize) -> (MemoryStore, Vec<UserId>) {
    use pong_tournament::TournamentStore;
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

/// Drive a tournament to InProgress: fill the roster and generate brackets.
fn in_progress_tournament(
    store: &MemoryStore,
    users: &[UserId],
) -> pong_tournament::Tournament {
    let t = create_tournament(store, pong_cup(users.len() as u32), users[0]).unwrap();
    for &user in users {
        join_tournament(store, t.id, user).unwrap();
    }
    generate_brackets(store, t.id, users[0], &mut StdRng::seed_from_u64(5)).unwrap()
}

#[test]
fn create_requires_an_existing_creator() {
    let store = MemoryStore::new();
    assert!(matches!(
        create_tournament(&store, pong_cup(8), Uuid::new_v4()),
        Err(TournamentError::NotFound(_))
    ));
}

#[test]
fn create_validates_the_payload() {
    let (store, users) = store_with_users(1);

    let mut short_name = pong_cup(8);
    short_name.name = "ab".to_string();
    assert!(matches!(
        create_tournament(&store, short_name, users[0]),
        Err(TournamentError::InvalidState(_))
    ));

    let mut too_small = pong_cup(8);
    too_small.max_participants = 1;
    assert!(matches!(
        create_tournament(&store, too_small, users[0]),
        Err(TournamentError::InvalidState(_))
    ));

    let mut too_big = pong_cup(8);
    too_big.max_participants = 65;
    assert!(matches!(
        create_tournament(&store, too_big, users[0]),
        Err(TournamentError::InvalidState(_))
    ));

    let mut past_window = pong_cup(8);
    past_window.registration_start = Some(Utc::now() - Duration::hours(1));
    assert!(matches!(
        create_tournament(&store, past_window, users[0]),
        Err(TournamentError::InvalidState(_))
    ));

    let mut inverted = pong_cup(8);
    inverted.registration_start = Some(Utc::now() + Duration::hours(2));
    inverted.registration_end = Some(Utc::now() + Duration::hours(1));
    assert!(matches!(
        create_tournament(&store, inverted, users[0]),
        Err(TournamentError::InvalidState(_))
    ));
}

#[test]
fn only_the_creator_may_update_or_delete() {
    let (store, users) = store_with_users(2);
    let t = create_tournament(&store, pong_cup(8), users[0]).unwrap();

    let patch = TournamentPatch {
        name: Some("Renamed Cup".to_string()),
        ..TournamentPatch::default()
    };
    assert!(matches!(
        update_tournament(&store, t.id, &patch, users[1]),
        Err(TournamentError::Forbidden(_))
    ));
    assert!(matches!(
        delete_tournament(&store, t.id, users[1]),
        Err(TournamentError::Forbidden(_))
    ));

    let t = update_tournament(&store, t.id, &patch, users[0]).unwrap();
    assert_eq!(t.name, "Renamed Cup");
}

#[test]
fn max_participants_cannot_drop_below_the_roster() {
    let (store, users) = store_with_users(3);
    let t = create_tournament(&store, pong_cup(8), users[0]).unwrap();
    for &user in &users {
        join_tournament(&store, t.id, user).unwrap();
    }
    let patch = TournamentPatch {
        max_participants: Some(2),
        ..TournamentPatch::default()
    };
    assert!(matches!(
        update_tournament(&store, t.id, &patch, users[0]),
        Err(TournamentError::InvalidState(_))
    ));
}

#[test]
fn draft_reaches_only_open_or_cancelled_in_one_step() {
    use TournamentStatus::*;
    assert!(Draft.can_transition(Open));
    assert!(Draft.can_transition(Cancelled));
    assert!(!Draft.can_transition(Full));
    assert!(!Draft.can_transition(InProgress));
    assert!(!Draft.can_transition(Completed));
}

#[test]
fn terminal_states_accept_no_transitions() {
    use TournamentStatus::*;
    for from in [Completed, Cancelled] {
        for to in [Draft, Open, Full, InProgress, Completed, Cancelled] {
            assert!(!from.can_transition(to));
        }
    }
}

#[test]
fn status_patch_follows_the_state_graph() {
    let (store, users) = store_with_users(1);
    let t = create_tournament(&store, pong_cup(8), users[0]).unwrap();

    let skip_ahead = TournamentPatch {
        status: Some(TournamentStatus::InProgress),
        ..TournamentPatch::default()
    };
    assert!(matches!(
        update_tournament(&store, t.id, &skip_ahead, users[0]),
        Err(TournamentError::InvalidState(_))
    ));

    let cancel = TournamentPatch {
        status: Some(TournamentStatus::Cancelled),
        ..TournamentPatch::default()
    };
    let t = update_tournament(&store, t.id, &cancel, users[0]).unwrap();
    assert_eq!(t.status, TournamentStatus::Cancelled);

    // Terminal: nothing moves it again.
    let reopen = TournamentPatch {
        status: Some(TournamentStatus::Open),
        ..TournamentPatch::default()
    };
    assert!(matches!(
        update_tournament(&store, t.id, &reopen, users[0]),
        Err(TournamentError::InvalidState(_))
    ));
    assert!(matches!(
        join_tournament(&store, t.id, users[0]),
        Err(TournamentError::InvalidState(_))
    ));
}

#[test]
fn in_progress_may_only_move_to_completed() {
    let (store, users) = store_with_users(4);
    let t = in_progress_tournament(&store, &users);

    let cancel = TournamentPatch {
        status: Some(TournamentStatus::Cancelled),
        ..TournamentPatch::default()
    };
    assert!(matches!(
        update_tournament(&store, t.id, &cancel, users[0]),
        Err(TournamentError::InvalidState(_))
    ));

    let complete = TournamentPatch {
        status: Some(TournamentStatus::Completed),
        winner_id: Some(users[2]),
        ..TournamentPatch::default()
    };
    let t = update_tournament(&store, t.id, &complete, users[0]).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(t.winner_id, Some(users[2]));
}

#[test]
fn winner_requires_a_completed_tournament_and_roster_membership() {
    let (store, users) = store_with_users(4);
    let t = in_progress_tournament(&store, &users);

    let early_winner = TournamentPatch {
        winner_id: Some(users[1]),
        ..TournamentPatch::default()
    };
    assert!(matches!(
        update_tournament(&store, t.id, &early_winner, users[0]),
        Err(TournamentError::InvalidState(_))
    ));

    let outsider = User::new("outsider", Utc::now());
    {
        use pong_tournament::TournamentStore;
        store.save_user(&outsider).unwrap();
    }
    let outsider_wins = TournamentPatch {
        status: Some(TournamentStatus::Completed),
        winner_id: Some(outsider.id),
        ..TournamentPatch::default()
    };
    assert!(matches!(
        update_tournament(&store, t.id, &outsider_wins, users[0]),
        Err(TournamentError::InvalidState(_))
    ));
}

#[test]
fn delete_is_limited_to_draft_and_open() {
    let (store, users) = store_with_users(2);

    let t = create_tournament(&store, pong_cup(2), users[0]).unwrap();
    for &user in &users {
        join_tournament(&store, t.id, user).unwrap();
    }
    // Full: too far along to delete.
    assert!(matches!(
        delete_tournament(&store, t.id, users[0]),
        Err(TournamentError::InvalidState(_))
    ));

    let t = create_tournament(&store, pong_cup(8), users[0]).unwrap();
    delete_tournament(&store, t.id, users[0]).unwrap();
    assert!(matches!(
        get_tournament(&store, t.id),
        Err(TournamentError::NotFound(_))
    ));
}

#[test]
fn listing_filters_and_paginates_newest_first() {
    let (store, users) = store_with_users(1);
    for i in 0..5 {
        let mut new = pong_cup(8);
        new.name = format!("Cup {i}");
        new.is_public = i % 2 == 0;
        create_tournament(&store, new, users[0]).unwrap();
    }

    let all = list_tournaments(&store, &TournamentFilter::default()).unwrap();
    assert_eq!(all.total, 5);
    assert_eq!(all.tournaments.len(), 5);

    let private_only = TournamentFilter {
        is_public: Some(false),
        ..TournamentFilter::default()
    };
    let page = list_tournaments(&store, &private_only).unwrap();
    assert_eq!(page.total, 2);
    assert!(page.tournaments.iter().all(|t| !t.is_public));

    let drafts = TournamentFilter {
        status: Some(TournamentStatus::Draft),
        ..TournamentFilter::default()
    };
    assert_eq!(list_tournaments(&store, &drafts).unwrap().total, 5);

    let small_pages = TournamentFilter {
        limit: 2,
        page: 3,
        ..TournamentFilter::default()
    };
    let last = list_tournaments(&store, &small_pages).unwrap();
    assert_eq!(last.total, 5);
    assert_eq!(last.tournaments.len(), 1);
}
