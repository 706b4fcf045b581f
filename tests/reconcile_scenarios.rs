use chrono::{TimeZone, Utc};
use rgamenight::collab::LocalBoard;
use rgamenight::core::clock::FixedClock;
use rgamenight::core::{Coordinator, IgnoreReason, Outcome, Rejection, SetupRequest};
use rgamenight::errors::AppError;
use rgamenight::models::category::CategoryModel;
use rgamenight::models::ids::{ChannelId, MessageId, UserId};
use rgamenight::models::settings::{EventSettings, Schedule};
use rgamenight::models::signal::Signal;
use rgamenight::store::RosterStore;
use std::fs;

const CHANNEL: ChannelId = ChannelId(9);

fn coordinator_with(store: RosterStore, board: LocalBoard) -> Coordinator<LocalBoard> {
    Coordinator::new(
        CategoryModel::default(),
        EventSettings::default(),
        Schedule::default(),
        store,
        board,
    )
    // Wednesday noon
    .with_clock(FixedClock(Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()))
}

fn signup(store: RosterStore, board: LocalBoard) -> (Coordinator<LocalBoard>, MessageId) {
    let mut coord = coordinator_with(store, board);
    let report = coord
        .setup(SetupRequest {
            channel: CHANNEL,
            ..SetupRequest::default()
        })
        .unwrap();
    (coord, report.message)
}

fn bound() -> (Coordinator<LocalBoard>, MessageId) {
    signup(RosterStore::in_memory(), LocalBoard::new())
}

fn react(coord: &mut Coordinator<LocalBoard>, msg: MessageId, user: u64, token: &str) -> Outcome {
    coord
        .platform_mut()
        .add_reaction(msg, UserId(user), token)
        .unwrap();
    coord.handle(Signal::added(UserId(user), msg, token))
}

fn unreact(coord: &mut Coordinator<LocalBoard>, msg: MessageId, user: u64, token: &str) -> Outcome {
    coord.platform_mut().remove_reaction(msg, UserId(user), token);
    coord.handle(Signal::removed(UserId(user), msg, token))
}

/// Two users at +5 each: main total 12.
fn main_at_twelve() -> (Coordinator<LocalBoard>, MessageId) {
    let (mut coord, msg) = bound();
    react(&mut coord, msg, 1, "🔥");
    react(&mut coord, msg, 2, "🔥");
    assert_eq!(coord.store().total_weight("main"), 12);
    (coord, msg)
}

#[test]
fn scenario_a_rejects_what_does_not_fit() {
    let (mut coord, msg) = main_at_twelve();

    let outcome = react(&mut coord, msg, 3, "🏹");
    assert_eq!(
        outcome,
        Outcome::Rejected(Rejection::CapacityExceeded {
            category: "main".into(),
            requested: 5,
            available: 3,
        })
    );
    assert_eq!(coord.store().total_weight("main"), 12);
    assert!(coord.platform().reactions_of(msg, UserId(3)).is_empty());

    let dms = coord.platform().deliveries_to(UserId(3));
    assert_eq!(dms.len(), 1);
    assert!(dms[0].contains("only 3 remain"));
    assert!(dms[0].contains("react with 🎒 to join travelers"));
}

#[test]
fn scenario_b_accepts_up_to_capacity() {
    let (mut coord, msg) = main_at_twelve();

    assert_eq!(
        react(&mut coord, msg, 3, "⚡"),
        Outcome::Accepted {
            category: "main".into(),
            weight: 3,
            total: 15,
        }
    );
    assert!(coord.platform().deliveries_to(UserId(3)).is_empty());
}

#[test]
fn scenario_c_switching_down_at_capacity() {
    let (mut coord, msg) = main_at_twelve();
    react(&mut coord, msg, 3, "⚡");

    assert_eq!(
        react(&mut coord, msg, 3, "🗡️"),
        Outcome::Accepted {
            category: "main".into(),
            weight: 2,
            total: 14,
        }
    );
    // the superseded reaction was retracted
    assert_eq!(
        coord.platform().reactions_of(msg, UserId(3)),
        vec!["🗡️".to_string()]
    );
}

#[test]
fn switching_up_beyond_capacity_is_rejected() {
    let (mut coord, msg) = main_at_twelve();
    react(&mut coord, msg, 3, "⚡");

    assert!(matches!(
        react(&mut coord, msg, 3, "🛡️"),
        Outcome::Rejected(Rejection::CapacityExceeded { available: 3, .. })
    ));
    assert_eq!(coord.store().weight_of(UserId(3), "main"), 3);
    assert_eq!(
        coord.platform().reactions_of(msg, UserId(3)),
        vec!["⚡".to_string()]
    );
}

#[test]
fn scenario_d_single_slot() {
    let (mut coord, msg) = bound();

    assert!(matches!(
        react(&mut coord, msg, 1, "📜"),
        Outcome::Accepted { weight: 1, .. }
    ));
    assert_eq!(
        react(&mut coord, msg, 2, "📜"),
        Outcome::Rejected(Rejection::SlotTaken {
            category: "storyteller".into(),
            holder: UserId(1),
        })
    );
    assert!(coord.platform().deliveries_to(UserId(2))[0].contains("already taken by <@1>"));

    assert_eq!(
        react(&mut coord, msg, 1, "📜"),
        Outcome::Unchanged {
            category: "storyteller".into()
        }
    );
    assert!(coord.platform().deliveries_to(UserId(1)).is_empty());
    assert_eq!(coord.store().total_weight("storyteller"), 1);
}

#[test]
fn scenario_e_removal_prunes_entry() {
    let (mut coord, msg) = bound();
    react(&mut coord, msg, 1, "⚡");
    react(&mut coord, msg, 2, "⚡");
    react(&mut coord, msg, 2, "👀");

    assert_eq!(
        unreact(&mut coord, msg, 1, "⚡"),
        Outcome::Removed {
            category: "main".into(),
            weight: 0,
            total: 3,
        }
    );
    assert!(coord.store().entry(UserId(1)).is_none());

    unreact(&mut coord, msg, 2, "⚡");
    let entry = coord.store().entry(UserId(2)).unwrap();
    assert_eq!(entry.weight("interested"), 1);
    assert_eq!(coord.store().total_weight("main"), 0);
}

#[test]
fn scenario_f_malformed_snapshot_restores_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    fs::write(&path, "{ not json").unwrap();

    let store = RosterStore::restore(&path);
    assert!(store.entries().is_empty());
    assert!(!store.snapshot().is_bound());

    // still usable, and the next write replaces the garbage
    let (mut coord, msg) = signup(store, LocalBoard::new());
    react(&mut coord, msg, 1, "⚔️");
    assert!(fs::read_to_string(&path).unwrap().contains("\"main\": 1"));
}

#[test]
fn capacity_is_never_exceeded() {
    let (mut coord, msg) = bound();
    let tokens = ["🔥", "🏹", "⚔️", "🛡️", "⚡", "🗡️"];

    for user in 1..=40u64 {
        let token = tokens[(user as usize * 7) % tokens.len()];
        react(&mut coord, msg, user, token);
        assert!(coord.store().total_weight("main") <= 15);
        if user % 3 == 0 {
            unreact(&mut coord, msg, user - 1, tokens[(user as usize) % tokens.len()]);
        }
    }

    for user in 1..=20u64 {
        react(&mut coord, msg, user, "🌟");
        assert!(coord.store().total_weight("travelers") <= 5);
    }
}

#[test]
fn re_adding_the_same_token_is_idempotent() {
    let (mut coord, msg) = bound();
    let first = react(&mut coord, msg, 1, "⚡");
    let second = react(&mut coord, msg, 1, "⚡");

    assert_eq!(first, second);
    assert_eq!(coord.store().total_weight("main"), 3);
    assert_eq!(coord.store().entries().len(), 1);
}

#[test]
fn removal_keeps_lowest_remaining_reaction() {
    let mut board = LocalBoard::new();
    // retractions fail, so both reactions stay on the message
    board.retract_denied = true;
    let (mut coord, msg) = signup(RosterStore::in_memory(), board);

    react(&mut coord, msg, 1, "⚔️");
    react(&mut coord, msg, 1, "🔥");
    assert_eq!(coord.store().weight_of(UserId(1), "main"), 6);

    assert_eq!(
        unreact(&mut coord, msg, 1, "🔥"),
        Outcome::Removed {
            category: "main".into(),
            weight: 1,
            total: 1,
        }
    );
}

#[test]
fn rejection_without_retract_permission_keeps_state() {
    let mut board = LocalBoard::new();
    board.retract_denied = true;
    let (mut coord, msg) = signup(RosterStore::in_memory(), board);
    react(&mut coord, msg, 1, "📜");

    assert!(matches!(
        react(&mut coord, msg, 2, "📜"),
        Outcome::Rejected(Rejection::SlotTaken { .. })
    ));
    assert_eq!(coord.store().weight_of(UserId(2), "storyteller"), 0);
    assert_eq!(coord.store().weight_of(UserId(1), "storyteller"), 1);
}

#[test]
fn closed_dms_fall_back_to_transient_post() {
    let mut board = LocalBoard::new();
    board.blocked_dms.insert(UserId(2));
    let (mut coord, msg) = signup(RosterStore::in_memory(), board);
    react(&mut coord, msg, 1, "📜");
    react(&mut coord, msg, 2, "📜");

    let board = coord.platform();
    assert!(board.deliveries_to(UserId(2)).is_empty());
    assert_eq!(board.transient.len(), 1);
    let post = &board.transient[0];
    assert_eq!(post.channel, CHANNEL);
    assert!(post.text.starts_with("<@2> "));
    assert!(post.text.contains("already taken"));
    assert_eq!(post.ttl_secs, 10);
}

#[test]
fn signup_message_and_event_follow_the_roster() {
    let (mut coord, msg) = bound();
    react(&mut coord, msg, 1, "⚡");
    react(&mut coord, msg, 2, "👀");

    let board = coord.platform();
    let content = &board.message(msg).unwrap().content;
    assert!(content.contains("⚔️ Main Players (3/15)"));
    assert!(content.contains("1. <@1> (+2 guests)"));
    assert!(content.contains("👀 Interested (1)"));

    let event = coord.store().snapshot().event_id.unwrap();
    let description = &board.events[&event].description;
    assert!(description.contains("Main Players: 3/15"));
    assert!(description.contains("Interested: 1"));
    assert!(description.ends_with("React to the signup message to join!"));
}

#[test]
fn setup_without_event_service_still_binds() {
    let mut board = LocalBoard::new();
    board.events_unavailable = true;
    let mut coord = coordinator_with(RosterStore::in_memory(), board);

    let report = coord
        .setup(SetupRequest {
            channel: CHANNEL,
            ..SetupRequest::default()
        })
        .unwrap();
    assert!(report.event.is_none());
    assert_eq!(report.week_of, "2026-10-15");
    assert_eq!(report.starts_at.to_rfc3339(), "2026-10-15T19:30:00+01:00");

    assert!(matches!(
        react(&mut coord, report.message, 1, "⚔️"),
        Outcome::Accepted { .. }
    ));
}

#[test]
fn signals_outside_the_signup_are_ignored() {
    let mut fresh = coordinator_with(RosterStore::in_memory(), LocalBoard::new());
    assert_eq!(
        fresh.handle(Signal::added(UserId(1), MessageId(1), "⚔️")),
        Outcome::Ignored(IgnoreReason::NotBound)
    );

    let (mut coord, msg) = bound();
    assert_eq!(
        coord.handle(Signal::added(UserId(1), MessageId(msg.0 + 100), "⚔️")),
        Outcome::Ignored(IgnoreReason::OtherMessage)
    );
    assert_eq!(
        react(&mut coord, msg, 1, "🎲"),
        Outcome::Ignored(IgnoreReason::UnknownToken)
    );
    assert!(coord.store().entries().is_empty());
}

#[test]
fn decoration_notifies_and_retracts() {
    let (mut coord, msg) = bound();

    assert_eq!(
        react(&mut coord, msg, 5, "🍿"),
        Outcome::Decorated {
            token: "🍿".into()
        }
    );
    assert!(coord.platform().reactions_of(msg, UserId(5)).is_empty());
    assert!(coord.platform().deliveries_to(UserId(5))[0].contains("Spectators"));
    assert!(coord.store().entries().is_empty());

    assert_eq!(
        coord.handle(Signal::removed(UserId(5), msg, "🍿")),
        Outcome::Ignored(IgnoreReason::DecorationRemoved)
    );
}

#[test]
fn new_setup_starts_an_empty_roster() {
    let (mut coord, first) = bound();
    react(&mut coord, first, 1, "⚔️");

    let report = coord
        .setup(SetupRequest {
            channel: CHANNEL,
            ..SetupRequest::default()
        })
        .unwrap();
    assert_ne!(report.message, first);
    assert!(coord.store().entries().is_empty());
    assert_eq!(
        coord.handle(Signal::added(UserId(1), first, "⚔️")),
        Outcome::Ignored(IgnoreReason::OtherMessage)
    );
}

#[test]
fn clear_and_reset() {
    let (mut coord, msg) = bound();
    react(&mut coord, msg, 1, "⚡");
    react(&mut coord, msg, 2, "📜");

    coord.clear_roster().unwrap();
    assert!(coord.store().entries().is_empty());
    assert!(coord.platform().reactions_of(msg, UserId(1)).is_empty());
    assert_eq!(coord.store().snapshot().message_id, Some(msg));
    assert_eq!(coord.status().section("main").unwrap().total, 0);

    react(&mut coord, msg, 1, "⚔️");
    coord.full_reset().unwrap();
    assert!(!coord.store().snapshot().is_bound());
    assert_eq!(
        coord.handle(Signal::added(UserId(1), msg, "⚔️")),
        Outcome::Ignored(IgnoreReason::NotBound)
    );
}

#[test]
fn roster_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    let (mut coord, msg) = signup(RosterStore::restore(&path), LocalBoard::new());
    react(&mut coord, msg, 1, "🛡️");
    react(&mut coord, msg, 2, "📜");
    let (store, board) = coord.into_parts();
    let before = store.snapshot().clone();
    drop(store);

    let restored = RosterStore::restore(&path);
    assert_eq!(restored.snapshot(), &before);

    let mut coord = coordinator_with(restored, board);
    assert_eq!(coord.store().total_weight("main"), 4);
    assert!(matches!(
        react(&mut coord, msg, 3, "📜"),
        Outcome::Rejected(Rejection::SlotTaken { .. })
    ));
}

#[test]
fn removal_keeps_accepted_weight_when_reactions_cannot_be_read() {
    let mut board = LocalBoard::new();
    board.retract_denied = true;
    let (mut coord, msg) = signup(RosterStore::in_memory(), board);

    react(&mut coord, msg, 1, "🗡️");
    react(&mut coord, msg, 1, "⚡");
    // the superseded 🗡️ could not be retracted
    assert_eq!(coord.platform().reactions_of(msg, UserId(1)).len(), 2);
    coord.platform_mut().reads_unavailable = true;

    assert_eq!(
        unreact(&mut coord, msg, 1, "🗡️"),
        Outcome::Removed {
            category: "main".into(),
            weight: 3,
            total: 3,
        }
    );
    assert_eq!(
        unreact(&mut coord, msg, 1, "⚡"),
        Outcome::Removed {
            category: "main".into(),
            weight: 0,
            total: 0,
        }
    );
    assert!(coord.store().entry(UserId(1)).is_none());
}

#[test]
fn clear_and_reset_complete_when_snapshot_cannot_be_written() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the snapshot file should be
    let path = dir.path().join("snapshot.json");
    fs::create_dir(&path).unwrap();

    let (mut coord, msg) = signup(RosterStore::restore(&path), LocalBoard::new());
    react(&mut coord, msg, 1, "⚡");
    assert_eq!(coord.store().total_weight("main"), 3);

    coord.clear_roster().unwrap();
    assert!(coord.store().entries().is_empty());
    assert!(coord.store().has_unsaved_changes());
    assert!(coord.platform().reactions_of(msg, UserId(1)).is_empty());
    let content = &coord.platform().message(msg).unwrap().content;
    assert!(!content.contains("<@1>"));
    assert!(content.contains("⚔️ Main Players (0/15)"));

    coord.full_reset().unwrap();
    assert!(!coord.store().snapshot().is_bound());
}

#[test]
fn setup_rejects_out_of_range_duration_before_posting() {
    let settings = EventSettings {
        duration_minutes: i64::MAX / 2,
        ..EventSettings::default()
    };
    let mut coord = Coordinator::new(
        CategoryModel::default(),
        settings,
        Schedule::default(),
        RosterStore::in_memory(),
        LocalBoard::new(),
    );

    let result = coord.setup(SetupRequest {
        channel: CHANNEL,
        ..SetupRequest::default()
    });
    assert!(matches!(result, Err(AppError::Config(_))));
    assert!(coord.platform().messages.is_empty());
    assert!(coord.platform().events.is_empty());
    assert!(!coord.store().snapshot().is_bound());
}
