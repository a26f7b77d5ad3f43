//! Actor-level flow tests: seating, the readiness barrier, folds, and the
//! short circuit, all driven through the table's message API.

use pokerd::{
    Phase, PlayerId, Street, TableActor, TableConfig, TableError, TableHandle, Username,
    constants::{BOARD_SIZE, FLOP_SIZE, HAND_SIZE},
};

async fn seat(table: &TableHandle, name: &str) -> PlayerId {
    table.join(Username::new(name), 0).await.unwrap()
}

async fn everyone_ready(table: &TableHandle, players: &[PlayerId], phase: Phase) {
    for &player in players {
        table.ready(player, phase).await.unwrap();
    }
}

#[tokio::test]
async fn table_waits_for_the_minimum_player_count() {
    let table = TableActor::spawn(TableConfig::default());

    let alice = seat(&table, "alice").await;
    let view = table.view().await.unwrap();
    assert_eq!(view.phase, Phase::Table);
    assert!(view.seat(alice).unwrap().hand.is_empty());

    let bob = seat(&table, "bob").await;
    let view = table.view().await.unwrap();
    assert_eq!(view.phase, Phase::Deal);
    assert!(view.community.is_empty());
    for player in [alice, bob] {
        assert_eq!(view.seat(player).unwrap().hand.len(), HAND_SIZE);
    }
}

#[tokio::test]
async fn a_third_player_waits_for_the_next_round() {
    let table = TableActor::spawn(TableConfig::default());
    seat(&table, "alice").await;
    seat(&table, "bob").await;

    assert_eq!(
        table.join(Username::new("carol"), 0).await,
        Err(TableError::RoundInProgress)
    );
}

#[tokio::test]
async fn flop_is_blocked_until_every_bet_is_in() {
    let table = TableActor::spawn(TableConfig::default());
    let alice = seat(&table, "alice").await;
    let bob = seat(&table, "bob").await;

    everyone_ready(&table, &[alice, bob], Phase::Deal).await;
    assert_eq!(table.view().await.unwrap().phase, Phase::Bet(Street::PreFlop));

    table.ready(alice, Phase::Bet(Street::PreFlop)).await.unwrap();
    let view = table.view().await.unwrap();
    assert_eq!(view.phase, Phase::Bet(Street::PreFlop));
    assert!(view.community.is_empty());

    table.ready(bob, Phase::Bet(Street::PreFlop)).await.unwrap();
    let view = table.view().await.unwrap();
    assert_eq!(view.phase, Phase::Flop);
    assert_eq!(view.community.len(), FLOP_SIZE);
}

#[tokio::test]
async fn a_late_fold_unblocks_the_remaining_players() {
    let table = TableActor::spawn(TableConfig { min_players: 3 });
    let alice = seat(&table, "alice").await;
    let bob = seat(&table, "bob").await;
    let carol = seat(&table, "carol").await;

    everyone_ready(&table, &[alice, bob, carol], Phase::Deal).await;
    everyone_ready(&table, &[alice, bob], Phase::Bet(Street::PreFlop)).await;
    assert_eq!(table.view().await.unwrap().phase, Phase::Bet(Street::PreFlop));

    table.fold(carol).await.unwrap();
    let view = table.view().await.unwrap();
    assert_eq!(view.phase, Phase::Flop);
    assert_eq!(view.seats.len(), 2);
}

#[tokio::test]
async fn folding_to_one_awards_the_survivor_immediately() {
    let table = TableActor::spawn(TableConfig::default());
    let alice = seat(&table, "alice").await;
    let bob = seat(&table, "bob").await;

    everyone_ready(&table, &[alice, bob], Phase::Deal).await;
    table.ready(bob, Phase::Bet(Street::PreFlop)).await.unwrap();
    table.fold(alice).await.unwrap();

    let view = table.view().await.unwrap();
    assert_eq!(view.phase, Phase::Score);
    assert!(view.community.is_empty());
    assert_eq!(view.showdown.unwrap().winner, Some(bob));
}

#[tokio::test]
async fn a_disconnect_mid_round_counts_as_a_fold() {
    let table = TableActor::spawn(TableConfig::default());
    let alice = seat(&table, "alice").await;
    let bob = seat(&table, "bob").await;

    everyone_ready(&table, &[alice, bob], Phase::Deal).await;
    table.leave(alice).await.unwrap();

    let view = table.view().await.unwrap();
    assert_eq!(view.phase, Phase::Score);
    assert_eq!(view.showdown.unwrap().winner, Some(bob));
}

#[tokio::test]
async fn a_full_round_walks_every_phase_and_resets() {
    let table = TableActor::spawn(TableConfig::default());
    let alice = seat(&table, "alice").await;
    let bob = seat(&table, "bob").await;
    let both = [alice, bob];

    everyone_ready(&table, &both, Phase::Deal).await;
    everyone_ready(&table, &both, Phase::Bet(Street::PreFlop)).await;
    assert_eq!(table.view().await.unwrap().community.len(), 3);
    everyone_ready(&table, &both, Phase::Flop).await;
    everyone_ready(&table, &both, Phase::Bet(Street::Flop)).await;
    assert_eq!(table.view().await.unwrap().community.len(), 4);
    everyone_ready(&table, &both, Phase::Turn).await;
    everyone_ready(&table, &both, Phase::Bet(Street::Turn)).await;
    assert_eq!(table.view().await.unwrap().community.len(), BOARD_SIZE);
    everyone_ready(&table, &both, Phase::River).await;
    everyone_ready(&table, &both, Phase::Bet(Street::River)).await;

    let view = table.view().await.unwrap();
    assert_eq!(view.phase, Phase::Score);
    let showdown = view.showdown.unwrap();
    assert_eq!(showdown.entries.len(), 2);

    everyone_ready(&table, &both, Phase::Score).await;
    let view = table.view().await.unwrap();
    assert_eq!(view.phase, Phase::Lobby);
    assert!(view.seats.is_empty());
    assert!(view.community.is_empty());

    // The table is joinable again, and seats carry fresh ids.
    let again = seat(&table, "alice").await;
    assert_ne!(again, alice);
}

#[tokio::test]
async fn everyone_leaving_resets_the_table() {
    let table = TableActor::spawn(TableConfig::default());
    let alice = seat(&table, "alice").await;
    let bob = seat(&table, "bob").await;

    table.leave(alice).await.unwrap();
    table.leave(bob).await.unwrap();

    let view = table.view().await.unwrap();
    assert_eq!(view.phase, Phase::Lobby);
    assert!(view.seats.is_empty());
}
