//! Multi-tick scenarios driven through the public engine API.

use rockfall::sim::level::{embedded_levels, parse_level_file};
use rockfall::{Command, Engine, FallState, GameEvent, KeyConfig, LevelError, Player, TileKind};

fn engine(codes: &[&[u8]]) -> Engine {
    let rows: Vec<Vec<u8>> = codes.iter().map(|r| r.to_vec()).collect();
    Engine::from_codes(&rows).unwrap()
}

fn row(e: &Engine, y: usize) -> Vec<TileKind> {
    (0..e.grid().width()).map(|x| e.grid().get(x, y)).collect()
}

const STONE: TileKind = TileKind::stone(FallState::Resting);

#[test]
fn push_a_stone_along_a_solid_floor() {
    let mut e = engine(&[
        &[3, 3, 3, 3, 3, 3],
        &[3, 2, 4, 0, 6, 3],
        &[3, 3, 3, 3, 3, 3],
    ]);

    e.push_command(Command::Right);
    let events = e.step();
    assert_eq!(events, vec![
        GameEvent::Pushed { from: (2, 1), to: (3, 1) },
        GameEvent::PlayerMoved { x: 2, y: 1 },
    ]);
    assert_eq!(row(&e, 1), vec![
        TileKind::Wall,
        TileKind::Air,
        TileKind::PlayerMarker,
        STONE,
        TileKind::boxed(FallState::Resting),
        TileKind::Wall,
    ]);

    // The box now sits right behind the stone.
    let before = e.grid().clone();
    e.push_command(Command::Right);
    assert!(e.step().is_empty());
    assert_eq!(e.grid(), &before);
    assert_eq!(e.player(), Player::new(2, 1));
}

#[test]
fn stone_falls_one_row_per_tick_then_lands() {
    let mut e = engine(&[
        &[3, 3, 3, 3],
        &[3, 5, 2, 3],
        &[3, 0, 3, 3],
        &[3, 0, 3, 3],
        &[3, 3, 3, 3],
    ]);

    e.step();
    assert_eq!(e.grid().get(1, 1), TileKind::Air);
    assert_eq!(e.grid().get(1, 2), TileKind::stone(FallState::Falling));
    e.step();
    assert_eq!(e.grid().get(1, 2), TileKind::Air);
    assert_eq!(e.grid().get(1, 3), TileKind::stone(FallState::Falling));
    assert_eq!(e.step(), vec![GameEvent::Landed { x: 1, y: 3 }]);
    assert_eq!(e.grid().get(1, 3), STONE);
    assert!(e.step().is_empty());
}

#[test]
fn falling_stone_resists_push_until_it_settles() {
    let mut e = engine(&[
        &[3, 3, 3, 3, 3],
        &[3, 2, 5, 0, 3],
        &[3, 3, 3, 3, 3],
    ]);

    e.push_command(Command::Right);
    assert_eq!(e.step(), vec![GameEvent::Landed { x: 2, y: 1 }]);
    assert_eq!(e.player(), Player::new(1, 1));

    e.push_command(Command::Right);
    let events = e.step();
    assert_eq!(events[0], GameEvent::Pushed { from: (2, 1), to: (3, 1) });
    assert_eq!(e.grid().get(3, 1), STONE);
}

#[test]
fn key_opens_every_matching_lock_once() {
    let mut e = engine(&[
        &[3, 3, 3, 3, 3, 3],
        &[3, 2, 9, 0, 11, 3],
        &[3, 11, 3, 3, 12, 3],
        &[3, 3, 3, 3, 3, 3],
    ]);

    e.push_command(Command::Right);
    let events = e.step();
    assert_eq!(events, vec![
        GameEvent::Unlocked { id: KeyConfig::YELLOW.id, removed: 2 },
        GameEvent::PlayerMoved { x: 2, y: 1 },
    ]);
    assert_eq!(e.grid().get(4, 1), TileKind::Air);
    assert_eq!(e.grid().get(1, 2), TileKind::Air);
    assert_eq!(e.grid().get(4, 2), TileKind::Lock(KeyConfig::CYAN));

    e.push_command(Command::Right);
    e.push_command(Command::Right);
    e.push_command(Command::Down);
    e.step();
    assert_eq!(e.player(), Player::new(4, 1));
    assert_eq!(e.grid().get(4, 2), TileKind::Lock(KeyConfig::CYAN));
    assert_eq!(e.grid().count(|t| t == TileKind::PlayerMarker), 1);
}

#[test]
fn unlocking_under_a_stone_lets_it_fall() {
    let mut e = engine(&[
        &[3, 3, 3, 3, 3, 3],
        &[3, 2, 9, 0, 4, 3],
        &[3, 3, 3, 3, 11, 3],
        &[3, 3, 3, 3, 0, 3],
        &[3, 3, 3, 3, 3, 3],
    ]);

    e.push_command(Command::Right);
    e.step();
    // Same tick: the lock is gone and the sweep already dropped the stone.
    assert_eq!(e.grid().get(4, 1), TileKind::Air);
    assert_eq!(e.grid().get(4, 2), TileKind::stone(FallState::Falling));
    e.step();
    assert_eq!(e.step(), vec![GameEvent::Landed { x: 4, y: 3 }]);
}

#[test]
fn player_holds_up_a_stone_until_stepping_away() {
    let mut e = engine(&[
        &[3, 3, 3, 3],
        &[3, 4, 0, 3],
        &[3, 2, 0, 3],
        &[3, 3, 3, 3],
    ]);

    let before = e.grid().clone();
    e.push_command(Command::Up);
    assert!(e.step().is_empty());
    assert_eq!(e.grid(), &before);

    e.push_command(Command::Right);
    e.step();
    assert_eq!(e.player(), Player::new(2, 2));
    assert_eq!(e.grid().get(1, 2), TileKind::stone(FallState::Falling));
    assert_eq!(e.step(), vec![GameEvent::Landed { x: 1, y: 2 }]);
}

#[test]
fn commands_queued_after_a_step_wait_for_the_next_one() {
    let mut e = engine(&[
        &[3, 3, 3, 3, 3],
        &[3, 2, 0, 0, 3],
        &[3, 3, 3, 3, 3],
    ]);
    e.step();
    e.push_command(Command::Right);
    assert_eq!(e.player(), Player::new(1, 1));
    assert_eq!(e.pending(), 1);
    e.step();
    assert_eq!(e.player(), Player::new(2, 1));
}

#[test]
fn built_in_levels_are_all_playable() {
    for def in embedded_levels() {
        let e = Engine::from_level(&def).unwrap_or_else(|err| panic!("{}: {err}", def.name));
        assert_eq!(e.grid().count(|t| t == TileKind::PlayerMarker), 1, "{}", def.name);
    }
}

#[test]
fn level_text_to_running_engine() {
    let text = "# Tiny\n3 3 3 3\n3 2 0 3 ; start\n3,3,3,3\n";
    let def = parse_level_file(text).unwrap();
    assert_eq!(def.name, "Tiny");
    let mut e = Engine::from_level(&def).unwrap();
    e.push_command(Command::Right);
    e.step();
    assert_eq!(e.player(), Player::new(2, 1));
}

#[test]
fn invalid_levels_are_rejected() {
    let open = Engine::from_codes(&[vec![3, 3, 3], vec![3, 2, 0], vec![3, 3, 3]]).err();
    assert_eq!(open, Some(LevelError::OpenBorder { x: 2, y: 1 }));

    let none = Engine::from_codes(&[vec![3, 3, 3], vec![3, 0, 3], vec![3, 3, 3]]).err();
    assert_eq!(none, Some(LevelError::MissingPlayer));
}
