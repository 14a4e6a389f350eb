use maze_chase_core::{Direction, Position, SENTINEL_POSITION};
use maze_chase_world::{query, BehaviorKind, Config, Game, SearchStrategy};

const DUEL: [&str; 5] = [
    "%%%%%", //
    "%...%", //
    "%PG.%", //
    "%...%", //
    "%%%%%",
];

fn build(layout: &[&str], seeker: BehaviorKind, tracker: BehaviorKind) -> Game {
    Game::new(layout, seeker, tracker, 4, Config::default()).expect("layout parses")
}

#[test]
fn seeker_captures_adjacent_idle_tracker() {
    let mut game = build(&DUEL, BehaviorKind::Steered, BehaviorKind::Idle);
    let tracker_id = query::trackers(&game)[0].id;
    assert!(query::is_running(&game));

    assert!(game.steer(Direction::East));
    game.update().expect("tick");

    let tracker = &query::trackers(&game)[0];
    assert_eq!(tracker.id, tracker_id);
    assert!(!tracker.alive);
    assert_eq!(tracker.position, SENTINEL_POSITION);
    assert_eq!(query::seeker(&game).position, Position::new(2, 2));
    assert_eq!(query::score(&game), -1 + 100);
    assert!(!query::is_running(&game));
}

#[test]
fn terminal_state_persists_until_reset() {
    let mut game = build(&DUEL, BehaviorKind::Steered, BehaviorKind::Idle);
    assert!(game.steer(Direction::East));
    game.update().expect("tick");
    assert!(!query::is_running(&game));

    for _ in 0..5 {
        game.update().expect("tick");
        assert!(!query::is_running(&game));
        assert!(!query::trackers(&game)[0].alive);
    }

    game.reset();
    assert!(query::is_running(&game));
}

#[test]
fn pursuit_follows_corridor_toward_tracker() {
    let corridor = ["%%%%%%", "%P  G%", "%%%%%%"];
    let mut game = build(
        &corridor,
        BehaviorKind::Pursuit(SearchStrategy::BreadthFirst),
        BehaviorKind::Idle,
    );

    game.update().expect("tick");
    let seeker = query::seeker(&game);
    assert_eq!(seeker.position, Position::new(2, 1));
    assert_eq!(seeker.direction, Direction::East);

    game.update().expect("tick");
    game.update().expect("tick");
    assert!(!query::is_running(&game));
    assert_eq!(query::score(&game), -3 + 100);
}

#[test]
fn pursuit_walks_around_wall_corners() {
    let bend = [
        "%%%%%", //
        "%  G%", //
        "%P%%%", //
        "%%%%%",
    ];
    for strategy in [SearchStrategy::BreadthFirst, SearchStrategy::AStar] {
        let mut game = build(&bend, BehaviorKind::Pursuit(strategy), BehaviorKind::Idle);
        game.update().expect("tick");
        assert_eq!(query::seeker(&game).position, Position::new(1, 2));
        assert_eq!(query::seeker(&game).direction, Direction::North);
    }
}

#[test]
fn pursuit_stops_when_every_tracker_is_walled_off() {
    let sealed = ["%%%%%%", "%P %G%", "%%%%%%"];
    let mut game = build(
        &sealed,
        BehaviorKind::Pursuit(SearchStrategy::BreadthFirst),
        BehaviorKind::Idle,
    );

    game.update().expect("tick");
    let seeker = query::seeker(&game);
    assert_eq!(seeker.position, Position::new(1, 1));
    assert_eq!(seeker.direction, Direction::Stop);
}

#[test]
fn steering_into_wall_keeps_position_and_facing() {
    let mut game = build(&DUEL, BehaviorKind::Steered, BehaviorKind::Idle);
    let start = query::seeker(&game).position;

    assert!(game.steer(Direction::West));
    game.update().expect("tick");

    let seeker = query::seeker(&game);
    assert_eq!(seeker.position, start);
    assert_eq!(seeker.direction, Direction::Stop);
    assert_eq!(seeker.previous_position, start);
}

#[test]
fn blocked_input_keeps_previous_heading() {
    let hall = ["%%%%%%", "%P...%", "%%%%%%"];
    let mut game = build(&hall, BehaviorKind::Steered, BehaviorKind::Idle);

    assert!(game.steer(Direction::East));
    game.update().expect("tick");
    assert_eq!(query::seeker(&game).position, Position::new(2, 1));

    assert!(game.steer(Direction::North));
    game.update().expect("tick");
    let seeker = query::seeker(&game);
    assert_eq!(seeker.position, Position::new(3, 1));
    assert_eq!(seeker.direction, Direction::East);
    assert_eq!(query::score(&game), -2 + 20);
}

#[test]
fn tracker_moving_head_on_into_seeker_is_captured() {
    let lane = ["%%%%%%%%", "%P  GG %", "%%%%%%%%"];
    let mut game = build(
        &lane,
        BehaviorKind::Pursuit(SearchStrategy::BreadthFirst),
        BehaviorKind::Dispersal,
    );

    game.update().expect("tick");
    let trackers = query::trackers(&game);
    assert_eq!(trackers[0].position, Position::new(3, 1));
    assert_eq!(trackers[1].position, Position::new(6, 1));
    assert_eq!(query::seeker(&game).position, Position::new(2, 1));

    game.update().expect("tick");
    let trackers = query::trackers(&game);
    assert!(!trackers[0].alive);
    assert_eq!(trackers[0].position, SENTINEL_POSITION);
    assert!(trackers[1].alive);
    assert_eq!(trackers[1].position, Position::new(6, 1));
    assert_eq!(query::seeker(&game).position, Position::new(3, 1));
    assert_eq!(query::score(&game), -2 + 100);
    assert!(query::is_running(&game));
}

#[test]
fn trackers_never_enter_occupied_cells() {
    let lane = ["%%%%%%", "%PGG %", "%%%%%%"];
    let mut game = build(&lane, BehaviorKind::Idle, BehaviorKind::Random);

    for _ in 0..50 {
        game.update().expect("tick");
        let trackers = query::trackers(&game);
        assert_ne!(trackers[0].position, trackers[1].position);
    }
}

#[test]
fn reset_reproduces_construction_state() {
    let maze = [
        "%%%%%%%%", //
        "%P....G%", //
        "%.%%.%.%", //
        "%..G...%", //
        "%%%%%%%%",
    ];
    let mut game = build(&maze, BehaviorKind::Random, BehaviorKind::Random);

    let items_before = query::frame(&game).items.to_vec();
    let seeker_before = query::seeker(&game).clone();
    let trackers_before = query::trackers(&game).to_vec();

    for _ in 0..40 {
        game.update().expect("tick");
    }
    game.reset();

    let frame = query::frame(&game);
    assert_eq!(frame.score, 0);
    assert_eq!(frame.tick, 0);
    assert_eq!(frame.items, items_before.as_slice());
    assert_eq!(frame.seeker, &seeker_before);
    assert_eq!(frame.trackers, trackers_before.as_slice());
}

#[test]
fn same_seed_replays_identically() {
    let maze = [
        "%%%%%%%%", //
        "%P....G%", //
        "%.%%.%.%", //
        "%G.....%", //
        "%%%%%%%%",
    ];
    let play = |seed: u64| {
        let mut game = Game::new(
            &maze,
            BehaviorKind::Random,
            BehaviorKind::Dispersal,
            4,
            Config::new(seed),
        )
        .expect("layout parses");
        let mut trail = Vec::new();
        for _ in 0..30 {
            game.update().expect("tick");
            trail.push(query::seeker(&game).position);
        }
        (trail, query::score(&game))
    };

    assert_eq!(play(42), play(42));
}

#[test]
fn run_stops_at_tick_limit_without_capture() {
    let mut game = build(&DUEL, BehaviorKind::Idle, BehaviorKind::Idle);
    let outcome = game.run(25).expect("run");
    assert_eq!(outcome.ticks, 25);
    assert_eq!(outcome.score, -25);
    assert_eq!(outcome.captured, 0);
    assert!(!outcome.finished);
}

#[test]
fn run_finishes_when_all_trackers_are_captured() {
    let corridor = ["%%%%%%%", "%G.P.G%", "%%%%%%%"];
    let mut game = build(
        &corridor,
        BehaviorKind::Pursuit(SearchStrategy::AStar),
        BehaviorKind::Idle,
    );
    let outcome = game.run(100).expect("run");
    assert!(outcome.finished);
    assert_eq!(outcome.captured, 2);
    assert_eq!(outcome.ticks, 6);
    assert_eq!(outcome.score, -6 + 2 * 10 + 2 * 100);
    assert_eq!(outcome.score, query::score(&game));
}
