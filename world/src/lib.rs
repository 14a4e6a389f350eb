#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for Maze Chase.
//!
//! The [`Game`] owns the grid, every entity and every behavior. Behaviors are
//! consulted through read-only views; all mutation happens while the game
//! resolves a tick.

mod grid;

use maze_chase_core::{
    CellFlags, Decide, DecisionError, Direction, Entity, EntityId, GameView, IdAllocator,
    Position, Role, SENTINEL_POSITION, TRACKER_PALETTE,
};
pub use grid::{Grid, LayoutError};
pub use maze_chase_system_behaviors::{Behavior, BehaviorKind, Pursuit};
pub use maze_chase_system_pathfinding::SearchStrategy;

/// Seed used when callers do not provide one.
pub const DEFAULT_SEED: u64 = 13_375_339;

const SEED_STRIDE: u64 = 0x9e37_79b9_7f4a_7c15;

/// Score adjustments applied while resolving ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    /// Added when the seeker collects an item.
    pub item_bonus: i64,
    /// Added when the seeker captures trackers on a cell.
    pub capture_bonus: i64,
    /// Subtracted once per tick.
    pub tick_cost: i64,
}

impl Rules {
    /// Standard scoring: 10 per item, 100 per capture, 1 per tick.
    pub const STANDARD: Self = Self {
        item_bonus: 10,
        capture_bonus: 100,
        tick_cost: 1,
    };
}

impl Default for Rules {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Configuration parameters required to construct a game.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    seed: u64,
    rules: Rules,
}

impl Config {
    /// Creates a configuration with standard rules and the provided seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            rules: Rules::STANDARD,
        }
    }

    /// Replaces the scoring rules.
    #[must_use]
    pub const fn with_rules(self, rules: Rules) -> Self {
        Self { rules, ..self }
    }

    /// Seed feeding the stochastic behaviors.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Scoring rules.
    #[must_use]
    pub const fn rules(&self) -> Rules {
        self.rules
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Failures surfaced while advancing the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    /// A behavior could not produce a move.
    #[error("entity {} failed to decide: {source}", .entity.get())]
    Decision {
        /// Entity whose behavior failed.
        entity: EntityId,
        /// Underlying failure.
        #[source]
        source: DecisionError,
    },
}

/// Summary of a finished or interrupted game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    /// Score when the game stopped.
    pub score: i64,
    /// Ticks played.
    pub ticks: u64,
    /// Trackers captured.
    pub captured: usize,
    /// Whether every tracker was captured.
    pub finished: bool,
}

/// Represents the authoritative Maze Chase game state.
#[derive(Debug)]
pub struct Game {
    grid: Grid,
    rules: Rules,
    seeker: Entity,
    trackers: Vec<Entity>,
    seeker_behavior: Behavior,
    tracker_behaviors: Vec<Behavior>,
    score: i64,
    tick: u64,
}

impl Game {
    /// Builds a game from layout rows listed top to bottom.
    ///
    /// At most `tracker_count` trackers are created, taken from the layout in
    /// scan order; surplus tracker symbols are treated as open floor.
    pub fn new<S: AsRef<str>>(
        layout: &[S],
        seeker_kind: BehaviorKind,
        tracker_kind: BehaviorKind,
        tracker_count: usize,
        config: Config,
    ) -> Result<Self, LayoutError> {
        let seed = config.seed();
        Self::with_behaviors(layout, tracker_count, config, |entity| {
            let kind = match entity.role {
                Role::Seeker => seeker_kind,
                Role::Tracker => tracker_kind,
            };
            kind.build(entity_seed(seed, entity.id))
        })
    }

    /// Builds a game whose behaviors come from `behavior_for`.
    ///
    /// The closure runs once per entity, seeker first, after ids, start
    /// positions and colors are assigned. Use it to plug in a custom
    /// [`PathSearch`](maze_chase_core::PathSearch) through [`Pursuit`] or a
    /// [`Behavior::Custom`].
    pub fn with_behaviors<S, F>(
        layout: &[S],
        tracker_count: usize,
        config: Config,
        mut behavior_for: F,
    ) -> Result<Self, LayoutError>
    where
        S: AsRef<str>,
        F: FnMut(&Entity) -> Behavior,
    {
        let mut grid = Grid::parse(layout)?;
        grid.retain_trackers(tracker_count);

        let mut ids = IdAllocator::new();
        let seeker = Entity::new(ids.allocate(), Role::Seeker, grid.seeker_start());
        let trackers: Vec<Entity> = grid
            .tracker_starts()
            .iter()
            .enumerate()
            .map(|(index, start)| {
                let mut tracker = Entity::new(ids.allocate(), Role::Tracker, *start);
                tracker.color = TRACKER_PALETTE.get(index).copied();
                tracker
            })
            .collect();

        let seeker_behavior = behavior_for(&seeker);
        let tracker_behaviors = trackers.iter().map(&mut behavior_for).collect();

        tracing::info!(
            width = grid.width(),
            height = grid.height(),
            trackers = trackers.len(),
            seeker = seeker_behavior.name(),
            "game created"
        );

        let mut game = Self {
            grid,
            rules: config.rules(),
            seeker,
            trackers,
            seeker_behavior,
            tracker_behaviors,
            score: 0,
            tick: 0,
        };
        game.initialize_behaviors();
        Ok(game)
    }

    /// Advances the game by exactly one tick.
    ///
    /// Trackers act first in list order, then the seeker. Each entity sees the
    /// moves already made earlier in the same tick.
    pub fn update(&mut self) -> Result<(), SimulationError> {
        self.tick = self.tick.saturating_add(1);
        self.score -= self.rules.tick_cost;

        for slot in 0..=self.trackers.len() {
            self.advance(slot)?;
        }

        tracing::trace!(tick = self.tick, score = self.score, "tick resolved");
        Ok(())
    }

    /// Restores the starting state while keeping entity identities and behaviors.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.score = 0;
        self.tick = 0;

        restart(&mut self.seeker, self.grid.seeker_start());
        for (tracker, start) in self.trackers.iter_mut().zip(self.grid.tracker_starts()) {
            restart(tracker, *start);
        }

        self.initialize_behaviors();
        tracing::info!("game reset");
    }

    /// Delivers external input to the seeker.
    ///
    /// Returns `false` when the seeker's behavior ignores input.
    pub fn steer(&mut self, direction: Direction) -> bool {
        self.seeker_behavior.steer(direction)
    }

    /// Plays until every tracker is captured or `max_ticks` elapse.
    pub fn run(&mut self, max_ticks: u64) -> Result<GameOutcome, SimulationError> {
        while query::is_running(self) && self.tick < max_ticks {
            self.update()?;
        }
        Ok(query::outcome(self))
    }

    fn initialize_behaviors(&mut self) {
        for slot in 0..=self.trackers.len() {
            let id = self.entity(slot).id;
            let view = GameView::new(id, self.grid.view(), &self.seeker, &self.trackers);
            let behavior = match self.tracker_behaviors.get_mut(slot) {
                Some(behavior) => behavior,
                None => &mut self.seeker_behavior,
            };
            behavior.initialize(&view);
        }
    }

    fn advance(&mut self, slot: usize) -> Result<(), SimulationError> {
        let entity = self.entity(slot);
        if !entity.alive {
            return Ok(());
        }
        let (id, role, position) = (entity.id, entity.role, entity.position);

        let direction = {
            let view = GameView::new(id, self.grid.view(), &self.seeker, &self.trackers);
            let behavior = match self.tracker_behaviors.get_mut(slot) {
                Some(behavior) => behavior,
                None => &mut self.seeker_behavior,
            };
            behavior
                .choose_action(&view)
                .map_err(|source| SimulationError::Decision { entity: id, source })?
        };

        self.entity_mut(slot).previous_position = position;

        if !self.grid.view().legal_actions(role, position).contains(direction) {
            tracing::trace!(entity = id.get(), %direction, "move rejected");
            return Ok(());
        }

        let destination = position.step(direction);
        let entity = self.entity_mut(slot);
        entity.position = destination;
        entity.direction = direction;
        self.grid.remove_flag(role.flag(), position);
        self.grid.add_flag(role.flag(), destination);

        if role == Role::Seeker || direction.is_opposite(self.seeker.direction) {
            self.resolve();
        }

        let view = GameView::new(id, self.grid.view(), &self.seeker, &self.trackers);
        let behavior = match self.tracker_behaviors.get_mut(slot) {
            Some(behavior) => behavior,
            None => &mut self.seeker_behavior,
        };
        behavior.observe(&view);
        Ok(())
    }

    /// Applies item pickup and captures on the seeker's cell.
    fn resolve(&mut self) {
        let at = self.seeker.position;

        if self.grid.has_flag(CellFlags::ITEM, at) {
            self.grid.remove_flag(CellFlags::ITEM, at);
            self.score += self.rules.item_bonus;
            tracing::debug!(%at, score = self.score, "item collected");
        }

        if self.grid.has_flag(CellFlags::TRACKER, at) {
            self.grid.remove_flag(CellFlags::TRACKER, at);
            self.score += self.rules.capture_bonus;
            for tracker in self
                .trackers
                .iter_mut()
                .filter(|tracker| tracker.alive && tracker.position == at)
            {
                tracker.alive = false;
                tracker.position = SENTINEL_POSITION;
                tracing::info!(tracker = tracker.id.get(), %at, "tracker captured");
            }
            if !query::is_running(self) {
                tracing::info!(tick = self.tick, score = self.score, "all trackers captured");
            }
        }
    }

    fn entity(&self, slot: usize) -> &Entity {
        self.trackers.get(slot).unwrap_or(&self.seeker)
    }

    fn entity_mut(&mut self, slot: usize) -> &mut Entity {
        match self.trackers.get_mut(slot) {
            Some(tracker) => tracker,
            None => &mut self.seeker,
        }
    }
}

fn restart(entity: &mut Entity, start: Position) {
    entity.position = start;
    entity.previous_position = start;
    entity.direction = Direction::Stop;
    entity.alive = true;
}

fn entity_seed(seed: u64, id: EntityId) -> u64 {
    seed.wrapping_add(u64::from(id.get()).wrapping_mul(SEED_STRIDE))
}

/// Query functions that provide read-only access to the game state.
pub mod query {
    use maze_chase_core::{Entity, EntityId, GridView, LegalActions, Position, WallView};

    use super::{Game, GameOutcome};

    /// Current score.
    #[must_use]
    pub fn score(game: &Game) -> i64 {
        game.score
    }

    /// Ticks played since construction or the last reset.
    #[must_use]
    pub fn tick(game: &Game) -> u64 {
        game.tick
    }

    /// Reports whether at least one tracker is still alive.
    #[must_use]
    pub fn is_running(game: &Game) -> bool {
        game.trackers.iter().any(|tracker| tracker.alive)
    }

    /// The seeker.
    #[must_use]
    pub fn seeker(game: &Game) -> &Entity {
        &game.seeker
    }

    /// Every tracker in list order.
    #[must_use]
    pub fn trackers(game: &Game) -> &[Entity] {
        &game.trackers
    }

    /// Read-only occupancy grid.
    #[must_use]
    pub fn grid(game: &Game) -> GridView<'_> {
        game.grid.view()
    }

    /// Wall matrix, as handed to path searches.
    #[must_use]
    pub fn walls(game: &Game) -> WallView<'_> {
        game.grid.walls()
    }

    /// Legal moves of an entity, or `None` for an unknown or captured entity.
    #[must_use]
    pub fn legal_actions(game: &Game, entity: EntityId) -> Option<LegalActions> {
        std::iter::once(&game.seeker)
            .chain(game.trackers.iter())
            .find(|candidate| candidate.id == entity && candidate.alive)
            .map(|found| game.grid.view().legal_actions(found.role, found.position))
    }

    /// Summarizes the game as it currently stands.
    #[must_use]
    pub fn outcome(game: &Game) -> GameOutcome {
        let captured = game
            .trackers
            .iter()
            .filter(|tracker| !tracker.alive)
            .count();
        GameOutcome {
            score: game.score,
            ticks: game.tick,
            captured,
            finished: !is_running(game),
        }
    }

    /// Captures everything a renderer needs for one frame.
    #[must_use]
    pub fn frame(game: &Game) -> Frame<'_> {
        Frame {
            score: game.score,
            tick: game.tick,
            running: is_running(game),
            width: game.grid.width(),
            height: game.grid.height(),
            seeker: &game.seeker,
            trackers: &game.trackers,
            items: game.grid.items(),
            walls: game.grid.wall_cells(),
        }
    }

    /// Read-only snapshot of the game for one rendered frame.
    #[derive(Clone, Copy, Debug)]
    pub struct Frame<'a> {
        /// Current score.
        pub score: i64,
        /// Ticks played.
        pub tick: u64,
        /// Whether any tracker is alive.
        pub running: bool,
        /// Number of columns.
        pub width: u32,
        /// Number of rows.
        pub height: u32,
        /// The seeker.
        pub seeker: &'a Entity,
        /// Every tracker, captured ones included.
        pub trackers: &'a [Entity],
        /// Row-major item matrix.
        pub items: &'a [bool],
        /// Row-major wall matrix.
        pub walls: &'a [bool],
    }

    impl Frame<'_> {
        /// Reports whether an item lies at `position`.
        #[must_use]
        pub fn has_item(&self, position: Position) -> bool {
            self.index(position)
                .and_then(|index| self.items.get(index).copied())
                .unwrap_or(false)
        }

        /// Reports whether `position` is a wall.
        #[must_use]
        pub fn is_wall(&self, position: Position) -> bool {
            WallView::new(self.walls, self.width, self.height).is_wall(position)
        }

        fn index(&self, position: Position) -> Option<usize> {
            let x = u32::try_from(position.x()).ok()?;
            let y = u32::try_from(position.y()).ok()?;
            if x >= self.width || y >= self.height {
                return None;
            }
            let row = usize::try_from(y).ok()?;
            let column = usize::try_from(x).ok()?;
            Some(row * usize::try_from(self.width).ok()? + column)
        }
    }
}
