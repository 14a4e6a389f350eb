#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Decision-making behaviors for seekers and trackers.
//!
//! Every behavior answers [`Decide::choose_action`] from an immutable
//! [`GameView`]; none of them touch world state. The set of behaviors is
//! closed: adapters pick one through [`BehaviorKind`] and the world stores the
//! resulting [`Behavior`]. Callers that need other logic, or a path search of
//! their own, build a [`Behavior`] directly.

mod dispersal;
mod pursuit;

use maze_chase_core::{Decide, DecisionError, Direction, GameView};
use maze_chase_system_pathfinding::SearchStrategy;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub use dispersal::{Dispersal, DispersalError};
pub use pursuit::{closest_living_tracker, Pursuit};

/// Selects which behavior an entity is constructed with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    /// Never moves.
    #[default]
    Idle,
    /// Picks a cardinal direction uniformly at random.
    Random,
    /// Follows externally supplied input.
    Steered,
    /// Moves away from other trackers.
    Dispersal,
    /// Walks the seeker toward the nearest living tracker.
    Pursuit(SearchStrategy),
}

impl BehaviorKind {
    /// Instantiates the behavior. `seed` feeds the stochastic variants.
    #[must_use]
    pub fn build(self, seed: u64) -> Behavior {
        match self {
            Self::Idle => Behavior::Idle(Idle),
            Self::Random => Behavior::Random(RandomWalk::new(seed)),
            Self::Steered => Behavior::Steered(Steered::default()),
            Self::Dispersal => Behavior::Dispersal(Dispersal::new(seed)),
            Self::Pursuit(strategy) => Behavior::Pursuit(Pursuit::new(strategy.build())),
        }
    }
}

/// A constructed behavior.
#[derive(Debug)]
pub enum Behavior {
    /// See [`Idle`].
    Idle(Idle),
    /// See [`RandomWalk`].
    Random(RandomWalk),
    /// See [`Steered`].
    Steered(Steered),
    /// See [`Dispersal`].
    Dispersal(Dispersal),
    /// See [`Pursuit`].
    Pursuit(Pursuit),
    /// Caller-supplied decision logic.
    Custom(Box<dyn Decide>),
}

impl Behavior {
    /// Short lowercase name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle(_) => "idle",
            Self::Random(_) => "random",
            Self::Steered(_) => "steered",
            Self::Dispersal(_) => "dispersal",
            Self::Pursuit(_) => "pursuit",
            Self::Custom(_) => "custom",
        }
    }

    /// Forwards external input to a steered behavior.
    ///
    /// Returns `false` when the behavior does not accept input.
    pub fn steer(&mut self, direction: Direction) -> bool {
        match self {
            Self::Steered(steered) => {
                steered.steer(direction);
                true
            }
            _ => false,
        }
    }
}

impl Decide for Behavior {
    fn initialize(&mut self, view: &GameView<'_>) {
        match self {
            Self::Idle(inner) => inner.initialize(view),
            Self::Random(inner) => inner.initialize(view),
            Self::Steered(inner) => inner.initialize(view),
            Self::Dispersal(inner) => inner.initialize(view),
            Self::Pursuit(inner) => inner.initialize(view),
            Self::Custom(inner) => inner.initialize(view),
        }
    }

    fn choose_action(&mut self, view: &GameView<'_>) -> Result<Direction, DecisionError> {
        match self {
            Self::Idle(inner) => inner.choose_action(view),
            Self::Random(inner) => inner.choose_action(view),
            Self::Steered(inner) => inner.choose_action(view),
            Self::Dispersal(inner) => inner.choose_action(view),
            Self::Pursuit(inner) => inner.choose_action(view),
            Self::Custom(inner) => inner.choose_action(view),
        }
    }

    fn observe(&mut self, view: &GameView<'_>) {
        match self {
            Self::Idle(inner) => inner.observe(view),
            Self::Random(inner) => inner.observe(view),
            Self::Steered(inner) => inner.observe(view),
            Self::Dispersal(inner) => inner.observe(view),
            Self::Pursuit(inner) => inner.observe(view),
            Self::Custom(inner) => inner.observe(view),
        }
    }
}

/// Behavior that always stays put.
#[derive(Clone, Copy, Debug, Default)]
pub struct Idle;

impl Decide for Idle {
    fn choose_action(&mut self, _view: &GameView<'_>) -> Result<Direction, DecisionError> {
        Ok(Direction::Stop)
    }
}

/// Behavior that picks one of the four cardinal directions uniformly.
///
/// Legality is left to the world, so the walk frequently bumps into walls.
#[derive(Clone, Debug)]
pub struct RandomWalk {
    rng: ChaCha8Rng,
}

impl RandomWalk {
    /// Creates a walk driven by a generator seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Decide for RandomWalk {
    fn choose_action(&mut self, _view: &GameView<'_>) -> Result<Direction, DecisionError> {
        Ok(Direction::CARDINALS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Direction::Stop))
    }
}

/// Behavior driven by the most recent external input.
#[derive(Clone, Copy, Debug, Default)]
pub struct Steered {
    input: Option<Direction>,
}

impl Steered {
    /// Records the latest input. Earlier input is discarded.
    pub fn steer(&mut self, direction: Direction) {
        self.input = Some(direction);
    }

    /// Most recent input, if any arrived.
    #[must_use]
    pub const fn input(&self) -> Option<Direction> {
        self.input
    }
}

impl Decide for Steered {
    fn choose_action(&mut self, view: &GameView<'_>) -> Result<Direction, DecisionError> {
        if let Some(input) = self.input {
            if view.legal_actions().contains(input) {
                return Ok(input);
            }
        }
        // Keep heading the same way while the requested turn is blocked.
        Ok(view
            .entity()
            .map_or(Direction::Stop, |entity| entity.direction))
    }
}
