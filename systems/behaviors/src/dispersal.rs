//! Tracker behavior that spreads trackers out across the maze.

use maze_chase_core::{Decide, DecisionError, Direction, GameView, Position};
use rand::{distributions::WeightedIndex, prelude::Distribution, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Moves away from other living trackers.
///
/// Each other tracker contributes one candidate: the step that retreats from
/// it along the dominant axis of the separating vector. Candidates are drawn
/// with probability proportional to the squared distance of the tracker they
/// retreat from.
#[derive(Clone, Debug)]
pub struct Dispersal {
    rng: ChaCha8Rng,
}

/// Reasons a dispersal draw cannot be made.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispersalError {
    /// No other living tracker exists to retreat from.
    #[error("no other living tracker to disperse from")]
    NoOtherTrackers,
    /// Every other tracker shares the deciding tracker's cell.
    #[error("all candidate weights are zero")]
    ZeroWeight,
}

impl Dispersal {
    /// Creates a dispersal behavior whose draws are seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws a retreat direction, reporting degenerate situations as errors.
    pub fn try_choose(&mut self, view: &GameView<'_>) -> Result<Direction, DispersalError> {
        let Some(me) = view.entity() else {
            return Err(DispersalError::NoOtherTrackers);
        };

        let (candidates, weights): (Vec<Direction>, Vec<u64>) = view
            .living_trackers()
            .filter(|tracker| tracker.id != me.id)
            .map(|tracker| {
                let direction = retreat_from(me.position, tracker.position);
                let weight = u64::try_from(me.position.squared_distance(tracker.position))
                    .unwrap_or_default();
                (direction, weight)
            })
            .unzip();

        if candidates.is_empty() {
            return Err(DispersalError::NoOtherTrackers);
        }

        let distribution =
            WeightedIndex::new(&weights).map_err(|_| DispersalError::ZeroWeight)?;
        Ok(candidates[distribution.sample(&mut self.rng)])
    }
}

impl Decide for Dispersal {
    fn choose_action(&mut self, view: &GameView<'_>) -> Result<Direction, DecisionError> {
        match self.try_choose(view) {
            Ok(direction) => Ok(direction),
            Err(error) => {
                tracing::debug!(entity = view.me().get(), %error, "dispersal falls back to stop");
                Ok(Direction::Stop)
            }
        }
    }
}

/// Step that retreats from `other` along the dominant axis only.
///
/// Ties between the axes resolve to the vertical axis; a zero component
/// yields `Stop`.
pub(crate) fn retreat_from(me: Position, other: Position) -> Direction {
    let (dx, dy) = me.offset_to(other);
    if dx.abs() > dy.abs() {
        match dx.signum() {
            1 => Direction::West,
            -1 => Direction::East,
            _ => Direction::Stop,
        }
    } else {
        match dy.signum() {
            1 => Direction::South,
            -1 => Direction::North,
            _ => Direction::Stop,
        }
    }
}
