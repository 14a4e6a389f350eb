//! Shortest-path pursuit of the nearest living tracker.

use maze_chase_core::{Decide, DecisionError, Direction, Entity, GameView, PathSearch, Position};

/// Walks the seeker along a shortest path toward the closest living tracker.
///
/// The route itself comes from a pluggable [`PathSearch`] strategy.
#[derive(Debug)]
pub struct Pursuit {
    search: Box<dyn PathSearch>,
}

impl Pursuit {
    /// Creates a pursuit driven by `search`.
    #[must_use]
    pub fn new(search: Box<dyn PathSearch>) -> Self {
        Self { search }
    }
}

impl Decide for Pursuit {
    fn choose_action(&mut self, view: &GameView<'_>) -> Result<Direction, DecisionError> {
        let position = view.seeker().position;

        let Some(target) = closest_living_tracker(position, view.trackers()) else {
            return Ok(Direction::Stop);
        };
        if target == position {
            return Ok(Direction::Stop);
        }

        let path = match self
            .search
            .find_path(view.grid().walls(), position, target)
        {
            Ok(path) => path,
            Err(error) => {
                tracing::debug!(entity = view.me().get(), %error, "pursuit target unreachable");
                return Ok(Direction::Stop);
            }
        };

        let Some(next) = path.get(1) else {
            return Ok(Direction::Stop);
        };
        let (dx, dy) = position.offset_to(*next);
        Ok(Direction::from_offset(dx, dy)?)
    }
}

/// Position of the living tracker closest to `from`.
///
/// Distances are squared Euclidean; on ties the tracker listed first wins.
#[must_use]
pub fn closest_living_tracker(from: Position, trackers: &[Entity]) -> Option<Position> {
    let mut closest: Option<(i64, Position)> = None;
    for tracker in trackers.iter().filter(|tracker| tracker.alive) {
        let distance = from.squared_distance(tracker.position);
        if closest.map_or(true, |(best, _)| distance < best) {
            closest = Some((distance, tracker.position));
        }
    }
    closest.map(|(_, position)| position)
}
