#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shortest-path strategies that plug into pursuing behaviors.
//!
//! Both strategies walk the immutable wall matrix only; entity occupancy is
//! ignored so that a route toward a tracker never depends on where other
//! trackers happen to stand.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, VecDeque},
};

use maze_chase_core::{Direction, NoPathFound, PathSearch, Position, WallView};

/// Selects one of the bundled strategies by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// Uniform breadth-first search.
    #[default]
    BreadthFirst,
    /// A* guided by the Manhattan distance.
    AStar,
}

impl SearchStrategy {
    /// Instantiates the selected strategy.
    #[must_use]
    pub fn build(self) -> Box<dyn PathSearch> {
        match self {
            Self::BreadthFirst => Box::new(BreadthFirst),
            Self::AStar => Box::new(AStar),
        }
    }
}

/// Breadth-first search over the four cardinal neighbors.
#[derive(Clone, Copy, Debug, Default)]
pub struct BreadthFirst;

impl PathSearch for BreadthFirst {
    fn find_path(
        &self,
        walls: WallView<'_>,
        start: Position,
        target: Position,
    ) -> Result<Vec<Position>, NoPathFound> {
        let no_path = NoPathFound { start, target };
        if start == target {
            return Ok(vec![start]);
        }
        if walls.is_wall(start) || walls.is_wall(target) {
            return Err(no_path);
        }

        let mut parents = ParentField::new(walls.dimensions());
        let mut queue = VecDeque::new();
        parents.visit(start, start);
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            for neighbor in open_neighbors(walls, cell) {
                if parents.is_visited(neighbor) {
                    continue;
                }
                parents.visit(neighbor, cell);
                if neighbor == target {
                    return parents.trace(start, target).ok_or(no_path);
                }
                queue.push_back(neighbor);
            }
        }

        Err(no_path)
    }
}

/// A* search with a Manhattan-distance heuristic.
#[derive(Clone, Copy, Debug, Default)]
pub struct AStar;

impl PathSearch for AStar {
    fn find_path(
        &self,
        walls: WallView<'_>,
        start: Position,
        target: Position,
    ) -> Result<Vec<Position>, NoPathFound> {
        let no_path = NoPathFound { start, target };
        if start == target {
            return Ok(vec![start]);
        }
        if walls.is_wall(start) || walls.is_wall(target) {
            return Err(no_path);
        }

        let mut parents = ParentField::new(walls.dimensions());
        let mut costs = CostField::new(walls.dimensions());
        let mut open = BinaryHeap::new();
        let mut sequence = 0_u64;

        parents.visit(start, start);
        costs.set(start, 0);
        open.push(Node {
            estimate: manhattan(start, target),
            cost: 0,
            sequence,
            cell: start,
        });

        while let Some(node) = open.pop() {
            if node.cell == target {
                return parents.trace(start, target).ok_or(no_path);
            }
            if costs.get(node.cell).is_some_and(|best| node.cost > best) {
                continue;
            }

            let next_cost = node.cost + 1;
            for neighbor in open_neighbors(walls, node.cell) {
                if costs.get(neighbor).is_some_and(|best| best <= next_cost) {
                    continue;
                }
                costs.set(neighbor, next_cost);
                parents.visit(neighbor, node.cell);
                sequence += 1;
                open.push(Node {
                    estimate: next_cost + manhattan(neighbor, target),
                    cost: next_cost,
                    sequence,
                    cell: neighbor,
                });
            }
        }

        Err(no_path)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Node {
    estimate: u32,
    cost: u32,
    sequence: u64,
    cell: Position,
}

impl Ord for Node {
    // Min-heap on the estimate; earlier insertions win ties.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct ParentField {
    width: u32,
    height: u32,
    parents: Vec<Option<Position>>,
}

impl ParentField {
    fn new((width, height): (u32, u32)) -> Self {
        Self {
            width,
            height,
            parents: vec![None; cell_count(width, height)],
        }
    }

    fn is_visited(&self, cell: Position) -> bool {
        self.index(cell)
            .and_then(|index| self.parents.get(index).copied().flatten())
            .is_some()
    }

    fn visit(&mut self, cell: Position, parent: Position) {
        if let Some(slot) = self.index(cell).and_then(|index| self.parents.get_mut(index)) {
            *slot = Some(parent);
        }
    }

    fn trace(&self, start: Position, target: Position) -> Option<Vec<Position>> {
        let mut path = vec![target];
        let mut cursor = target;
        while cursor != start {
            cursor = self.parents.get(self.index(cursor)?).copied().flatten()?;
            path.push(cursor);
            if path.len() > self.parents.len() {
                return None;
            }
        }
        path.reverse();
        Some(path)
    }

    fn index(&self, cell: Position) -> Option<usize> {
        index(self.width, self.height, cell)
    }
}

#[derive(Debug)]
struct CostField {
    width: u32,
    height: u32,
    costs: Vec<u32>,
}

impl CostField {
    fn new((width, height): (u32, u32)) -> Self {
        Self {
            width,
            height,
            costs: vec![u32::MAX; cell_count(width, height)],
        }
    }

    fn get(&self, cell: Position) -> Option<u32> {
        let index = index(self.width, self.height, cell)?;
        self.costs
            .get(index)
            .copied()
            .filter(|cost| *cost != u32::MAX)
    }

    fn set(&mut self, cell: Position, cost: u32) {
        if let Some(slot) =
            index(self.width, self.height, cell).and_then(|index| self.costs.get_mut(index))
        {
            *slot = cost;
        }
    }
}

fn open_neighbors(walls: WallView<'_>, cell: Position) -> impl Iterator<Item = Position> + '_ {
    Direction::CARDINALS
        .into_iter()
        .map(move |direction| cell.step(direction))
        .filter(move |neighbor| !walls.is_wall(*neighbor))
}

fn manhattan(from: Position, to: Position) -> u32 {
    from.x().abs_diff(to.x()) + from.y().abs_diff(to.y())
}

fn cell_count(width: u32, height: u32) -> usize {
    let count = u64::from(width) * u64::from(height);
    usize::try_from(count).unwrap_or(0)
}

fn index(width: u32, height: u32, cell: Position) -> Option<usize> {
    let x = u32::try_from(cell.x()).ok()?;
    let y = u32::try_from(cell.y()).ok()?;
    if x >= width || y >= height {
        return None;
    }
    let row = usize::try_from(y).ok()?;
    let column = usize::try_from(x).ok()?;
    row.checked_mul(usize::try_from(width).ok()?)?
        .checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a wall matrix from rows listed top to bottom, `#` marking walls.
    fn walls_from(rows: &[&str]) -> (Vec<bool>, u32, u32) {
        let height = rows.len();
        let width = rows[0].len();
        let mut walls = vec![false; width * height];
        for (y, row) in rows.iter().rev().enumerate() {
            for (x, symbol) in row.chars().enumerate() {
                walls[y * width + x] = symbol == '#';
            }
        }
        (walls, width as u32, height as u32)
    }

    fn assert_contiguous(path: &[Position]) {
        for pair in path.windows(2) {
            let (dx, dy) = pair[0].offset_to(pair[1]);
            assert_eq!(dx.abs() + dy.abs(), 1, "non-adjacent step {pair:?}");
        }
    }

    #[test]
    fn straight_corridor_is_followed() {
        let (walls, width, height) = walls_from(&["#######", "#     #", "#######"]);
        let view = WallView::new(&walls, width, height);
        let start = Position::new(1, 1);
        let target = Position::new(4, 1);

        for search in [SearchStrategy::BreadthFirst, SearchStrategy::AStar] {
            let path = search.build().find_path(view, start, target).expect("path");
            assert_eq!(
                path,
                vec![
                    Position::new(1, 1),
                    Position::new(2, 1),
                    Position::new(3, 1),
                    Position::new(4, 1),
                ]
            );
        }
    }

    #[test]
    fn routes_around_walls() {
        let (walls, width, height) = walls_from(&[
            "#####", //
            "#   #", //
            "# # #", //
            "# # #", //
            "#####",
        ]);
        let view = WallView::new(&walls, width, height);
        let start = Position::new(1, 1);
        let target = Position::new(3, 1);

        let bfs = BreadthFirst.find_path(view, start, target).expect("bfs path");
        let astar = AStar.find_path(view, start, target).expect("astar path");

        assert_eq!(bfs.len(), 7);
        assert_eq!(astar.len(), bfs.len());
        assert_contiguous(&bfs);
        assert_contiguous(&astar);
        assert_eq!(bfs[1], Position::new(1, 2));
        assert!(bfs.iter().all(|cell| !view.is_wall(*cell)));
    }

    #[test]
    fn already_at_target_yields_single_cell() {
        let (walls, width, height) = walls_from(&["   "]);
        let view = WallView::new(&walls, width, height);
        let cell = Position::new(1, 0);
        assert_eq!(BreadthFirst.find_path(view, cell, cell), Ok(vec![cell]));
        assert_eq!(AStar.find_path(view, cell, cell), Ok(vec![cell]));
    }

    #[test]
    fn sealed_target_is_unreachable() {
        let (walls, width, height) = walls_from(&["  #  "]);
        let view = WallView::new(&walls, width, height);
        let start = Position::new(0, 0);
        let target = Position::new(4, 0);
        let expected = Err(NoPathFound { start, target });

        assert_eq!(BreadthFirst.find_path(view, start, target), expected);
        assert_eq!(AStar.find_path(view, start, target), expected);
    }

    #[test]
    fn off_grid_target_is_unreachable() {
        let (walls, width, height) = walls_from(&["   "]);
        let view = WallView::new(&walls, width, height);
        let start = Position::new(0, 0);
        assert!(BreadthFirst
            .find_path(view, start, Position::new(-1000, -1000))
            .is_err());
    }
}
