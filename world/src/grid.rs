//! Occupancy grid parsed from a textual layout.

use maze_chase_core::{CellFlags, GridView, Position, WallView};

const WALL_SYMBOL: char = '%';
const ITEM_SYMBOL: char = '.';
const SEEKER_SYMBOL: char = 'P';
const TRACKER_SYMBOL: char = 'G';

/// Reasons a layout cannot be turned into a grid.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The layout contained no rows.
    #[error("layout contains no rows")]
    Empty,
    /// A row's length differs from the first row's.
    #[error("layout row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row as written in the layout.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// The layout does not fit the coordinate space.
    #[error("layout of {columns}x{rows} cells is too large")]
    TooLarge {
        /// Number of columns in the layout.
        columns: usize,
        /// Number of rows in the layout.
        rows: usize,
    },
    /// No seeker symbol was found.
    #[error("layout has no seeker")]
    MissingSeeker,
    /// More than one seeker symbol was found.
    #[error("layout has a second seeker at {second}, first at {first}")]
    MultipleSeekers {
        /// Seeker encountered first in scan order.
        first: Position,
        /// Seeker encountered second in scan order.
        second: Position,
    },
}

/// Dense occupancy grid plus the item and wall matrices derived from it.
///
/// Storage is row-major with `y = 0` holding the layout's last text row.
/// Walls are fixed at parse time: flag mutations aimed at wall cells, and the
/// wall flag itself, are ignored.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<CellFlags>,
    items: Vec<bool>,
    initial_items: Vec<bool>,
    walls: Vec<bool>,
    seeker_start: Position,
    tracker_starts: Vec<Position>,
}

impl Grid {
    /// Parses layout rows, listed top to bottom.
    ///
    /// `'%'` is a wall, `'.'` an item, `'P'` the seeker and `'G'` a tracker.
    /// Every other symbol is open floor.
    pub fn parse<S: AsRef<str>>(layout: &[S]) -> Result<Self, LayoutError> {
        let first = layout.first().ok_or(LayoutError::Empty)?;
        let columns = first.as_ref().chars().count();
        let rows = layout.len();
        for (row, line) in layout.iter().enumerate() {
            let found = line.as_ref().chars().count();
            if found != columns {
                return Err(LayoutError::RaggedRow {
                    row,
                    expected: columns,
                    found,
                });
            }
        }

        let too_large = LayoutError::TooLarge { columns, rows };
        let width = u32::try_from(columns).map_err(|_| too_large.clone())?;
        let height = u32::try_from(rows).map_err(|_| too_large.clone())?;
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(too_large);
        }
        let cell_count = columns.checked_mul(rows).ok_or(too_large)?;

        let mut cells = vec![CellFlags::empty(); cell_count];
        let mut items = vec![false; cell_count];
        let mut walls = vec![false; cell_count];
        let mut seeker_start: Option<Position> = None;
        let mut tracker_starts = Vec::new();

        for (y, line) in layout.iter().rev().enumerate() {
            for (x, symbol) in line.as_ref().chars().enumerate() {
                let index = y * columns + x;
                // Bounds were validated above, so the casts cannot truncate.
                let position = Position::new(x as i32, y as i32);
                match symbol {
                    WALL_SYMBOL => {
                        cells[index] = CellFlags::WALL;
                        walls[index] = true;
                    }
                    ITEM_SYMBOL => {
                        cells[index] = CellFlags::ITEM;
                        items[index] = true;
                    }
                    SEEKER_SYMBOL => {
                        if let Some(first) = seeker_start {
                            return Err(LayoutError::MultipleSeekers {
                                first,
                                second: position,
                            });
                        }
                        cells[index] = CellFlags::SEEKER;
                        seeker_start = Some(position);
                    }
                    TRACKER_SYMBOL => {
                        cells[index] = CellFlags::TRACKER;
                        tracker_starts.push(position);
                    }
                    _ => {}
                }
            }
        }

        let seeker_start = seeker_start.ok_or(LayoutError::MissingSeeker)?;

        Ok(Self {
            width,
            height,
            cells,
            initial_items: items.clone(),
            items,
            walls,
            seeker_start,
            tracker_starts,
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Seeker position recorded at parse time.
    #[must_use]
    pub const fn seeker_start(&self) -> Position {
        self.seeker_start
    }

    /// Tracker positions recorded at parse time, in scan order.
    #[must_use]
    pub fn tracker_starts(&self) -> &[Position] {
        &self.tracker_starts
    }

    /// Sets `flag` on a cell. Setting the item flag also marks the item matrix.
    pub fn add_flag(&mut self, flag: CellFlags, position: Position) {
        let flag = flag.difference(CellFlags::WALL);
        let Some(index) = self.mutable_index(position) else {
            return;
        };
        self.cells[index].insert(flag);
        if flag.contains(CellFlags::ITEM) {
            self.items[index] = true;
        }
    }

    /// Clears `flag` on a cell. Clearing the item flag also clears the item matrix.
    pub fn remove_flag(&mut self, flag: CellFlags, position: Position) {
        let flag = flag.difference(CellFlags::WALL);
        let Some(index) = self.mutable_index(position) else {
            return;
        };
        self.cells[index].remove(flag);
        if flag.contains(CellFlags::ITEM) {
            self.items[index] = false;
        }
    }

    /// Reports whether a cell carries `flag`. Cells outside the grid read as walls.
    #[must_use]
    pub fn has_flag(&self, flag: CellFlags, position: Position) -> bool {
        self.view().has_flag(flag, position)
    }

    /// Restores items and the starting occupancy. Walls are left untouched.
    pub fn reset(&mut self) {
        self.items.clone_from(&self.initial_items);
        for ((cell, wall), item) in self
            .cells
            .iter_mut()
            .zip(self.walls.iter())
            .zip(self.items.iter())
        {
            *cell = if *wall {
                CellFlags::WALL
            } else if *item {
                CellFlags::ITEM
            } else {
                CellFlags::empty()
            };
        }

        self.add_flag(CellFlags::SEEKER, self.seeker_start);
        for index in 0..self.tracker_starts.len() {
            let start = self.tracker_starts[index];
            self.add_flag(CellFlags::TRACKER, start);
        }
    }

    /// Drops tracker starts beyond `count`, clearing their occupancy marks.
    pub(crate) fn retain_trackers(&mut self, count: usize) {
        if count >= self.tracker_starts.len() {
            return;
        }
        let dropped: Vec<Position> = self.tracker_starts.drain(count..).collect();
        for position in dropped {
            self.remove_flag(CellFlags::TRACKER, position);
        }
    }

    /// Current item matrix, row-major.
    #[must_use]
    pub fn items(&self) -> &[bool] {
        &self.items
    }

    /// Item matrix as parsed, row-major.
    #[must_use]
    pub fn initial_items(&self) -> &[bool] {
        &self.initial_items
    }

    /// Wall matrix, row-major.
    #[must_use]
    pub fn walls(&self) -> WallView<'_> {
        WallView::new(&self.walls, self.width, self.height)
    }

    /// Read-only view shared with behaviors and adapters.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(
            &self.cells,
            &self.items,
            &self.walls,
            self.width,
            self.height,
        )
    }

    pub(crate) fn wall_cells(&self) -> &[bool] {
        &self.walls
    }

    fn mutable_index(&self, position: Position) -> Option<usize> {
        let x = u32::try_from(position.x()).ok()?;
        let y = u32::try_from(position.y()).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = usize::try_from(y).ok()? * usize::try_from(self.width).ok()?
            + usize::try_from(x).ok()?;
        if self.walls.get(index).copied().unwrap_or(true) {
            return None;
        }
        Some(index)
    }
}
