#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Chase engine.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the behavior systems, and adapters. The world owns all mutable state and
//! hands behaviors an immutable [`GameView`] each time it asks them for a move.
//! Behaviors answer through the [`Decide`] capability with a [`Direction`];
//! the world alone decides whether that move is legal and applies it.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Off-grid coordinate assigned to captured trackers.
pub const SENTINEL_POSITION: Position = Position::new(-1000, -1000);

/// Movement vocabulary shared by every entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing y.
    North,
    /// Movement toward decreasing y.
    South,
    /// Movement toward increasing x.
    East,
    /// Movement toward decreasing x.
    West,
    /// No movement.
    Stop,
}

impl Direction {
    /// The four movement directions in the order legality is evaluated.
    pub const CARDINALS: [Direction; 4] = [
        Direction::East,
        Direction::North,
        Direction::West,
        Direction::South,
    ];

    /// Unit offset `(dx, dy)` travelled by a single step in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::South => (0, -1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::Stop => (0, 0),
        }
    }

    /// Maps a unit offset back onto its direction.
    ///
    /// Only the five canonical offsets are accepted; anything else indicates
    /// a caller produced a non-adjacent step.
    pub const fn from_offset(dx: i32, dy: i32) -> Result<Self, InvalidOffset> {
        match (dx, dy) {
            (0, 0) => Ok(Self::Stop),
            (0, 1) => Ok(Self::North),
            (0, -1) => Ok(Self::South),
            (1, 0) => Ok(Self::East),
            (-1, 0) => Ok(Self::West),
            _ => Err(InvalidOffset { dx, dy }),
        }
    }

    /// Returns the reverse direction. `Stop` has none.
    #[must_use]
    pub const fn opposite(self) -> Option<Self> {
        match self {
            Self::North => Some(Self::South),
            Self::South => Some(Self::North),
            Self::East => Some(Self::West),
            Self::West => Some(Self::East),
            Self::Stop => None,
        }
    }

    /// Reports whether `self` and `other` point in exactly opposite directions.
    #[must_use]
    pub fn is_opposite(self, other: Self) -> bool {
        self.opposite() == Some(other)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::Stop => "Stop",
        };
        f.write_str(name)
    }
}

/// Raised when an offset does not correspond to any [`Direction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("offset ({dx}, {dy}) is not a unit movement vector")]
pub struct InvalidOffset {
    /// Horizontal component of the rejected offset.
    pub dx: i32,
    /// Vertical component of the rejected offset.
    pub dy: i32,
}

/// Location of a single grid cell. The origin sits at the bottom-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the cell, counted from the bottom.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Position reached after a single step in `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Component-wise difference `other - self`.
    #[must_use]
    pub const fn offset_to(self, other: Position) -> (i32, i32) {
        (other.x - self.x, other.y - self.y)
    }

    /// Squared Euclidean distance between two positions.
    #[must_use]
    pub fn squared_distance(self, other: Position) -> i64 {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        dx * dx + dy * dy
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

bitflags! {
    /// Occupancy flags stored for every grid cell.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        /// Impassable maze wall.
        const WALL = 0x01;
        /// Collectible item.
        const ITEM = 0x02;
        /// The seeker stands here.
        const SEEKER = 0x04;
        /// At least one tracker stands here.
        const TRACKER = 0x08;
    }
}

/// Unique identifier assigned to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Issues sequential entity identifiers.
///
/// Each game construction owns its allocator, so ids are deterministic no
/// matter how many games a process builds.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Creates an allocator whose first identifier is zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Hands out the next identifier.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId::new(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Logical role of an entity; selects the occupancy flag it contributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The single steerable entity that collects items and captures trackers.
    Seeker,
    /// An autonomous entity whose capture ends the game once all are taken.
    Tracker,
}

impl Role {
    /// Occupancy flag the role marks on the grid.
    #[must_use]
    pub const fn flag(self) -> CellFlags {
        match self {
            Self::Seeker => CellFlags::SEEKER,
            Self::Tracker => CellFlags::TRACKER,
        }
    }
}

/// Display color applied to a tracker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackerColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl TrackerColor {
    /// Red tracker.
    pub const RED: Self = Self::from_rgb(0xff, 0x00, 0x00);
    /// Green tracker.
    pub const GREEN: Self = Self::from_rgb(0x00, 0x80, 0x00);
    /// Blue tracker.
    pub const BLUE: Self = Self::from_rgb(0x00, 0x00, 0xff);
    /// Orange tracker.
    pub const ORANGE: Self = Self::from_rgb(0xff, 0xa5, 0x00);

    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Colors handed to trackers in list order. Later trackers stay uncolored.
pub const TRACKER_PALETTE: [TrackerColor; 4] = [
    TrackerColor::RED,
    TrackerColor::GREEN,
    TrackerColor::BLUE,
    TrackerColor::ORANGE,
];

/// State of a single entity as maintained by the world.
///
/// Fields are public so adapters can read them from frame snapshots, but the
/// world only ever hands out shared references; all mutation happens while
/// the world resolves a tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Identifier allocated when the game was built.
    pub id: EntityId,
    /// Seeker or tracker.
    pub role: Role,
    /// Cell currently occupied.
    pub position: Position,
    /// Cell occupied before the most recent tick, used for interpolation.
    pub previous_position: Position,
    /// Direction of the last successful move.
    pub direction: Direction,
    /// Cleared once a tracker is captured.
    pub alive: bool,
    /// Display color; only trackers carry one.
    pub color: Option<TrackerColor>,
}

impl Entity {
    /// Creates a living, stationary entity at `position`.
    #[must_use]
    pub const fn new(id: EntityId, role: Role, position: Position) -> Self {
        Self {
            id,
            role,
            position,
            previous_position: position,
            direction: Direction::Stop,
            alive: true,
            color: None,
        }
    }

    /// Reports whether the entity is the seeker.
    #[must_use]
    pub fn is_seeker(&self) -> bool {
        self.role == Role::Seeker
    }
}

/// Set of directions an entity may currently take.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LegalActions {
    buffer: [Option<Direction>; 4],
    len: usize,
}

impl LegalActions {
    fn push(&mut self, direction: Direction) {
        if self.len < self.buffer.len() {
            self.buffer[self.len] = Some(direction);
            self.len += 1;
        }
    }

    /// Reports whether `direction` is one of the legal moves.
    #[must_use]
    pub fn contains(&self, direction: Direction) -> bool {
        self.iter().any(|candidate| candidate == direction)
    }

    /// Iterator over the legal moves in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        self.buffer[..self.len].iter().flatten().copied()
    }

    /// Number of legal moves.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Reports whether the entity is boxed in.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Read-only view of the immutable wall matrix.
#[derive(Clone, Copy, Debug)]
pub struct WallView<'a> {
    walls: &'a [bool],
    width: u32,
    height: u32,
}

impl<'a> WallView<'a> {
    /// Captures a wall view backed by a row-major slice.
    #[must_use]
    pub fn new(walls: &'a [bool], width: u32, height: u32) -> Self {
        Self {
            walls,
            width,
            height,
        }
    }

    /// Reports whether a cell is impassable. Cells outside the grid count as walls.
    #[must_use]
    pub fn is_wall(&self, position: Position) -> bool {
        cell_index(position, self.width, self.height)
            .and_then(|index| self.walls.get(index).copied())
            .unwrap_or(true)
    }

    /// Reports whether a cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        cell_index(position, self.width, self.height).is_some()
    }

    /// Provides the `(width, height)` of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Read-only view into the occupancy grid.
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    cells: &'a [CellFlags],
    items: &'a [bool],
    walls: &'a [bool],
    width: u32,
    height: u32,
}

impl<'a> GridView<'a> {
    /// Captures a view over row-major cell, item and wall slices.
    #[must_use]
    pub fn new(
        cells: &'a [CellFlags],
        items: &'a [bool],
        walls: &'a [bool],
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            cells,
            items,
            walls,
            width,
            height,
        }
    }

    /// Reports whether a cell carries `flag`.
    ///
    /// Cells outside the grid read as walls and carry no other flag.
    #[must_use]
    pub fn has_flag(&self, flag: CellFlags, position: Position) -> bool {
        match self.index(position) {
            Some(index) => self
                .cells
                .get(index)
                .is_some_and(|cell| cell.intersects(flag)),
            None => flag.intersects(CellFlags::WALL),
        }
    }

    /// Wall matrix for path searches.
    #[must_use]
    pub fn walls(&self) -> WallView<'a> {
        WallView::new(self.walls, self.width, self.height)
    }

    /// Row-major item matrix.
    #[must_use]
    pub fn items(&self) -> &'a [bool] {
        self.items
    }

    /// Provides the `(width, height)` of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Directions an entity with `role` standing at `position` may take.
    ///
    /// A move is legal when the destination is not a wall and, unless the
    /// mover is the seeker, not already occupied by a tracker.
    #[must_use]
    pub fn legal_actions(&self, role: Role, position: Position) -> LegalActions {
        let mut legal = LegalActions::default();
        for direction in Direction::CARDINALS {
            let destination = position.step(direction);
            if self.has_flag(CellFlags::WALL, destination) {
                continue;
            }
            if role != Role::Seeker && self.has_flag(CellFlags::TRACKER, destination) {
                continue;
            }
            legal.push(direction);
        }
        legal
    }

    fn index(&self, position: Position) -> Option<usize> {
        cell_index(position, self.width, self.height)
    }
}

/// Everything a behavior may observe when asked for its next move.
#[derive(Clone, Copy, Debug)]
pub struct GameView<'a> {
    me: EntityId,
    grid: GridView<'a>,
    seeker: &'a Entity,
    trackers: &'a [Entity],
}

impl<'a> GameView<'a> {
    /// Captures a view from the perspective of entity `me`.
    #[must_use]
    pub fn new(
        me: EntityId,
        grid: GridView<'a>,
        seeker: &'a Entity,
        trackers: &'a [Entity],
    ) -> Self {
        Self {
            me,
            grid,
            seeker,
            trackers,
        }
    }

    /// Identifier of the entity being asked to decide.
    #[must_use]
    pub const fn me(&self) -> EntityId {
        self.me
    }

    /// State of the deciding entity.
    #[must_use]
    pub fn entity(&self) -> Option<&'a Entity> {
        if self.seeker.id == self.me {
            return Some(self.seeker);
        }
        self.trackers.iter().find(|tracker| tracker.id == self.me)
    }

    /// Occupancy grid.
    #[must_use]
    pub const fn grid(&self) -> GridView<'a> {
        self.grid
    }

    /// The seeker.
    #[must_use]
    pub const fn seeker(&self) -> &'a Entity {
        self.seeker
    }

    /// Every tracker in list order, captured ones included.
    #[must_use]
    pub const fn trackers(&self) -> &'a [Entity] {
        self.trackers
    }

    /// Trackers that have not been captured, in list order.
    pub fn living_trackers(&self) -> impl Iterator<Item = &'a Entity> + 'a {
        self.trackers.iter().filter(|tracker| tracker.alive)
    }

    /// Legal moves of the deciding entity.
    #[must_use]
    pub fn legal_actions(&self) -> LegalActions {
        self.entity()
            .map(|entity| self.grid.legal_actions(entity.role, entity.position))
            .unwrap_or_default()
    }
}

/// Decision-making capability implemented by every behavior.
///
/// The world calls [`Decide::choose_action`] exactly once per living entity
/// per tick. Legality is checked by the world afterwards, so behaviors may
/// return any direction.
pub trait Decide: fmt::Debug {
    /// Runs once after construction and after every reset, before the first tick.
    fn initialize(&mut self, _view: &GameView<'_>) {}

    /// Picks the next move.
    fn choose_action(&mut self, view: &GameView<'_>) -> Result<Direction, DecisionError>;

    /// Runs after the entity moved and the world resolved the move.
    fn observe(&mut self, _view: &GameView<'_>) {}
}

/// Pluggable shortest-path strategy used by pursuing behaviors.
pub trait PathSearch: fmt::Debug {
    /// Finds a route from `start` to `target`, both inclusive.
    ///
    /// A path that only contains `start` means the entity is already at the
    /// target.
    fn find_path(
        &self,
        walls: WallView<'_>,
        start: Position,
        target: Position,
    ) -> Result<Vec<Position>, NoPathFound>;
}

/// Raised by a [`PathSearch`] when the target cannot be reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no path from {start} to {target}")]
pub struct NoPathFound {
    /// Cell the search started from.
    pub start: Position,
    /// Cell the search tried to reach.
    pub target: Position,
}

/// Failures a behavior cannot recover from on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    /// A computed step did not match any direction.
    #[error(transparent)]
    InvalidOffset(#[from] InvalidOffset),
}

fn cell_index(position: Position, width: u32, height: u32) -> Option<usize> {
    let x = u32::try_from(position.x()).ok()?;
    let y = u32::try_from(position.y()).ok()?;
    if x >= width || y >= height {
        return None;
    }
    let row = usize::try_from(y).ok()?;
    let column = usize::try_from(x).ok()?;
    let width = usize::try_from(width).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_offsets_negate() {
        for direction in Direction::CARDINALS {
            let opposite = direction.opposite().expect("cardinal has an opposite");
            let (dx, dy) = direction.offset();
            assert_eq!(opposite.offset(), (-dx, -dy));
        }
        assert_eq!(Direction::Stop.opposite(), None);
    }

    #[test]
    fn offsets_map_back_to_directions() {
        for direction in Direction::CARDINALS.into_iter().chain([Direction::Stop]) {
            let (dx, dy) = direction.offset();
            assert_eq!(Direction::from_offset(dx, dy), Ok(direction));
        }
    }

    #[test]
    fn diagonal_offset_is_rejected() {
        assert_eq!(
            Direction::from_offset(1, 1),
            Err(InvalidOffset { dx: 1, dy: 1 })
        );
        assert!(Direction::from_offset(0, 2).is_err());
    }

    #[test]
    fn stop_is_never_opposite() {
        assert!(Direction::North.is_opposite(Direction::South));
        assert!(Direction::West.is_opposite(Direction::East));
        assert!(!Direction::North.is_opposite(Direction::East));
        assert!(!Direction::Stop.is_opposite(Direction::Stop));
        assert!(!Direction::North.is_opposite(Direction::Stop));
    }

    #[test]
    fn id_allocator_is_sequential() {
        let mut allocator = IdAllocator::new();
        assert_eq!(allocator.allocate(), EntityId::new(0));
        assert_eq!(allocator.allocate(), EntityId::new(1));

        let mut fresh = IdAllocator::default();
        assert_eq!(fresh.allocate(), EntityId::new(0));
    }

    #[test]
    fn squared_distance_matches_expectation() {
        let origin = Position::new(1, 1);
        assert_eq!(origin.squared_distance(Position::new(4, 5)), 25);
        assert_eq!(Position::new(4, 5).squared_distance(origin), 25);
    }

    #[test]
    fn legal_actions_block_walls_and_trackers_for_trackers_only() {
        // 3x3 with walls on the left column and a tracker to the east.
        let mut cells = vec![CellFlags::empty(); 9];
        let mut walls = vec![false; 9];
        for y in 0..3 {
            cells[y * 3] = CellFlags::WALL;
            walls[y * 3] = true;
        }
        cells[3 + 2] = CellFlags::TRACKER;
        let items = vec![false; 9];
        let grid = GridView::new(&cells, &items, &walls, 3, 3);
        let center = Position::new(1, 1);

        let tracker_moves = grid.legal_actions(Role::Tracker, center);
        assert!(!tracker_moves.contains(Direction::West));
        assert!(!tracker_moves.contains(Direction::East));
        assert!(tracker_moves.contains(Direction::North));
        assert!(tracker_moves.contains(Direction::South));

        let seeker_moves = grid.legal_actions(Role::Seeker, center);
        assert!(seeker_moves.contains(Direction::East));
        assert!(!seeker_moves.contains(Direction::West));
        assert_eq!(seeker_moves.len(), 3);
    }

    #[test]
    fn outside_cells_read_as_walls() {
        let cells = vec![CellFlags::empty(); 1];
        let grid = GridView::new(&cells, &[false], &[false], 1, 1);
        assert!(grid.has_flag(CellFlags::WALL, Position::new(-1, 0)));
        assert!(!grid.has_flag(CellFlags::ITEM, Position::new(0, 5)));
        assert!(grid.legal_actions(Role::Seeker, Position::new(0, 0)).is_empty());
        assert!(grid.walls().is_wall(SENTINEL_POSITION));
    }

    #[test]
    fn entity_round_trips_through_bincode() {
        let mut entity = Entity::new(EntityId::new(3), Role::Tracker, Position::new(2, 7));
        entity.color = Some(TrackerColor::ORANGE);
        let bytes = bincode::serialize(&entity).expect("serialize");
        let restored: Entity = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, entity);
    }
}
