use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
                | (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
        )
    }
}

/// Toroidal playing field. `Up` decreases `y`, `Down` increases it, matching
/// screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSize {
    pub width: usize,
    pub height: usize,
}

impl FieldSize {
    /// Moves one cell in `direction`, wrapping past either edge.
    pub fn step(&self, from: Point, direction: Direction) -> Point {
        match direction {
            Direction::Up => Point::new(from.x, wrapping_dec(from.y, self.height)),
            Direction::Down => Point::new(from.x, wrapping_inc(from.y, self.height)),
            Direction::Left => Point::new(wrapping_dec(from.x, self.width), from.y),
            Direction::Right => Point::new(wrapping_inc(from.x, self.width), from.y),
        }
    }
}

fn wrapping_inc(value: usize, max: usize) -> usize {
    if value + 1 >= max { 0 } else { value + 1 }
}

fn wrapping_dec(value: usize, max: usize) -> usize {
    if value == 0 { max - 1 } else { value - 1 }
}

/// Whether running into the snake's own body or an obstacle ends the game.
/// Walls wrap in both modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionMode {
    Permissive,
    Fatal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    SelfCollision,
    ObstacleCollision,
}

/// A user pause survives backgrounding; a system pause is lifted when the
/// window regains focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseState {
    Running,
    PausedByUser,
    PausedBySystem,
}

impl PauseState {
    pub fn is_paused(&self) -> bool {
        !matches!(self, PauseState::Running)
    }
}
