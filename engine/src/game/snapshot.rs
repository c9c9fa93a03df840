use std::time::Duration;

use super::types::{FieldSize, GameOverReason, Point};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    SnakeBody,
    Food,
    Obstacle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaggedCell {
    pub point: Point,
    pub kind: CellKind,
}

/// Everything the presenter needs for one frame. Pure data; any visual
/// mapping (colors, cell size, overlays) belongs to the presenter.
///
/// Snake cells come first, head first, followed by the food cell and the
/// obstacles.
#[derive(Clone, Debug)]
pub struct RenderSnapshot {
    pub field_size: FieldSize,
    pub cells: Vec<TaggedCell>,
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub target_score: u32,
    pub tick_interval: Duration,
    pub paused: bool,
    pub game_over: Option<GameOverReason>,
}

impl RenderSnapshot {
    pub fn snake_cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells
            .iter()
            .filter(|cell| cell.kind == CellKind::SnakeBody)
            .map(|cell| cell.point)
    }
}
