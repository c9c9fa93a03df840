mod engine;
mod rng;
mod settings;
mod snapshot;
mod types;

pub use engine::GameEngine;
pub use rng::GameRng;
pub use settings::GameSettings;
pub use snapshot::{CellKind, RenderSnapshot, TaggedCell};
pub use types::{CollisionMode, Direction, FieldSize, GameOverReason, PauseState, Point};
