use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::{CollisionMode, FieldSize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub field_width: usize,
    pub field_height: usize,
    pub base_tick_interval_ms: u64,
    pub tick_interval_decrement_ms: u64,
    pub min_tick_interval_ms: u64,
    pub initial_target_score: u32,
    pub target_score_increment: u32,
    pub obstacles_per_level: u32,
    pub collision_mode: CollisionMode,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            field_width: 20,
            field_height: 20,
            base_tick_interval_ms: 250,
            tick_interval_decrement_ms: 20,
            min_tick_interval_ms: 50,
            initial_target_score: 5,
            target_score_increment: 2,
            obstacles_per_level: 2,
            collision_mode: CollisionMode::Permissive,
        }
    }
}

impl GameSettings {
    pub fn field_size(&self) -> FieldSize {
        FieldSize {
            width: self.field_width,
            height: self.field_height,
        }
    }

    /// Tick interval for a level: the base interval shortened by one
    /// decrement per level gained, never below the floor.
    pub fn tick_interval_for_level(&self, level: u32) -> Duration {
        let decrement = self
            .tick_interval_decrement_ms
            .saturating_mul(level.saturating_sub(1) as u64);
        let interval_ms = self
            .base_tick_interval_ms
            .saturating_sub(decrement)
            .max(self.min_tick_interval_ms);
        Duration::from_millis(interval_ms)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.field_width < 10 || self.field_width > 100 {
            return Err("Field width must be between 10 and 100".to_string());
        }
        if self.field_height < 10 || self.field_height > 100 {
            return Err("Field height must be between 10 and 100".to_string());
        }
        if self.base_tick_interval_ms < 50 || self.base_tick_interval_ms > 5000 {
            return Err("Base tick interval must be between 50ms and 5000ms".to_string());
        }
        if self.min_tick_interval_ms < 10 || self.min_tick_interval_ms > self.base_tick_interval_ms {
            return Err(
                "Minimum tick interval must be between 10ms and the base interval".to_string(),
            );
        }
        if self.initial_target_score < 1 {
            return Err("Initial target score must be at least 1".to_string());
        }
        if self.target_score_increment < 1 {
            return Err("Target score increment must be at least 1".to_string());
        }
        if self.obstacles_per_level > 10 {
            return Err("Obstacles per level must be at most 10".to_string());
        }
        Ok(())
    }
}
