use eframe::egui;
use tokio::sync::mpsc;

use serpent_engine::game::{CellKind, Direction, GameOverReason, RenderSnapshot};
use serpent_engine::session::EngineCommand;

use crate::state::SharedState;

pub const PIXELS_PER_CELL: f32 = 24.0;

const BACKGROUND_COLOR: egui::Color32 = egui::Color32::from_rgb(0x1E, 0x22, 0x26);
const SNAKE_HEAD_COLOR: egui::Color32 = egui::Color32::from_rgb(0x9A, 0xE6, 0x6E);
const SNAKE_BODY_COLOR: egui::Color32 = egui::Color32::from_rgb(0x44, 0xAA, 0x44);
const FOOD_COLOR: egui::Color32 = egui::Color32::from_rgb(0xD9, 0x4F, 0x4F);
const OBSTACLE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x6E, 0x72, 0x7A);

pub struct SerpentApp {
    shared_state: SharedState,
    command_tx: mpsc::UnboundedSender<EngineCommand>,
    last_input_direction: Option<Direction>,
    window_focused: bool,
}

impl SerpentApp {
    pub fn new(shared_state: SharedState, command_tx: mpsc::UnboundedSender<EngineCommand>) -> Self {
        Self {
            shared_state,
            command_tx,
            last_input_direction: None,
            window_focused: true,
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context) {
        let focused = ctx.input(|i| {
            let mut new_direction = None;

            if i.key_pressed(egui::Key::ArrowUp) {
                new_direction = Some(Direction::Up);
            } else if i.key_pressed(egui::Key::ArrowDown) {
                new_direction = Some(Direction::Down);
            } else if i.key_pressed(egui::Key::ArrowLeft) {
                new_direction = Some(Direction::Left);
            } else if i.key_pressed(egui::Key::ArrowRight) {
                new_direction = Some(Direction::Right);
            }

            if let Some(direction) = new_direction
                && Some(direction) != self.last_input_direction
            {
                let _ = self.command_tx.send(EngineCommand::SetDirection(direction));
                self.last_input_direction = Some(direction);
            }

            if i.key_pressed(egui::Key::Space) {
                let _ = self.command_tx.send(EngineCommand::TogglePause);
            }

            if i.key_pressed(egui::Key::Enter) {
                let _ = self.command_tx.send(EngineCommand::Restart);
                self.last_input_direction = None;
            }

            i.focused
        });

        // The host window losing focus is the desktop equivalent of the app
        // being sent to the background.
        if focused != self.window_focused {
            let command = if focused {
                EngineCommand::EnteringForeground
            } else {
                EngineCommand::EnteredBackground
            };
            let _ = self.command_tx.send(command);
            self.window_focused = focused;
        }

        ctx.request_repaint();
    }

    fn render_grid(&self, ui: &mut egui::Ui, snapshot: &RenderSnapshot) {
        let canvas_width = snapshot.field_size.width as f32 * PIXELS_PER_CELL;
        let canvas_height = snapshot.field_size.height as f32 * PIXELS_PER_CELL;

        let (response, painter) = ui.allocate_painter(
            egui::Vec2::new(canvas_width, canvas_height),
            egui::Sense::hover(),
        );
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, BACKGROUND_COLOR);

        let mut head_drawn = false;
        for cell in &snapshot.cells {
            let min = egui::pos2(
                rect.min.x + cell.point.x as f32 * PIXELS_PER_CELL,
                rect.min.y + cell.point.y as f32 * PIXELS_PER_CELL,
            );
            let cell_rect = egui::Rect::from_min_size(min, egui::Vec2::splat(PIXELS_PER_CELL));

            let color = match cell.kind {
                CellKind::SnakeBody if !head_drawn => {
                    head_drawn = true;
                    SNAKE_HEAD_COLOR
                }
                CellKind::SnakeBody => SNAKE_BODY_COLOR,
                CellKind::Food => FOOD_COLOR,
                CellKind::Obstacle => OBSTACLE_COLOR,
            };

            painter.rect_filled(cell_rect.shrink(1.0), 2.0, color);
        }
    }

    fn render_status(&self, ui: &mut egui::Ui, snapshot: &RenderSnapshot) {
        ui.horizontal(|ui| {
            ui.label(format!("Score: {} / {}", snapshot.score, snapshot.target_score));
            ui.separator();
            ui.label(format!("High Score: {}", snapshot.high_score));
            ui.separator();
            ui.label(format!("Level: {}", snapshot.level));
            ui.separator();
            ui.label(format!("Tick: {} ms", snapshot.tick_interval.as_millis()));
        });
    }
}

impl eframe::App for SerpentApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        let snapshot = self.shared_state.get_snapshot();

        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            if let Some(snapshot) = &snapshot {
                self.render_status(ui, snapshot);
            } else {
                ui.label("Starting...");
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(snapshot) = &snapshot else {
                ui.label("Waiting for the first tick...");
                return;
            };

            self.render_grid(ui, snapshot);

            if let Some(reason) = snapshot.game_over {
                ui.heading(match reason {
                    GameOverReason::SelfCollision => "Game over: the snake bit itself",
                    GameOverReason::ObstacleCollision => "Game over: the snake hit an obstacle",
                });
                ui.label("Press Enter to play again");
            } else if snapshot.paused {
                ui.heading("Paused");
                ui.label("Press Space to resume");
            } else {
                ui.label("Arrows to steer, Space to pause");
            }
        });
    }
}
