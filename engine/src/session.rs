use tokio::sync::mpsc;
use tokio::time::interval;

use crate::game::{Direction, GameEngine, GameRng, RenderSnapshot};
use crate::log;

/// Input events delivered to the running game loop. Direction changes are
/// buffered by the engine; everything else takes effect immediately.
#[derive(Clone, Copy, Debug)]
pub enum EngineCommand {
    SetDirection(Direction),
    TogglePause,
    EnteredBackground,
    EnteringForeground,
    Restart,
    Quit,
}

/// Receives the engine snapshot after every visible state change.
pub trait SnapshotSink {
    fn publish(&self, snapshot: RenderSnapshot);
}

/// Drives the engine: a periodic timer at the engine's current tick interval,
/// multiplexed with the command channel. Ticks are serial and are skipped
/// entirely while the engine is paused or the game is over. The timer is
/// rebuilt whenever a level advance changes the interval.
pub async fn run_game_loop<S: SnapshotSink>(
    mut engine: GameEngine,
    mut rng: GameRng,
    mut command_rx: mpsc::UnboundedReceiver<EngineCommand>,
    sink: S,
) {
    log!("Game loop started (seed {})", rng.seed());
    sink.publish(engine.snapshot());

    let mut ticker = interval(engine.tick_interval());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if engine.is_paused() || engine.is_game_over() {
                    continue;
                }

                let interval_before = engine.tick_interval();
                engine.tick(&mut rng);
                sink.publish(engine.snapshot());

                if engine.tick_interval() != interval_before {
                    ticker = interval(engine.tick_interval());
                }
            }
            command = command_rx.recv() => {
                match command {
                    Some(EngineCommand::SetDirection(direction)) => {
                        engine.set_direction(direction);
                    }
                    Some(EngineCommand::TogglePause) => {
                        engine.toggle_pause();
                        sink.publish(engine.snapshot());
                    }
                    Some(EngineCommand::EnteredBackground) => {
                        engine.on_background();
                        sink.publish(engine.snapshot());
                    }
                    Some(EngineCommand::EnteringForeground) => {
                        engine.on_foreground();
                        sink.publish(engine.snapshot());
                    }
                    Some(EngineCommand::Restart) => {
                        engine.reset(&mut rng);
                        ticker = interval(engine.tick_interval());
                        sink.publish(engine.snapshot());
                    }
                    Some(EngineCommand::Quit) | None => break,
                }
            }
        }
    }

    log!("Game loop stopped");
}
