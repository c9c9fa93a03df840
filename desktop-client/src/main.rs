mod app;
mod config;
mod state;

use clap::Parser;
use eframe::egui;
use tokio::sync::mpsc;

use serpent_engine::game::{GameEngine, GameRng};
use serpent_engine::highscore::FileHighScoreStore;
use serpent_engine::log;
use serpent_engine::logger;
use serpent_engine::session::{EngineCommand, run_game_loop};

use app::SerpentApp;
use state::{LocalSink, SharedState};

#[derive(Parser)]
#[command(name = "serpent")]
struct Args {
    /// Fixed RNG seed for a reproducible game; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    use_log_prefix: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Serpent".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config = config::get_config_manager().get_config()?;

    let mut rng = match args.seed {
        Some(seed) => GameRng::new(seed),
        None => GameRng::from_random(),
    };
    log!("Starting game (seed {})", rng.seed());

    let store = Box::new(FileHighScoreStore::new(config.high_score_file.clone()));
    let engine = GameEngine::new(config.game.clone(), store, &mut rng);

    let shared_state = SharedState::new();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let shared_state_for_loop = shared_state.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        rt.block_on(run_game_loop(
            engine,
            rng,
            command_rx,
            LocalSink::new(shared_state_for_loop),
        ));
    });

    let canvas_width = (config.game.field_width as f32 * app::PIXELS_PER_CELL).max(480.0);
    let canvas_height = config.game.field_height as f32 * app::PIXELS_PER_CELL + 120.0;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([canvas_width + 40.0, canvas_height])
            .with_title("Serpent"),
        ..Default::default()
    };

    let command_tx_for_app = command_tx.clone();
    eframe::run_native(
        "Serpent",
        options,
        Box::new(move |_cc| Ok(Box::new(SerpentApp::new(shared_state, command_tx_for_app)))),
    )?;

    let _ = command_tx.send(EngineCommand::Quit);

    Ok(())
}
