//! Chicken Galaxy headless runner
//!
//! Plays one run with a simple autopilot, settles the reward into the local
//! save and prints the result.
//!
//! Usage: `chicken-galaxy [VARIANT] [DATA_DIR] [--upgrade]`

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;

use chicken_galaxy::audio::{AudioCues, AudioManager};
use chicken_galaxy::consts::*;
use chicken_galaxy::outcome::{OutcomeHandler, Reward};
use chicken_galaxy::persistence::{JsonPlayerRepository, PlayerRepository};
use chicken_galaxy::sim::{GamePhase, SeededRandom, Simulation};
use chicken_galaxy::{GameSession, GameUiState, GameVariant, HighScores, Settings, ships};

/// Give up on a run after this much simulated time
const MAX_RUN_SECONDS: f32 = 600.0;

/// Command-line arguments for the headless runner.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Game variant to play (chicken-galaxy or egg-magnet); defaults to the saved setting.
    #[arg(value_name = "VARIANT")]
    variant: Option<GameVariant>,
    /// Directory holding settings, player progress and high scores.
    #[arg(value_name = "DATA_DIR", default_value = ".")]
    data_dir: PathBuf,
    /// Try to buy the next ship tier after the run.
    #[arg(long)]
    upgrade: bool,
}

/// Chase the nearest egg, otherwise line up under the lowest enemy
fn autopilot(session: &GameSession, ui: &GameUiState) {
    let target = ui
        .eggs
        .iter()
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .or_else(|| ui.enemies.iter().max_by(|a, b| a.pos.y.total_cmp(&b.pos.y)));

    if let Some(target) = target {
        let dx = (target.pos.x - ui.player.pos.x).clamp(-0.01, 0.01);
        let dodge = ui
            .enemy_bullets
            .iter()
            .any(|b| (b.pos.x - ui.player.pos.x).abs() < 0.06 && b.pos.y < ui.player.pos.y);
        let dy = if dodge { 0.01 } else { 0.0 };
        if dx != 0.0 || dy != 0.0 {
            session.move_player_by(dx, dy);
        }
    }

    if ui.energy >= SHOT_ENERGY_COST + 0.2 && !ui.enemies.is_empty() {
        session.fire();
    }
}

fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    if let Err(e) = std::fs::create_dir_all(&args.data_dir) {
        log::warn!("Cannot create {}: {}", args.data_dir.display(), e);
    }
    let settings_path = args.data_dir.join("settings.json");
    let scores_path = args.data_dir.join("highscores.json");

    let mut settings = Settings::load(&settings_path);
    if let Some(variant) = args.variant {
        settings.variant = variant;
    }
    log::info!("Chicken Galaxy starting ({})", settings.variant.as_str());

    let repo = Arc::new(Mutex::new(JsonPlayerRepository::open_or_default(
        args.data_dir.join("player.json"),
    )));
    let scores = Arc::new(Mutex::new(HighScores::load(&scores_path)));
    let points_before = repo.lock().map(|r| r.player().points).unwrap_or_default();

    let rng = SeededRandom::from_clock();
    log::info!("Seed: {}", rng.seed());
    let session = GameSession::new(Simulation::new(settings.sim_config(), Box::new(rng)));

    let listener = OutcomeHandler::new(Box::new(AudioManager::from_settings(&settings)), repo.clone())
        .with_high_scores(scores.clone(), Some(scores_path.clone()))
        .spawn(session.subscribe_events());
    let listener = match listener {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::error!("Failed to start outcome listener: {}", e);
            None
        }
    };

    session.start_run();
    let max_ticks = (MAX_RUN_SECONDS / SIM_DT) as u32;
    let mut ticks = 0;
    while session.phase() == GamePhase::Running && ticks < max_ticks {
        autopilot(&session, &session.snapshot());
        session.step(SIM_DT);
        ticks += 1;
    }

    let ui = session.snapshot();
    // Closes the event channel so the listener drains and exits
    drop(session);
    if let Some(handle) = listener {
        if handle.join().is_err() {
            log::error!("Outcome listener panicked");
        }
    }

    let Some(result) = ui.result else {
        println!(
            "Run stopped after {}s with {} lives left, score {}",
            ui.elapsed_seconds, ui.lives, ui.score
        );
        return;
    };

    let reward = Reward::for_result(&result);
    println!("Game over");
    println!("  score:        {}", result.score);
    println!("  time:         {}s", result.elapsed_seconds);
    println!("  eggs:         {}", result.bonus_eggs);
    println!("  enemies down: {}", result.enemies_down);
    println!("  reward:       +{} points, +{} exp", reward.points, reward.experience);

    let Ok(mut repo) = repo.lock() else {
        return;
    };
    let player = repo.player();
    println!("  saved to:     {}", repo.path().display());
    println!(
        "  progress:     {} -> {} points, level {} ({}/{} exp)",
        points_before,
        player.points,
        player.game_level,
        player.exp,
        chicken_galaxy::persistence::required_for_level(player.game_level)
    );
    if let Ok(scores) = scores.lock() {
        if let Some(top) = scores.top_score() {
            println!("  best score:   {}", top);
        }
    }

    if args.upgrade {
        let outcome = ships::buy_next_ship(&mut *repo);
        match &outcome {
            Ok(ship) => println!("Upgraded to ship level {} (damage {})", ship.level, ship.damage),
            Err(e) => println!("No upgrade: {}", e),
        }
        if let Some(cue) = ships::purchase_cue(&outcome) {
            AudioManager::from_settings(&settings).play(cue);
        }
    }

    if let Err(e) = settings.save(&settings_path) {
        log::warn!("Failed to save settings: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["chicken-galaxy"]).expect("no arguments");
        assert_eq!(args.variant, None);
        assert_eq!(args.data_dir, PathBuf::from("."));
        assert!(!args.upgrade);
    }

    #[test]
    fn test_variant_dir_and_upgrade() {
        let args = CliArgs::try_parse_from(["chicken-galaxy", "egg-magnet", "/tmp/save", "--upgrade"])
            .expect("valid arguments");
        assert_eq!(args.variant, Some(GameVariant::EggMagnet));
        assert_eq!(args.data_dir, PathBuf::from("/tmp/save"));
        assert!(args.upgrade);
    }

    #[test]
    fn test_help_does_not_start_a_run() {
        let err = CliArgs::try_parse_from(["chicken-galaxy", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_bad_input_is_rejected() {
        let err = CliArgs::try_parse_from(["chicken-galaxy", "pong"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        let err = CliArgs::try_parse_from(["chicken-galaxy", "egg", "a", "b"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
