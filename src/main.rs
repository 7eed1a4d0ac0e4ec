//! Advanced Snake entry point
//!
//! Runs a headless demo game driven by the autopilot, then records the run
//! in the leaderboard and lifetime stats.

use std::process::ExitCode;

use clap::Parser;

use advanced_snake::Settings;
use advanced_snake::consts::DATA_DIR;
use advanced_snake::persistence::Store;
use advanced_snake::sim::{GameState, RunRecord, TickOutcome, autopilot, tick};

/// Snake with power-ups, hazards and levels
#[derive(Debug, Parser)]
#[command(name = "advanced-snake", version, about)]
struct Cli {
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let store = Store::new(DATA_DIR);
    let settings = Settings::load(&Settings::path_in(store.dir()));
    let mut state = GameState::with_tuning(settings.tuning.clone(), cli.seed);
    log::info!("Advanced Snake starting (seed {})", state.seed);

    let (record, died) = run_demo(&mut state, settings.demo_tick_limit);

    let new_best = match store.record_run(&record, died) {
        Ok(recorded) => recorded.new_best,
        Err(err) => {
            log::error!("Failed to save run: {}", err);
            false
        }
    };

    println!("Seed:       {}", state.seed);
    println!("Score:      {}", record.score);
    println!("Level:      {}", record.level);
    println!("Duration:   {:.2}s", record.duration);
    println!("Food eaten: {}", record.foods);
    println!("Power-ups:  {}", record.powerups.total());
    println!("Max length: {}", record.max_length);
    if new_best {
        println!("New best score!");
    }

    ExitCode::SUCCESS
}

/// Tick until the snake dies or the limit is reached. The flag is true when
/// the run ended in death.
fn run_demo(state: &mut GameState, tick_limit: u64) -> (RunRecord, bool) {
    for _ in 0..tick_limit {
        let input = autopilot::steer(state);
        match tick(state, input) {
            TickOutcome::Dead(record) => return (record, true),
            TickOutcome::LevelUp(level) => {
                log::debug!("Level {} intro (boss: {})", level.level, level.boss);
            }
            TickOutcome::Continue(_) => {}
        }
    }
    log::info!("Tick limit {} reached, ending demo", tick_limit);
    (state.session.clone().finalize(), false)
}
