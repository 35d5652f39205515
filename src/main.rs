use std::process::ExitCode;
use std::time::Instant;

use tracing_subscriber::EnvFilter;
use twinflip::{Difficulty, Engine, run_to_completion};

/// Plays one board to completion with the auto-solver, at real-time
/// pacing, then prints the session summary as JSON. Used for scripted
/// verification of the engine; a rendering layer is somebody else's
/// binary.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        None => Difficulty::Chill,
        Some(raw) => match Difficulty::from_name(&raw) {
            Some(difficulty) => difficulty,
            None => {
                eprintln!("unknown difficulty '{raw}' (expected chill, brisk or intense)");
                return ExitCode::from(2);
            }
        },
    };

    let mut rng = rand::rng();
    let mut engine = match Engine::new(difficulty, &mut rng) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let turn_budget = difficulty.config().pairs as u32 * 4;
    let outcome = run_to_completion(&mut engine, turn_budget, |wait| {
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        Instant::now()
    });

    match outcome {
        Ok(report) => {
            tracing::info!(
                turns = report.turns,
                elapsed_ms = report.elapsed.as_millis() as u64,
                "session complete"
            );
            let summary = engine.summary(Instant::now());
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(err) => {
                    eprintln!("{err}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
