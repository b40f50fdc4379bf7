//! Headless autopilot driver: plays one Blue-vs-Red game as fast as the
//! scheduler allows and prints a JSON summary line.

use std::time::Duration;

use broadside::{GameOutcome, GamePhase, GameSession, SessionConfig, Side};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <seed>", args[0]);
        std::process::exit(1);
    }
    let seed: u64 = args[1].parse()?;

    let config = SessionConfig {
        computer_delay: Duration::ZERO,
        autopilot_delay: Duration::ZERO,
    };
    let (mut handle, task) = GameSession::spawn(config, SmallRng::seed_from_u64(seed));

    handle.start_autopilot().await?;
    let snap = handle
        .wait_for(|s| s.phase == GamePhase::GameOver)
        .await?;

    let winner = match snap.outcome {
        Some(GameOutcome::Victory(Side::Player)) => Some("blue"),
        Some(GameOutcome::Victory(Side::Computer)) => Some("red"),
        Some(GameOutcome::Draw) | None => None,
    };

    let result = json!({
        "seed": seed,
        "winner": winner,
        "blue_shots": snap.shots_fired(Side::Player),
        "red_shots": snap.shots_fired(Side::Computer),
        "message": snap.message,
    });
    println!("{}", serde_json::to_string(&result)?);

    drop(handle);
    let _ = task.await;
    Ok(())
}
