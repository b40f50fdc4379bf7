use std::io::{self, Write};
use std::time::Duration;

use broadside::{init_logging, view, GameHandle, GamePhase, GameSession, SessionConfig, Side};
use clap::Parser;
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
enum Commands {
    /// Play an interactive game against the computer.
    Play {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Watch Blue Fleet and Red Fleet fight each other on autopilot.
    Autopilot {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 1500, help = "Milliseconds between turns")]
        delay_ms: u64,
    },
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play { seed } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let (mut handle, task) = GameSession::spawn(SessionConfig::default(), make_rng(seed));
            let result = run_interactive(&mut handle).await;
            drop(handle);
            let _ = task.await;
            result
        }
        Commands::Autopilot { seed, delay_ms } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let config = SessionConfig {
                autopilot_delay: Duration::from_millis(delay_ms),
                ..SessionConfig::default()
            };
            let (mut handle, task) = GameSession::spawn(config, make_rng(seed));
            handle.start_autopilot().await?;
            watch_autopilot(&mut handle).await?;
            let snap = handle.snapshot();
            view::print_boards(&snap);
            println!("\n{}", snap.message);
            drop(handle);
            let _ = task.await;
            Ok(())
        }
    }
}

async fn run_interactive(handle: &mut GameHandle) -> anyhow::Result<()> {
    println!("{}", handle.snapshot().message);
    loop {
        let snap = handle.snapshot();
        let keep_going = match snap.phase {
            GamePhase::Placing => placement_round(handle).await?,
            GamePhase::Playing => {
                if snap.autopilot {
                    watch_autopilot(handle).await?;
                    true
                } else {
                    battle_round(handle).await?
                }
            }
            GamePhase::GameOver => game_over_round(handle).await?,
        };
        if !keep_going {
            return Ok(());
        }
    }
}

/// Prompt for one ship placement. Returns `false` when the player quits.
async fn placement_round(handle: &mut GameHandle) -> anyhow::Result<bool> {
    let snap = handle.snapshot();
    let Some(ship) = snap.next_unplaced(Side::Player).cloned() else {
        // phase is about to flip; wait it out
        handle.wait_for(|s| s.phase != GamePhase::Placing).await?;
        return Ok(true);
    };

    view::print_own_board(&snap);
    println!("\nShip: {} (length {})", ship.name, ship.size);
    let line = read_line("Place it (e.g. A5 H), 'auto' for autopilot, 'quit' to exit: ")?;

    match line.as_str() {
        "quit" => return Ok(false),
        "auto" => {
            let before = snap.revision;
            handle.start_autopilot().await?;
            handle.wait_for(|s| s.revision > before).await?;
            return Ok(true);
        }
        _ => {}
    }

    let mut parts = line.split_whitespace();
    let (row, col) = match parts.next().map(view::parse_coord) {
        Some(Ok(coord)) => coord,
        Some(Err(e)) => {
            println!("✗ {}", e);
            return Ok(true);
        }
        None => {
            println!("✗ Enter coordinates, e.g. A5 H");
            return Ok(true);
        }
    };
    let orientation = match parts.next().map(view::parse_orientation) {
        Some(Ok(o)) => o,
        Some(Err(e)) => {
            println!("✗ {}", e);
            return Ok(true);
        }
        None => snap.orientation,
    };

    let before = snap.revision;
    handle.select_ship(ship.id).await?;
    handle.set_orientation(orientation).await?;
    handle.place_at(row, col).await?;
    let after = handle.wait_for(|s| s.revision >= before + 3).await?;
    if after.fleets.player[ship.id.index()].placed {
        println!(
            "✓ {} placed at {}",
            ship.name,
            view::coord_label(row, col)
        );
        if after.phase == GamePhase::Playing {
            println!("\n{}", after.message);
        }
    } else {
        println!("✗ That doesn't fit - ships must stay on the board and not overlap.");
    }
    Ok(true)
}

/// One full exchange: the player's shot, then the computer's reply.
async fn battle_round(handle: &mut GameHandle) -> anyhow::Result<bool> {
    let snap = handle
        .wait_for(|s| s.phase != GamePhase::Playing || s.active == Side::Player)
        .await?;
    if snap.phase != GamePhase::Playing {
        return Ok(true);
    }

    view::print_boards(&snap);
    let line = read_line("\nFire at (e.g. B4), 'quit' to exit: ")?;
    if line == "quit" {
        return Ok(false);
    }
    let (row, col) = match view::parse_coord(&line) {
        Ok(coord) => coord,
        Err(e) => {
            println!("✗ {}", e);
            return Ok(true);
        }
    };

    let already_shot = snap.shots.player[row][col].is_some();
    let before = snap.revision;
    handle.fire_at(row, col).await?;
    let after = handle.wait_for(|s| s.revision > before).await?;
    if already_shot {
        println!("✗ You already shot at {}.", view::coord_label(row, col));
        return Ok(true);
    }
    println!("{}", after.message);

    // the computer's reply arrives on its own timer
    let reply = handle
        .wait_for(|s| s.phase != GamePhase::Playing || s.active == Side::Player)
        .await?;
    if reply.phase == GamePhase::Playing && reply.revision > after.revision {
        println!("{}", reply.message);
    }
    Ok(true)
}

async fn game_over_round(handle: &mut GameHandle) -> anyhow::Result<bool> {
    let snap = handle.snapshot();
    view::print_boards(&snap);
    println!("\n{}", snap.message);

    let line = read_line("\nPlay again? (y/n): ")?;
    if line.eq_ignore_ascii_case("y") {
        let before = snap.revision;
        handle.reset().await?;
        let snap = handle.wait_for(|s| s.revision > before).await?;
        println!("\n{}", snap.message);
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Print every new status line until the game ends or autopilot stops.
async fn watch_autopilot(handle: &mut GameHandle) -> anyhow::Result<()> {
    let mut snap = handle.snapshot();
    let mut last_message = String::new();
    loop {
        if snap.message != last_message {
            println!("{}", snap.message);
            last_message = snap.message.clone();
        }
        if snap.phase != GamePhase::Playing || !snap.autopilot {
            break;
        }
        snap = handle.changed().await?;
    }
    Ok(())
}

fn read_line(prompt: &str) -> anyhow::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    let n = io::stdin().read_line(&mut line)?;
    if n == 0 {
        // stdin closed; behave as if the player quit
        return Ok("quit".to_string());
    }
    Ok(line.trim().to_string())
}
