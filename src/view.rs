//! Terminal rendering and input parsing for the CLI adapter.
//!
//! Strictly a consumer of [`GameSnapshot`]; nothing in here touches the
//! engine.

use crate::common::{GamePhase, ShotMark, Side};
use crate::config::BOARD_SIZE;
use crate::ship::Orientation;
use crate::snapshot::{CellGrid, GameSnapshot, ShotView};

/// "A5"-style label for a cell.
pub fn coord_label(row: usize, col: usize) -> String {
    let col_ch = (b'A' + col as u8) as char;
    format!("{}{}", col_ch, row + 1)
}

/// Parse "A5" / "j10" into (row, col).
pub fn parse_coord(input: &str) -> Result<(usize, usize), String> {
    if input.len() < 2 {
        return Err("too short - need column letter and row number (e.g., A5)".to_string());
    }
    let mut chars = input.chars();
    let col_ch = chars.next().ok_or("no column letter")?.to_ascii_uppercase();
    if !col_ch.is_ascii_alphabetic() {
        return Err(format!("invalid column '{}' - must be a letter A-J", col_ch));
    }
    let col = (col_ch as u8).wrapping_sub(b'A') as usize;
    if col >= BOARD_SIZE {
        return Err(format!("column '{}' out of bounds - must be A-J", col_ch));
    }
    let row_str: String = chars.collect();
    let row: usize = row_str
        .parse()
        .map_err(|_| format!("invalid row '{}' - must be a number 1-10", row_str))?;
    if row == 0 || row > BOARD_SIZE {
        return Err(format!("row {} out of bounds - must be 1-10", row_str));
    }
    Ok((row - 1, col))
}

/// Parse "H"/"horizontal"/"V"/"vertical" (any case).
pub fn parse_orientation(input: &str) -> Result<Orientation, String> {
    match input.chars().next().map(|c| c.to_ascii_uppercase()) {
        Some('H') => Ok(Orientation::Horizontal),
        Some('V') => Ok(Orientation::Vertical),
        _ => Err(format!("invalid orientation '{}' - use H or V", input)),
    }
}

fn print_grid<F: Fn(usize, usize) -> char>(cell: F) {
    println!("    ╔═══════════════════════╗");
    print!("    ║  ");
    for c in 0..BOARD_SIZE {
        print!(" {}", (b'A' + c as u8) as char);
    }
    println!(" ║");
    println!("    ╠═══════════════════════╣");
    for r in 0..BOARD_SIZE {
        print!("    ║ {:2}", r + 1);
        for c in 0..BOARD_SIZE {
            print!(" {}", cell(r, c));
        }
        println!(" ║");
    }
    println!("    ╚═══════════════════════╝");
}

/// A board as its owner sees it: own ships plus the opponent's shots.
fn print_own_grid(cells: &CellGrid, incoming: &ShotView) {
    print_grid(|r, c| match (incoming[r][c], cells[r][c]) {
        (Some(ShotMark::Hit), _) => 'X',
        (Some(ShotMark::Miss), _) => 'o',
        (None, Some(_)) => 'S',
        (None, None) => '.',
    });
    println!("    Legend: S=Ship  X=Hit  o=Miss  .=Water");
}

/// A board as its attacker sees it: shots only, ships hidden.
fn print_target_grid(shots: &ShotView) {
    print_grid(|r, c| match shots[r][c] {
        Some(ShotMark::Hit) => 'X',
        Some(ShotMark::Miss) => 'o',
        None => '.',
    });
    println!("    Legend: X=Hit  o=Miss  .=Unknown");
}

fn print_fleet_summary(snap: &GameSnapshot, side: Side) {
    println!("    Ships:");
    for ship in snap.fleets.get(side) {
        let status = if ship.sunk {
            "SUNK".to_string()
        } else if !ship.placed {
            "not placed".to_string()
        } else {
            format!("{}/{} hit", ship.hits, ship.size)
        };
        println!("      {} ({}): {}", ship.name, ship.size, status);
    }
}

/// The player's own board with fleet summary (placement phase view).
pub fn print_own_board(snap: &GameSnapshot) {
    println!("\nYour fleet:");
    print_own_grid(&snap.boards.player, &snap.shots.computer);
    print_fleet_summary(snap, Side::Player);
}

/// Both boards. The opponent's ships stay hidden until the game is over
/// or both sides are computers anyway.
pub fn print_boards(snap: &GameSnapshot) {
    let reveal = snap.autopilot || snap.phase == GamePhase::GameOver;
    let (own_title, enemy_title) = if snap.autopilot {
        ("Blue Fleet:", "Red Fleet:")
    } else {
        ("Your fleet:", "Computer's fleet:")
    };

    println!("\n{}", own_title);
    print_own_grid(&snap.boards.player, &snap.shots.computer);
    print_fleet_summary(snap, Side::Player);

    println!("\n{}", enemy_title);
    if reveal {
        print_own_grid(&snap.boards.computer, &snap.shots.player);
        print_fleet_summary(snap, Side::Computer);
    } else {
        print_target_grid(&snap.shots.player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_corner_coordinates() {
        assert_eq!(parse_coord("A1"), Ok((0, 0)));
        assert_eq!(parse_coord("J10"), Ok((9, 9)));
        assert_eq!(parse_coord("b4"), Ok((3, 1)));
    }

    #[test]
    fn rejects_malformed_coordinates() {
        assert!(parse_coord("").is_err());
        assert!(parse_coord("A").is_err());
        assert!(parse_coord("K5").is_err());
        assert!(parse_coord("A0").is_err());
        assert!(parse_coord("A11").is_err());
        assert!(parse_coord("5A").is_err());
    }

    #[test]
    fn coordinate_labels_round_trip() {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let label = coord_label(row, col);
                assert_eq!(parse_coord(&label), Ok((row, col)));
            }
        }
    }

    #[test]
    fn parses_orientations_loosely() {
        assert_eq!(parse_orientation("H"), Ok(Orientation::Horizontal));
        assert_eq!(parse_orientation("vertical"), Ok(Orientation::Vertical));
        assert!(parse_orientation("x").is_err());
        assert!(parse_orientation("").is_err());
    }
}
