//! Moderator-facing text for the Catan script.

use super::settings::BoardMode;

pub const SETUP_TITLE: &str = "Game setup";
pub const SETUP_LABEL: &str = "Setup";
pub const CHOOSE_MODE: &str = "Choose the board mode: beginner, randomized or manual.";
pub const PLACE_TILES: &str = "Lay out the resource tiles and the desert.";
pub const PLACE_NUMBERS: &str = "Place the number tokens on the tiles.";
pub const PLACE_NUMBERS_HELPER: &str = "Beginner: never put a 6 next to an 8.";
pub const PLACE_PORTS: &str = "Place the ports around the board.";
pub const PREPARE_BANK: &str = "Prepare the bank: resource cards and development cards.";
pub const PREPARE_PIECES: &str = "Hand out pieces: 5 settlements, 4 cities and 15 roads each.";
pub const PICK_FIRST: &str = "Pick the first player at random.";
pub const READY: &str = "Ready? Confirm to start placing settlements.";

pub const PLACEMENT_TITLE_R1: &str = "Placement round 1";
pub const PLACEMENT_TITLE_R2: &str = "Placement round 2";
pub const PLACEMENT_COLLECT_HELPER: &str =
    "Collect one resource from every tile next to the second settlement.";
pub const PLACEMENT_COMPLETE: &str = "Placement complete. Start the regular rounds.";

pub const ROLL_DICE: &str = "Roll the dice.";
pub const DISTRIBUTE: &str = "Hand out resources for the roll.";
pub const DISTRIBUTE_HELPER: &str =
    "Every player with a building next to a tile showing the roll collects from it.";
pub const TRADE: &str = "Trade with other players, the bank or a port.";
pub const TRADE_PORT_HELPER: &str = "Bank 4:1, ports 3:1 or 2:1.";
pub const BUILD: &str = "Build roads, settlements, cities or buy development cards.";
pub const BUILD_COSTS: &str = "Road: brick + lumber | Settlement: brick + lumber + wool + grain | City: 3 ore + 2 grain | Development: ore + wool + grain";
pub const ROUND_CHECKPOINT: &str = "Rate this round (1-5).";

pub const ROBBER_TITLE: &str = "Robber! (rolled 7)";
pub const ROBBER_DISCARD: &str = "Every player holding more than 7 cards discards half, rounded down.";
pub const ROBBER_DISCARD_HELPER: &str = "8 cards: discard 4. 9 cards: discard 4.";
pub const ROBBER_STEAL_HELPER: &str = "Nobody next to the new tile? Skip the steal.";
pub const FRIENDLY_ROBBER: &str = "Friendly robber: no stealing from players with 2 VP or fewer.";
pub const ROBBER_CHECKPOINT: &str = "Rate the robber moment (1-5).";
pub const ROBBER_RETURN: &str = "Back to the game: trade and build.";

/// Short description of a board mode.
#[must_use]
pub fn board_mode(mode: BoardMode) -> &'static str {
    match mode {
        BoardMode::Beginner => "Selected: beginner layout",
        BoardMode::Randomized => "Selected: random tiles, numbers and ports",
        BoardMode::Manual => "Selected: arranged by hand",
    }
}

#[must_use]
pub fn place_settlement_road(name: &str) -> String {
    format!("{name}: place one settlement and one road.")
}

#[must_use]
pub fn place_second_and_collect(name: &str) -> String {
    format!("{name}: place one settlement and one road, then collect from the second settlement.")
}

#[must_use]
pub fn round_label(round: u32) -> String {
    format!("Round {round}")
}

#[must_use]
pub fn turn_start(name: &str) -> String {
    format!("Turn start: {name}")
}

#[must_use]
pub fn turn_timer(seconds: u32) -> String {
    format!("Turn timer: {seconds} s")
}

#[must_use]
pub fn end_turn(name: &str) -> String {
    format!("End of turn: {name} passes the dice.")
}

#[must_use]
pub fn victory_target(points: u32) -> String {
    format!("First to {points} VP wins.")
}

#[must_use]
pub fn move_robber(name: &str) -> String {
    format!("{name}: move the robber to a new tile (not the same one).")
}

#[must_use]
pub fn steal(name: &str) -> String {
    format!("{name}: steal one card from a player with a building next to the robber.")
}
