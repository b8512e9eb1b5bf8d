use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use minesweeper_core::{Game, GameStatus};
use minesweeper_protocol::GameSnapshot;

use crate::input::{Command, parse_command};
use crate::render::render_grid;

const PROMPT: &str = "Cell to uncover ([flag] <row> <col>, or exit):";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ending {
    Won,
    Lost,
    Quit,
}

/// Reads commands line by line until the game ends, the player exits or
/// input runs out.
pub fn run(game: &mut Game, input: impl BufRead, output: &mut impl Write) -> Result<Ending> {
    let mut lines = input.lines();
    let mut redraw = true;

    loop {
        if redraw {
            write!(output, "{}", render_grid(&GameSnapshot::from_game(game)))?;
            writeln!(output, "Mines left: {}", game.mines_left())?;
        }
        writeln!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            log::debug!("Input closed");
            writeln!(output, "Bye!")?;
            return Ok(Ending::Quit);
        };
        let line = line.context("Failed to read command")?;

        let command = match parse_command(&line, game.grid_size()) {
            Ok(command) => command,
            Err(err) => {
                writeln!(output, "{err}")?;
                redraw = false;
                continue;
            }
        };

        redraw = match command {
            Command::Exit => {
                writeln!(output, "Bye!")?;
                return Ok(Ending::Quit);
            }
            Command::Flag(coords) => game.add_flag(coords).has_update(),
            Command::Reveal(coords) => {
                let outcome = game.reveal(coords);
                log::debug!("Reveal {:?}: {:?}", coords, outcome);
                outcome.has_update()
            }
        };

        if let Some(ending) = finish(game, output)? {
            return Ok(ending);
        }
    }
}

fn finish(game: &Game, output: &mut impl Write) -> Result<Option<Ending>> {
    let ending = match game.status() {
        GameStatus::Ongoing => return Ok(None),
        GameStatus::Won => Ending::Won,
        GameStatus::Lost => Ending::Lost,
    };

    let snapshot = GameSnapshot::from_game(game).with_mines_revealed();
    write!(output, "{}", render_grid(&snapshot))?;
    match ending {
        Ending::Won => {
            writeln!(output, "You won!")?;
            writeln!(output, "Time elapsed: {}s", game.elapsed().as_secs())?;
        }
        _ => writeln!(output, "Game lost!")?,
    }

    Ok(Some(ending))
}

#[cfg(test)]
mod tests {
    use super::*;
    use minesweeper_core::MineLayout;

    fn play(mines: &[(u8, u8)], script: &str) -> (Ending, String) {
        let mut game = Game::new(MineLayout::from_mine_coords(2, mines).unwrap());
        let mut output = Vec::new();

        let ending = run(&mut game, script.as_bytes(), &mut output).unwrap();

        (ending, String::from_utf8(output).unwrap())
    }

    #[test]
    fn winning_session() {
        let (ending, output) = play(&[(0, 0)], "0 1\n1 0\n1 1\n");

        assert_eq!(ending, Ending::Won);
        assert!(output.contains("You won!"));
        assert!(output.contains("|0||B||1|"));
    }

    #[test]
    fn losing_session_shows_every_mine() {
        let (ending, output) = play(&[(0, 0), (1, 1)], "flag 1 1\n0 0\n");

        assert_eq!(ending, Ending::Lost);
        assert!(output.contains("Game lost!"));
        assert!(output.ends_with("|0||B||.|\n|1||.||B|\nGame lost!\n"));
    }

    #[test]
    fn invalid_input_is_reported_and_play_continues() {
        let (ending, output) = play(&[(0, 0)], "5 5\nhello\nexit\n");

        assert_eq!(ending, Ending::Quit);
        assert!(output.contains("Invalid position"));
        assert!(output.contains("Unrecognized command"));
        assert!(output.ends_with("Bye!\n"));
    }

    #[test]
    fn board_is_only_redrawn_after_a_change() {
        let (ending, output) = play(&[(0, 0)], "1 1\n1 1\nflag 1 1\nexit\n");

        assert_eq!(ending, Ending::Quit);
        assert_eq!(output.matches("| ||0||1|").count(), 2);
        assert_eq!(output.matches(PROMPT).count(), 4);
    }

    #[test]
    fn end_of_input_quits() {
        let (ending, _) = play(&[(0, 0)], "");

        assert_eq!(ending, Ending::Quit);
    }
}
