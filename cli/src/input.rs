use minesweeper_core::{Coord, Coord2};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    Exit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Wrong number of arguments. Expected [flag] <row> <col>")]
    WrongArgumentCount,
    #[error("Unrecognized command {0:?}. Expected [flag] <row> <col>")]
    UnrecognizedCommand(String),
    #[error("Invalid numeric values. Expected [flag] <row> <col>")]
    InvalidNumber,
    #[error("Invalid position")]
    InvalidPosition,
}

/// Parses `<row> <col>`, `flag <row> <col>` or `exit`, rejecting positions
/// outside a `grid_size` square grid.
pub fn parse_command(line: &str, grid_size: Coord) -> Result<Command, InputError> {
    let words: Vec<&str> = line.split_whitespace().collect();

    match words.as_slice() {
        ["exit" | "quit"] => Ok(Command::Exit),
        ["flag" | "f"] => Err(InputError::WrongArgumentCount),
        [word] => Err(InputError::UnrecognizedCommand((*word).to_owned())),
        [row, col] => parse_coords(row, col, grid_size).map(Command::Reveal),
        ["flag" | "f", row, col] => parse_coords(row, col, grid_size).map(Command::Flag),
        [word, _, _] => Err(InputError::UnrecognizedCommand((*word).to_owned())),
        _ => Err(InputError::WrongArgumentCount),
    }
}

fn parse_coords(row: &str, col: &str, grid_size: Coord) -> Result<Coord2, InputError> {
    let row: i64 = row.parse().map_err(|_| InputError::InvalidNumber)?;
    let col: i64 = col.parse().map_err(|_| InputError::InvalidNumber)?;

    let in_range = |value: i64| {
        Coord::try_from(value)
            .ok()
            .filter(|&value| value < grid_size)
    };
    match (in_range(row), in_range(col)) {
        (Some(row), Some(col)) => Ok((row, col)),
        _ => Err(InputError::InvalidPosition),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reveal_flag_and_exit() {
        assert_eq!(parse_command("3 4", 9), Ok(Command::Reveal((3, 4))));
        assert_eq!(parse_command("  flag 0 8 ", 9), Ok(Command::Flag((0, 8))));
        assert_eq!(parse_command("f 1 1", 9), Ok(Command::Flag((1, 1))));
        assert_eq!(parse_command("exit", 9), Ok(Command::Exit));
    }

    #[test]
    fn rejects_wrong_argument_counts() {
        assert_eq!(parse_command("", 9), Err(InputError::WrongArgumentCount));
        assert_eq!(parse_command("flag", 9), Err(InputError::WrongArgumentCount));
        assert_eq!(parse_command("flag 1 2 3", 9), Err(InputError::WrongArgumentCount));
    }

    #[test]
    fn rejects_unknown_commands() {
        assert_eq!(
            parse_command("dig 1 2", 9),
            Err(InputError::UnrecognizedCommand("dig".to_owned()))
        );
        assert_eq!(
            parse_command("help", 9),
            Err(InputError::UnrecognizedCommand("help".to_owned()))
        );
    }

    #[test]
    fn rejects_bad_numbers_and_positions() {
        assert_eq!(parse_command("one 2", 9), Err(InputError::InvalidNumber));
        assert_eq!(parse_command("flag 1 x", 9), Err(InputError::InvalidNumber));
        assert_eq!(parse_command("9 0", 9), Err(InputError::InvalidPosition));
        assert_eq!(parse_command("-1 0", 9), Err(InputError::InvalidPosition));
        assert_eq!(parse_command("0 1000", 9), Err(InputError::InvalidPosition));
    }
}
