use std::borrow::Cow;
use std::fmt;

use minesweeper_core::CellState;
use minesweeper_protocol::GameSnapshot;

fn symbol(state: CellState) -> Cow<'static, str> {
    match state {
        CellState::Hidden => Cow::Borrowed("."),
        CellState::Flagged => Cow::Borrowed("F"),
        CellState::Mine => Cow::Borrowed("B"),
        CellState::Empty => Cow::Borrowed(" "),
        CellState::Count(count) => Cow::Owned(count.to_string()),
    }
}

/// Plain text grid with row and column indices, one `|x|` box per cell.
struct Grid<'a>(&'a GameSnapshot);

impl fmt::Display for Grid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;
        let width = snapshot.grid_size.saturating_sub(1).to_string().len();

        write!(f, "|{:width$}|", "")?;
        for col in 0..snapshot.grid_size {
            write!(f, "|{col:<width$}|")?;
        }
        writeln!(f)?;

        for (row, cells) in snapshot.grid.iter().enumerate() {
            write!(f, "|{row:<width$}|")?;
            for cell in cells {
                write!(f, "|{:<width$}|", symbol(cell.state))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

pub fn render_grid(snapshot: &GameSnapshot) -> String {
    Grid(snapshot).to_string()
}
