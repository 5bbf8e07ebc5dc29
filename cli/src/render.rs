use std::fmt::Write;

use tilemerge_core::{Board, ROWS};

const CELL_WIDTH: usize = 6;

/// Draws the settled values of `board` as a text grid.
pub fn render(board: &Board) -> String {
    let values = board.values();
    let border = format!("+{}\n", format!("{}+", "-".repeat(CELL_WIDTH)).repeat(ROWS.into()));

    let mut out = border.clone();
    for row in values.rows() {
        out.push('|');
        for value in row {
            let written = match value {
                Some(value) => write!(out, "{value:>w$} |", w = CELL_WIDTH - 1),
                None => write!(out, "{:w$}|", "", w = CELL_WIDTH),
            };
            written.expect("writing to a String cannot fail");
        }
        out.push('\n');
        out.push_str(&border);
    }
    out
}
