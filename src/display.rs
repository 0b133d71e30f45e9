use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect383::{Cell, GameState, Player};

/// Draws the board in colour, top row first, with column numbers underneath
pub fn draw(state: &GameState) -> Result<()> {
    let mut stdout = stdout();

    for row in 0..state.rows() {
        for col in 0..state.cols() {
            let cell = state.cell(row, col);
            let glyph = match cell {
                Cell::Blocked => "#",
                _ => "O",
            };
            stdout.queue(PrintStyledContent(
                style(glyph)
                    .attribute(Attribute::Bold)
                    .on(Color::DarkBlue)
                    .with(match cell {
                        Cell::Token(Player::One) => Color::Red,
                        Cell::Token(Player::Two) => Color::Yellow,
                        Cell::Blocked => Color::DarkGrey,
                        Cell::Empty => Color::DarkBlue,
                    }),
            ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }

    let cols: String = (0..state.cols()).map(|col| (col % 10).to_string()).collect();
    stdout.queue(PrintStyledContent(style(cols + "\n")))?;
    stdout.flush()?;
    Ok(())
}
