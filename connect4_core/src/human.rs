use std::fmt::Display;
use std::io::{self, BufRead, Stdout, StdinLock, Write};

use crate::error::PlayError;
use crate::interface::{Board, Color, Player};

/// Typing this instead of a column leaves the game.
pub const EXIT_COMMAND: &str = "exit";

/// Lets a person choose the column, re-prompting until it is legal.
pub struct HumanPlayer<R, W> {
    color: Color,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> HumanPlayer<R, W> {
    pub fn new(color: Color, input: R, output: W) -> Self {
        Self {
            color,
            input,
            output,
        }
    }
}

impl HumanPlayer<StdinLock<'static>, Stdout> {
    /// A player on the console.
    pub fn stdio(color: Color) -> Self {
        Self::new(color, io::stdin().lock(), io::stdout())
    }
}

impl<B, R, W> Player<B> for HumanPlayer<R, W>
where
    B: Board + Display,
    R: BufRead,
    W: Write,
{
    fn color(&self) -> Color {
        self.color
    }

    fn next_move(&mut self, board: &B) -> Result<Option<usize>, PlayError> {
        writeln!(self.output, "\n{board}")?;
        let mut line = String::new();
        loop {
            write!(
                self.output,
                "Player {}, where do you want to move next? ",
                board.occupation_label(self.color)
            )?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                // end of input
                return Err(PlayError::Quit);
            }
            let raw = line.trim();
            if raw == EXIT_COMMAND {
                return Err(PlayError::Quit);
            }
            let Ok(column) = raw.parse::<i64>() else {
                writeln!(self.output, "Please enter an Integer.")?;
                continue;
            };
            match usize::try_from(column) {
                Ok(column) if board.is_legal(column) => return Ok(Some(column)),
                _ => writeln!(self.output, "You can't play there.")?,
            }
        }
    }

    fn name(&self) -> String {
        "Human".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::BitBoard;

    fn ask(input: &str, board: &BitBoard) -> (Result<Option<usize>, PlayError>, String) {
        let mut output = Vec::new();
        let mut player = HumanPlayer::new(Color::Red, input.as_bytes(), &mut output);
        let choice = player.next_move(board);
        (choice, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_reads_a_column() {
        let (choice, output) = ask("4\n", &BitBoard::standard());
        assert_eq!(choice.unwrap(), Some(4));
        assert!(output.contains("Player X (red), where do you want to move next? "));
    }

    #[test]
    fn test_reprompts_on_bad_input() {
        let mut board = BitBoard::standard();
        for _ in 0..6 {
            board.place_stone(2, Color::Yellow);
        }
        let (choice, output) = ask("two\n2\n-1\n7\n 5 \n", &board);
        assert_eq!(choice.unwrap(), Some(5));
        assert_eq!(output.matches("Please enter an Integer.").count(), 1);
        assert_eq!(output.matches("You can't play there.").count(), 3);
        assert_eq!(output.matches("where do you want to move next?").count(), 5);
    }

    #[test]
    fn test_exit_and_end_of_input_quit() {
        let (choice, _) = ask("exit\n", &BitBoard::standard());
        assert!(matches!(choice, Err(PlayError::Quit)));
        let (choice, _) = ask("", &BitBoard::standard());
        assert!(matches!(choice, Err(PlayError::Quit)));
    }
}
