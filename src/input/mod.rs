//! # Input Module
//!
//! Line-based command parsing for player interactions.

pub mod commands;

pub use commands::*;

use crate::{PairlinkError, PairlinkResult};
use std::path::PathBuf;
use std::str::FromStr;

/// Input handler for text commands.
///
/// Converts lines typed at the terminal into [`Command`] values. Player numbers on the
/// command line are 1-based; parsed commands carry 0-based player indices.
pub struct InputHandler {
    /// Number of players that commands may address
    pub players: usize,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(1)
    }
}

impl InputHandler {
    /// Creates an input handler for a game with `players` players.
    ///
    /// # Examples
    ///
    /// ```
    /// use pairlink::{Command, InputHandler};
    ///
    /// let input = InputHandler::new(2);
    /// assert_eq!(
    ///     input.parse_line("pick 0 3 2").unwrap(),
    ///     Some(Command::Pick { player: 1, row: 0, col: 3 })
    /// );
    /// assert_eq!(input.parse_line("   ").unwrap(), None);
    /// ```
    pub fn new(players: usize) -> Self {
        Self { players }
    }

    /// Parses one line. Blank lines yield `None`.
    pub fn parse_line(&self, line: &str) -> PairlinkResult<Option<Command>> {
        let mut words = line.split_whitespace();
        let keyword = match words.next() {
            Some(word) => word.to_lowercase(),
            None => return Ok(None),
        };
        let args: Vec<&str> = words.collect();

        let command = match keyword.as_str() {
            "pick" | "p" => {
                expect_args(&keyword, &args, 2, 3)?;
                Command::Pick {
                    row: parse_number(&args[0], "row")?,
                    col: parse_number(&args[1], "column")?,
                    player: self.player_arg(args.get(2))?,
                }
            }
            "click" | "c" => {
                expect_args(&keyword, &args, 2, 3)?;
                Command::Click {
                    x: parse_number(&args[0], "x")?,
                    y: parse_number(&args[1], "y")?,
                    player: self.player_arg(args.get(2))?,
                }
            }
            "tick" | "t" => {
                expect_args(&keyword, &args, 0, 1)?;
                match args.first() {
                    Some(secs) => Command::Tick(parse_number(secs, "seconds")?),
                    None => Command::Tick(1),
                }
            }
            "hint" | "h" => no_args(&keyword, &args, Command::Hint)?,
            "pause" => no_args(&keyword, &args, Command::Pause)?,
            "show" | "s" => no_args(&keyword, &args, Command::Show)?,
            "save" => {
                expect_args(&keyword, &args, 1, 1)?;
                Command::Save(PathBuf::from(args[0]))
            }
            "load" => {
                expect_args(&keyword, &args, 1, 1)?;
                Command::Load(PathBuf::from(args[0]))
            }
            "new" => no_args(&keyword, &args, Command::NewGame)?,
            "help" | "?" => no_args(&keyword, &args, Command::Help)?,
            "quit" | "q" | "exit" => no_args(&keyword, &args, Command::Quit)?,
            other => {
                return Err(PairlinkError::InvalidAction(format!(
                    "unknown command '{}', type 'help' for a list",
                    other
                )))
            }
        };
        Ok(Some(command))
    }

    fn player_arg(&self, arg: Option<&&str>) -> PairlinkResult<usize> {
        let number: usize = match arg {
            Some(arg) => parse_number(arg, "player")?,
            None => 1,
        };
        if number == 0 || number > self.players {
            return Err(PairlinkError::InvalidAction(format!(
                "player must be between 1 and {}",
                self.players
            )));
        }
        Ok(number - 1)
    }
}

fn expect_args(keyword: &str, args: &[&str], min: usize, max: usize) -> PairlinkResult<()> {
    if args.len() < min || args.len() > max {
        return Err(PairlinkError::InvalidAction(format!(
            "'{}' takes {} argument(s), got {}",
            keyword,
            if min == max {
                min.to_string()
            } else {
                format!("{} to {}", min, max)
            },
            args.len()
        )));
    }
    Ok(())
}

fn no_args(keyword: &str, args: &[&str], command: Command) -> PairlinkResult<Command> {
    expect_args(keyword, args, 0, 0)?;
    Ok(command)
}

fn parse_number<T: FromStr>(value: &str, what: &str) -> PairlinkResult<T> {
    value
        .parse()
        .map_err(|_| PairlinkError::InvalidAction(format!("invalid {} '{}'", what, value)))
}
