//! Raw key capture and the normalized actions the systems consume.

use std::fmt;

use bracket_geometry::prelude::Point;
use crossterm::event::{self, Event, KeyEventKind};

use crate::error::EngineResult;

pub use crossterm::event::KeyCode;

/// A key press after normalization. Letters are lower-cased.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Char(char),
    Escape,
    Enter,
    Up,
    Down,
    Left,
    Right,
    Other,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Self {
        match code {
            KeyCode::Char(c) => Action::Char(c.to_ascii_lowercase()),
            KeyCode::Esc => Action::Escape,
            KeyCode::Enter => Action::Enter,
            KeyCode::Up => Action::Up,
            KeyCode::Down => Action::Down,
            KeyCode::Left => Action::Left,
            KeyCode::Right => Action::Right,
            _ => Action::Other,
        }
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, Action::Char('q') | Action::Escape)
    }

    /// Step for arrows, `wasd` and `hjkl`.
    pub fn direction(&self) -> Option<Point> {
        match self {
            Action::Left | Action::Char('a') | Action::Char('h') => Some(Point::new(-1, 0)),
            Action::Right | Action::Char('d') | Action::Char('l') => Some(Point::new(1, 0)),
            Action::Up | Action::Char('w') | Action::Char('k') => Some(Point::new(0, -1)),
            Action::Down | Action::Char('s') | Action::Char('j') => Some(Point::new(0, 1)),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Char(c) => write!(f, "{c}"),
            Action::Escape => f.write_str("escape"),
            Action::Enter => f.write_str("enter"),
            Action::Up => f.write_str("up"),
            Action::Down => f.write_str("down"),
            Action::Left => f.write_str("left"),
            Action::Right => f.write_str("right"),
            Action::Other => f.write_str("other"),
        }
    }
}

/// Where key presses come from. `next_key` blocks until one arrives.
pub trait KeySource {
    fn next_key(&mut self) -> EngineResult<KeyCode>;
}

/// Reads presses from the terminal. Expects raw mode to be on.
#[derive(Default)]
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> EngineResult<KeyCode> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key.code);
                }
            }
        }
    }
}
