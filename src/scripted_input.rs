use std::{collections::VecDeque, fs, path::Path};

use log::warn;

use crate::{
    error::{EngineError, EngineResult},
    input::{KeyCode, KeySource},
};

/// Replays a fixed list of key presses, for headless runs and tests.
///
/// Script files hold one entry per line. A line naming a key (`escape`,
/// `enter`, `up`, `down`, `left`, `right`, `space`) is that key; any other
/// line is typed character by character. Blank lines and `#` comments are
/// skipped.
pub struct ScriptedInput {
    script_commands: VecDeque<KeyCode>,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = KeyCode>>(keys: I) -> Self {
        Self {
            script_commands: keys.into_iter().collect(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|err| EngineError::config(path, err.to_string()))?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut script_commands = VecDeque::new();
        for line in text.lines() {
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }
            if let Some(key) = named_key(trimmed_line) {
                script_commands.push_back(key);
                continue;
            }
            for c in trimmed_line.chars() {
                if c.is_control() {
                    warn!("skipping control character {c:?} in key script");
                    continue;
                }
                script_commands.push_back(KeyCode::Char(c));
            }
        }
        Self { script_commands }
    }

    pub fn remaining(&self) -> usize {
        self.script_commands.len()
    }
}

impl KeySource for ScriptedInput {
    fn next_key(&mut self) -> EngineResult<KeyCode> {
        self.script_commands
            .pop_front()
            .ok_or(EngineError::InputExhausted)
    }
}

fn named_key(word: &str) -> Option<KeyCode> {
    match word.to_ascii_lowercase().as_str() {
        "escape" | "esc" => Some(KeyCode::Esc),
        "enter" => Some(KeyCode::Enter),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_keys_and_typed_lines() {
        let mut script = ScriptedInput::parse("# title\nspace\n\nll>\nEscape\n");
        assert_eq!(script.remaining(), 5);
        assert_eq!(script.next_key().unwrap(), KeyCode::Char(' '));
        assert_eq!(script.next_key().unwrap(), KeyCode::Char('l'));
        assert_eq!(script.next_key().unwrap(), KeyCode::Char('l'));
        assert_eq!(script.next_key().unwrap(), KeyCode::Char('>'));
        assert_eq!(script.next_key().unwrap(), KeyCode::Esc);
    }

    #[test]
    fn running_dry_is_an_error() {
        let mut script = ScriptedInput::new([KeyCode::Enter]);
        assert_eq!(script.next_key().unwrap(), KeyCode::Enter);
        assert!(matches!(script.next_key(), Err(EngineError::InputExhausted)));
    }
}
