//! Single-line text entry on the status row.

use crate::input::keys::{ctrl, Key, BACKSPACE, DEL, ENTER, ESCAPE};
use crate::render::style::Colour;

/// What the prompt is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Search { reverse: bool },
    Colour,
    Seek,
    Bisect,
}

/// Parsed result of a committed prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Search { pattern: String, reverse: bool },
    Colour { colour: Option<Colour>, pattern: String },
    Seek { percent: u64 },
    Bisect { prefix: Vec<u8> },
    /// Committed with nothing to do.
    Empty,
}

impl PromptKind {
    /// Name used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            PromptKind::Search { reverse: false } => "forward search",
            PromptKind::Search { reverse: true } => "backward search",
            PromptKind::Colour => "colour pattern",
            PromptKind::Seek => "percent seek",
            PromptKind::Bisect => "prefix bisect",
        }
    }

    /// Label drawn before the input.
    pub fn prompt(self) -> &'static str {
        match self {
            PromptKind::Search { reverse: false } => "/",
            PromptKind::Search { reverse: true } => "?",
            PromptKind::Colour => "colour: ",
            PromptKind::Seek => "%: ",
            PromptKind::Bisect => "prefix: ",
        }
    }

    /// Interpret the committed input. Errors are messages for the status line.
    pub fn on_enter(self, input: &str) -> Result<Submission, String> {
        match self {
            PromptKind::Search { reverse } => {
                if input.is_empty() {
                    return Ok(Submission::Empty);
                }
                Ok(Submission::Search {
                    pattern: input.to_string(),
                    reverse,
                })
            }
            PromptKind::Colour => {
                let input = input.trim_start();
                if input.is_empty() {
                    return Ok(Submission::Empty);
                }
                let (colour, pattern) = match input.split_once(' ') {
                    Some((word, rest)) if !rest.is_empty() => match Colour::parse(word) {
                        Some(colour) => (Some(colour), rest),
                        None => (None, input),
                    },
                    _ => (None, input),
                };
                Ok(Submission::Colour {
                    colour,
                    pattern: pattern.to_string(),
                })
            }
            PromptKind::Seek => {
                let input = input.trim();
                if input.is_empty() {
                    return Ok(Submission::Empty);
                }
                match input.parse::<u64>() {
                    Ok(percent) if percent <= 100 => Ok(Submission::Seek { percent }),
                    _ => Err(format!("Not a percentage: {}", input)),
                }
            }
            PromptKind::Bisect => {
                if input.is_empty() {
                    return Ok(Submission::Empty);
                }
                Ok(Submission::Bisect {
                    prefix: input.as_bytes().to_vec(),
                })
            }
        }
    }
}

/// Outcome of feeding one key to a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// Input changed (or the key was ignored); keep the prompt open.
    Edited,
    Cancelled,
    Committed(String),
}

/// An open prompt and its input buffer.
#[derive(Debug, Clone)]
pub struct Prompt {
    kind: PromptKind,
    input: String,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            input: String::new(),
        }
    }

    pub fn kind(&self) -> PromptKind {
        self.kind
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn handle_key(&mut self, key: Key) -> PromptEvent {
        let Key::Char(byte) = key else {
            return PromptEvent::Edited;
        };
        match byte {
            ENTER | b'\n' => PromptEvent::Committed(std::mem::take(&mut self.input)),
            ESCAPE => PromptEvent::Cancelled,
            b if b == ctrl(b'c') => PromptEvent::Cancelled,
            b if b == ctrl(b'u') => {
                self.input.clear();
                PromptEvent::Edited
            }
            BACKSPACE | DEL => {
                self.input.pop();
                PromptEvent::Edited
            }
            0x20..=0x7e => {
                self.input.push(byte as char);
                PromptEvent::Edited
            }
            _ => PromptEvent::Edited,
        }
    }
}
