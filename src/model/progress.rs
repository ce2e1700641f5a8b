use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-item progress, persisted as 0, 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressState {
    #[default]
    Unknown,
    InProgress,
    Complete,
}

impl ProgressState {
    /// Size of the state space; advancing wraps modulo this.
    pub const COUNT: u8 = 3;

    pub const ALL: [ProgressState; 3] = [
        ProgressState::Unknown,
        ProgressState::InProgress,
        ProgressState::Complete,
    ];

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(ProgressState::Unknown),
            1 => Some(ProgressState::InProgress),
            2 => Some(ProgressState::Complete),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        match self {
            ProgressState::Unknown => 0,
            ProgressState::InProgress => 1,
            ProgressState::Complete => 2,
        }
    }

    /// The next state in the cycle: (state + 1) mod 3
    pub fn next(self) -> Self {
        match Self::from_value((self.value() + 1) % Self::COUNT) {
            Some(s) => s,
            None => ProgressState::Unknown,
        }
    }

    pub fn index(self) -> usize {
        self.value() as usize
    }

    /// Generic name, used when a category does not name its states
    pub fn as_str(self) -> &'static str {
        match self {
            ProgressState::Unknown => "unknown",
            ProgressState::InProgress => "in-progress",
            ProgressState::Complete => "complete",
        }
    }

    /// Parse a state from user input: a number or a generic state name.
    /// Category-specific names are handled by `Category::parse_state`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "unknown" | "none" => Some(ProgressState::Unknown),
            "1" | "in-progress" | "inprogress" | "progress" => Some(ProgressState::InProgress),
            "2" | "complete" | "done" => Some(ProgressState::Complete),
            _ => None,
        }
    }

    pub fn indicator(self) -> Indicator {
        match self {
            ProgressState::Unknown => Indicator::Hidden,
            ProgressState::InProgress => Indicator::Amber,
            ProgressState::Complete => Indicator::Green,
        }
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card styling derived from a state. Pure presentation, no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Untouched: no check mark, neutral border
    Hidden,
    /// In progress: amber/yellow
    Amber,
    /// Complete: green
    Green,
}

impl Indicator {
    /// Check-mark glyph shown on a card, if any
    pub fn glyph(self) -> Option<&'static str> {
        match self {
            Indicator::Hidden => None,
            Indicator::Amber => Some("\u{25CB}"),
            Indicator::Green => Some("\u{2713}"),
        }
    }
}
