//! Agent Labels
//!
//! Life phases and temperament labels shared by the engine and persisted records.
//!
//! # Example
//!
//! ```
//! use life_events::{Phase, Temperament};
//!
//! assert_eq!(Phase::from_age(2500, 500, 2500, 7000), Phase::Mature);
//! assert_eq!("wary".parse::<Temperament>().unwrap(), Temperament::Wary);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse life stage, ordered by age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Infant,
    Juvenile,
    Mature,
    Elder,
}

impl Phase {
    /// Phase for an age given the juvenile, mature and elder thresholds.
    ///
    /// Infancy always starts at tick 0.
    pub fn from_age(age_ticks: u64, juvenile: u64, mature: u64, elder: u64) -> Self {
        if age_ticks >= elder {
            Phase::Elder
        } else if age_ticks >= mature {
            Phase::Mature
        } else if age_ticks >= juvenile {
            Phase::Juvenile
        } else {
            Phase::Infant
        }
    }

    /// Capitalised display label.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Infant => "Infant",
            Phase::Juvenile => "Juvenile",
            Phase::Mature => "Mature",
            Phase::Elder => "Elder",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Infant => write!(f, "infant"),
            Phase::Juvenile => write!(f, "juvenile"),
            Phase::Mature => write!(f, "mature"),
            Phase::Elder => write!(f, "elder"),
        }
    }
}

/// Temperament labels. An agent carries two; the first is its primary voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Temperament {
    Curious,
    Cautious,
    Restless,
    Watchful,
    Quiet,
    Playful,
    Solitary,
    Attentive,
    Social,
    Bold,
    Gentle,
    Wary,
}

impl Temperament {
    pub const ALL: [Temperament; 12] = [
        Temperament::Curious,
        Temperament::Cautious,
        Temperament::Restless,
        Temperament::Watchful,
        Temperament::Quiet,
        Temperament::Playful,
        Temperament::Solitary,
        Temperament::Attentive,
        Temperament::Social,
        Temperament::Bold,
        Temperament::Gentle,
        Temperament::Wary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Temperament::Curious => "curious",
            Temperament::Cautious => "cautious",
            Temperament::Restless => "restless",
            Temperament::Watchful => "watchful",
            Temperament::Quiet => "quiet",
            Temperament::Playful => "playful",
            Temperament::Solitary => "solitary",
            Temperament::Attentive => "attentive",
            Temperament::Social => "social",
            Temperament::Bold => "bold",
            Temperament::Gentle => "gentle",
            Temperament::Wary => "wary",
        }
    }
}

impl fmt::Display for Temperament {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Temperament {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Temperament::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ParseLabelError::InvalidTemperament(s.to_string()))
    }
}

/// Error parsing a temperament label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseLabelError {
    InvalidTemperament(String),
}

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseLabelError::InvalidTemperament(s) => write!(f, "invalid temperament: '{}'", s),
        }
    }
}

impl std::error::Error for ParseLabelError {}
