use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CuratorError;

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum Race {
    White,
    Black,
    Hispanic,
    #[default]
    Other,
}

impl Race {
    /// All categories in declaration order. Grouping iterates over
    /// this order.
    pub const ALL: [Race; 4] =
        [Race::White, Race::Black, Race::Hispanic, Race::Other];
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
pub enum Armed {
    Gun,
    Knife,
    Unarmed,
    #[default]
    Other,
}

impl Armed {
    /// All categories in declaration order. Grouping iterates over
    /// this order.
    pub const ALL: [Armed; 4] =
        [Armed::Gun, Armed::Knife, Armed::Unarmed, Armed::Other];
}

/// Maps a raw race code onto a [Race].
///
/// Single-letter codes (`W`, `B`, `H`) and the full names are matched
/// case-insensitively; everything else is [Race::Other].
pub fn classify_race(raw: &str) -> Race {
    match raw.trim().to_ascii_lowercase().as_str() {
        "w" | "white" => Race::White,
        "b" | "black" => Race::Black,
        "h" | "hispanic" => Race::Hispanic,
        _ => Race::Other,
    }
}

/// Maps a raw weapon description onto an [Armed] status.
pub fn classify_armed(raw: &str) -> Armed {
    match raw.trim().to_ascii_lowercase().as_str() {
        "gun" => Armed::Gun,
        "knife" => Armed::Knife,
        "unarmed" => Armed::Unarmed,
        _ => Armed::Other,
    }
}

impl Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "White"),
            Self::Black => write!(f, "Black"),
            Self::Hispanic => write!(f, "Hispanic"),
            Self::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for Race {
    type Err = CuratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "White" => Ok(Self::White),
            "Black" => Ok(Self::Black),
            "Hispanic" => Ok(Self::Hispanic),
            "Other" => Ok(Self::Other),
            _ => Err(CuratorError::other(format!("invalid race '{s}'"))),
        }
    }
}

impl Display for Armed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gun => write!(f, "Gun"),
            Self::Knife => write!(f, "Knife"),
            Self::Unarmed => write!(f, "Unarmed"),
            Self::Other => write!(f, "Other"),
        }
    }
}

impl FromStr for Armed {
    type Err = CuratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Gun" => Ok(Self::Gun),
            "Knife" => Ok(Self::Knife),
            "Unarmed" => Ok(Self::Unarmed),
            "Other" => Ok(Self::Other),
            _ => Err(CuratorError::other(format!("invalid armed '{s}'"))),
        }
    }
}
