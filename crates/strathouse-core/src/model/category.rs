use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy component category
///
/// The taxonomy is closed. Each category doubles as the directory a house
/// keeps its parts in and as the second-to-last segment of a part name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Asset allocation (fund distribution across systems)
    Af,
    /// Trading condition
    Cn,
    /// Market environment
    Ev,
    /// Money management
    Mm,
    /// Profit goal
    Pg,
    /// Security selector
    Se,
    /// Signal indicator
    Sg,
    /// Slippage model
    Sp,
    /// Stop loss
    St,
    /// Portfolio
    Prtflo,
    /// Trading system
    Sys,
}

impl Category {
    /// Every category, in scan order
    pub const ALL: [Category; 11] = [
        Category::Af,
        Category::Cn,
        Category::Ev,
        Category::Mm,
        Category::Pg,
        Category::Se,
        Category::Sg,
        Category::Sp,
        Category::St,
        Category::Prtflo,
        Category::Sys,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Af => "af",
            Category::Cn => "cn",
            Category::Ev => "ev",
            Category::Mm => "mm",
            Category::Pg => "pg",
            Category::Se => "se",
            Category::Sg => "sg",
            Category::Sp => "sp",
            Category::St => "st",
            Category::Prtflo => "prtflo",
            Category::Sys => "sys",
        }
    }

    /// Whether the category lives under the house's `part/` directory
    ///
    /// `prtflo` and `sys` sit directly under the house root.
    pub fn has_part_prefix(&self) -> bool {
        !matches!(self, Category::Prtflo | Category::Sys)
    }

    /// Directory of this category relative to the house root
    pub fn dir(&self) -> &'static str {
        match self {
            Category::Af => "part/af",
            Category::Cn => "part/cn",
            Category::Ev => "part/ev",
            Category::Mm => "part/mm",
            Category::Pg => "part/pg",
            Category::Se => "part/se",
            Category::Sg => "part/sg",
            Category::Sp => "part/sp",
            Category::St => "part/st",
            Category::Prtflo => "prtflo",
            Category::Sys => "sys",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown part category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_prefix_asymmetry() {
        let unprefixed: Vec<_> = Category::ALL
            .iter()
            .filter(|c| !c.has_part_prefix())
            .collect();
        assert_eq!(unprefixed, vec![&Category::Prtflo, &Category::Sys]);
        assert_eq!(Category::Sg.dir(), "part/sg");
        assert_eq!(Category::Sys.dir(), "sys");
    }

    #[test]
    fn test_unknown_category() {
        assert!("xx".parse::<Category>().is_err());
        assert!("SG".parse::<Category>().is_err());
        assert!("part".parse::<Category>().is_err());
    }
}
