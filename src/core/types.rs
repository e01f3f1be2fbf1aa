//! Common types used across tierwatch modules.

use crate::core::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Service tier a request is classified into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlaTier {
    /// Fastest tier
    Gold,
    /// Middle tier
    Silver,
    /// Everything slower than silver
    Bronze,
}

impl SlaTier {
    /// All tiers, fastest first.
    pub const ALL: [SlaTier; 3] = [SlaTier::Gold, SlaTier::Silver, SlaTier::Bronze];

    /// Lowercase label used in exports and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            SlaTier::Gold => "gold",
            SlaTier::Silver => "silver",
            SlaTier::Bronze => "bronze",
        }
    }
}

impl fmt::Display for SlaTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlaTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gold" => Ok(SlaTier::Gold),
            "silver" => Ok(SlaTier::Silver),
            "bronze" => Ok(SlaTier::Bronze),
            _ => Err(Error::UnknownTier(s.to_string())),
        }
    }
}

/// One value per tier.
///
/// The tier set is closed, so this is a plain struct rather than a map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TierMap<T> {
    pub gold: T,
    pub silver: T,
    pub bronze: T,
}

impl<T> TierMap<T> {
    /// Build a map by evaluating `f` for every tier.
    pub fn from_fn(mut f: impl FnMut(SlaTier) -> T) -> Self {
        Self {
            gold: f(SlaTier::Gold),
            silver: f(SlaTier::Silver),
            bronze: f(SlaTier::Bronze),
        }
    }

    /// Get the value for a tier.
    pub fn get(&self, tier: SlaTier) -> &T {
        match tier {
            SlaTier::Gold => &self.gold,
            SlaTier::Silver => &self.silver,
            SlaTier::Bronze => &self.bronze,
        }
    }

    /// Get a mutable reference for a tier.
    pub fn get_mut(&mut self, tier: SlaTier) -> &mut T {
        match tier {
            SlaTier::Gold => &mut self.gold,
            SlaTier::Silver => &mut self.silver,
            SlaTier::Bronze => &mut self.bronze,
        }
    }

    /// Iterate tiers fastest first.
    pub fn iter(&self) -> impl Iterator<Item = (SlaTier, &T)> {
        [
            (SlaTier::Gold, &self.gold),
            (SlaTier::Silver, &self.silver),
            (SlaTier::Bronze, &self.bronze),
        ]
        .into_iter()
    }

    /// Transform each value.
    pub fn map<U>(&self, mut f: impl FnMut(SlaTier, &T) -> U) -> TierMap<U> {
        TierMap {
            gold: f(SlaTier::Gold, &self.gold),
            silver: f(SlaTier::Silver, &self.silver),
            bronze: f(SlaTier::Bronze, &self.bronze),
        }
    }
}

/// Serde helper encoding a `Duration` as fractional seconds.
pub mod duration_secs {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(de::Error::custom)
    }
}
