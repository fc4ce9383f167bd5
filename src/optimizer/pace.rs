use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::OptimizerError;

/// How densely days are packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pace {
    #[serde(rename = "Fast-Paced")]
    FastPaced,
    Balanced,
    Relaxing,
}

impl Pace {
    pub fn locations_per_day(&self) -> usize {
        match self {
            Pace::FastPaced => 4,
            Pace::Balanced => 3,
            Pace::Relaxing => 2,
        }
    }

    pub fn distance_per_day_km(&self) -> f64 {
        match self {
            Pace::FastPaced => 500.0,
            Pace::Balanced => 300.0,
            Pace::Relaxing => 150.0,
        }
    }

    /// Markup applied to the itemised budget; busier trips cost more.
    pub fn budget_multiplier(&self) -> f64 {
        match self {
            Pace::FastPaced => 1.2,
            Pace::Balanced => 1.1,
            Pace::Relaxing => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Pace::FastPaced => "Fast-Paced",
            Pace::Balanced => "Balanced",
            Pace::Relaxing => "Relaxing",
        }
    }
}

impl FromStr for Pace {
    type Err = OptimizerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Fast-Paced" => Ok(Pace::FastPaced),
            "Balanced" => Ok(Pace::Balanced),
            "Relaxing" => Ok(Pace::Relaxing),
            other => Err(OptimizerError::UnknownPace(other.to_string())),
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
