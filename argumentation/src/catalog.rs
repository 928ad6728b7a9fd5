use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Criterion on which items are evaluated.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    Power,
    Cost,
    Consumption,
    Durability,
    Environment,
    Noise,
}

/// Ordinal value given to an item on a criterion.
#[derive(
    Clone, Copy, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rating {
    #[display(fmt = "VERY_BAD")]
    VeryBad,
    #[display(fmt = "BAD")]
    Bad,
    #[display(fmt = "GOOD")]
    Good,
    #[display(fmt = "VERY_GOOD")]
    VeryGood,
}

impl Criterion {
    pub const ALL: [Criterion; 6] = [
        Criterion::Power,
        Criterion::Cost,
        Criterion::Consumption,
        Criterion::Durability,
        Criterion::Environment,
        Criterion::Noise,
    ];
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::VeryBad, Rating::Bad, Rating::Good, Rating::VeryGood];

    /// Numeric ordinal, 0 for the worst rating and 3 for the best.
    pub fn value(self) -> u32 {
        match self {
            Rating::VeryBad => 0,
            Rating::Bad => 1,
            Rating::Good => 2,
            Rating::VeryGood => 3,
        }
    }

    pub fn from_value(value: u32) -> Option<Rating> {
        Rating::ALL.iter().copied().find(|rating| rating.value() == value)
    }

    pub fn is_positive(self) -> bool {
        self >= Rating::Good
    }
}

impl FromStr for Criterion {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Criterion::ALL
            .iter()
            .copied()
            .find(|criterion| criterion.to_string() == name)
            .ok_or_else(|| Error::UnknownCriterion(name.to_string()))
    }
}

impl FromStr for Rating {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Rating::ALL
            .iter()
            .copied()
            .find(|rating| rating.to_string() == name)
            .ok_or_else(|| Error::UnknownRating(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Power", Criterion::Power)]
    #[test_case("Consumption", Criterion::Consumption)]
    #[test_case("Noise", Criterion::Noise)]
    fn test_criterion_labels(label: &str, criterion: Criterion) {
        assert_eq!(label.parse::<Criterion>().unwrap(), criterion);
        assert_eq!(criterion.to_string(), label);
    }

    #[test]
    fn test_unknown_labels() {
        assert!(matches!(
            "power".parse::<Criterion>(),
            Err(Error::UnknownCriterion(name)) if name == "power"
        ));
        assert!(matches!(
            "AVERAGE".parse::<Rating>(),
            Err(Error::UnknownRating(name)) if name == "AVERAGE"
        ));
    }

    #[test]
    fn test_rating_order_follows_value() {
        for pair in Rating::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert_eq!(pair[0].value() + 1, pair[1].value());
        }
        assert_eq!("VERY_GOOD".parse::<Rating>().unwrap(), Rating::VeryGood);
        assert_eq!(Rating::from_value(1), Some(Rating::Bad));
        assert_eq!(Rating::from_value(4), None);
    }
}
