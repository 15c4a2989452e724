use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

pub type PlayerId = i64;
pub type MatchId = i64;
pub type RatingValue = f64;

/// Every player enters the ladder with this rating, and every trajectory replay starts here.
pub const STARTING_RATING: RatingValue = 1200.0;

const MIN_HALF_STARS: u8 = 1;
const MAX_HALF_STARS: u8 = 10;

/// Team quality on a 0.5..=5 star scale in half-star steps.
///
/// Stored as a count of half stars so comparisons and differences are exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TeamStrength(u8);

impl TeamStrength {
    pub const WEAKEST: Self = Self(MIN_HALF_STARS);
    pub const STRONGEST: Self = Self(MAX_HALF_STARS);

    pub fn from_stars(stars: f64) -> Result<Self, ValidationError> {
        if !(0.5..=5.0).contains(&stars) {
            return Err(ValidationError::StrengthOutOfRange(stars));
        }

        let doubled = stars * 2.0;
        if (doubled - doubled.round()).abs() > 1e-9 {
            return Err(ValidationError::StrengthNotHalfStep(stars));
        }

        Ok(Self(doubled.round() as u8))
    }

    pub fn from_half_stars(half_stars: u8) -> Result<Self, ValidationError> {
        if (MIN_HALF_STARS..=MAX_HALF_STARS).contains(&half_stars) {
            Ok(Self(half_stars))
        } else {
            Err(ValidationError::StrengthOutOfRange(f64::from(half_stars) / 2.0))
        }
    }

    pub fn stars(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    pub fn half_stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<f64> for TeamStrength {
    type Error = ValidationError;

    fn try_from(stars: f64) -> Result<Self, Self::Error> {
        Self::from_stars(stars)
    }
}

impl From<TeamStrength> for f64 {
    fn from(strength: TeamStrength) -> Self {
        strength.stars()
    }
}

/// One of the two sides of a recorded match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn label(self) -> char {
        match self {
            Side::A => 'A',
            Side::B => 'B',
        }
    }
}

/// Result of a match from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    pub fn from_scores(own: u32, opponent: u32) -> Self {
        match own.cmp(&opponent) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// Sign applied to a recorded transfer for the player with this outcome.
    pub fn sign(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => -1.0,
            Outcome::Draw => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_accepts_half_steps() {
        for half in 1..=10u8 {
            let stars = f64::from(half) / 2.0;
            let strength = TeamStrength::from_stars(stars).unwrap();
            assert_eq!(strength.half_stars(), half);
            assert_eq!(strength.stars(), stars);
        }
    }

    #[test]
    fn test_strength_rejects_out_of_range() {
        assert_eq!(
            TeamStrength::from_stars(0.0),
            Err(ValidationError::StrengthOutOfRange(0.0))
        );
        assert_eq!(
            TeamStrength::from_stars(5.5),
            Err(ValidationError::StrengthOutOfRange(5.5))
        );
        assert!(TeamStrength::from_stars(f64::NAN).is_err());
        assert!(TeamStrength::from_half_stars(0).is_err());
        assert!(TeamStrength::from_half_stars(11).is_err());
    }

    #[test]
    fn test_strength_rejects_off_grid_values() {
        assert_eq!(
            TeamStrength::from_stars(3.25),
            Err(ValidationError::StrengthNotHalfStep(3.25))
        );
    }

    #[test]
    fn test_strength_serializes_as_stars() {
        let strength = TeamStrength::from_stars(4.5).unwrap();
        assert_eq!(serde_json::to_string(&strength).unwrap(), "4.5");

        let parsed: TeamStrength = serde_json::from_str("2").unwrap();
        assert_eq!(parsed.half_stars(), 4);
        assert!(serde_json::from_str::<TeamStrength>("7").is_err());
    }

    #[test]
    fn test_outcome_from_scores() {
        assert_eq!(Outcome::from_scores(3, 1), Outcome::Win);
        assert_eq!(Outcome::from_scores(0, 2), Outcome::Loss);
        assert_eq!(Outcome::from_scores(2, 2), Outcome::Draw);
        assert_eq!(Outcome::Draw.sign(), 0.0);
    }
}
