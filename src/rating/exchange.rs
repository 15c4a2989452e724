use super::types::{RatingValue, Side, TeamStrength};
use crate::errors::ValidationError;

/// Points exchanged for a plain win before any multiplier.
pub const BASE_EXCHANGE: f64 = 20.0;
/// Multiplier when the lower-rated player wins.
pub const UPSET_MULTIPLIER: f64 = 1.5;
/// Added to the upset multiplier for every full 100 rating points of difference.
pub const UPSET_INCREMENT_PER_100: f64 = 0.1;
/// Multiplier when the weaker team wins.
pub const UNDERDOG_TEAM_MULTIPLIER: f64 = 1.3;
/// Added to the underdog multiplier for each star of team strength difference.
pub const UNDERDOG_INCREMENT_PER_STAR: f64 = 0.15;
/// Added for each goal of margin above one.
pub const GOAL_MARGIN_INCREMENT: f64 = 0.1;

// Exact forms of the multipliers above. The rating and goal factors are in
// tenths, the team factor in fortieths (0.15 per star = 3/40 per half star).
const NEUTRAL_TENTHS: u128 = 10;
const UPSET_TENTHS: u128 = 15;
const NEUTRAL_FORTIETHS: u128 = 40;
const UNDERDOG_FORTIETHS: u128 = 52;
const UNDERDOG_FORTIETHS_PER_HALF_STAR: u128 = 3;
const HUNDREDTHS_PER_BRACKET: u128 = 100 * 100;
// 20 * (r/10) * (s/40) * (g/10) == r*s*g / 200, i.e. r*s*g half-hundredths.

/// Outcome of settling one match: who won and how many points move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub winner: Option<Side>,
    pub transfer: f64,
}

impl Settlement {
    pub fn draw() -> Self {
        Self {
            winner: None,
            transfer: 0.0,
        }
    }

    /// Ratings of side A and side B after applying the transfer to their snapshots.
    pub fn apply(&self, prior_a: RatingValue, prior_b: RatingValue) -> (RatingValue, RatingValue) {
        match self.winner {
            Some(Side::A) => (prior_a + self.transfer, prior_b - self.transfer),
            Some(Side::B) => (prior_a - self.transfer, prior_b + self.transfer),
            None => (prior_a, prior_b),
        }
    }
}

/// Points the winner takes from the loser, rounded to hundredths.
///
/// Only defined for decided matches: calling this with
/// `winner_score <= loser_score` is rejected rather than producing a
/// meaningless non-zero amount. Ties are settled by [`settle`].
pub fn compute_transfer(
    winner_rating: RatingValue,
    loser_rating: RatingValue,
    winner_strength: TeamStrength,
    loser_strength: TeamStrength,
    winner_score: u32,
    loser_score: u32,
) -> Result<f64, ValidationError> {
    if winner_score <= loser_score {
        return Err(ValidationError::UndecidedMatch {
            winner_score,
            loser_score,
        });
    }
    ensure_finite(winner_rating)?;
    ensure_finite(loser_rating)?;

    let rating = rating_tenths(winner_rating, loser_rating);
    let strength = strength_fortieths(winner_strength, loser_strength);
    let goals = goal_tenths(winner_score - loser_score);

    let half_hundredths = rating.saturating_mul(strength).saturating_mul(goals);
    Ok(round_half_hundredths(half_hundredths))
}

/// Settles a match from side A's and side B's point of view.
///
/// A tie never reaches the calculator and always yields a zero transfer.
pub fn settle(
    rating_a: RatingValue,
    rating_b: RatingValue,
    strength_a: TeamStrength,
    strength_b: TeamStrength,
    score_a: u32,
    score_b: u32,
) -> Result<Settlement, ValidationError> {
    if score_a == score_b {
        return Ok(Settlement::draw());
    }

    let (winner, transfer) = if score_a > score_b {
        let transfer =
            compute_transfer(rating_a, rating_b, strength_a, strength_b, score_a, score_b)?;
        (Side::A, transfer)
    } else {
        let transfer =
            compute_transfer(rating_b, rating_a, strength_b, strength_a, score_b, score_a)?;
        (Side::B, transfer)
    };

    Ok(Settlement {
        winner: Some(winner),
        transfer,
    })
}

pub fn rating_multiplier(winner_rating: RatingValue, loser_rating: RatingValue) -> f64 {
    rating_tenths(winner_rating, loser_rating) as f64 / 10.0
}

pub fn strength_multiplier(winner_strength: TeamStrength, loser_strength: TeamStrength) -> f64 {
    strength_fortieths(winner_strength, loser_strength) as f64 / 40.0
}

pub fn goal_multiplier(goal_difference: u32) -> f64 {
    goal_tenths(goal_difference) as f64 / 10.0
}

fn ensure_finite(rating: RatingValue) -> Result<(), ValidationError> {
    if rating.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFiniteRating(rating))
    }
}

// Ratings only ever move by whole hundredths, so the gap is compared in
// integer hundredths and sub-cent float noise cannot cross a bracket.
fn rating_tenths(winner_rating: RatingValue, loser_rating: RatingValue) -> u128 {
    let gap_hundredths = ((loser_rating - winner_rating) * 100.0).round() as i128;
    if gap_hundredths > 0 {
        let brackets = gap_hundredths.unsigned_abs() / HUNDREDTHS_PER_BRACKET;
        UPSET_TENTHS.saturating_add(brackets)
    } else {
        NEUTRAL_TENTHS
    }
}

fn strength_fortieths(winner_strength: TeamStrength, loser_strength: TeamStrength) -> u128 {
    if winner_strength < loser_strength {
        let gap = u128::from(loser_strength.half_stars() - winner_strength.half_stars());
        UNDERDOG_FORTIETHS + gap * UNDERDOG_FORTIETHS_PER_HALF_STAR
    } else {
        NEUTRAL_FORTIETHS
    }
}

fn goal_tenths(goal_difference: u32) -> u128 {
    if goal_difference > 1 {
        NEUTRAL_TENTHS + u128::from(goal_difference - 1)
    } else {
        NEUTRAL_TENTHS
    }
}

/// Rounds half away from zero; the count is never negative.
fn round_half_hundredths(half_hundredths: u128) -> f64 {
    let hundredths = half_hundredths / 2 + half_hundredths % 2;
    hundredths as f64 / 100.0
}
