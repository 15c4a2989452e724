use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::rating::exchange::{self, Settlement};
use crate::rating::types::{MatchId, Outcome, PlayerId, RatingValue, Side, TeamStrength};

/// Registered player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub rating: RatingValue,
    pub created_at: DateTime<Utc>,
}

/// Stored result of one match, immutable once inserted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: MatchId,
    pub side_a: PlayerId,
    pub side_b: PlayerId,
    pub score_a: u32,
    pub score_b: u32,
    pub strength_a: TeamStrength,
    pub strength_b: TeamStrength,
    /// Ratings captured right before the match was played.
    pub prior_rating_a: RatingValue,
    pub prior_rating_b: RatingValue,
    pub transfer: f64,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn player(&self, side: Side) -> PlayerId {
        match side {
            Side::A => self.side_a,
            Side::B => self.side_b,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::A => self.score_a,
            Side::B => self.score_b,
        }
    }

    pub fn strength(&self, side: Side) -> TeamStrength {
        match side {
            Side::A => self.strength_a,
            Side::B => self.strength_b,
        }
    }

    pub fn prior_rating(&self, side: Side) -> RatingValue {
        match side {
            Side::A => self.prior_rating_a,
            Side::B => self.prior_rating_b,
        }
    }

    pub fn side_of(&self, player_id: PlayerId) -> Option<Side> {
        if self.side_a == player_id {
            Some(Side::A)
        } else if self.side_b == player_id {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.side_of(player_id).is_some()
    }

    /// True when the two sides are exactly `first` and `second`, in either order.
    pub fn is_between(&self, first: PlayerId, second: PlayerId) -> bool {
        (self.side_a == first && self.side_b == second)
            || (self.side_a == second && self.side_b == first)
    }

    pub fn winning_side(&self) -> Option<Side> {
        match Outcome::from_scores(self.score_a, self.score_b) {
            Outcome::Win => Some(Side::A),
            Outcome::Loss => Some(Side::B),
            Outcome::Draw => None,
        }
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winning_side().map(|side| self.player(side))
    }

    pub fn is_draw(&self) -> bool {
        self.score_a == self.score_b
    }

    pub fn outcome_for(&self, player_id: PlayerId) -> Option<Outcome> {
        let side = self.side_of(player_id)?;
        Some(Outcome::from_scores(
            self.score(side),
            self.score(side.opponent()),
        ))
    }

    /// `+transfer` for the winner, `-transfer` for the loser, zero otherwise.
    pub fn signed_transfer_for(&self, player_id: PlayerId) -> f64 {
        self.outcome_for(player_id)
            .map(|outcome| outcome.sign() * self.transfer)
            .unwrap_or(0.0)
    }
}

/// Match about to be inserted; id is assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMatchRecord {
    pub side_a: PlayerId,
    pub side_b: PlayerId,
    pub score_a: u32,
    pub score_b: u32,
    pub strength_a: TeamStrength,
    pub strength_b: TeamStrength,
    pub prior_rating_a: RatingValue,
    pub prior_rating_b: RatingValue,
    pub transfer: f64,
    pub created_at: DateTime<Utc>,
}

impl NewMatchRecord {
    pub fn check_invariants(&self) -> Result<(), ValidationError> {
        if self.side_a == self.side_b {
            return Err(ValidationError::SelfPlay);
        }
        let decided = self.score_a != self.score_b;
        if self.transfer < 0.0 || decided == (self.transfer == 0.0) {
            return Err(ValidationError::UndecidedMatch {
                winner_score: self.score_a.max(self.score_b),
                loser_score: self.score_a.min(self.score_b),
            });
        }
        Ok(())
    }
}

/// Raw match submission as entered by a user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSubmission {
    pub side_a: Option<PlayerId>,
    pub side_b: Option<PlayerId>,
    pub score_a: i64,
    pub score_b: i64,
    pub strength_a: f64,
    pub strength_b: f64,
}

impl MatchSubmission {
    pub fn validate(&self) -> Result<ValidMatch, ValidationError> {
        let side_a = self.side_a.ok_or(ValidationError::MissingPlayer('A'))?;
        let side_b = self.side_b.ok_or(ValidationError::MissingPlayer('B'))?;
        if side_a == side_b {
            return Err(ValidationError::SelfPlay);
        }

        Ok(ValidMatch {
            side_a,
            side_b,
            score_a: parse_score(Side::A, self.score_a)?,
            score_b: parse_score(Side::B, self.score_b)?,
            strength_a: TeamStrength::from_stars(self.strength_a)?,
            strength_b: TeamStrength::from_stars(self.strength_b)?,
        })
    }
}

fn parse_score(side: Side, score: i64) -> Result<u32, ValidationError> {
    u32::try_from(score).map_err(|_| ValidationError::InvalidScore {
        side: side.label(),
        score,
    })
}

/// Fully typed submission that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidMatch {
    pub side_a: PlayerId,
    pub side_b: PlayerId,
    pub score_a: u32,
    pub score_b: u32,
    pub strength_a: TeamStrength,
    pub strength_b: TeamStrength,
}

impl ValidMatch {
    pub fn settle(
        &self,
        rating_a: RatingValue,
        rating_b: RatingValue,
    ) -> Result<Settlement, ValidationError> {
        exchange::settle(
            rating_a,
            rating_b,
            self.strength_a,
            self.strength_b,
            self.score_a,
            self.score_b,
        )
    }

    /// Settles against the players' current ratings, which become the
    /// record's prior snapshots.
    pub fn price(
        &self,
        player_a: &Player,
        player_b: &Player,
        created_at: DateTime<Utc>,
    ) -> Result<PendingMatch, ValidationError> {
        let settlement = self.settle(player_a.rating, player_b.rating)?;
        let (new_rating_a, new_rating_b) = settlement.apply(player_a.rating, player_b.rating);

        Ok(PendingMatch {
            record: self.into_record(player_a.rating, player_b.rating, &settlement, created_at),
            new_rating_a,
            new_rating_b,
        })
    }

    pub fn into_record(
        self,
        prior_rating_a: RatingValue,
        prior_rating_b: RatingValue,
        settlement: &Settlement,
        created_at: DateTime<Utc>,
    ) -> NewMatchRecord {
        NewMatchRecord {
            side_a: self.side_a,
            side_b: self.side_b,
            score_a: self.score_a,
            score_b: self.score_b,
            strength_a: self.strength_a,
            strength_b: self.strength_b,
            prior_rating_a,
            prior_rating_b,
            transfer: settlement.transfer,
            created_at,
        }
    }
}

/// A settled match together with both players' ratings after it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMatch {
    pub record: NewMatchRecord,
    pub new_rating_a: RatingValue,
    pub new_rating_b: RatingValue,
}

/// A stored match and both participants as they stand after it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMatch {
    pub record: MatchRecord,
    pub side_a: Player,
    pub side_b: Player,
}

/// Trims a display name and rejects it when nothing is left.
pub fn normalize_display_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyDisplayName);
    }
    Ok(name.to_string())
}
