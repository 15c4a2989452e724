use thiserror::Error;

use crate::rating::types::PlayerId;

pub type LadderResult<T> = std::result::Result<T, LadderError>;

/// Input rejected before anything is computed or persisted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("A player cannot play against themselves")]
    SelfPlay,

    #[error("No player selected for side {0}")]
    MissingPlayer(char),

    #[error("Score for side {side} must be a non-negative whole number, got {score}")]
    InvalidScore { side: char, score: i64 },

    #[error("Team strength must be between 0.5 and 5 stars, got {0}")]
    StrengthOutOfRange(f64),

    #[error("Team strength must be a multiple of half a star, got {0}")]
    StrengthNotHalfStep(f64),

    #[error("Display name must not be empty")]
    EmptyDisplayName,

    /// The calculator only settles decided matches; ties are handled by the caller.
    #[error("Winner score {winner_score} must be strictly greater than loser score {loser_score}")]
    UndecidedMatch { winner_score: u32, loser_score: u32 },

    #[error("Rating must be a finite number, got {0}")]
    NonFiniteRating(f64),
}

/// Errors surfaced by ladder services.
#[derive(Debug, Error)]
pub enum LadderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("Storage failure: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl LadderError {
    pub fn is_validation(&self) -> bool {
        matches!(self, LadderError::Validation(_))
    }
}
