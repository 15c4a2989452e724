use chrono::Utc;
use log::{info, warn};

use crate::database::LadderRepository;
use crate::domain::{MatchSubmission, Player, RecordedMatch, normalize_display_name};
use crate::errors::LadderResult;

/// Registers players and records matches.
pub struct SubmissionService<R> {
    repository: R,
}

impl<R: LadderRepository> SubmissionService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn register_player(&self, display_name: &str) -> LadderResult<Player> {
        let name = normalize_display_name(display_name)?;
        let player = self.repository.insert_player(&name, Utc::now())?;
        info!("Registered player {} ({})", player.display_name, player.id);
        Ok(player)
    }

    /// Validates a submission, settles it against the ratings read inside the
    /// write transaction and stores the record together with both new ratings.
    pub fn submit_match(&self, submission: &MatchSubmission) -> LadderResult<RecordedMatch> {
        let valid = submission.validate().inspect_err(|e| {
            warn!("Rejected match submission: {}", e);
        })?;

        let recorded = self
            .repository
            .record_match(valid.side_a, valid.side_b, &|player_a, player_b| {
                Ok(valid.price(player_a, player_b, Utc::now())?)
            })?;

        info!(
            "Recorded match {}: {} {}-{} {} ({:.2} points)",
            recorded.record.id,
            recorded.side_a.display_name,
            recorded.record.score_a,
            recorded.record.score_b,
            recorded.side_b.display_name,
            recorded.record.transfer
        );
        Ok(recorded)
    }
}
