use anyhow::Result;
use colored::Colorize;
use log::{info, warn};

use crate::database::{LadderRepository, MatchFilter};
use crate::rating::trajectory::rating_trajectory;
use crate::rating::types::{PlayerId, RatingValue};

/// Stored and replayed ratings may differ by float noise only.
const DRIFT_TOLERANCE: f64 = 1e-6;

/// A player whose stored rating disagrees with the replay of their matches.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingDrift {
    pub player_id: PlayerId,
    pub display_name: String,
    pub stored: RatingValue,
    pub replayed: RatingValue,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecalculationReport {
    pub players_checked: usize,
    pub matches_replayed: usize,
    pub drifts: Vec<RatingDrift>,
    pub repaired: bool,
}

impl RecalculationReport {
    pub fn is_consistent(&self) -> bool {
        self.drifts.is_empty()
    }

    /// Human readable summary for the terminal.
    pub fn render(&self) -> String {
        let mut lines = vec![format!(
            "Checked {} players against {} matches",
            self.players_checked, self.matches_replayed
        )];

        if self.is_consistent() {
            lines.push("All stored ratings match their history".green().to_string());
            return lines.join("\n");
        }

        for drift in &self.drifts {
            lines.push(format!(
                "  {} (#{}): stored {:.2}, replayed {:.2}",
                drift.display_name.bold(),
                drift.player_id,
                drift.stored,
                drift.replayed
            ));
        }

        let summary = format!("{} player(s) out of sync", self.drifts.len());
        if self.repaired {
            lines.push(format!("{} {}", summary.yellow(), "(repaired)".green()));
        } else {
            lines.push(format!(
                "{}, run with --repair to fix",
                summary.red()
            ));
        }
        lines.join("\n")
    }
}

/// Replays the match log and compares it with the stored ratings.
pub struct RecalculationService<R> {
    repository: R,
}

impl<R: LadderRepository> RecalculationService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn run(&self, repair: bool) -> Result<RecalculationReport> {
        info!("=== Starting Rating Recalculation ===");

        let players = self.repository.list_players()?;
        let history = self.repository.list_matches(&MatchFilter::All)?;
        info!("  → Loaded {} players and {} matches", players.len(), history.len());

        let drifts: Vec<RatingDrift> = players
            .iter()
            .filter_map(|player| {
                let replayed = rating_trajectory(player.id, &history).final_rating();
                ((player.rating - replayed).abs() > DRIFT_TOLERANCE).then(|| RatingDrift {
                    player_id: player.id,
                    display_name: player.display_name.clone(),
                    stored: player.rating,
                    replayed,
                })
            })
            .collect();

        for drift in &drifts {
            warn!(
                "Player {} drifted: stored {}, replayed {}",
                drift.player_id, drift.stored, drift.replayed
            );
        }

        let repaired = repair && !drifts.is_empty();
        if repaired {
            let updates: Vec<(PlayerId, RatingValue)> =
                drifts.iter().map(|d| (d.player_id, d.replayed)).collect();
            self.repository.apply_ratings(&updates)?;
            info!("  → Repaired {} ratings", updates.len());
        }

        info!("=== Recalculation Complete ===");
        Ok(RecalculationReport {
            players_checked: players.len(),
            matches_replayed: history.len(),
            drifts,
            repaired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{SqliteRepository, create_memory_pool};
    use crate::domain::MatchSubmission;
    use crate::services::SubmissionService;

    fn seeded() -> (SqliteRepository, PlayerId, PlayerId) {
        let repository = SqliteRepository::open(create_memory_pool().unwrap()).unwrap();
        let submissions = SubmissionService::new(repository.clone());
        let a = submissions.register_player("Ana").unwrap().id;
        let b = submissions.register_player("Bruno").unwrap().id;
        submissions
            .submit_match(&MatchSubmission {
                side_a: Some(a),
                side_b: Some(b),
                score_a: 3,
                score_b: 0,
                strength_a: 3.0,
                strength_b: 3.5,
            })
            .unwrap();
        (repository, a, b)
    }

    #[test]
    fn test_consistent_ladder_reports_no_drift() {
        let (repository, _, _) = seeded();
        let report = RecalculationService::new(repository).run(false).unwrap();

        assert_eq!(report.players_checked, 2);
        assert_eq!(report.matches_replayed, 1);
        assert!(report.is_consistent());
        assert!(!report.repaired);
    }

    #[test]
    fn test_drift_is_reported_without_repair() {
        let (repository, a, _) = seeded();
        repository.apply_rating(a, 1500.0).unwrap();

        let report = RecalculationService::new(repository.clone()).run(false).unwrap();

        assert_eq!(report.drifts.len(), 1);
        assert_eq!(report.drifts[0].player_id, a);
        // 20 * 1.375 * 1.2
        assert_eq!(report.drifts[0].replayed, 1233.0);
        assert_eq!(repository.get_player(a).unwrap().unwrap().rating, 1500.0);
        assert!(report.render().contains("--repair"));
    }

    #[test]
    fn test_repair_restores_replayed_rating() {
        let (repository, _, b) = seeded();
        let expected = repository.get_player(b).unwrap().unwrap().rating;
        repository.apply_rating(b, 0.0).unwrap();

        let report = RecalculationService::new(repository.clone()).run(true).unwrap();

        assert!(report.repaired);
        assert_eq!(repository.get_player(b).unwrap().unwrap().rating, expected);
        assert!(RecalculationService::new(repository.clone())
            .run(false)
            .unwrap()
            .is_consistent());
    }
}
