use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{MatchRecord, Player};
use crate::rating::exchange;
use crate::rating::stats::{HeadToHead, PlayerStats};
use crate::rating::trajectory::TrajectoryPoint;
use crate::rating::types::{
    MatchId, Outcome, PlayerId, RatingValue, STARTING_RATING, TeamStrength,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub display_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub player: Player,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerListResponse {
    pub items: Vec<LeaderboardEntry>,
    pub total: usize,
}

impl PlayerListResponse {
    /// Players must already be in leaderboard order.
    pub fn ranked(players: Vec<Player>) -> Self {
        let items: Vec<LeaderboardEntry> = players
            .into_iter()
            .enumerate()
            .map(|(i, player)| LeaderboardEntry { rank: i + 1, player })
            .collect();

        Self {
            total: items.len(),
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRef {
    pub id: PlayerId,
    pub display_name: String,
}

/// Lookup of display names used when rendering match lists.
pub struct PlayerNames(HashMap<PlayerId, String>);

impl PlayerNames {
    pub fn new(players: &[Player]) -> Self {
        Self(
            players
                .iter()
                .map(|p| (p.id, p.display_name.clone()))
                .collect(),
        )
    }

    pub fn player_ref(&self, id: PlayerId) -> PlayerRef {
        PlayerRef {
            id,
            display_name: self.0.get(&id).cloned().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub id: MatchId,
    pub side_a: PlayerRef,
    pub side_b: PlayerRef,
    pub score_a: u32,
    pub score_b: u32,
    pub strength_a: TeamStrength,
    pub strength_b: TeamStrength,
    pub transfer: f64,
    pub winner_id: Option<PlayerId>,
    pub created_at: DateTime<Utc>,
}

impl MatchView {
    pub fn new(record: &MatchRecord, names: &PlayerNames) -> Self {
        Self {
            id: record.id,
            side_a: names.player_ref(record.side_a),
            side_b: names.player_ref(record.side_b),
            score_a: record.score_a,
            score_b: record.score_b,
            strength_a: record.strength_a,
            strength_b: record.strength_b,
            transfer: record.transfer,
            winner_id: record.winner(),
            created_at: record.created_at,
        }
    }
}

/// A match seen from one participant's side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMatchView {
    #[serde(flatten)]
    pub view: MatchView,
    pub outcome: Option<Outcome>,
    pub points_change: f64,
}

impl PlayerMatchView {
    pub fn new(player_id: PlayerId, record: &MatchRecord, names: &PlayerNames) -> Self {
        Self {
            view: MatchView::new(record, names),
            outcome: record.outcome_for(player_id),
            points_change: record.signed_transfer_for(player_id),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetailResponse {
    pub player: Player,
    pub stats: PlayerStats,
    pub trajectory: Vec<TrajectoryPoint>,
    pub matches: Vec<PlayerMatchView>,
    pub compare_with: Vec<PlayerRef>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadResponse {
    pub player1: Player,
    pub player2: Player,
    pub stats: HeadToHead,
    /// Matches oriented from player1's side.
    pub matches: Vec<PlayerMatchView>,
}

#[derive(Debug, Deserialize)]
pub struct RecentMatchesParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesResponse {
    pub starting_rating: RatingValue,
    pub base_exchange: f64,
    pub upset_multiplier: f64,
    pub upset_increment_per_100: f64,
    pub underdog_team_multiplier: f64,
    pub underdog_increment_per_star: f64,
    pub goal_margin_increment: f64,
    pub min_team_strength: TeamStrength,
    pub max_team_strength: TeamStrength,
    pub rules: Vec<&'static str>,
}

impl RulesResponse {
    pub fn current() -> Self {
        Self {
            starting_rating: STARTING_RATING,
            base_exchange: exchange::BASE_EXCHANGE,
            upset_multiplier: exchange::UPSET_MULTIPLIER,
            upset_increment_per_100: exchange::UPSET_INCREMENT_PER_100,
            underdog_team_multiplier: exchange::UNDERDOG_TEAM_MULTIPLIER,
            underdog_increment_per_star: exchange::UNDERDOG_INCREMENT_PER_STAR,
            goal_margin_increment: exchange::GOAL_MARGIN_INCREMENT,
            min_team_strength: TeamStrength::WEAKEST,
            max_team_strength: TeamStrength::STRONGEST,
            rules: vec![
                "Every player starts at 1200 points.",
                "The winner takes 20 points from the loser before multipliers.",
                "A lower rated winner earns x1.5, plus 0.1 for each full 100 points of difference.",
                "A winner with the weaker team earns x1.3, plus 0.15 for every star of difference.",
                "Every goal of margin above one adds 0.1 to the multiplier.",
                "A draw moves no points.",
                "Points are rounded to two decimals.",
            ],
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
