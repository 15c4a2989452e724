use serde::Serialize;

use super::types::{Outcome, PlayerId, Side};
use crate::domain::MatchRecord;

// Every reduction below only looks at matches the player took part in, and
// divides by `count.max(1)` so an empty history averages to zero.

fn involving<'a>(
    player_id: PlayerId,
    matches: impl IntoIterator<Item = &'a MatchRecord>,
) -> impl Iterator<Item = (Side, &'a MatchRecord)> {
    matches
        .into_iter()
        .filter_map(move |m| m.side_of(player_id).map(|side| (side, m)))
}

fn count_outcome(player_id: PlayerId, matches: &[MatchRecord], outcome: Outcome) -> u32 {
    matches
        .iter()
        .filter(|m| m.outcome_for(player_id) == Some(outcome))
        .count() as u32
}

fn guarded_mean(total: f64, count: u32) -> f64 {
    total / f64::from(count.max(1))
}

pub fn total_matches(player_id: PlayerId, matches: &[MatchRecord]) -> u32 {
    involving(player_id, matches).count() as u32
}

pub fn win_count(player_id: PlayerId, matches: &[MatchRecord]) -> u32 {
    count_outcome(player_id, matches, Outcome::Win)
}

pub fn loss_count(player_id: PlayerId, matches: &[MatchRecord]) -> u32 {
    count_outcome(player_id, matches, Outcome::Loss)
}

pub fn draw_count(player_id: PlayerId, matches: &[MatchRecord]) -> u32 {
    count_outcome(player_id, matches, Outcome::Draw)
}

pub fn total_goals_for(player_id: PlayerId, matches: &[MatchRecord]) -> u64 {
    involving(player_id, matches)
        .map(|(side, m)| u64::from(m.score(side)))
        .sum()
}

pub fn total_goals_against(player_id: PlayerId, matches: &[MatchRecord]) -> u64 {
    involving(player_id, matches)
        .map(|(side, m)| u64::from(m.score(side.opponent())))
        .sum()
}

pub fn average_team_strength(player_id: PlayerId, matches: &[MatchRecord]) -> f64 {
    let total: f64 = involving(player_id, matches)
        .map(|(side, m)| m.strength(side).stars())
        .sum();
    guarded_mean(total, total_matches(player_id, matches))
}

pub fn average_opponent_strength(player_id: PlayerId, matches: &[MatchRecord]) -> f64 {
    let total: f64 = involving(player_id, matches)
        .map(|(side, m)| m.strength(side.opponent()).stars())
        .sum();
    guarded_mean(total, total_matches(player_id, matches))
}

pub fn win_rate(player_id: PlayerId, matches: &[MatchRecord]) -> f64 {
    guarded_mean(
        f64::from(win_count(player_id, matches)),
        total_matches(player_id, matches),
    )
}

/// Aggregate view of one player's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub total_matches: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub goals_for: u64,
    pub goals_against: u64,
    pub goals_per_game: f64,
    pub conceded_per_game: f64,
    pub win_rate: f64,
    pub average_team_strength: f64,
    pub average_opponent_strength: f64,
}

impl PlayerStats {
    pub fn compute(player_id: PlayerId, matches: &[MatchRecord]) -> Self {
        let total_matches = total_matches(player_id, matches);
        let goals_for = total_goals_for(player_id, matches);
        let goals_against = total_goals_against(player_id, matches);

        Self {
            total_matches,
            wins: win_count(player_id, matches),
            losses: loss_count(player_id, matches),
            draws: draw_count(player_id, matches),
            goals_for,
            goals_against,
            goals_per_game: guarded_mean(goals_for as f64, total_matches),
            conceded_per_game: guarded_mean(goals_against as f64, total_matches),
            win_rate: win_rate(player_id, matches),
            average_team_strength: average_team_strength(player_id, matches),
            average_opponent_strength: average_opponent_strength(player_id, matches),
        }
    }
}

/// One player's side of a head-to-head record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHeadSide {
    pub player_id: PlayerId,
    pub wins: u32,
    pub goals: u64,
    pub average_team_strength: f64,
}

impl HeadToHeadSide {
    /// `shared` must already be restricted to matches against one opponent.
    fn compute<'a>(player_id: PlayerId, shared: impl Iterator<Item = &'a MatchRecord>) -> Self {
        let mut side = Self {
            player_id,
            wins: 0,
            goals: 0,
            average_team_strength: 0.0,
        };
        let mut played = 0;
        let mut total_strength = 0.0;

        for (seat, m) in involving(player_id, shared) {
            played += 1;
            total_strength += m.strength(seat).stars();
            side.goals += u64::from(m.score(seat));
            if m.outcome_for(player_id) == Some(Outcome::Win) {
                side.wins += 1;
            }
        }

        side.average_team_strength = guarded_mean(total_strength, played);
        side
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadToHead {
    pub total_matches: u32,
    pub draws: u32,
    pub first: HeadToHeadSide,
    pub second: HeadToHeadSide,
}

/// Matches played between `first` and `second`, borrowed from `matches`.
pub fn matches_between(
    first: PlayerId,
    second: PlayerId,
    matches: &[MatchRecord],
) -> impl Iterator<Item = &MatchRecord> + Clone {
    matches.iter().filter(move |m| m.is_between(first, second))
}

pub fn head_to_head(first: PlayerId, second: PlayerId, matches: &[MatchRecord]) -> HeadToHead {
    let shared = matches_between(first, second, matches);

    HeadToHead {
        total_matches: shared.clone().count() as u32,
        draws: shared.clone().filter(|m| m.is_draw()).count() as u32,
        first: HeadToHeadSide::compute(first, shared.clone()),
        second: HeadToHeadSide::compute(second, shared),
    }
}
