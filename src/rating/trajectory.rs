use chrono::{DateTime, Utc};
use serde::Serialize;

use super::types::{MatchId, PlayerId, RatingValue, STARTING_RATING};
use crate::domain::MatchRecord;

/// Rating of a player right after one of their matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryPoint {
    pub match_id: MatchId,
    pub played_at: DateTime<Utc>,
    pub delta: f64,
    pub rating: RatingValue,
}

/// Chronological replay of a player's recorded transfers, starting from
/// [`STARTING_RATING`].
///
/// The replay only trusts the immutable match log, never the live rating
/// stored on the player. Iterating is lazy and can be repeated.
#[derive(Debug, Clone)]
pub struct RatingTrajectory<'a> {
    player_id: PlayerId,
    matches: Vec<&'a MatchRecord>,
}

impl<'a> RatingTrajectory<'a> {
    pub fn new(player_id: PlayerId, matches: &'a [MatchRecord]) -> Self {
        let mut own: Vec<&MatchRecord> = matches.iter().filter(|m| m.involves(player_id)).collect();
        own.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Self {
            player_id,
            matches: own,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> TrajectoryIter<'_> {
        TrajectoryIter {
            player_id: self.player_id,
            remaining: self.matches.iter(),
            rating: STARTING_RATING,
        }
    }

    /// Rating after the last replayed match.
    pub fn final_rating(&self) -> RatingValue {
        self.iter()
            .last()
            .map(|point| point.rating)
            .unwrap_or(STARTING_RATING)
    }
}

impl<'t> IntoIterator for &'t RatingTrajectory<'_> {
    type Item = TrajectoryPoint;
    type IntoIter = TrajectoryIter<'t>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct TrajectoryIter<'t> {
    player_id: PlayerId,
    remaining: std::slice::Iter<'t, &'t MatchRecord>,
    rating: RatingValue,
}

impl Iterator for TrajectoryIter<'_> {
    type Item = TrajectoryPoint;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.remaining.next()?;
        let delta = record.signed_transfer_for(self.player_id);
        self.rating += delta;

        Some(TrajectoryPoint {
            match_id: record.id,
            played_at: record.created_at,
            delta,
            rating: self.rating,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.remaining.size_hint()
    }
}

pub fn rating_trajectory(player_id: PlayerId, matches: &[MatchRecord]) -> RatingTrajectory<'_> {
    RatingTrajectory::new(player_id, matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::types::TeamStrength;
    use chrono::{Duration, TimeZone};

    fn game(
        id: i64,
        a: PlayerId,
        b: PlayerId,
        score: (u32, u32),
        transfer: f64,
        hour: i64,
    ) -> MatchRecord {
        let three = TeamStrength::from_stars(3.0).unwrap();
        MatchRecord {
            id,
            side_a: a,
            side_b: b,
            score_a: score.0,
            score_b: score.1,
            strength_a: three,
            strength_b: three,
            prior_rating_a: 0.0,
            prior_rating_b: 0.0,
            transfer,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + Duration::hours(hour),
        }
    }

    #[test]
    fn test_replays_in_chronological_order() {
        // newest first, as storage returns them
        let matches = vec![
            game(3, 2, 1, (0, 2), 22.0, 3),
            game(2, 1, 3, (1, 1), 0.0, 2),
            game(1, 1, 2, (0, 1), 20.0, 1),
        ];

        let points: Vec<TrajectoryPoint> = rating_trajectory(1, &matches).iter().collect();
        let ids: Vec<i64> = points.iter().map(|p| p.match_id).collect();
        let ratings: Vec<f64> = points.iter().map(|p| p.rating).collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(ratings, vec![1180.0, 1180.0, 1202.0]);
        assert_eq!(points[1].delta, 0.0);
    }

    #[test]
    fn test_same_timestamp_falls_back_to_id() {
        let matches = vec![game(9, 1, 2, (1, 0), 20.0, 0), game(4, 1, 2, (0, 3), 24.0, 0)];
        let ids: Vec<i64> = rating_trajectory(1, &matches).iter().map(|p| p.match_id).collect();
        assert_eq!(ids, vec![4, 9]);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let matches = vec![game(1, 1, 2, (2, 0), 22.0, 1), game(2, 2, 1, (5, 0), 30.0, 2)];
        let trajectory = rating_trajectory(1, &matches);

        let first: Vec<TrajectoryPoint> = trajectory.iter().collect();
        let second: Vec<TrajectoryPoint> = (&trajectory).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(trajectory.final_rating(), 1192.0);
        assert_eq!(trajectory.len(), 2);
    }

    #[test]
    fn test_empty_trajectory_stays_at_start() {
        let matches = vec![game(1, 2, 3, (2, 0), 22.0, 1)];
        let trajectory = rating_trajectory(1, &matches);
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.iter().count(), 0);
        assert_eq!(trajectory.final_rating(), STARTING_RATING);
    }

    #[test]
    fn test_ignores_stored_prior_ratings() {
        // prior ratings are deliberately bogus; only transfers matter
        let matches = vec![game(1, 1, 2, (1, 0), 20.0, 1)];
        assert_eq!(rating_trajectory(2, &matches).final_rating(), 1180.0);
    }
}
