use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, TransactionBehavior};
use std::sync::Arc;

use super::connection::{DbPool, get_connection};
use super::models::MatchFilter;
use super::{matches, players, setup};
use crate::domain::{MatchRecord, NewMatchRecord, PendingMatch, Player, RecordedMatch};
use crate::errors::{LadderError, LadderResult};
use crate::rating::types::{PlayerId, RatingValue};

/// Turns both players, as read inside the write transaction, into the match to store.
pub type SettleFn<'a> = &'a dyn Fn(&Player, &Player) -> LadderResult<PendingMatch>;

/// Storage boundary the ladder services are written against.
pub trait LadderRepository {
    /// All players, highest rating first.
    fn list_players(&self) -> Result<Vec<Player>>;

    fn get_player(&self, id: PlayerId) -> Result<Option<Player>>;

    /// Best rated players other than `excluded`, for "compare with" suggestions.
    fn top_players_excluding(&self, excluded: PlayerId, limit: usize) -> Result<Vec<Player>>;

    /// Matches selected by `filter`, newest first.
    fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>>;

    fn insert_player(&self, display_name: &str, created_at: DateTime<Utc>) -> Result<Player>;

    fn insert_match(&self, record: &NewMatchRecord) -> Result<MatchRecord>;

    /// Overwrites one player's rating.
    fn apply_rating(&self, id: PlayerId, rating: RatingValue) -> Result<()>;

    /// Stores a match and both players' new ratings as a single unit:
    /// either all three writes land or none do.
    fn commit_match(
        &self,
        record: &NewMatchRecord,
        new_rating_a: RatingValue,
        new_rating_b: RatingValue,
    ) -> Result<MatchRecord>;

    /// Reads both players, settles with `settle` and stores the result, all
    /// under one write lock so no other submission can slip in between.
    fn record_match(
        &self,
        side_a: PlayerId,
        side_b: PlayerId,
        settle: SettleFn<'_>,
    ) -> LadderResult<RecordedMatch>;

    /// Overwrites several ratings as a single unit.
    fn apply_ratings(&self, updates: &[(PlayerId, RatingValue)]) -> Result<()>;

    fn list_matches_for_player(&self, id: PlayerId) -> Result<Vec<MatchRecord>> {
        self.list_matches(&MatchFilter::ForPlayer(id))
    }

    fn list_matches_between(
        &self,
        first: PlayerId,
        second: PlayerId,
    ) -> Result<Vec<MatchRecord>> {
        self.list_matches(&MatchFilter::Between(first, second))
    }

    fn list_recent_matches(&self, limit: usize) -> Result<Vec<MatchRecord>> {
        self.list_matches(&MatchFilter::Recent(limit))
    }
}

/// [`LadderRepository`] backed by a pooled SQLite database.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Opens a repository and makes sure the schema exists.
    pub fn open(pool: DbPool) -> Result<Self> {
        let repository = Self::new(pool);
        repository.initialize()?;
        Ok(repository)
    }

    pub fn initialize(&self) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        setup::initialize_schema(&conn)
    }
}

impl LadderRepository for SqliteRepository {
    fn list_players(&self) -> Result<Vec<Player>> {
        let conn = get_connection(&self.pool)?;
        players::list_all(&conn)
    }

    fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
        let conn = get_connection(&self.pool)?;
        players::find_by_id(&conn, id)
    }

    fn top_players_excluding(&self, excluded: PlayerId, limit: usize) -> Result<Vec<Player>> {
        let conn = get_connection(&self.pool)?;
        players::list_top_excluding(&conn, excluded, limit)
    }

    fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>> {
        let conn = get_connection(&self.pool)?;
        matches::list(&conn, filter)
    }

    fn insert_player(&self, display_name: &str, created_at: DateTime<Utc>) -> Result<Player> {
        let conn = get_connection(&self.pool)?;
        players::insert_player(&conn, display_name, created_at)
    }

    fn insert_match(&self, record: &NewMatchRecord) -> Result<MatchRecord> {
        let conn = get_connection(&self.pool)?;
        matches::insert_match(&conn, record)
    }

    fn apply_rating(&self, id: PlayerId, rating: RatingValue) -> Result<()> {
        let conn = get_connection(&self.pool)?;
        players::update_rating(&conn, id, rating)
    }

    fn commit_match(
        &self,
        record: &NewMatchRecord,
        new_rating_a: RatingValue,
        new_rating_b: RatingValue,
    ) -> Result<MatchRecord> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn
            .transaction()
            .context("Failed to start match transaction")?;

        // Dropping `tx` on any error below rolls every write back.
        let stored = matches::insert_match(&tx, record)?;
        players::update_rating(&tx, record.side_a, new_rating_a)?;
        players::update_rating(&tx, record.side_b, new_rating_b)?;

        tx.commit().context("Failed to commit match transaction")?;
        Ok(stored)
    }

    fn record_match(
        &self,
        side_a: PlayerId,
        side_b: PlayerId,
        settle: SettleFn<'_>,
    ) -> LadderResult<RecordedMatch> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to start match transaction")?;

        let player_a = find_required(&tx, side_a)?;
        let player_b = find_required(&tx, side_b)?;

        let pending = settle(&player_a, &player_b)?;
        let stored = matches::insert_match(&tx, &pending.record)?;
        players::update_rating(&tx, side_a, pending.new_rating_a)?;
        players::update_rating(&tx, side_b, pending.new_rating_b)?;

        tx.commit().context("Failed to commit match transaction")?;
        Ok(RecordedMatch {
            record: stored,
            side_a: Player {
                rating: pending.new_rating_a,
                ..player_a
            },
            side_b: Player {
                rating: pending.new_rating_b,
                ..player_b
            },
        })
    }

    fn apply_ratings(&self, updates: &[(PlayerId, RatingValue)]) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn
            .transaction()
            .context("Failed to start rating transaction")?;

        for &(id, rating) in updates {
            players::update_rating(&tx, id, rating)?;
        }

        tx.commit().context("Failed to commit rating transaction")
    }
}

fn find_required(conn: &Connection, id: PlayerId) -> LadderResult<Player> {
    players::find_by_id(conn, id)?.ok_or(LadderError::PlayerNotFound(id))
}

impl<R: LadderRepository + ?Sized> LadderRepository for Arc<R> {
    fn list_players(&self) -> Result<Vec<Player>> {
        (**self).list_players()
    }

    fn get_player(&self, id: PlayerId) -> Result<Option<Player>> {
        (**self).get_player(id)
    }

    fn top_players_excluding(&self, excluded: PlayerId, limit: usize) -> Result<Vec<Player>> {
        (**self).top_players_excluding(excluded, limit)
    }

    fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>> {
        (**self).list_matches(filter)
    }

    fn insert_player(&self, display_name: &str, created_at: DateTime<Utc>) -> Result<Player> {
        (**self).insert_player(display_name, created_at)
    }

    fn insert_match(&self, record: &NewMatchRecord) -> Result<MatchRecord> {
        (**self).insert_match(record)
    }

    fn apply_rating(&self, id: PlayerId, rating: RatingValue) -> Result<()> {
        (**self).apply_rating(id, rating)
    }

    fn commit_match(
        &self,
        record: &NewMatchRecord,
        new_rating_a: RatingValue,
        new_rating_b: RatingValue,
    ) -> Result<MatchRecord> {
        (**self).commit_match(record, new_rating_a, new_rating_b)
    }

    fn record_match(
        &self,
        side_a: PlayerId,
        side_b: PlayerId,
        settle: SettleFn<'_>,
    ) -> LadderResult<RecordedMatch> {
        (**self).record_match(side_a, side_b, settle)
    }

    fn apply_ratings(&self, updates: &[(PlayerId, RatingValue)]) -> Result<()> {
        (**self).apply_ratings(updates)
    }
}
