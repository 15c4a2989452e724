use anyhow::{Context, Result};
use rusqlite::{Connection, Params, params};

use super::models::MatchFilter;
use crate::domain::{MatchRecord, NewMatchRecord};

const MATCH_COLUMNS: &str = "id, side_a_id, side_b_id, score_a, score_b, strength_a, strength_b, \
     prior_rating_a, prior_rating_b, transfer, created_at";
const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

/// Inserts a match record. Self-play and tie/transfer mismatches are
/// rejected before anything reaches the database.
pub fn insert_match(conn: &Connection, record: &NewMatchRecord) -> Result<MatchRecord> {
    record
        .check_invariants()
        .context("Refusing to insert invalid match")?;

    let sql = format!(
        "INSERT INTO matches (side_a_id, side_b_id, score_a, score_b, strength_a, strength_b,
             prior_rating_a, prior_rating_b, transfer, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            record.side_a,
            record.side_b,
            record.score_a,
            record.score_b,
            record.strength_a,
            record.strength_b,
            record.prior_rating_a,
            record.prior_rating_b,
            record.transfer,
            record.created_at
        ],
        parse_match_row,
    )
    .context("Failed to insert match")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<MatchRecord> {
    Ok(MatchRecord {
        id: row.get(0)?,
        side_a: row.get(1)?,
        side_b: row.get(2)?,
        score_a: row.get(3)?,
        score_b: row.get(4)?,
        strength_a: row.get(5)?,
        strength_b: row.get(6)?,
        prior_rating_a: row.get(7)?,
        prior_rating_b: row.get(8)?,
        transfer: row.get(9)?,
        created_at: row.get(10)?,
    })
}

pub fn list(conn: &Connection, filter: &MatchFilter) -> Result<Vec<MatchRecord>> {
    let rows = match *filter {
        MatchFilter::All => query(
            conn,
            &format!("SELECT {MATCH_COLUMNS} FROM matches {NEWEST_FIRST}"),
            params![],
        ),
        MatchFilter::ForPlayer(player_id) => query(
            conn,
            &format!(
                "SELECT {MATCH_COLUMNS} FROM matches
                 WHERE side_a_id = ?1 OR side_b_id = ?1 {NEWEST_FIRST}"
            ),
            params![player_id],
        ),
        MatchFilter::Between(first, second) => query(
            conn,
            &format!(
                "SELECT {MATCH_COLUMNS} FROM matches
                 WHERE (side_a_id = ?1 AND side_b_id = ?2)
                    OR (side_a_id = ?2 AND side_b_id = ?1)
                 {NEWEST_FIRST}"
            ),
            params![first, second],
        ),
        MatchFilter::Recent(limit) => query(
            conn,
            &format!("SELECT {MATCH_COLUMNS} FROM matches {NEWEST_FIRST} LIMIT ?1"),
            params![limit as i64],
        ),
    };

    rows.with_context(|| format!("Failed to list matches ({:?})", filter))
}

fn query<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<MatchRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
