use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::Player;
use crate::rating::types::{PlayerId, RatingValue, STARTING_RATING};

const PLAYER_COLUMNS: &str = "id, display_name, rating, created_at";

pub fn insert_player(
    conn: &Connection,
    display_name: &str,
    created_at: DateTime<Utc>,
) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (display_name, rating, created_at) VALUES (?1, ?2, ?3)
         RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![display_name, STARTING_RATING, created_at],
        parse_player_row,
    )
    .context("Failed to insert new player")
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        display_name: row.get(1)?,
        rating: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

/// Leaderboard order: highest rating first, earliest registration breaks ties.
pub fn list_all(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY rating DESC, id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_top_excluding(
    conn: &Connection,
    excluded: PlayerId,
    limit: usize,
) -> Result<Vec<Player>> {
    let sql = format!(
        "SELECT {PLAYER_COLUMNS} FROM players WHERE id <> ?1
         ORDER BY rating DESC, id ASC LIMIT ?2"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![excluded, limit as i64], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Overwrites the stored rating; the caller has already applied the transfer.
pub fn update_rating(conn: &Connection, id: PlayerId, rating: RatingValue) -> Result<()> {
    if !rating.is_finite() {
        bail!("Refusing to store non-finite rating {} for player {}", rating, id);
    }

    let updated = conn
        .execute("UPDATE players SET rating = ?1 WHERE id = ?2", params![rating, id])
        .context("Failed to update player rating")?;

    if updated == 0 {
        bail!("Player {} not found while updating rating", id);
    }
    Ok(())
}
