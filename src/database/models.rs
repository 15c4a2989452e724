use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::rating::types::{PlayerId, TeamStrength};

/// Which slice of the match log to load. Results are always newest first.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchFilter {
    All,
    ForPlayer(PlayerId),
    /// Matches whose two sides are exactly these players, in either order.
    Between(PlayerId, PlayerId),
    Recent(usize),
}

// Team strength is stored as REAL stars so the column reads naturally.
impl ToSql for TeamStrength {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.stars()))
    }
}

impl FromSql for TeamStrength {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let stars = f64::column_result(value)?;
        TeamStrength::from_stars(stars).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
