//! Row-to-[`Race`] mapping.

use std::str::FromStr;

use prost_types::Timestamp;
use racing_proto::Race;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tokio_stream::{Stream, StreamExt};

use crate::persistence::PersistenceError;

/// Columns as selected by [`LIST_RACES_QUERY`](crate::persistence::query::LIST_RACES_QUERY).
type RaceColumns = (i64, i64, String, i64, bool, String);

/// Drain `rows` into races, preserving cursor order.
///
/// The caller gets either every row or an error, never a truncated list. The
/// stream is dropped (closing the cursor) on every return path.
///
/// `sqlx::Error::RowNotFound` surfacing mid-scan is treated as an empty
/// result rather than a failure. Callers have long relied on that, so it is
/// kept even though a drained cursor already covers the normal empty case.
pub async fn scan_races<S>(mut rows: S) -> Result<Vec<Race>, PersistenceError>
where
    S: Stream<Item = Result<SqliteRow, sqlx::Error>> + Unpin,
{
    let mut races = Vec::new();

    while let Some(row) = rows.next().await {
        let columns = match row.and_then(|row| decode_columns(&row)) {
            Ok(columns) => columns,
            Err(sqlx::Error::RowNotFound) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        races.push(race_from_columns(columns)?);
    }

    Ok(races)
}

fn decode_columns(row: &SqliteRow) -> Result<RaceColumns, sqlx::Error> {
    Ok((
        row.try_get(0)?,
        row.try_get(1)?,
        row.try_get(2)?,
        row.try_get(3)?,
        row.try_get(4)?,
        row.try_get(5)?,
    ))
}

fn race_from_columns(
    (id, meeting_id, name, number, visible, advertised_start): RaceColumns,
) -> Result<Race, PersistenceError> {
    let advertised_start_time =
        Timestamp::from_str(&advertised_start).map_err(|source| PersistenceError::Timestamp {
            race_id: id,
            value: advertised_start,
            source,
        })?;

    Ok(Race {
        id,
        meeting_id,
        name,
        number,
        visible,
        advertised_start_time: Some(advertised_start_time),
    })
}
