//! Demonstration race data.

use std::time::{Duration, SystemTime};

use prost_types::Timestamp;
use sqlx::SqlitePool;

pub const SEED_RACE_COUNT: i64 = 100;

const MEETING_COUNT: i64 = 10;
const RACES_PER_MEETING: i64 = 12;
const START_WINDOW_HOURS: i64 = 48;

const NAMES: [&str; 8] = [
    "Maiden Plate",
    "Handicap",
    "Sprint",
    "Cup",
    "Stakes",
    "Classic",
    "Mile",
    "Derby",
];

const VENUES: [&str; 10] = [
    "Flemington",
    "Randwick",
    "Eagle Farm",
    "Morphettville",
    "Ascot",
    "Caulfield",
    "Rosehill",
    "Doomben",
    "Moonee Valley",
    "Warrnambool",
];

/// Insert [`SEED_RACE_COUNT`] races with start times spread across
/// `now ± 48h`.
///
/// Rows are keyed by id and written with `INSERT OR IGNORE`, so re-seeding an
/// existing database leaves it unchanged.
pub async fn seed_races(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let now = SystemTime::now();
    let mut tx = pool.begin().await?;

    for id in 1..=SEED_RACE_COUNT {
        let meeting_id = (id - 1) % MEETING_COUNT + 1;
        let number = race_number(id);
        let name = format!(
            "{} {}",
            VENUES[(meeting_id - 1) as usize],
            NAMES[(id * 7 % NAMES.len() as i64) as usize]
        );
        let visible = id % 3 != 0;

        sqlx::query(
            "INSERT OR IGNORE INTO races \
             (id, meeting_id, name, number, visible, advertised_start_time) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(meeting_id)
        .bind(name)
        .bind(number)
        .bind(visible)
        .bind(start_time(now, id))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(count = SEED_RACE_COUNT, "Seeded races");
    Ok(())
}

/// Race number within its meeting. Each meeting starts its card at a
/// different number and wraps at [`RACES_PER_MEETING`], so numbers are unique
/// within a meeting and the seed as a whole uses all of them.
fn race_number(id: i64) -> i64 {
    let meeting_index = (id - 1) % MEETING_COUNT;
    let race_index = (id - 1) / MEETING_COUNT;
    (race_index + meeting_index) % RACES_PER_MEETING + 1
}

/// RFC 3339 start time for race `id`, at whole minutes within the window.
fn start_time(now: SystemTime, id: i64) -> String {
    let window_minutes = START_WINDOW_HOURS * 60;
    let offset_minutes = (id * 577) % (2 * window_minutes) - window_minutes;
    let offset = Duration::from_secs(offset_minutes.unsigned_abs() * 60);

    let at = if offset_minutes < 0 {
        now - offset
    } else {
        now + offset
    };

    let mut ts = Timestamp::from(at);
    ts.seconds -= ts.seconds % 60;
    ts.nanos = 0;
    ts.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::sqlite::Database;
    use std::str::FromStr;

    #[test]
    fn test_start_time_is_parseable_and_within_window() {
        let now = SystemTime::now();
        let now_secs = Timestamp::from(now).seconds;
        for id in 1..=SEED_RACE_COUNT {
            let text = start_time(now, id);
            let ts = Timestamp::from_str(&text).unwrap();
            assert_eq!(ts.seconds % 60, 0, "{text} should be on a whole minute");
            assert!((ts.seconds - now_secs).abs() <= START_WINDOW_HOURS * 3600);
        }
    }

    #[tokio::test]
    async fn test_seed_numbers_cover_full_card() {
        let db = Database::new_in_memory().await.unwrap();
        seed_races(db.pool()).await.unwrap();

        let (min, max, distinct): (i64, i64, i64) =
            sqlx::query_as("SELECT MIN(number), MAX(number), COUNT(DISTINCT number) FROM races")
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!((min, max, distinct), (1, RACES_PER_MEETING, RACES_PER_MEETING));

        let (duplicates,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM (SELECT meeting_id, number FROM races \
             GROUP BY meeting_id, number HAVING COUNT(*) > 1)",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(duplicates, 0);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::new_in_memory().await.unwrap();
        seed_races(db.pool()).await.unwrap();
        seed_races(db.pool()).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM races")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, SEED_RACE_COUNT);
    }

    #[tokio::test]
    async fn test_seed_spreads_meetings_and_visibility() {
        let db = Database::new_in_memory().await.unwrap();
        seed_races(db.pool()).await.unwrap();

        let (meetings,): (i64,) = sqlx::query_as("SELECT COUNT(DISTINCT meeting_id) FROM races")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(meetings, MEETING_COUNT);

        let (hidden,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM races WHERE visible = false")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(hidden, SEED_RACE_COUNT / 3);
    }
}
