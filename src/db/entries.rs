//! Health entry queries. Every statement filters on `user_id`, so a caller
//! can only ever see or touch rows owned by the user it passes in.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::{EntryValues, HealthEntry, WeightPoint};

const ENTRY_COLUMNS: &str = "data_id, user_id, date, weight, steps, calories_burned";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<HealthEntry> {
    Ok(HealthEntry {
        id: row.get("data_id")?,
        user_id: row.get("user_id")?,
        date: row.get("date")?,
        weight: row.get("weight")?,
        steps: row.get("steps")?,
        calories_burned: row.get("calories_burned")?,
    })
}

/// All entries for a user, oldest date first. Entries sharing a date keep
/// insertion order.
pub fn list_for_user(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<HealthEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENTRY_COLUMNS} FROM health_data
         WHERE user_id = ?1
         ORDER BY date ASC, data_id ASC"
    ))?;

    let entries = stmt
        .query_map(params![user_id], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

pub fn insert(conn: &Connection, user_id: i64, values: &EntryValues) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO health_data (user_id, date, weight, steps, calories_burned)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            values.date,
            values.weight,
            values.steps,
            values.calories_burned
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_for_user(
    conn: &Connection,
    user_id: i64,
    entry_id: i64,
) -> rusqlite::Result<Option<HealthEntry>> {
    conn.query_row(
        &format!("SELECT {ENTRY_COLUMNS} FROM health_data WHERE data_id = ?1 AND user_id = ?2"),
        params![entry_id, user_id],
        entry_from_row,
    )
    .optional()
}

/// Replace every editable field. Returns whether a row was updated.
pub fn update_for_user(
    conn: &Connection,
    user_id: i64,
    entry_id: i64,
    values: &EntryValues,
) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "UPDATE health_data
         SET date = ?1, weight = ?2, steps = ?3, calories_burned = ?4
         WHERE data_id = ?5 AND user_id = ?6",
        params![
            values.date,
            values.weight,
            values.steps,
            values.calories_burned,
            entry_id,
            user_id
        ],
    )?;
    Ok(rows > 0)
}

/// Returns whether a row was deleted. Missing or foreign ids delete nothing.
pub fn delete_for_user(conn: &Connection, user_id: i64, entry_id: i64) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM health_data WHERE data_id = ?1 AND user_id = ?2",
        params![entry_id, user_id],
    )?;
    Ok(rows > 0)
}

pub fn weight_series(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<WeightPoint>> {
    let mut stmt = conn.prepare(
        "SELECT date, weight FROM health_data
         WHERE user_id = ?1 AND weight IS NOT NULL
         ORDER BY date ASC, data_id ASC",
    )?;

    let points = stmt
        .query_map(params![user_id], |row| {
            Ok(WeightPoint {
                date: row.get(0)?,
                weight: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(points)
}
