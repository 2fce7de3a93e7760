use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;

/// Add a favorite membership. Returns false when it already existed.
pub fn add_favorite(
    conn: &Connection,
    user_id: &str,
    plant_id: &Uuid,
) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO favorites (user_id, plant_id) VALUES (?1, ?2)",
        params![user_id, plant_id.to_string()],
    )?;
    Ok(changed > 0)
}

/// Remove a favorite membership. Returns false when it was absent.
pub fn remove_favorite(
    conn: &Connection,
    user_id: &str,
    plant_id: &Uuid,
) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM favorites WHERE user_id = ?1 AND plant_id = ?2",
        params![user_id, plant_id.to_string()],
    )?;
    Ok(changed > 0)
}

pub fn is_favorite(
    conn: &Connection,
    user_id: &str,
    plant_id: &Uuid,
) -> Result<bool, DatabaseError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM favorites WHERE user_id = ?1 AND plant_id = ?2",
        params![user_id, plant_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn list_favorites(conn: &Connection, user_id: &str) -> Result<Vec<Uuid>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT plant_id FROM favorites WHERE user_id = ?1 ORDER BY created_at, plant_id",
    )?;
    let rows = stmt.query_map(params![user_id], |row| row.get::<_, String>(0))?;

    let mut ids = Vec::new();
    for row in rows {
        let raw = row?;
        let id = Uuid::parse_str(&raw).map_err(|_| DatabaseError::InvalidEnum {
            field: "favorites.plant_id".into(),
            value: raw,
        })?;
        ids.push(id);
    }
    Ok(ids)
}
