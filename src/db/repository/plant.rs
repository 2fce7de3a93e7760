use rusqlite::{params, Connection, ErrorCode};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{popularity_delta, Plant};

/// Insert a new plant record. The UNIQUE index on display_name makes
/// this the race detector for concurrent creation: a duplicate insert
/// surfaces as `ConstraintViolation`, never as silent overwrite.
pub fn insert_plant(conn: &Connection, plant: &Plant) -> Result<(), DatabaseError> {
    let doc = serde_json::to_string(plant)?;
    conn.execute(
        "INSERT INTO plants (id, display_name, scientific_name, view_count, favorite_count,
         popularity_score, created_at, doc)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            plant.id.to_string(),
            plant.display_name,
            plant.scientific_name,
            plant.view_count,
            plant.favorite_count,
            plant.popularity_score,
            plant.created_at.to_string(),
            doc,
        ],
    )
    .map_err(map_constraint)?;
    Ok(())
}

pub fn get_plant(conn: &Connection, id: &Uuid) -> Result<Option<Plant>, DatabaseError> {
    query_one(
        conn,
        "SELECT doc, view_count, favorite_count, popularity_score
         FROM plants WHERE id = ?1",
        params![id.to_string()],
    )
}

pub fn get_plant_by_display_name(
    conn: &Connection,
    display_name: &str,
) -> Result<Option<Plant>, DatabaseError> {
    query_one(
        conn,
        "SELECT doc, view_count, favorite_count, popularity_score
         FROM plants WHERE display_name = ?1",
        params![display_name],
    )
}

pub fn get_plant_by_scientific_name(
    conn: &Connection,
    scientific_name: &str,
) -> Result<Option<Plant>, DatabaseError> {
    query_one(
        conn,
        "SELECT doc, view_count, favorite_count, popularity_score
         FROM plants WHERE scientific_name = ?1 LIMIT 1",
        params![scientific_name],
    )
}

/// First stored record whose scientific name starts with the genus token,
/// case-insensitively. No ranking is defined for genus-mates; rowid order
/// keeps the choice stable for this engine but is not a contract.
pub fn find_plant_by_genus_prefix(
    conn: &Connection,
    genus: &str,
) -> Result<Option<Plant>, DatabaseError> {
    query_one(
        conn,
        "SELECT doc, view_count, favorite_count, popularity_score
         FROM plants WHERE scientific_name LIKE ?1 ORDER BY rowid LIMIT 1",
        params![format!("{genus}%")],
    )
}

/// Delete a record by id. Missing rows are ignored so the rollback path
/// stays best-effort.
pub fn delete_plant(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    conn.execute("DELETE FROM plants WHERE id = ?1", params![id.to_string()])?;
    Ok(())
}

/// One view: view_count += 1, popularity follows in the same UPDATE.
pub fn increment_view_count(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let delta = popularity_delta(1, 0);
    let changed = conn.execute(
        "UPDATE plants SET view_count = view_count + 1,
         popularity_score = popularity_score + ?1
         WHERE id = ?2",
        params![delta, id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "plant".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Favorite add/remove: favorite_count += delta (±1), popularity follows
/// in the same UPDATE. Not retry-idempotent; callers dedupe.
pub fn increment_favorite_count(
    conn: &Connection,
    id: &Uuid,
    delta: i64,
) -> Result<(), DatabaseError> {
    let pop_delta = popularity_delta(0, delta);
    let changed = conn.execute(
        "UPDATE plants SET favorite_count = favorite_count + ?1,
         popularity_score = popularity_score + ?2
         WHERE id = ?3",
        params![delta, pop_delta, id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "plant".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn query_one(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Option<Plant>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let result = stmt.query_row(params, |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, i64>(3)?,
        ))
    });

    match result {
        Ok((doc, views, favorites, popularity)) => {
            let mut plant: Plant = serde_json::from_str(&doc)?;
            // Counters live in columns so increments stay atomic; the
            // doc copy is stale the moment a counter moves.
            plant.view_count = views;
            plant.favorite_count = favorites;
            plant.popularity_score = popularity;
            Ok(Some(plant))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn map_constraint(e: rusqlite::Error) -> DatabaseError {
    match &e {
        rusqlite::Error::SqliteFailure(inner, msg)
            if inner.code == ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(
                msg.clone().unwrap_or_else(|| "unique key conflict".into()),
            )
        }
        _ => e.into(),
    }
}
