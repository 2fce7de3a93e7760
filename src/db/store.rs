//! Record store shim: the pipeline's store capability over SQLite.
//!
//! Queries run on a mutex-guarded connection; local SQLite calls are
//! short enough that holding the lock across one statement is fine even
//! on a cooperative runtime.

use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::Connection;
use uuid::Uuid;

use super::{repository, DatabaseError};
use crate::models::Plant;
use crate::pipeline::types::{FavoriteStore, RecordStore, StoreError};

pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Ok(Self::new(super::sqlite::open_memory_database()?))
    }

    fn with_conn<T>(
        &self,
        op: impl FnOnce(&Connection) -> Result<T, DatabaseError>,
    ) -> Result<T, StoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection mutex poisoned".into()))?;
        op(&conn).map_err(map_db_error)
    }
}

fn map_db_error(e: DatabaseError) -> StoreError {
    match e {
        DatabaseError::ConstraintViolation(_) => StoreError::Conflict,
        other => StoreError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn get(&self, id: &Uuid) -> Result<Option<Plant>, StoreError> {
        self.with_conn(|conn| repository::get_plant(conn, id))
    }

    async fn get_by_display_name(
        &self,
        display_name: &str,
    ) -> Result<Option<Plant>, StoreError> {
        self.with_conn(|conn| repository::get_plant_by_display_name(conn, display_name))
    }

    async fn get_by_scientific_name(
        &self,
        scientific_name: &str,
    ) -> Result<Option<Plant>, StoreError> {
        self.with_conn(|conn| repository::get_plant_by_scientific_name(conn, scientific_name))
    }

    async fn find_by_genus_prefix(&self, genus: &str) -> Result<Option<Plant>, StoreError> {
        self.with_conn(|conn| repository::find_plant_by_genus_prefix(conn, genus))
    }

    async fn insert(&self, plant: &Plant) -> Result<(), StoreError> {
        self.with_conn(|conn| repository::insert_plant(conn, plant))
    }

    async fn delete(&self, id: &Uuid) -> Result<(), StoreError> {
        self.with_conn(|conn| repository::delete_plant(conn, id))
    }

    async fn record_view(&self, id: &Uuid) -> Result<(), StoreError> {
        self.with_conn(|conn| repository::increment_view_count(conn, id))
    }

    async fn record_favorite_delta(&self, id: &Uuid, delta: i64) -> Result<(), StoreError> {
        self.with_conn(|conn| repository::increment_favorite_count(conn, id, delta))
    }
}

#[async_trait]
impl FavoriteStore for SqliteRecordStore {
    async fn add_favorite(&self, user_id: &str, plant_id: &Uuid) -> Result<bool, StoreError> {
        self.with_conn(|conn| repository::add_favorite(conn, user_id, plant_id))
    }

    async fn remove_favorite(
        &self,
        user_id: &str,
        plant_id: &Uuid,
    ) -> Result<bool, StoreError> {
        self.with_conn(|conn| repository::remove_favorite(conn, user_id, plant_id))
    }

    async fn is_favorite(&self, user_id: &str, plant_id: &Uuid) -> Result<bool, StoreError> {
        self.with_conn(|conn| repository::is_favorite(conn, user_id, plant_id))
    }

    async fn list_favorites(&self, user_id: &str) -> Result<Vec<Uuid>, StoreError> {
        self.with_conn(|conn| repository::list_favorites(conn, user_id))
    }
}
