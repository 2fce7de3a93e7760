//! Repository layer — entity-scoped database operations.
//!
//! Free functions over `&Connection`, one sub-module per entity.

mod favorite;
mod plant;

pub use favorite::*;
pub use plant::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::plant::test_plant as make_plant;
    use rusqlite::Connection;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    #[test]
    fn plant_insert_and_retrieve() {
        let conn = test_db();
        let plant = make_plant("장미", "Rosa canina");
        insert_plant(&conn, &plant).unwrap();

        let found = get_plant(&conn, &plant.id).unwrap().unwrap();
        assert_eq!(found, plant);
    }

    #[test]
    fn plant_lookup_by_names() {
        let conn = test_db();
        let plant = make_plant("장미", "Rosa canina");
        insert_plant(&conn, &plant).unwrap();

        let by_name = get_plant_by_display_name(&conn, "장미").unwrap().unwrap();
        assert_eq!(by_name.id, plant.id);

        let by_sci = get_plant_by_scientific_name(&conn, "Rosa canina")
            .unwrap()
            .unwrap();
        assert_eq!(by_sci.id, plant.id);

        assert!(get_plant_by_display_name(&conn, "튤립").unwrap().is_none());
    }

    #[test]
    fn duplicate_display_name_is_constraint_violation() {
        let conn = test_db();
        insert_plant(&conn, &make_plant("장미", "Rosa canina")).unwrap();
        let err = insert_plant(&conn, &make_plant("장미", "Rosa rugosa")).unwrap_err();
        assert!(matches!(
            err,
            crate::db::DatabaseError::ConstraintViolation(_)
        ));
    }

    #[test]
    fn genus_prefix_finds_sibling_species() {
        let conn = test_db();
        let stored = make_plant("장미", "Rosa canina");
        insert_plant(&conn, &stored).unwrap();

        let hit = find_plant_by_genus_prefix(&conn, "rosa").unwrap().unwrap();
        assert_eq!(hit.id, stored.id);

        assert!(find_plant_by_genus_prefix(&conn, "lavandula")
            .unwrap()
            .is_none());
    }

    #[test]
    fn genus_prefix_returns_first_by_row_order() {
        let conn = test_db();
        let first = make_plant("장미", "Rosa canina");
        let second = make_plant("해당화", "Rosa rugosa");
        insert_plant(&conn, &first).unwrap();
        insert_plant(&conn, &second).unwrap();

        let hit = find_plant_by_genus_prefix(&conn, "Rosa").unwrap().unwrap();
        assert_eq!(hit.id, first.id);
    }

    #[test]
    fn delete_plant_removes_row() {
        let conn = test_db();
        let plant = make_plant("장미", "Rosa canina");
        insert_plant(&conn, &plant).unwrap();
        delete_plant(&conn, &plant.id).unwrap();
        assert!(get_plant(&conn, &plant.id).unwrap().is_none());
        // deleting again is a no-op, not an error (best-effort rollback path)
        delete_plant(&conn, &plant.id).unwrap();
    }

    #[test]
    fn counters_update_popularity_atomically() {
        let conn = test_db();
        let plant = make_plant("장미", "Rosa canina");
        insert_plant(&conn, &plant).unwrap();

        increment_view_count(&conn, &plant.id).unwrap();
        increment_favorite_count(&conn, &plant.id, 1).unwrap();

        let found = get_plant(&conn, &plant.id).unwrap().unwrap();
        assert_eq!(found.view_count, 1);
        assert_eq!(found.favorite_count, 1);
        assert_eq!(found.popularity_score, 11);

        increment_favorite_count(&conn, &plant.id, -1).unwrap();
        let found = get_plant(&conn, &plant.id).unwrap().unwrap();
        assert_eq!(found.popularity_score, 1);
    }

    #[test]
    fn favorites_round_trip() {
        let conn = test_db();
        let plant = make_plant("장미", "Rosa canina");
        insert_plant(&conn, &plant).unwrap();

        assert!(add_favorite(&conn, "user-1", &plant.id).unwrap());
        // second add is a no-op
        assert!(!add_favorite(&conn, "user-1", &plant.id).unwrap());
        assert!(is_favorite(&conn, "user-1", &plant.id).unwrap());
        assert_eq!(list_favorites(&conn, "user-1").unwrap(), vec![plant.id]);

        assert!(remove_favorite(&conn, "user-1", &plant.id).unwrap());
        assert!(!remove_favorite(&conn, "user-1", &plant.id).unwrap());
        assert!(!is_favorite(&conn, "user-1", &plant.id).unwrap());
    }
}
