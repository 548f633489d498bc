use tablekit_core::{Database, DbError, TableDescriptor, TableValidationError};
use uuid::Uuid;

const DATABASE_URL_ENV: &str = "TABLEKIT_TEST_DATABASE_URL";

/// Connects to the server named by `TABLEKIT_TEST_DATABASE_URL`, or returns
/// `None` so the calling test can skip when no server is configured.
fn connect() -> Option<Database> {
    let url = match std::env::var(DATABASE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("skipping: {DATABASE_URL_ENV} is not set");
            return None;
        }
    };
    Some(Database::open(&url).unwrap())
}

fn unique_name(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

fn users_table(name: &str) -> TableDescriptor {
    TableDescriptor::new(name)
        .column("id", "SERIAL PRIMARY KEY")
        .column("name", "TEXT NOT NULL")
        .column("age", "INT")
}

#[test]
fn users_scenario_end_to_end() {
    let Some(mut db) = connect() else { return };
    let table = users_table(&unique_name("users"));

    db.create_table(&table).unwrap();
    assert_eq!(
        db.insert_row(&table.name, &[&1_i32, &"John Doe", &30_i32])
            .unwrap(),
        1
    );

    let rows = db
        .select_rows(&table.name, "age > $1", &[&25_i32])
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<_, i32>("id"), 1);
    assert_eq!(rows[0].get::<_, String>("name"), "John Doe");
    assert_eq!(rows[0].get::<_, Option<i32>>("age"), Some(30));

    let deleted = db.delete_rows(&table.name, "age > $1", &[&20_i32]).unwrap();
    assert_eq!(deleted, 1);

    db.drop_table(&table.name).unwrap();
    assert!(!db.table_exists(&table.name).unwrap());
    db.close().unwrap();
}

#[test]
fn create_table_twice_is_idempotent() {
    let Some(mut db) = connect() else { return };
    let table = users_table(&unique_name("twice"));

    db.create_table(&table).unwrap();
    db.create_table(&table).unwrap();
    assert!(db.table_exists(&table.name).unwrap());

    db.drop_table(&table.name).unwrap();
}

#[test]
fn dropping_missing_table_succeeds() {
    let Some(mut db) = connect() else { return };
    let name = unique_name("missing");

    assert!(!db.table_exists(&name).unwrap());
    db.drop_table(&name).unwrap();
}

#[test]
fn delete_count_matches_rows_selected_before_delete() {
    let Some(mut db) = connect() else { return };
    let table = users_table(&unique_name("ages"));
    db.create_table(&table).unwrap();

    for (id, name, age) in [(1_i32, "ann", 18_i32), (2, "bob", 41), (3, "cid", 67)] {
        db.insert_row(&table.name, &[&id, &name, &age]).unwrap();
    }

    let mut cursor = db.select_rows(&table.name, "age >= $1", &[&40_i32]).unwrap();
    let mut matching = 0;
    for row in cursor.by_ref() {
        row.unwrap();
        matching += 1;
    }
    assert_eq!(cursor.rows_affected(), Some(2));
    drop(cursor);

    let deleted = db.delete_rows(&table.name, "age >= $1", &[&40_i32]).unwrap();
    assert_eq!(deleted, matching);

    let remaining = db
        .select_rows(&table.name, "age >= $1", &[&40_i32])
        .unwrap()
        .count();
    assert_eq!(remaining, 0);

    let untouched = db
        .select_rows(&table.name, "name = $1", &[&"ann"])
        .unwrap()
        .count();
    assert_eq!(untouched, 1);

    db.drop_table(&table.name).unwrap();
}

#[test]
fn insert_without_values_uses_column_defaults() {
    let Some(mut db) = connect() else { return };
    let table = TableDescriptor::new(unique_name("defaults"))
        .column("id", "SERIAL PRIMARY KEY")
        .column("label", "TEXT NOT NULL DEFAULT 'pending'");
    db.create_table(&table).unwrap();

    assert_eq!(db.insert_row(&table.name, &[]).unwrap(), 1);
    let rows = db
        .select_rows(&table.name, "label = $1", &[&"pending"])
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(rows.len(), 1);

    db.drop_table(&table.name).unwrap();
}

#[test]
fn server_errors_surface_as_statement_errors_with_sqlstate() {
    let Some(mut db) = connect() else { return };
    let name = unique_name("absent");

    let err = db.select_rows(&name, "1 = 1", &[]).err().unwrap();
    assert!(matches!(err, DbError::Statement(_)));
    assert_eq!(err.db_code(), Some("42P01"));

    // The connection stays usable after a failed statement.
    assert!(!db.table_exists(&name).unwrap());
}

#[test]
fn invalid_input_is_rejected_before_reaching_server() {
    let Some(mut db) = connect() else { return };

    let err = db.drop_table("users; DROP TABLE users").unwrap_err();
    assert!(matches!(err, DbError::InvalidIdentifier { .. }));

    let err = db
        .create_table(&TableDescriptor::new(unique_name("nocols")))
        .unwrap_err();
    assert!(matches!(
        err,
        DbError::InvalidTable(TableValidationError::NoColumns { .. })
    ));

    let err = db.delete_rows("users", "  ", &[]).unwrap_err();
    assert!(matches!(err, DbError::EmptyCondition));
}
