use tablekit_core::{placeholders, TableDescriptor, TableValidationError};

#[test]
fn descriptor_loads_from_json_schema() {
    let table: TableDescriptor = serde_json::from_str(
        r#"{
            "name": "users",
            "columns": [
                { "name": "id", "type": "SERIAL PRIMARY KEY" },
                { "name": "name", "type": "TEXT NOT NULL" },
                { "name": "age", "type": "INT" }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(
        table,
        TableDescriptor::new("users")
            .column("id", "SERIAL PRIMARY KEY")
            .column("name", "TEXT NOT NULL")
            .column("age", "INT")
    );
    table.validate().unwrap();

    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["columns"][1]["type"], "TEXT NOT NULL");
}

#[test]
fn injected_table_name_fails_validation() {
    let table = TableDescriptor::new("users (id INT); DROP TABLE accounts; --").column("id", "INT");
    assert!(matches!(
        table.validate(),
        Err(TableValidationError::InvalidIdentifier { .. })
    ));
}

#[test]
fn placeholder_sequence() {
    assert_eq!(placeholders(0), "");
    assert_eq!(placeholders(3), "$1, $2, $3");
}
