use sqliter::prelude::*;
use sqliter::{CreateTable, SqliteConnection, decompose_type};

#[derive(Record, Debug, Default)]
struct MyStruct {
    #[sqliter(column = "id", attr = "PRIMARY KEY")]
    id: i64,
    #[sqliter(column = "value")]
    value: String,
    #[sqliter(column = "value2", attr = "INDEX")]
    value2: String,
    #[sqliter(column = "value3", unique, index)]
    value3: Option<String>,
}

fn index_names(conn: &SqliteConnection) -> Vec<String> {
    conn.query(
        "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = ? AND sql IS NOT NULL ORDER BY name",
        &[Value::from("mystruct")],
    )
    .unwrap()
    .iter()
    .map(|row| row.get_as::<String>(0).unwrap())
    .collect()
}

#[test]
fn create_table_statements() {
    let record = decompose_type::<MyStruct>().unwrap();
    let create = CreateTable::new(&record);

    assert_eq!(
        create.build().unwrap(),
        "CREATE TABLE IF NOT EXISTS mystruct (id INTEGER PRIMARY KEY, value TEXT, value2 TEXT, value3 TEXT UNIQUE);"
    );
    assert_eq!(
        create.indexes(),
        vec![
            "CREATE INDEX IF NOT EXISTS mystruct_value2_idx ON mystruct (value2);",
            "CREATE INDEX IF NOT EXISTS mystruct_value3_idx ON mystruct (value3);",
        ]
    );
}

#[test]
fn create_table_creates_indexes() {
    let db = Sqliter::open_memory().unwrap();
    db.create_table::<MyStruct>().unwrap();

    let conn = db.into_inner();
    assert_eq!(
        index_names(&conn),
        vec!["mystruct_value2_idx", "mystruct_value3_idx"]
    );
}

#[test]
fn create_table_is_idempotent() {
    let db = Sqliter::open_memory().unwrap();
    db.create_table::<MyStruct>().unwrap();
    db.insert(&MyStruct {
        value: "kept".to_string(),
        ..MyStruct::default()
    })
    .unwrap();

    db.create_table::<MyStruct>().unwrap();
    assert_eq!(db.count::<MyStruct>("", &[]).unwrap(), 1);
}

#[test]
fn optional_columns_round_trip_null() {
    let db = Sqliter::open_memory().unwrap();
    db.create_table::<MyStruct>().unwrap();
    db.insert(&MyStruct {
        value: "no third".to_string(),
        ..MyStruct::default()
    })
    .unwrap();

    let back: MyStruct = db.find_one("value3 IS NULL", &[]).unwrap();
    assert_eq!(back.value, "no third");
    assert_eq!(back.value3, None);
}
