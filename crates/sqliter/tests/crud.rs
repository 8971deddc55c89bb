use sqliter::prelude::*;

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct TestStruct {
    #[sqliter(column = "db_a", primary_key)]
    a: i32,
    #[sqliter(column = "db_b")]
    b: String,
    scratch: Vec<u8>,
}

fn seeded() -> Sqliter {
    let db = Sqliter::open_memory().expect("open sqlite memory db");
    db.create_table::<TestStruct>().expect("create teststruct");
    for b in ["one", "two", "three"] {
        db.insert(&TestStruct {
            b: b.to_string(),
            ..TestStruct::default()
        })
        .expect("insert");
    }
    db
}

#[test]
fn insert_assigns_rowids() {
    let db = Sqliter::open_memory().unwrap();
    db.create_table::<TestStruct>().unwrap();

    let record = TestStruct {
        a: 42,
        b: "b".to_string(),
        scratch: vec![1],
    };
    // the primary key column is left to the engine
    assert_eq!(db.insert(&record).unwrap(), 1);
    assert_eq!(db.insert(&record).unwrap(), 2);
    assert_eq!(db.count::<TestStruct>("", &[]).unwrap(), 2);
}

#[test]
fn read_one_loads_persisted_fields_only() {
    let db = seeded();
    let mut out = TestStruct {
        scratch: vec![9, 9],
        ..TestStruct::default()
    };

    db.read_one(&mut out, "db_b = ?", &[Value::from("two")])
        .unwrap();
    assert_eq!(out.a, 2);
    assert_eq!(out.b, "two");
    assert_eq!(out.scratch, vec![9, 9]);
}

#[test]
fn read_one_reports_missing_rows() {
    let db = seeded();
    let mut out = TestStruct::default();

    let err = db
        .read_one(&mut out, "db_a > ?", &[Value::Int(100)])
        .unwrap_err();
    assert!(err.is_not_found());
    let message = err.to_string();
    assert!(message.contains("teststruct"));
    assert!(message.contains("db_a > ?"));
    assert!(message.contains("[100]"));
    assert_eq!(out, TestStruct::default());
}

#[test]
fn read_many_appends_in_row_order() {
    let db = seeded();
    let mut out = vec![TestStruct {
        a: -1,
        b: "kept".to_string(),
        scratch: Vec::new(),
    }];

    db.read_many(&mut out, "db_a > ? ORDER BY db_a", &[Value::Int(1)])
        .unwrap();
    let names: Vec<_> = out.iter().map(|r| r.b.as_str()).collect();
    assert_eq!(names, vec!["kept", "two", "three"]);

    db.read_many(&mut out, "db_a > ?", &[Value::Int(100)])
        .unwrap();
    assert_eq!(out.len(), 3);
}

#[test]
fn find_helpers_return_owned_records() {
    let db = seeded();

    let first: TestStruct = db.find_one("db_a = ?", &[Value::Int(1)]).unwrap();
    assert_eq!(first.b, "one");

    let all: Vec<TestStruct> = db.find_many("", &[]).unwrap();
    assert_eq!(all.len(), 3);

    let none = db.find_one::<TestStruct>("db_b = 'nobody'", &[]);
    assert!(none.unwrap_err().is_not_found());
}

#[test]
fn update_targets_the_key_row() {
    let db = seeded();
    let changed = db
        .update(
            &TestStruct {
                a: 2,
                b: "deux".to_string(),
                scratch: Vec::new(),
            },
            "",
            &[],
        )
        .unwrap();
    assert_eq!(changed, 1);

    let all: Vec<TestStruct> = db.find_many("1 = 1 ORDER BY db_a", &[]).unwrap();
    let names: Vec<_> = all.iter().map(|r| r.b.as_str()).collect();
    assert_eq!(names, vec!["one", "deux", "three"]);
}

#[test]
fn update_fragment_narrows_the_key() {
    let db = seeded();
    let record = TestStruct {
        a: 2,
        b: "deux".to_string(),
        scratch: Vec::new(),
    };

    // key matches but the fragment does not
    let changed = db
        .update(&record, "db_b = ?", &[Value::from("one")])
        .unwrap();
    assert_eq!(changed, 0);

    let changed = db
        .update(&record, "db_b = ?", &[Value::from("two")])
        .unwrap();
    assert_eq!(changed, 1);
}

#[test]
fn delete_and_delete_from() {
    let db = seeded();

    assert_eq!(
        db.delete::<TestStruct>("db_a = ?", &[Value::Int(1)])
            .unwrap(),
        1
    );
    assert_eq!(db.count::<TestStruct>("", &[]).unwrap(), 2);

    assert_eq!(db.delete_from("teststruct", "", &[]).unwrap(), 2);
    assert_eq!(db.count::<TestStruct>("", &[]).unwrap(), 0);
}

#[test]
fn execute_runs_raw_sql() {
    let db = seeded();
    let done = db
        .execute(
            "UPDATE teststruct SET db_b = upper(db_b) WHERE db_a < ?",
            &[Value::Int(3)],
        )
        .unwrap();
    assert_eq!(done.rows_affected, 2);

    let first: TestStruct = db.find_one("db_a = 1", &[]).unwrap();
    assert_eq!(first.b, "ONE");
}

#[test]
fn execute_runs_every_statement_in_a_script() {
    let db = seeded();
    let done = db
        .execute(
            "INSERT INTO teststruct (db_b) VALUES ('a'); INSERT INTO teststruct (db_b) VALUES (?);",
            &[Value::from("b")],
        )
        .unwrap();
    assert_eq!(done.rows_affected, 2);
    assert_eq!(done.last_insert_id, 5);
    assert_eq!(db.count::<TestStruct>("", &[]).unwrap(), 5);
}

#[test]
fn engine_errors_carry_sql_and_context() {
    let db = seeded();
    let err = db
        .find_many::<TestStruct>("no_such_column = ?", &[Value::Int(1)])
        .unwrap_err();

    let Error::Query(q) = &err else {
        panic!("expected a query error, got {err}");
    };
    assert_eq!(
        q.sql.as_deref(),
        Some("SELECT db_a,db_b FROM teststruct WHERE no_such_column = ?;")
    );
    assert!(q.detail.as_deref().unwrap().contains("no_such_column = ?"));
}

#[test]
fn closed_handle_rejects_operations() {
    let db = seeded();
    db.close().unwrap();

    let err = db.count::<TestStruct>("", &[]).unwrap_err();
    assert!(matches!(err, Error::Connection(_)));
}

#[test]
fn file_database_survives_reopen() {
    let path = std::env::temp_dir().join(format!("sqliter_crud_{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let path_str = path.to_string_lossy().to_string();

    {
        let db = Sqliter::open(path_str.clone()).unwrap();
        db.create_table::<TestStruct>().unwrap();
        db.insert(&TestStruct {
            b: "persisted".to_string(),
            ..TestStruct::default()
        })
        .unwrap();
        db.close().unwrap();
    }

    let db = Sqliter::open_with(&SqliteConfig::file(path_str).busy_timeout(250)).unwrap();
    let back: TestStruct = db.find_one("", &[]).unwrap();
    assert_eq!(back.b, "persisted");

    drop(db);
    let _ = std::fs::remove_file(&path);
}
