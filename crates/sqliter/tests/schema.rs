use std::marker::PhantomData;

use sqliter::prelude::*;
use sqliter::{ColumnFlags, SqlType, decompose};

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct TestStruct {
    #[sqliter(column = "db_a", primary_key)]
    a: i32,
    #[sqliter(column = "db_b")]
    b: String,
    scratch: Vec<u8>,
}

#[derive(Record, Debug, Default)]
struct Everything {
    #[sqliter(column = "flag")]
    flag: bool,
    #[sqliter(column = "tiny")]
    tiny: i8,
    #[sqliter(column = "count", attr = "unique index")]
    count: u32,
    #[sqliter(column = "big")]
    big: u64,
    #[sqliter(column = "ratio")]
    ratio: f32,
    #[sqliter(column = "score")]
    score: Option<f64>,
    #[sqliter(column = "label")]
    label: Box<String>,
    #[sqliter(column = "initial")]
    initial: char,
}

#[derive(Record, Debug, Default)]
struct Tagged<T> {
    #[sqliter(column = "id", primary_key)]
    id: i64,
    #[sqliter(column = "name")]
    name: String,
    marker: PhantomData<T>,
}

#[derive(Debug, Default)]
struct UserData;

#[test]
fn table_name_is_lowercased_struct_name() {
    assert_eq!(TestStruct::TABLE_NAME, "teststruct");
    assert_eq!(Everything::TABLE_NAME, "everything");
    assert_eq!(<Tagged<UserData> as Record>::TABLE_NAME, "tagged");
}

#[test]
fn unnamed_fields_are_not_persisted() {
    let fields = TestStruct::fields();
    assert_eq!(fields.len(), 2);
    assert!(fields.iter().all(|f| f.name != "scratch"));
}

#[test]
fn fields_keep_declaration_order() {
    let columns: Vec<_> = Everything::fields().iter().map(|f| f.column_name).collect();
    assert_eq!(
        columns,
        vec!["flag", "tiny", "count", "big", "ratio", "score", "label", "initial"]
    );

    let names: Vec<_> = TestStruct::fields().iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn column_flags_from_attributes() {
    let fields = TestStruct::fields();
    assert!(fields[0].is_primary_key());
    assert!(!fields[0].is_unique());
    assert_eq!(fields[1].flags, ColumnFlags::NONE);

    let count = &Everything::fields()[2];
    assert_eq!(count.flags, ColumnFlags::UNIQUE | ColumnFlags::INDEX);
    assert!(!count.is_primary_key());
}

#[test]
fn sql_types_follow_rust_types() {
    let types: Vec<_> = Everything::fields().iter().map(|f| f.sql_type).collect();
    assert_eq!(
        types,
        vec![
            SqlType::Boolean,
            SqlType::Integer,
            SqlType::Integer,
            SqlType::Integer,
            SqlType::Real,
            SqlType::Real,
            SqlType::Text,
            SqlType::Text,
        ]
    );

    let rust_types: Vec<_> = Everything::fields().iter().map(|f| f.rust_type).collect();
    assert_eq!(rust_types[5], "Option<f64>");
    assert_eq!(rust_types[6], "Box<String>");
}

#[test]
fn values_line_up_with_fields() {
    let record = Everything {
        flag: true,
        tiny: -3,
        count: 7,
        big: u64::MAX,
        ratio: 0.5,
        score: None,
        label: Box::new("x".to_string()),
        initial: 'q',
    };
    let decomposed = decompose(&record).unwrap();

    assert_eq!(decomposed.table, "everything");
    let values: Vec<_> = decomposed.fields.iter().map(|f| f.value.clone()).collect();
    assert_eq!(
        values,
        vec![
            Value::Bool(true),
            Value::TinyInt(-3),
            Value::BigInt(7),
            Value::BigInt(i64::MAX),
            Value::Float(0.5),
            Value::Null,
            Value::Text("x".to_string()),
            Value::Text("q".to_string()),
        ]
    );
}

#[test]
fn pointer_inputs_decompose_like_values() {
    let boxed = Box::new(TestStruct {
        a: 1,
        b: "b".to_string(),
        scratch: Vec::new(),
    });
    let decomposed = decompose::<TestStruct>(&boxed).unwrap();
    assert_eq!(decomposed.field("db_b").unwrap().value, Value::from("b"));
}

#[test]
fn every_supported_type_round_trips() {
    let db = Sqliter::open_memory().unwrap();
    db.create_table::<Everything>().unwrap();

    db.insert(&Everything {
        flag: true,
        tiny: -3,
        count: 7,
        big: 1 << 40,
        ratio: 0.25,
        score: Some(9.5),
        label: Box::new("label".to_string()),
        initial: 'z',
    })
    .unwrap();

    let back: Everything = db.find_one("count = ?", &[Value::from(7_u32)]).unwrap();
    assert!(back.flag);
    assert_eq!(back.tiny, -3);
    assert_eq!(back.big, 1 << 40);
    assert!((back.ratio - 0.25).abs() < f32::EPSILON);
    assert_eq!(back.score, Some(9.5));
    assert_eq!(*back.label, "label");
    assert_eq!(back.initial, 'z');
}

#[test]
fn generic_records_persist_concrete_fields() {
    let fields = <Tagged<UserData> as Record>::fields();
    assert_eq!(fields.len(), 2);

    let db = Sqliter::open_memory().unwrap();
    db.create_table::<Tagged<UserData>>().unwrap();
    let id = db
        .insert(&Tagged::<UserData> {
            id: 0,
            name: "tagged".to_string(),
            marker: PhantomData,
        })
        .unwrap();

    let back: Tagged<UserData> = db.find_one("id = ?", &[Value::BigInt(id)]).unwrap();
    assert_eq!(back.name, "tagged");
}

#[test]
fn decode_failures_name_the_column() {
    let db = Sqliter::open_memory().unwrap();
    db.create_table::<TestStruct>().unwrap();
    db.execute(
        "INSERT INTO teststruct (db_a, db_b) VALUES (?, ?)",
        &[Value::BigInt(i64::MAX), Value::from("too wide")],
    )
    .unwrap();

    let err = db.find_many::<TestStruct>("", &[]).unwrap_err();
    let Error::Type(type_error) = err else {
        panic!("expected a type error");
    };
    assert_eq!(type_error.column.as_deref(), Some("db_a"));
}
