//! Statement generation through `#[derive(Modeler)]` / `#[derive(Fields)]`.

#![cfg(feature = "derive")]
#![allow(dead_code)]

use modelx::{
    BindType, Fields, ModelError, Modeler, SqlValue, StatementKind, insert_statement,
    update_statement,
};

#[derive(Debug, Modeler)]
#[orm(table = "users")]
struct User {
    #[orm(id)]
    id: i64,
    name: String,
    age: i32,
}

fn args(args: &[&dyn SqlValue]) -> Vec<String> {
    args.iter().map(|v| format!("{v:?}")).collect()
}

#[test]
fn insert_elides_zero_key() {
    let user = User {
        id: 0,
        name: "foo".into(),
        age: 18,
    };
    let stmt = insert_statement(&user).unwrap();
    assert_eq!(stmt.kind(), StatementKind::Insert);
    assert_eq!(stmt.sql(), "INSERT INTO users(age,name) VALUES (?,?)");
    assert_eq!(args(stmt.args()), vec!["18", "\"foo\""]);
}

#[test]
fn insert_keeps_assigned_key() {
    let user = User {
        id: 10,
        name: "foo".into(),
        age: 18,
    };
    let stmt = insert_statement(&user).unwrap();
    assert_eq!(stmt.sql(), "INSERT INTO users(age,id,name) VALUES (?,?,?)");
    assert_eq!(args(stmt.args()), vec!["18", "10", "\"foo\""]);
}

#[test]
fn update_puts_key_last() {
    let user = User {
        id: 5,
        name: "bar".into(),
        age: 18,
    };
    let stmt = update_statement(&user).unwrap();
    assert_eq!(stmt.kind(), StatementKind::Update);
    assert_eq!(stmt.sql(), "UPDATE users SET age=?,name=? WHERE id = ?");
    assert_eq!(args(stmt.args()), vec!["18", "\"bar\"", "5"]);
    assert_eq!(
        stmt.rebind(BindType::Dollar),
        "UPDATE users SET age=$1,name=$2 WHERE id = $3"
    );
}

#[test]
fn derived_table_and_key() {
    let user = User {
        id: 1,
        name: String::new(),
        age: 0,
    };
    assert_eq!(user.table_name(), "users");
    assert_eq!(user.key_name(), "id");
    assert_eq!(User::field_names(), vec!["id", "name", "age"]);
}

#[derive(Modeler)]
#[orm(table = "accounts")]
struct Account {
    #[orm(id, column = "account_id")]
    id: i64,
    #[orm(column = "display_name")]
    name: String,
    r#type: String,
}

#[test]
fn column_renames_and_raw_identifiers() {
    let account = Account {
        id: 3,
        name: "ops".into(),
        r#type: "team".into(),
    };
    assert_eq!(account.key_name(), "account_id");

    let stmt = update_statement(&account).unwrap();
    assert_eq!(
        stmt.sql(),
        "UPDATE accounts SET display_name=?,type=? WHERE account_id = ?"
    );
    assert_eq!(args(stmt.args()), vec!["\"ops\"", "\"team\"", "3"]);
}

#[derive(Modeler)]
#[orm(table = "app.sessions", key = "token")]
struct Session {
    token: uuid::Uuid,
    user_id: i64,
    #[orm(skip)]
    scratch: Vec<u8>,
}

#[test]
fn explicit_key_and_skip() {
    let session = Session {
        token: uuid::Uuid::nil(),
        user_id: 7,
        scratch: vec![1, 2, 3],
    };
    assert_eq!(session.key_name(), "token");
    assert!(session.field("scratch").is_none());

    let stmt = insert_statement(&session).unwrap();
    assert_eq!(stmt.sql(), "INSERT INTO app.sessions(user_id) VALUES (?)");

    let session = Session {
        token: uuid::Uuid::from_u128(1),
        ..session
    };
    let stmt = insert_statement(&session).unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO app.sessions(token,user_id) VALUES (?,?)"
    );
}

#[derive(Fields)]
struct Audit {
    created_by: String,
    updated_by: String,
}

#[derive(Modeler)]
#[orm(table = "posts")]
struct Post {
    #[orm(id)]
    id: i64,
    title: String,
    #[orm(flatten)]
    audit: Audit,
}

#[test]
fn flattened_fields_are_columns() {
    let post = Post {
        id: 0,
        title: "hello".into(),
        audit: Audit {
            created_by: "alice".into(),
            updated_by: "bob".into(),
        },
    };
    assert_eq!(
        Post::field_names(),
        vec!["id", "title", "created_by", "updated_by"]
    );

    let stmt = insert_statement(&post).unwrap();
    assert_eq!(
        stmt.sql(),
        "INSERT INTO posts(created_by,title,updated_by) VALUES (?,?,?)"
    );
    assert_eq!(
        args(stmt.args()),
        vec!["\"alice\"", "\"hello\"", "\"bob\""]
    );
}

#[derive(Modeler)]
#[orm(table = "drafts")]
struct Draft {
    id: Option<i64>,
    body: Option<String>,
}

#[test]
fn option_key_is_zero_only_when_none() {
    let draft = Draft { id: None, body: None };
    let stmt = insert_statement(&draft).unwrap();
    assert_eq!(stmt.sql(), "INSERT INTO drafts(body) VALUES (?)");
    assert_eq!(args(stmt.args()), vec!["None"]);

    let draft = Draft {
        id: Some(0),
        body: None,
    };
    let stmt = insert_statement(&draft).unwrap();
    assert_eq!(stmt.sql(), "INSERT INTO drafts(body,id) VALUES (?,?)");
}

#[derive(Modeler)]
#[orm(table = "counters")]
struct Counter {
    id: i64,
}

#[test]
fn key_only_record_with_zero_key_has_nothing_to_insert() {
    let err = insert_statement(&Counter { id: 0 }).unwrap_err();
    assert!(matches!(
        err,
        ModelError::EmptyColumnSet {
            kind: StatementKind::Insert,
            ..
        }
    ));
    assert!(err.is_build_error());

    let assigned = Counter { id: 4 };
    let stmt = insert_statement(&assigned).unwrap();
    assert_eq!(stmt.sql(), "INSERT INTO counters(id) VALUES (?)");
}

#[derive(Modeler)]
#[orm(table = "labels", key = "slug")]
struct Label {
    id: i64,
    name: String,
}

#[test]
fn undeclared_key_fails_update() {
    let label = Label {
        id: 1,
        name: "x".into(),
    };
    let err = update_statement(&label).unwrap_err();
    assert!(matches!(err, ModelError::KeyNotDeclared { .. }), "{err}");
}

#[derive(Modeler)]
#[orm(table = "settings")]
struct Setting<T: SqlValue> {
    id: i64,
    value: T,
}

#[test]
fn generic_records() {
    let setting = Setting {
        id: 2,
        value: true,
    };
    let stmt = update_statement(&setting).unwrap();
    assert_eq!(stmt.sql(), "UPDATE settings SET value=? WHERE id = ?");
    assert_eq!(args(stmt.args()), vec!["true", "2"]);
}
