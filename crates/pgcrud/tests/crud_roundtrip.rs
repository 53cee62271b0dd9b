use pgcrud::prelude::*;
use serde_json::json;
use std::time::Duration;

fn database_url(test: &str) -> Option<String> {
    let _ = dotenvy::dotenv();
    match std::env::var("DATABASE_URL") {
        Ok(v) => Some(v),
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            None
        }
    }
}

async fn connect(url: &str) -> CrudResult<Database> {
    let config = DbConfig::from_url(url)?
        .application_name("pgcrud-tests")
        .query_timeout(Duration::from_secs(10));
    let mut db = Database::connect(&config).await?;
    db.execute_sql(
        "CREATE TEMP TABLE people (
            id serial PRIMARY KEY,
            name text NOT NULL,
            age int4,
            active bool NOT NULL DEFAULT true
        )",
    )
    .await?;
    Ok(db)
}

#[tokio::test]
async fn crud_roundtrip() -> CrudResult<()> {
    let Some(url) = database_url("crud_roundtrip") else {
        return Ok(());
    };
    let mut db = connect(&url).await?;

    for (name, age) in [("O'Brien", "30"), ("Ann", "41"), ("Bob", "25")] {
        let inserted = db
            .insert(insert("people").set("name", name).set("age", age))
            .await?;
        assert_eq!(inserted, 1);
    }

    let all = db
        .select(select("people").order_by("id"), AddressingMode::Assoc)
        .await?;
    assert_eq!(all.len(), 3);
    let first = all.first().expect("three rows");
    assert_eq!(first.get("name"), Some(&json!("O'Brien")));
    assert_eq!(first.get("age"), Some(&json!(30)));
    assert_eq!(first.get("active"), Some(&json!(true)));

    let one = db
        .select(
            select("people").where_eq("name", " Ann ").columns("id, age"),
            AddressingMode::Both,
        )
        .await?;
    match &one {
        NormalizedResult::Single(row) => {
            assert_eq!(row.get("age"), Some(&json!(41)));
            assert_eq!(row.get_index(1), Some(&json!(41)));
        }
        other => panic!("expected one row, got {other:?}"),
    }

    let updated = db
        .update(update("people").set("age", "42").where_eq("name", "Ann"))
        .await?;
    assert_eq!(updated, 1);

    let none = db
        .select(select("people").where_eq("name", "Nobody"), AddressingMode::Both)
        .await?;
    assert!(none.is_empty());
    assert!(!db.have_results());

    let like = db
        .select(select("people").where_eq("name", "b").like(true), AddressingMode::Assoc)
        .await?;
    assert_eq!(like.len(), 1);

    assert!(db.delete(delete("people").where_eq("name", "Bob")).await?);
    assert!(!db.delete(delete("people").where_eq("name", "Bob")).await?);
    assert!(db.delete(delete("people").where_eq("active", true).limit(1)).await?);
    assert_eq!(db.affected_rows(), 1);

    db.close().await
}

#[tokio::test]
async fn typed_columns_roundtrip() -> CrudResult<()> {
    let Some(url) = database_url("typed_columns_roundtrip") else {
        return Ok(());
    };
    let mut db = connect(&url).await?;
    db.execute_sql(
        "CREATE TEMP TABLE items (
            id serial PRIMARY KEY,
            price numeric(10, 2) NOT NULL,
            opens_at time,
            qty int4
        )",
    )
    .await?;

    db.insert(
        insert("items")
            .set("price", "9.99")
            .set("opens_at", "12:30")
            .set("qty", "42"),
    )
    .await?;
    db.insert(insert("items").set("price", "100").set("qty", "7"))
        .await?;

    let rows = db
        .select(select("items").order_by("id"), AddressingMode::Assoc)
        .await?;
    let first = rows.first().expect("two rows");
    assert_eq!(first.get("price"), Some(&json!("9.99")));
    assert_eq!(first.get("opens_at"), Some(&json!("12:30:00")));

    let matched = db
        .select(
            select("items").where_eq("qty", 4).like(true).columns("qty"),
            AddressingMode::Assoc,
        )
        .await?;
    match &matched {
        NormalizedResult::Single(row) => assert_eq!(row.get("qty"), Some(&json!(42))),
        other => panic!("expected one row, got {other:?}"),
    }

    db.execute_sql("SELECT ARRAY[1, NULL, 3]::int4[] AS xs, '10.0.0.1'::inet AS addr")
        .await?;
    let row = db.fetch(AddressingMode::Assoc)?;
    let row = row.first().expect("one row");
    assert_eq!(row.get("xs"), Some(&json!([1, null, 3])));
    assert_eq!(row.get("addr"), Some(&json!("10.0.0.1")));

    db.close().await
}

#[tokio::test]
async fn server_errors_are_reported_verbatim() -> CrudResult<()> {
    let Some(url) = database_url("server_errors_are_reported_verbatim") else {
        return Ok(());
    };
    let mut db = connect(&url).await?;

    db.insert(insert("people").set("id", 1).set("name", "x"))
        .await?;
    let err = db
        .insert(insert("people").set("id", 1).set("name", "y"))
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());
    assert!(db.last_error().is_some_and(|m| m.contains("duplicate key")));

    let err = db.execute_sql("SELECT * FROM missing_table").await.unwrap_err();
    assert_eq!(err.sqlstate(), Some("42P01"));

    db.execute_sql("SELECT 1").await?;
    assert_eq!(db.last_error(), None);

    db.close().await
}

#[tokio::test]
async fn query_timeout_cancels_statement() -> CrudResult<()> {
    let Some(url) = database_url("query_timeout_cancels_statement") else {
        return Ok(());
    };
    let config = DbConfig::from_url(&url)?.query_timeout(Duration::from_millis(200));
    let mut db = Database::connect(&config).await?;

    let err = db.execute_sql("SELECT pg_sleep(5)").await.unwrap_err();
    assert!(err.is_timeout());

    db.close().await
}
