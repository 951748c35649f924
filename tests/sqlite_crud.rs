#![cfg(feature = "sqlite")]

mod common;

use serde::Deserialize;
use sql_crud_middleware::prelude::*;

#[derive(Debug, Deserialize, PartialEq)]
struct Goods {
    id: i64,
    name: String,
    price: i64,
    note: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Name {
    name: String,
}

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test(flavor = "current_thread")]
async fn insert_find_update_delete_round_trip() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");

    let pen = goods
        .insert(&data_map! { "name" => "pen", "price" => 3_i64 })
        .await?;
    let cup = goods
        .insert(&data_map! { "name" => "cup", "price" => 8_i64, "note" => "blue" })
        .await?;
    assert_eq!((pen, cup), (1, 2));

    let found: Goods = goods
        .find_one(Condition::new().filter("id = ?").bind(cup))
        .await?;
    assert_eq!(
        found,
        Goods {
            id: 2,
            name: "cup".into(),
            price: 8,
            note: Some("blue".into())
        }
    );

    let updated = goods
        .update(
            &Condition::new().filter("id = ?").bind(pen),
            &data_map! { "price" => 4_i64, "note" => None::<String> },
        )
        .await?;
    assert_eq!(updated, 1);

    let all: Vec<Goods> = goods
        .find(&Condition::new().order_by("price DESC"))
        .await?;
    assert_eq!(all.len(), 2);
    assert_eq!((all[0].price, all[1].price), (8, 4));

    let deleted = goods
        .delete(&Condition::new().filter("name = ?").bind("pen"))
        .await?;
    assert_eq!(deleted, 1);
    assert_eq!(goods.count(Condition::new(), None).await?, 1);
    Ok(())
}

/// Generated statements land on the prefixed table.
#[tokio::test(flavor = "current_thread")]
async fn prefix_applies_to_every_statement() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    assert_eq!(registry.prefix("db"), "shop_");

    let stock = registry.table("stock");
    stock
        .insert(&data_map! { "sku" => "pen", "qty" => 5_i64 })
        .await?;

    let mut conn = registry.resolve("db").pool.get_connection().await?;
    let rows = conn
        .execute_select(
            "SELECT qty FROM shop_stock WHERE sku = ?",
            &[RowValues::Text("pen".into())],
        )
        .await?;
    assert_eq!(rows.scalar(), Some(&RowValues::Int(5)));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn expression_update_binds_before_where() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");
    let id = goods
        .insert(&data_map! { "name" => "pen", "price" => 10_i64 })
        .await?;

    goods
        .update(
            &Condition::new().filter("id = ?").bind(id),
            &data_map! {
                "price" => Expr::new("price * ? + ?", vec![RowValues::Int(2), RowValues::Int(1)]),
                "name" => "pen2",
            },
        )
        .await?;

    let row: Goods = goods
        .find_one(Condition::new().filter("id = ?").bind(id))
        .await?;
    assert_eq!((row.name.as_str(), row.price), ("pen2", 21));
    Ok(())
}

/// Inserts take expressions too; the fragment is spliced into the VALUES list.
#[tokio::test(flavor = "current_thread")]
async fn insert_with_expression_value() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");
    let id = goods
        .insert(&data_map! {
            "name" => Expr::new("upper(?)", vec!["ink".into()]),
            "price" => Expr::raw("1 + 1"),
        })
        .await?;
    let row: Goods = goods
        .find_one(Condition::new().filter("id = ?").bind(id))
        .await?;
    assert_eq!((row.name.as_str(), row.price), ("INK", 2));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn list_binds_expand_for_reads_updates_and_deletes() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");
    let rows: Vec<DataMap> = (1..=5_i64)
        .map(|i| data_map! { "name" => format!("g{i}"), "price" => i })
        .collect();
    goods.batch_insert(&["name", "price"], &rows).await?;

    let picked: Vec<Name> = goods
        .find(
            &Condition::new()
                .select("name")
                .filter("price > ? AND id IN (?)")
                .bind(1_i64)
                .bind(vec![1_i64, 2, 4])
                .order_by("id"),
        )
        .await?;
    assert_eq!(
        picked,
        vec![Name { name: "g2".into() }, Name { name: "g4".into() }]
    );

    let bumped = goods
        .update(
            &Condition::new().filter("name IN (?)").bind(vec!["g1", "g3"]),
            &data_map! { "price" => 100_i64 },
        )
        .await?;
    assert_eq!(bumped, 2);

    let removed = goods
        .delete(&Condition::new().filter("id IN (?)").bind(vec![4_i64, 5]))
        .await?;
    assert_eq!(removed, 2);

    let empty = goods
        .find::<Name>(&Condition::new().filter("id IN (?)").bind(Vec::<i64>::new()))
        .await;
    assert!(matches!(empty, Err(SqlMiddlewareDbError::ParameterError(_))));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn count_and_find_one_override_caller_clauses() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");
    for (name, price) in [("a", 1_i64), ("b", 2), ("c", 3)] {
        goods
            .insert(&data_map! { "name" => name, "price" => price })
            .await?;
    }

    // `select` is replaced by COUNT(*).
    let n = goods
        .count(
            Condition::new().select("name").filter("price >= ?").bind(2_i64),
            None,
        )
        .await?;
    assert_eq!(n, 2);
    assert_eq!(goods.count(Condition::new(), Some("note")).await?, 0);

    // `limit` is replaced by 1.
    let first: Name = goods
        .find_one(Condition::new().select("name").order_by("price DESC").limit(30))
        .await?;
    assert_eq!(first.name, "c");
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn no_rows_behavior() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");

    let err = goods
        .find_one::<Goods>(Condition::new().filter("id = ?").bind(99_i64))
        .await
        .unwrap_err();
    assert!(err.is_no_rows());

    let none: Vec<Goods> = goods
        .find(&Condition::new().filter("id = ?").bind(99_i64))
        .await?;
    assert!(none.is_empty());
    assert_eq!(goods.count(Condition::new(), None).await?, 0);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn batch_insert_projects_rows_onto_columns() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");
    let rows = vec![
        data_map! { "name" => "a", "price" => 1_i64, "ignored" => "x" },
        data_map! { "price" => 2_i64, "name" => "b", "note" => "kept?" },
    ];
    let inserted = goods.batch_insert(&["name", "price"], &rows).await?;
    assert_eq!(inserted, 2);

    let all: Vec<Goods> = goods.find_all(&[]).await?;
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|g| g.note.is_none()));

    let names: Vec<Name> = goods.find_all(&["name"]).await?;
    assert_eq!(names[1].name, "b");

    // A missing key binds NULL, which the NOT NULL column rejects.
    let partial = vec![data_map! { "name" => "c" }];
    assert!(goods.batch_insert(&["name", "price"], &partial).await.is_err());
    Ok(())
}

/// The builder does not validate an empty batch; the driver does.
#[tokio::test(flavor = "current_thread")]
async fn empty_batch_insert_is_a_driver_error() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let err = registry
        .table("goods")
        .batch_insert(&["name", "price"], &[])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlMiddlewareDbError::SqliteError(_)));
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn find_rows_exposes_raw_values() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");
    goods
        .insert(&data_map! { "name" => "pen", "price" => 3_i64 })
        .await?;

    let rows = goods
        .find_rows(&Condition::new().select("name, price, note"))
        .await?;
    assert_eq!(
        rows.get_column_names().map(|c| c.as_slice()),
        Some(["name".to_string(), "price".into(), "note".into()].as_slice())
    );
    let row = &rows.results[0];
    assert_eq!(row.get("name").and_then(RowValues::as_text), Some("pen"));
    assert_eq!(row.get("price").and_then(RowValues::as_int), Some(&3));
    assert!(row.get("note").is_some_and(RowValues::is_null));
    Ok(())
}

/// `SQLite` treats `\` inside a literal as an ordinary byte, so a literal
/// ending in one still closes and later list binds expand.
#[tokio::test(flavor = "current_thread")]
async fn literal_ending_in_backslash_keeps_list_expansion() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");
    let id = goods
        .insert(&data_map! { "name" => "path", "price" => 1_i64, "note" => "C:\\" })
        .await?;

    let n = goods
        .count(
            Condition::new()
                .filter("note = 'C:\\' AND id IN (?)")
                .bind(vec![id]),
            None,
        )
        .await?;
    assert_eq!(n, 1);

    let outcome = goods
        .do_transactions(vec![BatchOperation::update(
            Condition::new()
                .filter("note = 'C:\\' AND id IN (?)")
                .bind(vec![id, 99]),
            data_map! { "price" => 2_i64 },
        )])
        .await?;
    assert_eq!(outcome.get(0).map(|r| r.rows_affected), Some(1));
    Ok(())
}
