#![cfg(feature = "sqlite")]

mod common;

use serde::Deserialize;
use sql_crud_middleware::prelude::*;

#[derive(Debug, Deserialize)]
struct Stock {
    sku: String,
    qty: i64,
}

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test(flavor = "current_thread")]
async fn mixed_batch_commits_in_order() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");

    let outcome = goods
        .do_transactions(vec![
            BatchOperation::insert(data_map! { "name" => "pen", "price" => 3_i64 }),
            BatchOperation::insert(data_map! { "name" => "cup", "price" => 8_i64 }),
            BatchOperation::batch_insert(
                ["sku", "qty"],
                vec![
                    data_map! { "sku" => "pen", "qty" => 10_i64 },
                    data_map! { "sku" => "cup", "qty" => 4_i64 },
                ],
            )
            .with_table("stock"),
            BatchOperation::update(
                Condition::new().table("stock").filter("sku IN (?)").bind(vec!["pen", "cup"]),
                data_map! { "qty" => Expr::new("qty - ?", vec![RowValues::Int(1)]) },
            ),
            BatchOperation::delete(Condition::new().filter("name = ?").bind("cup")),
        ])
        .await?;

    assert_eq!(outcome.len(), 5);
    assert_eq!(outcome.get(0).map(|r| r.last_insert_id), Some(1));
    assert_eq!(outcome.get(1).map(|r| r.last_insert_id), Some(2));
    assert_eq!(outcome.get(2).map(|r| r.rows_affected), Some(2));
    assert_eq!(outcome.get(3).map(|r| r.rows_affected), Some(2));
    assert_eq!(outcome.get(4).map(|r| r.rows_affected), Some(1));
    assert_eq!(outcome.total_rows_affected(), 7);

    assert_eq!(goods.count(Condition::new(), None).await?, 1);
    let stock: Vec<Stock> = registry
        .table("stock")
        .find(&Condition::new().order_by("sku"))
        .await?;
    assert_eq!(
        stock.iter().map(|s| (s.sku.as_str(), s.qty)).collect::<Vec<_>>(),
        vec![("cup", 3), ("pen", 9)]
    );
    Ok(())
}

/// A failing operation rolls back everything before it.
#[tokio::test(flavor = "current_thread")]
async fn failure_rolls_back_whole_batch() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");
    goods
        .insert(&data_map! { "name" => "keep", "price" => 1_i64 })
        .await?;

    let err = goods
        .do_transactions(vec![
            BatchOperation::insert(data_map! { "name" => "lost", "price" => 2_i64 }),
            BatchOperation::update(
                Condition::new().filter("id = = ?").bind(1_i64),
                data_map! { "price" => 5_i64 },
            ),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlMiddlewareDbError::SqliteError(_)));

    assert_eq!(goods.count(Condition::new(), None).await?, 1);
    let lost = goods
        .count(Condition::new().filter("name = ?").bind("lost"), None)
        .await?;
    assert_eq!(lost, 0);

    // The pool still hands out usable connections.
    goods
        .insert(&data_map! { "name" => "after", "price" => 3_i64 })
        .await?;
    assert_eq!(goods.count(Condition::new(), None).await?, 2);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn expansion_error_aborts_batch() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let goods = registry.table("goods");

    let err = goods
        .do_transactions(vec![
            BatchOperation::insert(data_map! { "name" => "lost", "price" => 2_i64 }),
            BatchOperation::delete(Condition::new().filter("id IN (?)").bind(Vec::<i64>::new())),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, SqlMiddlewareDbError::ParameterError(_)));
    assert_eq!(goods.count(Condition::new(), None).await?, 0);
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn empty_batch_commits_nothing() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let outcome = registry.table("goods").do_transactions(Vec::new()).await?;
    assert!(outcome.is_empty());
    Ok(())
}

/// An open transaction dropped without commit rolls back.
#[tokio::test(flavor = "current_thread")]
async fn dropped_transaction_rolls_back() -> TestResult {
    let (_dir, registry) = common::shop().await?;
    let pool = registry.resolve("db").pool.clone();

    {
        let mut tx = pool.begin().await?;
        tx.execute_write(
            "INSERT INTO shop_stock (sku, qty) VALUES (?, ?)",
            &[RowValues::Text("pen".into()), RowValues::Int(1)],
        )
        .await?;
    }
    tokio::task::yield_now().await;

    let mut tx = pool.begin().await?;
    let rows = tx
        .execute_select("SELECT COUNT(*) FROM shop_stock", &[])
        .await?;
    assert_eq!(rows.scalar(), Some(&RowValues::Int(0)));
    tx.commit().await?;
    Ok(())
}

/// Dropped outside any runtime, the transaction still rolls back before its
/// connection returns to the pool.
#[test]
fn transaction_dropped_outside_runtime_rolls_back() -> TestResult {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let (_dir, registry) = rt.block_on(common::shop())?;
    let pool = registry.resolve("db").pool.clone();

    let mut tx = rt.block_on(pool.begin())?;
    rt.block_on(tx.execute_write(
        "INSERT INTO shop_stock (sku, qty) VALUES (?, ?)",
        &[RowValues::Text("ink".into()), RowValues::Int(1)],
    ))?;
    drop(tx);

    let count = rt.block_on(async {
        let mut conn = pool.get_connection().await?;
        conn.execute_select("SELECT COUNT(*) FROM shop_stock", &[])
            .await
    })?;
    assert_eq!(count.scalar(), Some(&RowValues::Int(0)));

    // Every pooled connection is back in autocommit mode, so a write lock is free.
    let outcome = rt.block_on(registry.table("stock").do_transactions(vec![
        BatchOperation::insert(data_map! { "sku" => "pen", "qty" => 2_i64 }),
    ]))?;
    assert_eq!(outcome.len(), 1);
    Ok(())
}
