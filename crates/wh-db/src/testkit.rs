//! Seeding and inspection helpers for DB-backed scenario tests.
//!
//! Compiled only with the `testkit` feature.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use crate::types::{OrderRow, StockReceiptRow};

pub async fn seed_product(pool: &PgPool, price: Decimal) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        "insert into product (name, description, price) values ($1, $2, $3) returning id_product",
    )
    .bind("test product")
    .bind("seeded by testkit")
    .bind(price)
    .fetch_one(pool)
    .await
}

pub async fn seed_warehouse(pool: &PgPool) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        "insert into warehouse (name, address) values ($1, $2) returning id_warehouse",
    )
    .bind("test warehouse")
    .bind("seeded by testkit")
    .fetch_one(pool)
    .await
}

pub async fn seed_order(
    pool: &PgPool,
    product_id: i32,
    amount: i32,
    created_at: DateTime<Utc>,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"insert into "order" (id_product, amount, created_at) values ($1, $2, $3) returning id_order"#,
    )
    .bind(product_id)
    .bind(amount)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub async fn fetch_order(pool: &PgPool, order_id: i32) -> Result<OrderRow, sqlx::Error> {
    let row = sqlx::query(
        r#"
        select id_order, id_product, amount, created_at, fulfilled_at
        from "order"
        where id_order = $1
        "#,
    )
    .bind(order_id)
    .fetch_one(pool)
    .await?;

    Ok(OrderRow {
        id_order: row.try_get("id_order")?,
        id_product: row.try_get("id_product")?,
        amount: row.try_get("amount")?,
        created_at: row.try_get("created_at")?,
        fulfilled_at: row.try_get("fulfilled_at")?,
    })
}

const RECEIPT_COLUMNS: &str =
    "id_product_warehouse, id_warehouse, id_product, id_order, amount, price, created_at";

fn receipt_from_row(row: &sqlx::postgres::PgRow) -> Result<StockReceiptRow, sqlx::Error> {
    Ok(StockReceiptRow {
        id_product_warehouse: row.try_get("id_product_warehouse")?,
        id_warehouse: row.try_get("id_warehouse")?,
        id_product: row.try_get("id_product")?,
        id_order: row.try_get("id_order")?,
        amount: row.try_get("amount")?,
        price: row.try_get("price")?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn fetch_receipt(
    pool: &PgPool,
    receipt_id: i32,
) -> Result<Option<StockReceiptRow>, sqlx::Error> {
    let sql = format!(
        "select {RECEIPT_COLUMNS} from product_warehouse where id_product_warehouse = $1"
    );
    let row = sqlx::query(&sql).bind(receipt_id).fetch_optional(pool).await?;
    row.as_ref().map(receipt_from_row).transpose()
}

/// All receipts referencing `order_id`, oldest id first.
pub async fn fetch_receipts_for_order(
    pool: &PgPool,
    order_id: i32,
) -> Result<Vec<StockReceiptRow>, sqlx::Error> {
    let sql = format!(
        "select {RECEIPT_COLUMNS} from product_warehouse where id_order = $1 order by id_product_warehouse"
    );
    let rows = sqlx::query(&sql).bind(order_id).fetch_all(pool).await?;
    rows.iter().map(receipt_from_row).collect()
}

/// Receipts recorded for `product_id` across all orders.
pub async fn count_receipts_for_product(pool: &PgPool, product_id: i32) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("select count(*)::bigint from product_warehouse where id_product = $1")
        .bind(product_id)
        .fetch_one(pool)
        .await
}
