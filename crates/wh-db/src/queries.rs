//! Data-access steps of the receiving workflow.
//!
//! Every helper takes `&mut PgConnection` so it runs inside whatever
//! transaction the caller holds. Plain `sqlx::query*` + binds (no macros).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgConnection;

use crate::types::{ReferenceTable, StockReceiptRequest};

pub async fn reference_exists(
    conn: &mut PgConnection,
    table: ReferenceTable,
    id: i32,
) -> Result<bool, sqlx::Error> {
    let found: Option<i32> = sqlx::query_scalar(table.existence_sql())
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

/// Oldest order for the same product and amount created strictly before the
/// request, ties broken by id. The row stays locked until the transaction
/// ends, so a concurrent receipt for the same order waits here and then
/// sees this transaction's receipt.
pub async fn find_matching_order(
    conn: &mut PgConnection,
    req: &StockReceiptRequest,
) -> Result<Option<i32>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        select id_order
        from "order"
        where id_product = $1
          and amount = $2
          and created_at < $3
        order by created_at asc, id_order asc
        limit 1
        for update
        "#,
    )
    .bind(req.product_id)
    .bind(req.amount)
    .bind(req.created_at)
    .fetch_optional(&mut *conn)
    .await
}

pub async fn order_has_receipt(conn: &mut PgConnection, order_id: i32) -> Result<bool, sqlx::Error> {
    let found: Option<i32> =
        sqlx::query_scalar("select 1 from product_warehouse where id_order = $1 limit 1")
            .bind(order_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(found.is_some())
}

pub async fn mark_order_fulfilled(
    conn: &mut PgConnection,
    order_id: i32,
    fulfilled_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"update "order" set fulfilled_at = $1 where id_order = $2"#)
        .bind(fulfilled_at)
        .bind(order_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn product_unit_price(
    conn: &mut PgConnection,
    product_id: i32,
) -> Result<Decimal, sqlx::Error> {
    sqlx::query_scalar("select price from product where id_product = $1")
        .bind(product_id)
        .fetch_one(&mut *conn)
        .await
}

/// Insert a stock receipt and return its generated id.
pub async fn insert_stock_receipt(
    conn: &mut PgConnection,
    req: &StockReceiptRequest,
    order_id: i32,
    total_price: Decimal,
) -> Result<i32, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        insert into product_warehouse (
          id_warehouse, id_product, id_order, amount, price, created_at
        ) values (
          $1, $2, $3, $4, $5, $6
        )
        returning id_product_warehouse
        "#,
    )
    .bind(req.warehouse_id)
    .bind(req.product_id)
    .bind(order_id)
    .bind(req.amount)
    .bind(total_price)
    .bind(req.created_at)
    .fetch_one(&mut *conn)
    .await
}
