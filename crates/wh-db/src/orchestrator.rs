//! Receive stock into a warehouse against an open order.
//!
//! The five steps run in one transaction:
//! 1. product and warehouse exist
//! 2. lock the matching order (same product, same amount, strictly older)
//! 3. the order has no stock receipt yet
//! 4. stamp the order's `fulfilled_at`
//! 5. insert the stock receipt priced at unit price x amount
//!
//! Any failure rolls the whole transaction back before the error reaches the
//! caller; success commits once, after step 5.

use sqlx::{Connection, PgConnection};
use tracing::{debug, error, info, warn};

use crate::error::ReceiptError;
use crate::queries;
use crate::source::ConnectionFactory;
use crate::types::{total_price, ReferenceTable, StockReceiptRequest};

pub struct StockReceiver<F> {
    factory: F,
}

impl<F: ConnectionFactory> StockReceiver<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    /// Record the receipt and return the new `id_product_warehouse`.
    pub async fn receive_stock(&self, req: &StockReceiptRequest) -> Result<i32, ReceiptError> {
        // Rejected before a connection is taken; nothing can have been written.
        if req.amount <= 0 {
            warn!(amount = req.amount, "receive_stock: non-positive amount");
            return Err(ReceiptError::invalid_input());
        }

        let mut conn = self.factory.acquire().await?;
        let mut tx = conn.begin().await.map_err(ReceiptError::DataAccess)?;

        match apply_receipt(&mut tx, req).await {
            Ok(receipt_id) => {
                tx.commit().await.map_err(ReceiptError::DataAccess)?;
                info!(
                    receipt_id,
                    product_id = req.product_id,
                    warehouse_id = req.warehouse_id,
                    amount = req.amount,
                    "stock receipt committed"
                );
                Ok(receipt_id)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    error!(
                        error = %err,
                        rollback_error = %rollback_err,
                        "receive_stock: rollback failed"
                    );
                    return Err(ReceiptError::DataAccess(rollback_err));
                }
                warn!(
                    kind = err.kind().as_str(),
                    error = %err,
                    product_id = req.product_id,
                    warehouse_id = req.warehouse_id,
                    amount = req.amount,
                    "stock receipt rejected; transaction rolled back"
                );
                Err(err)
            }
        }
    }
}

async fn apply_receipt(
    conn: &mut PgConnection,
    req: &StockReceiptRequest,
) -> Result<i32, ReceiptError> {
    let product_exists =
        queries::reference_exists(conn, ReferenceTable::Product, req.product_id).await?;
    let warehouse_exists =
        queries::reference_exists(conn, ReferenceTable::Warehouse, req.warehouse_id).await?;
    if !product_exists || !warehouse_exists {
        debug!(product_exists, warehouse_exists, "reference check failed");
        return Err(ReceiptError::invalid_input());
    }

    let order_id = queries::find_matching_order(conn, req)
        .await?
        .ok_or_else(ReceiptError::no_matching_order)?;
    debug!(order_id, "matched order");

    if queries::order_has_receipt(conn, order_id).await? {
        return Err(ReceiptError::already_fulfilled());
    }

    queries::mark_order_fulfilled(conn, order_id, req.created_at).await?;

    let unit_price = queries::product_unit_price(conn, req.product_id).await?;
    let price = total_price(unit_price, req.amount)
        .ok_or_else(|| ReceiptError::price_overflow(unit_price, req.amount))?;
    let receipt_id = queries::insert_stock_receipt(conn, req, order_id, price).await?;

    Ok(receipt_id)
}
