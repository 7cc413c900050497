//! Receive stock through the `add_product_to_warehouse` server routine.
//!
//! The routine enforces the same rules as [`crate::orchestrator`] inside the
//! engine and is atomic on its own, so no client-side transaction is opened
//! and no local validation is done. Routine errors are classified by
//! SQLSTATE and keep the engine's message.

use tracing::{info, warn};

use crate::error::ReceiptError;
use crate::source::ConnectionFactory;
use crate::types::StockReceiptRequest;

pub const RECEIVE_STOCK_ROUTINE: &str = "add_product_to_warehouse";

const CALL_RECEIVE_STOCK_ROUTINE: &str = "select add_product_to_warehouse($1, $2, $3, $4)";

pub struct ProcedureGateway<F> {
    factory: F,
}

impl<F: ConnectionFactory> ProcedureGateway<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    pub async fn receive_stock_via_procedure(
        &self,
        req: &StockReceiptRequest,
    ) -> Result<i32, ReceiptError> {
        let mut conn = self.factory.acquire().await?;

        let result: Result<i32, sqlx::Error> = sqlx::query_scalar(CALL_RECEIVE_STOCK_ROUTINE)
            .bind(req.product_id)
            .bind(req.warehouse_id)
            .bind(req.amount)
            .bind(req.created_at)
            .fetch_one(&mut *conn)
            .await;

        match result {
            Ok(receipt_id) => {
                info!(
                    receipt_id,
                    routine = RECEIVE_STOCK_ROUTINE,
                    product_id = req.product_id,
                    warehouse_id = req.warehouse_id,
                    amount = req.amount,
                    "stock receipt recorded by routine"
                );
                Ok(receipt_id)
            }
            Err(e) => {
                let err = ReceiptError::from(e);
                warn!(
                    kind = err.kind().as_str(),
                    error = %err,
                    routine = RECEIVE_STOCK_ROUTINE,
                    product_id = req.product_id,
                    warehouse_id = req.warehouse_id,
                    amount = req.amount,
                    "routine rejected stock receipt"
                );
                Err(err)
            }
        }
    }
}
