use async_trait::async_trait;

use crate::error::ReceiptError;
use crate::orchestrator::StockReceiver;
use crate::procedure::ProcedureGateway;
use crate::source::ConnectionFactory;
use crate::types::StockReceiptRequest;

/// The two receiving entry points, as consumed by the HTTP layer.
#[async_trait]
pub trait ReceiptService: Send + Sync {
    /// Client-side transaction path.
    async fn receive_stock(&self, req: &StockReceiptRequest) -> Result<i32, ReceiptError>;

    /// Server-side routine path.
    async fn receive_stock_via_procedure(
        &self,
        req: &StockReceiptRequest,
    ) -> Result<i32, ReceiptError>;
}

/// Both paths over one shared connection factory.
pub struct Warehouse<F> {
    receiver: StockReceiver<F>,
    gateway: ProcedureGateway<F>,
}

impl<F: ConnectionFactory + Clone> Warehouse<F> {
    pub fn new(factory: F) -> Self {
        Self {
            receiver: StockReceiver::new(factory.clone()),
            gateway: ProcedureGateway::new(factory),
        }
    }
}

#[async_trait]
impl<F: ConnectionFactory> ReceiptService for Warehouse<F> {
    async fn receive_stock(&self, req: &StockReceiptRequest) -> Result<i32, ReceiptError> {
        self.receiver.receive_stock(req).await
    }

    async fn receive_stock_via_procedure(
        &self,
        req: &StockReceiptRequest,
    ) -> Result<i32, ReceiptError> {
        self.gateway.receive_stock_via_procedure(req).await
    }
}
