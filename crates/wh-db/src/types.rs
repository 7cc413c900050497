use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stock receipt to record against a previously placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReceiptRequest {
    pub product_id: i32,
    pub warehouse_id: i32,
    /// Units received. Must be > 0.
    pub amount: i32,
    /// Receipt timestamp; the matched order must be strictly older.
    pub created_at: DateTime<Utc>,
}

/// Tables whose rows may be existence-checked by id.
///
/// Each variant owns a fixed, parameterized query, so no table name is
/// ever spliced into SQL from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTable {
    Product,
    Warehouse,
}

impl ReferenceTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            ReferenceTable::Product => "product",
            ReferenceTable::Warehouse => "warehouse",
        }
    }

    pub(crate) fn existence_sql(&self) -> &'static str {
        match self {
            ReferenceTable::Product => "select 1 from product where id_product = $1",
            ReferenceTable::Warehouse => "select 1 from warehouse where id_warehouse = $1",
        }
    }
}

/// Mirrors the `"order"` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRow {
    pub id_order: i32,
    pub id_product: i32,
    pub amount: i32,
    pub created_at: DateTime<Utc>,
    pub fulfilled_at: Option<DateTime<Utc>>,
}

/// Mirrors the `product_warehouse` table. `price` is the total for the
/// receipt (unit price x amount at time of receipt).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockReceiptRow {
    pub id_product_warehouse: i32,
    pub id_warehouse: i32,
    pub id_product: i32,
    pub id_order: i32,
    pub amount: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Total price of a receipt, `None` when the product overflows `Decimal`.
pub fn total_price(unit_price: Decimal, amount: i32) -> Option<Decimal> {
    unit_price.checked_mul(Decimal::from(amount))
}
