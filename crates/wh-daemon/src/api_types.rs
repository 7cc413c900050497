//! Request and response types for the wh-daemon HTTP endpoints.
//!
//! Bodies use camelCase on the wire. No business logic lives here.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use wh_db::StockReceiptRequest;

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
}

// ---------------------------------------------------------------------------
// /api/warehouse  /api/warehouse/procedure
// ---------------------------------------------------------------------------

/// Receipt request body. `createdAt` is RFC 3339; a timestamp without an
/// offset is taken as UTC.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveStockBody {
    pub id_product: i32,
    pub id_warehouse: i32,
    pub amount: i32,
    #[serde(deserialize_with = "utc_or_naive")]
    pub created_at: DateTime<Utc>,
}

fn utc_or_naive<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| de::Error::custom(format!("invalid createdAt '{raw}': {e}")))
}

impl ReceiveStockBody {
    pub fn to_request(&self) -> StockReceiptRequest {
        StockReceiptRequest {
            product_id: self.id_product,
            warehouse_id: self.id_warehouse,
            amount: self.amount,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveStockResponse {
    pub id_product_warehouse: i32,
}

/// Body of every 4xx/5xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
