//! Axum router and all HTTP handlers for wh-daemon.
//!
//! `build_router` is the single entry point; `main.rs` calls it and attaches
//! middleware layers. The scenario tests in `tests/` drive the bare router.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, warn};
use wh_db::{ReceiptError, StockReceiptRequest};

use crate::{
    api_types::{ErrorResponse, HealthResponse, ReceiveStockBody, ReceiveStockResponse},
    state::AppState,
};

pub const INVALID_REQUEST_MSG: &str = "Invalid request data";

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the complete application router wired to the given shared state.
///
/// Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
/// attaches them after this call so tests can use the bare router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/health", get(health))
        .route("/api/warehouse", post(receive_stock))
        .route("/api/warehouse/procedure", post(receive_stock_via_procedure))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// GET /v1/health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            ok: true,
            service: st.build.service.clone(),
            version: st.build.version.clone(),
        }),
    )
}

// ---------------------------------------------------------------------------
// POST /api/warehouse
// ---------------------------------------------------------------------------

pub(crate) async fn receive_stock(
    State(st): State<Arc<AppState>>,
    body: Result<Json<ReceiveStockBody>, JsonRejection>,
) -> Response {
    let req = match validated(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let outcome = st.receipts.receive_stock(&req).await;
    respond("transaction", &req, outcome)
}

// ---------------------------------------------------------------------------
// POST /api/warehouse/procedure
// ---------------------------------------------------------------------------

pub(crate) async fn receive_stock_via_procedure(
    State(st): State<Arc<AppState>>,
    body: Result<Json<ReceiveStockBody>, JsonRejection>,
) -> Response {
    let req = match validated(body) {
        Ok(req) => req,
        Err(resp) => return resp,
    };
    let outcome = st.receipts.receive_stock_via_procedure(&req).await;
    respond("procedure", &req, outcome)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A missing or undecodable body, or a non-positive amount, is a 400.
fn validated(
    body: Result<Json<ReceiveStockBody>, JsonRejection>,
) -> Result<StockReceiptRequest, Response> {
    match body {
        Ok(Json(body)) if body.amount > 0 => Ok(body.to_request()),
        Ok(Json(body)) => {
            warn!(amount = body.amount, "rejecting receipt: non-positive amount");
            Err(bad_request())
        }
        Err(rejection) => {
            warn!(error = %rejection, "rejecting receipt: bad body");
            Err(bad_request())
        }
    }
}

fn bad_request() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(INVALID_REQUEST_MSG)),
    )
        .into_response()
}

/// Every core failure is a 500 carrying the error message, whatever its kind.
fn respond(
    path: &'static str,
    req: &StockReceiptRequest,
    outcome: Result<i32, ReceiptError>,
) -> Response {
    match outcome {
        Ok(id_product_warehouse) => {
            info!(path, id_product_warehouse, "receipt recorded");
            (
                StatusCode::OK,
                Json(ReceiveStockResponse {
                    id_product_warehouse,
                }),
            )
                .into_response()
        }
        Err(err) => {
            if err.is_business_rule() {
                warn!(
                    path,
                    kind = err.kind().as_str(),
                    error = %err,
                    product_id = req.product_id,
                    warehouse_id = req.warehouse_id,
                    "receipt rejected"
                );
            } else {
                error!(
                    path,
                    error = %err,
                    product_id = req.product_id,
                    warehouse_id = req.warehouse_id,
                    "receipt failed: data access fault"
                );
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(err.to_string())),
            )
                .into_response()
        }
    }
}
