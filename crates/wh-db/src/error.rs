//! Error taxonomy for the receiving workflow.
//!
//! Business failures (validation, no matching order, already fulfilled) are
//! distinct variants so callers can branch on [`ReceiptError::kind`] instead
//! of matching on messages. Everything else the database reports is a
//! [`ReceiptError::DataAccess`] fault and is carried unchanged.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

pub const INVALID_INPUT_MSG: &str = "invalid product, warehouse or amount";
pub const NO_MATCHING_ORDER_MSG: &str = "no matching order found";
pub const ALREADY_FULFILLED_MSG: &str = "order already fulfilled";

/// SQLSTATEs raised by the `add_product_to_warehouse` routine.
pub const SQLSTATE_INVALID_INPUT: &str = "WH001";
pub const SQLSTATE_NO_MATCHING_ORDER: &str = "WH002";
pub const SQLSTATE_ALREADY_FULFILLED: &str = "WH003";

/// Postgres unique_violation.
const SQLSTATE_UNIQUE_VIOLATION: &str = "23505";

/// Unique constraint that allows at most one stock receipt per order.
pub const UQ_RECEIPT_PER_ORDER: &str = "uq_product_warehouse_order";

#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Bad input or a missing product / warehouse reference.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NoMatchingOrder(String),

    #[error("{0}")]
    AlreadyFulfilled(String),

    /// Connectivity or engine-level fault.
    #[error("database error: {0}")]
    DataAccess(#[source] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptErrorKind {
    Validation,
    NoMatchingOrder,
    AlreadyFulfilled,
    DataAccess,
}

impl ReceiptError {
    pub fn invalid_input() -> Self {
        ReceiptError::Validation(INVALID_INPUT_MSG.to_string())
    }

    pub fn no_matching_order() -> Self {
        ReceiptError::NoMatchingOrder(NO_MATCHING_ORDER_MSG.to_string())
    }

    pub fn already_fulfilled() -> Self {
        ReceiptError::AlreadyFulfilled(ALREADY_FULFILLED_MSG.to_string())
    }

    /// Total price not representable. Reported as a data-access fault, the
    /// same kind the routine yields when the engine overflows the column.
    pub fn price_overflow(unit_price: Decimal, amount: i32) -> Self {
        ReceiptError::DataAccess(sqlx::Error::Encode(
            format!("total price overflow: {unit_price} x {amount}").into(),
        ))
    }

    pub fn kind(&self) -> ReceiptErrorKind {
        match self {
            ReceiptError::Validation(_) => ReceiptErrorKind::Validation,
            ReceiptError::NoMatchingOrder(_) => ReceiptErrorKind::NoMatchingOrder,
            ReceiptError::AlreadyFulfilled(_) => ReceiptErrorKind::AlreadyFulfilled,
            ReceiptError::DataAccess(_) => ReceiptErrorKind::DataAccess,
        }
    }

    /// True for the three business-rule failures.
    pub fn is_business_rule(&self) -> bool {
        !matches!(self, ReceiptError::DataAccess(_))
    }
}

impl ReceiptErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceiptErrorKind::Validation => "validation",
            ReceiptErrorKind::NoMatchingOrder => "no_matching_order",
            ReceiptErrorKind::AlreadyFulfilled => "already_fulfilled",
            ReceiptErrorKind::DataAccess => "data_access",
        }
    }
}

/// Map a database error's SQLSTATE (and constraint name) to a business kind.
/// `None` means the error is a plain data-access fault; the result is never
/// `Some(DataAccess)`.
pub fn classify_db_error(code: Option<&str>, constraint: Option<&str>) -> Option<ReceiptErrorKind> {
    match code? {
        SQLSTATE_INVALID_INPUT => Some(ReceiptErrorKind::Validation),
        SQLSTATE_NO_MATCHING_ORDER => Some(ReceiptErrorKind::NoMatchingOrder),
        SQLSTATE_ALREADY_FULFILLED => Some(ReceiptErrorKind::AlreadyFulfilled),
        SQLSTATE_UNIQUE_VIOLATION if constraint == Some(UQ_RECEIPT_PER_ORDER) => {
            Some(ReceiptErrorKind::AlreadyFulfilled)
        }
        _ => None,
    }
}

impl From<sqlx::Error> for ReceiptError {
    /// Routine-raised errors keep the engine's message verbatim. A duplicate
    /// receipt caught by the unique constraint reports the canonical
    /// already-fulfilled message.
    fn from(err: sqlx::Error) -> Self {
        let classified = match &err {
            sqlx::Error::Database(db) => {
                let code = db.code();
                let unique_violation = code.as_deref() == Some(SQLSTATE_UNIQUE_VIOLATION);
                classify_db_error(code.as_deref(), db.constraint())
                    .map(|kind| (kind, db.message().to_string(), unique_violation))
            }
            _ => None,
        };

        match classified {
            Some((ReceiptErrorKind::Validation, msg, _)) => ReceiptError::Validation(msg),
            Some((ReceiptErrorKind::NoMatchingOrder, msg, _)) => ReceiptError::NoMatchingOrder(msg),
            Some((ReceiptErrorKind::AlreadyFulfilled, _, true)) => ReceiptError::already_fulfilled(),
            Some((ReceiptErrorKind::AlreadyFulfilled, msg, false)) => {
                ReceiptError::AlreadyFulfilled(msg)
            }
            _ => ReceiptError::DataAccess(err),
        }
    }
}
