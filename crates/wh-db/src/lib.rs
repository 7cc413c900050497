//! Relational core of the warehouse receiving service.
//!
//! Two entry points record a stock receipt against an open order:
//! [`StockReceiver`] runs the workflow as a client-side transaction and
//! [`ProcedureGateway`] delegates it to the `add_product_to_warehouse`
//! server routine. [`Warehouse`] exposes both behind [`ReceiptService`].

pub mod error;
pub mod orchestrator;
pub mod procedure;
pub mod queries;
pub mod service;
pub mod source;
pub mod types;

#[cfg(feature = "testkit")]
pub mod testkit;

use anyhow::{Context, Result};
use sqlx::PgPool;

pub use error::{ReceiptError, ReceiptErrorKind};
pub use orchestrator::StockReceiver;
pub use procedure::ProcedureGateway;
pub use service::{ReceiptService, Warehouse};
pub use source::{connect, connect_from_env, ConnectionFactory, PgConnectionFactory, ENV_DB_URL};
pub use types::{OrderRow, ReferenceTable, StockReceiptRequest, StockReceiptRow};

/// Run embedded SQLx migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("db migrate failed")?;
    Ok(())
}

/// Simple status query (connectivity + schema presence).
pub async fn status(pool: &PgPool) -> Result<DbStatus> {
    let (one,): (i32,) = sqlx::query_as::<_, (i32,)>("select 1")
        .fetch_one(pool)
        .await
        .context("status connectivity query failed")?;

    let (has_receipts_table,): (bool,) = sqlx::query_as::<_, (bool,)>(
        r#"
        select exists (
            select 1
            from information_schema.tables
            where table_schema = 'public' and table_name = 'product_warehouse'
        )
        "#,
    )
    .fetch_one(pool)
    .await
    .context("status table-exists query failed")?;

    let (has_routine,): (bool,) = sqlx::query_as::<_, (bool,)>(
        "select exists (select 1 from pg_proc where proname = $1)",
    )
    .bind(procedure::RECEIVE_STOCK_ROUTINE)
    .fetch_one(pool)
    .await
    .context("status routine-exists query failed")?;

    Ok(DbStatus {
        ok: one == 1,
        has_receipts_table,
        has_routine,
    })
}

#[derive(Debug, Clone)]
pub struct DbStatus {
    pub ok: bool,
    pub has_receipts_table: bool,
    /// `add_product_to_warehouse` is deployed.
    pub has_routine: bool,
}
