//! Connection provisioning.
//!
//! Callers receive a [`ConnectionFactory`] at construction time and ask it
//! for a connection per unit of work. Each connection is independently
//! owned and goes back to the pool when dropped, on every exit path.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};

use crate::error::ReceiptError;

pub const ENV_DB_URL: &str = wh_config::secrets::DEFAULT_DATABASE_URL_ENV;

#[async_trait::async_trait]
pub trait ConnectionFactory: Send + Sync {
    async fn acquire(&self) -> Result<PoolConnection<Postgres>, ReceiptError>;
}

#[async_trait::async_trait]
impl<T: ConnectionFactory + ?Sized> ConnectionFactory for Arc<T> {
    async fn acquire(&self) -> Result<PoolConnection<Postgres>, ReceiptError> {
        (**self).acquire().await
    }
}

/// Pool-backed factory. Cloning is cheap (the pool is reference counted).
#[derive(Debug, Clone)]
pub struct PgConnectionFactory {
    pool: PgPool,
}

impl PgConnectionFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ConnectionFactory for PgConnectionFactory {
    async fn acquire(&self) -> Result<PoolConnection<Postgres>, ReceiptError> {
        self.pool.acquire().await.map_err(ReceiptError::DataAccess)
    }
}

/// Build a pool. `acquire_timeout` bounds how long a request waits for a
/// connection before failing with a data-access fault.
pub async fn connect(url: &str, max_connections: u32, acquire_timeout: Duration) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(acquire_timeout)
        .connect(url)
        .await
        .context("failed to connect to Postgres")
}

/// Connect to Postgres using WH_DATABASE_URL and the default pool settings.
pub async fn connect_from_env() -> Result<PgPool> {
    let url = std::env::var(ENV_DB_URL).with_context(|| format!("missing env var {ENV_DB_URL}"))?;
    let settings = wh_config::PoolSettings::default();
    connect(&url, settings.max_connections, settings.acquire_timeout).await
}
