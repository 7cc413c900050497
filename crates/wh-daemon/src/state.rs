//! Shared runtime state for wh-daemon.
//!
//! Handlers receive `State<Arc<AppState>>` from Axum. The receiving core is
//! injected as a trait object so tests can swap in a stub.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use wh_db::ReceiptService;

/// Static build metadata included in health responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BuildInfo {
    pub service: String,
    pub version: String,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            service: "wh-daemon".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub build: BuildInfo,
    /// Both receiving paths (client transaction and server routine).
    pub receipts: Arc<dyn ReceiptService>,
}

impl AppState {
    pub fn new(receipts: Arc<dyn ReceiptService>) -> Self {
        Self {
            build: BuildInfo::default(),
            receipts,
        }
    }
}
