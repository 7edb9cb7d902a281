//! HTTP API
//!
//! Route definitions and shared application state. Session verification
//! happens upstream: every authenticated route receives the caller's
//! already-verified phone number as a path parameter.

pub mod routes;

use sqlx::PgPool;

use crate::ledger::WalletPolicy;
use crate::notify::Notifier;

pub use routes::create_router;

/// State shared by every route handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub policy: WalletPolicy,
    pub notifier: Notifier,
}
