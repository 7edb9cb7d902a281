//! Command Handlers module
//!
//! Handlers orchestrate one operation each: resolve the involved
//! aggregates from the store, run the domain rules, persist the results
//! and dispatch notifications. They never mutate state themselves.

mod card_handler;
mod commands;
mod user_handler;
mod wallet_handler;

pub use card_handler::CardHandler;
pub use commands::*;
pub use user_handler::UserHandler;
pub use wallet_handler::WalletHandler;
