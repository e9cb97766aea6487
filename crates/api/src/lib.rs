//! CodeJudge API server library.
//!
//! Exposes the building blocks (config, state, error handling, router,
//! middleware) so integration tests and the binary entrypoint share the
//! same construction path.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;
