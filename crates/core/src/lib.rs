//! Core domain logic for the CodeJudge evaluation platform.
//!
//! This crate is free of I/O: it holds the shared wire/domain models, the
//! ranking and status aggregation, locale negotiation and message catalogs,
//! and the validation rules enforced by the API layer. Both the server
//! crates and the client depend on it.

pub mod error;
pub mod i18n;
pub mod model;
pub mod ranking;
pub mod types;
pub mod validation;
