//! HTTP handlers, grouped per resource.

pub mod challenges;
pub mod criteria;
pub mod evaluations;
pub mod health;
pub mod repositories;
