//! Infrastructure Layer
//!
//! PostgreSQL connection management, repository implementations and
//! Prometheus metrics.

pub mod database;
pub mod metrics;
pub mod repositories;
