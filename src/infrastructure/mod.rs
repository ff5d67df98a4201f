//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer on top of PostgreSQL.

pub mod persistence;
