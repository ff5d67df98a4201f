//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::resolution_service::ResolutionService`] - Shorten, redirect and stats use cases

pub mod services;
