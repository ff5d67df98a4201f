//! Domain layer containing business entities and logic.
//!
//! Defines the data model, the store contract and the hit recording pipeline,
//! independent of HTTP and PostgreSQL.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`hit_event`] - Hit event model
//! - [`hit_worker`] - Asynchronous hit recording worker
//!
//! # Hit Recording Flow
//!
//! 1. A redirect resolves its short code
//! 2. A [`hit_event::HitEvent`] for the current local day is sent to a bounded channel
//! 3. [`hit_worker::run_hit_worker`] writes it with retry logic
//! 4. The day counter is upserted via [`repositories::StatsRepository`]

pub mod entities;
pub mod hit_event;
pub mod hit_worker;
pub mod repositories;
