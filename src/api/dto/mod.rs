//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization. Input rules live in
//! the resolution service.

pub mod health;
pub mod shorten;
pub mod stats;
