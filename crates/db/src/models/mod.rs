//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - An entity struct matching the database row (`FromRow`).
//! - Create/update DTOs consumed by the repositories.
//! - Where the row holds secrets or raw lookup ids, a response struct for API output.

pub mod contact;
pub mod dashboard_layout;
pub mod group;
pub mod preference;
pub mod theme;
pub mod user;
