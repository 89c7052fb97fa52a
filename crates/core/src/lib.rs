//! Domain core for the ERP identity and access service.
//!
//! Everything in this crate is free of IO so it can be shared by the
//! persistence layer, the HTTP layer and the seeding tools.

pub mod auth;
pub mod error;
pub mod i18n;
pub mod identity;
pub mod layout;
pub mod lookup;
pub mod policy;
pub mod types;
