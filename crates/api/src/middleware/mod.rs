//! Request extractors.
//!
//! - [`locale::RequestLocale`] -- language negotiated from `Accept-Language`.
//! - [`auth::AuthUser`] -- the authenticated, active actor behind a Bearer token.

pub mod auth;
pub mod locale;
