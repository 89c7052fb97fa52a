//! Route definitions for the `/users` resource and its nested contacts.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{contacts, preferences, users};
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET, POST    /                                  -> list, create
/// GET, PUT     /{id}                              -> show, update
/// POST         /{id}/deactivate                   -> deactivate
/// GET, POST    /{id}/emails                       -> list_emails, add_email
/// PUT          /{id}/emails/{email_id}/primary    -> set_primary_email
/// DELETE       /{id}/emails/{email_id}            -> delete_email
/// GET, POST    /{id}/phones                       -> list_phones, add_phone
/// DELETE       /{id}/phones/{phone_id}            -> delete_phone
/// GET, PUT     /{id}/preference                   -> preference show, update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/{id}", get(users::show).put(users::update))
        .route("/{id}/deactivate", post(users::deactivate))
        .route(
            "/{id}/emails",
            get(contacts::list_emails).post(contacts::add_email),
        )
        .route(
            "/{id}/emails/{email_id}/primary",
            put(contacts::set_primary_email),
        )
        .route("/{id}/emails/{email_id}", delete(contacts::delete_email))
        .route(
            "/{id}/phones",
            get(contacts::list_phones).post(contacts::add_phone),
        )
        .route("/{id}/phones/{phone_id}", delete(contacts::delete_phone))
        .route(
            "/{id}/preference",
            get(preferences::show).put(preferences::update),
        )
}
