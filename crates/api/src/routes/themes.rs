//! Route definitions for the `/themes` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::themes;
use crate::state::AppState;

/// Routes mounted at `/themes`.
///
/// ```text
/// GET, POST     /               -> list, create
/// PUT, DELETE   /{id}           -> update, delete
/// PUT           /{id}/default   -> set_default
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(themes::list).post(themes::create))
        .route("/{id}", put(themes::update).delete(themes::delete))
        .route("/{id}/default", put(themes::set_default))
}
