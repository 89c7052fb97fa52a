//! Route definitions for the `/groups` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::groups;
use crate::state::AppState;

/// Routes mounted at `/groups`.
///
/// ```text
/// GET, POST          /      -> list, create
/// GET, PUT, DELETE   /{id}  -> show, update, delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(groups::list).post(groups::create))
        .route(
            "/{id}",
            get(groups::show).put(groups::update).delete(groups::delete),
        )
}
