//! Route definitions for the caller's dashboard layout.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard_layout;
use crate::state::AppState;

/// Routes merged at the API root.
///
/// ```text
/// GET      /dashboard-layout  -> show
/// PUT/POST /dashboard-layout  -> save
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/dashboard-layout",
        get(dashboard_layout::show)
            .put(dashboard_layout::save)
            .post(dashboard_layout::save),
    )
}
