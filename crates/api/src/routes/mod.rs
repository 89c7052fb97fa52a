pub mod auth;
pub mod dashboard_layout;
pub mod groups;
pub mod health;
pub mod themes;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/login                                   login (public)
/// /auth/refresh                                 refresh (public)
/// /auth/logout                                  logout
/// /auth/password                                change password
/// /auth/me                                      current user
///
/// /dashboard-layout                             get, save (own layout)
///
/// /users                                        list, create
/// /users/{id}                                   get, update
/// /users/{id}/deactivate                        soft delete
/// /users/{id}/emails                            list, add
/// /users/{id}/emails/{email_id}                 delete
/// /users/{id}/emails/{email_id}/primary         make primary
/// /users/{id}/phones                            list, add
/// /users/{id}/phones/{phone_id}                 delete
/// /users/{id}/preference                        get, update
///
/// /groups                                       list, create
/// /groups/{id}                                  get, update, delete
///
/// /themes                                       list, create
/// /themes/{id}                                  update, delete
/// /themes/{id}/default                          make default
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(dashboard_layout::router())
        .nest("/users", users::router())
        .nest("/groups", groups::router())
        .nest("/themes", themes::router())
}
