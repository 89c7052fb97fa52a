//! Repository layer: zero-sized structs with async CRUD methods.
//!
//! Each repository takes `&PgPool` and returns `Result<T, sqlx::Error>`.

pub mod contact_repo;
pub mod dashboard_layout_repo;
pub mod group_repo;
pub mod preference_repo;
pub mod theme_repo;
pub mod user_repo;

pub use contact_repo::ContactRepo;
pub use dashboard_layout_repo::DashboardLayoutRepo;
pub use group_repo::GroupRepo;
pub use preference_repo::PreferenceRepo;
pub use theme_repo::ThemeRepo;
pub use user_repo::UserRepo;
