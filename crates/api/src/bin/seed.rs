//! Seed a development database.
//!
//! Creates the `administrators` and `staff` groups, a default and a dark
//! theme, one administrator and `SEED_USER_COUNT` synthetic users spread
//! over the existing non-admin groups. Groups, themes and the administrator are
//! looked up first, so running the seeder twice only adds more synthetic
//! users.
//!
//! | Env Var               | Default     |
//! |-----------------------|-------------|
//! | `DATABASE_URL`        | required    |
//! | `SEED_ADMIN_USERNAME` | `admin`     |
//! | `SEED_ADMIN_PASSWORD` | `password`  |
//! | `SEED_USER_PASSWORD`  | `password`  |
//! | `SEED_USER_COUNT`     | `10`        |

use anyhow::{anyhow, Context};
use erp_core::identity::ADMIN_GROUP;
use erp_core::types::DbId;
use erp_db::factory::UserFactory;
use erp_db::models::group::CreateGroup;
use erp_db::models::theme::CreateTheme;
use erp_db::models::user::CreateUser;
use erp_db::repositories::{GroupRepo, ThemeRepo, UserRepo};
use erp_db::DbPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use erp_api::auth::password::hash_password;

const STAFF_GROUP: &str = "staff";
const DEFAULT_THEME: &str = "Light";
const DARK_THEME: &str = "Dark";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "erp_seed=info,erp_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let admin_username = env_string("SEED_ADMIN_USERNAME", "admin");
    let admin_password = env_string("SEED_ADMIN_PASSWORD", "password");
    let user_password = env_string("SEED_USER_PASSWORD", "password");
    let user_count: usize = env_string("SEED_USER_COUNT", "10")
        .parse()
        .context("SEED_USER_COUNT must be a non-negative integer")?;

    let pool = erp_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    erp_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    // Themes first so new preferences pick up the default.
    ensure_theme(&pool, DEFAULT_THEME, true).await?;
    ensure_theme(&pool, DARK_THEME, false).await?;

    let admin_group = ensure_group(&pool, ADMIN_GROUP).await?;
    ensure_group(&pool, STAFF_GROUP).await?;

    ensure_admin(&pool, &admin_username, &admin_password, admin_group).await?;

    let hash = hash_password(&user_password).map_err(|e| anyhow!("Password hashing failed: {e}"))?;
    let users = UserFactory::new(hash)
        .in_random_group_except(&[ADMIN_GROUP])
        .create_many(&pool, user_count)
        .await
        .context("Failed to create synthetic users")?;
    tracing::info!(count = users.len(), "Seeded synthetic users");

    pool.close().await;
    tracing::info!("Seeding complete");
    Ok(())
}

fn env_string(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

async fn ensure_group(pool: &DbPool, name: &str) -> anyhow::Result<DbId> {
    if let Some(group) = GroupRepo::find_by_name(pool, name).await? {
        return Ok(group.id);
    }
    let group = GroupRepo::create(
        pool,
        &CreateGroup {
            name: name.to_string(),
        },
    )
    .await
    .with_context(|| format!("Failed to create group '{name}'"))?;
    tracing::info!(group_id = group.id, name, "Seeded group");
    Ok(group.id)
}

async fn ensure_theme(pool: &DbPool, name: &str, is_default: bool) -> anyhow::Result<()> {
    let existing = ThemeRepo::list(pool).await?;
    if existing.iter().any(|t| t.name == name) {
        return Ok(());
    }
    // Keep whatever default an operator already picked.
    let is_default = is_default && !existing.iter().any(|t| t.is_default);
    let theme = ThemeRepo::create(
        pool,
        &CreateTheme {
            name: name.to_string(),
            is_default,
        },
    )
    .await
    .with_context(|| format!("Failed to create theme '{name}'"))?;
    tracing::info!(theme_id = theme.id, name, is_default, "Seeded theme");
    Ok(())
}

async fn ensure_admin(
    pool: &DbPool,
    username: &str,
    password: &str,
    group_id: DbId,
) -> anyhow::Result<()> {
    if UserRepo::find_by_username(pool, username).await?.is_some() {
        tracing::info!(username, "Administrator already present");
        return Ok(());
    }

    let password_hash =
        hash_password(password).map_err(|e| anyhow!("Password hashing failed: {e}"))?;
    let admin = UserRepo::create(
        pool,
        &CreateUser {
            name: "Administrator".to_string(),
            username: username.to_string(),
            password_hash,
            avatar: None,
            group_id: Some(group_id),
            email: format!("{username}@example.test"),
            email_verified: true,
        },
    )
    .await
    .context("Failed to create administrator")?;
    tracing::info!(user_id = admin.id, username, "Seeded administrator");
    Ok(())
}
