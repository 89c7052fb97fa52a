//! Integration tests for theme management and the single-default rule.

use erp_db::models::theme::{CreateTheme, UpdateTheme};
use erp_db::repositories::ThemeRepo;
use sqlx::PgPool;

fn theme(name: &str, is_default: bool) -> CreateTheme {
    CreateTheme {
        name: name.to_string(),
        is_default,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_creating_default_demotes_previous(pool: PgPool) {
    let light = ThemeRepo::create(&pool, &theme("light", true)).await.unwrap();
    let dark = ThemeRepo::create(&pool, &theme("dark", true)).await.unwrap();

    assert_eq!(ThemeRepo::count_defaults(&pool).await.unwrap(), 1);
    let default = ThemeRepo::find_default(&pool).await.unwrap().unwrap();
    assert_eq!(default.id, dark.id);

    let light = ThemeRepo::find_by_id(&pool, light.id).await.unwrap().unwrap();
    assert!(!light.is_default);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_set_default_swaps(pool: PgPool) {
    let light = ThemeRepo::create(&pool, &theme("light", true)).await.unwrap();
    let dark = ThemeRepo::create(&pool, &theme("dark", false)).await.unwrap();

    let swapped = ThemeRepo::set_default(&pool, dark.id).await.unwrap().unwrap();
    assert!(swapped.is_default);
    assert_eq!(ThemeRepo::count_defaults(&pool).await.unwrap(), 1);

    // Idempotent on the current default.
    ThemeRepo::set_default(&pool, dark.id).await.unwrap().unwrap();
    assert_eq!(ThemeRepo::count_defaults(&pool).await.unwrap(), 1);

    let light = ThemeRepo::find_by_id(&pool, light.id).await.unwrap().unwrap();
    assert!(!light.is_default);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_set_default_unknown_theme(pool: PgPool) {
    let light = ThemeRepo::create(&pool, &theme("light", true)).await.unwrap();
    assert!(ThemeRepo::set_default(&pool, 9_999).await.unwrap().is_none());

    let default = ThemeRepo::find_default(&pool).await.unwrap().unwrap();
    assert_eq!(default.id, light.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_schema_refuses_second_default(pool: PgPool) {
    ThemeRepo::create(&pool, &theme("light", true)).await.unwrap();
    let result = sqlx::query("INSERT INTO themes (name, is_default) VALUES ('rogue', TRUE)")
        .execute(&pool)
        .await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rename_and_delete(pool: PgPool) {
    let dark = ThemeRepo::create(&pool, &theme("dark", false)).await.unwrap();
    let renamed = ThemeRepo::update(&pool, dark.id, &UpdateTheme { name: Some("midnight".into()) })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.name, "midnight");

    assert!(ThemeRepo::delete(&pool, dark.id).await.unwrap());
    assert!(ThemeRepo::list(&pool).await.unwrap().is_empty());
}
