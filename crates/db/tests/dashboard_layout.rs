//! Integration tests for per-user dashboard layout storage.

use erp_core::layout::{default_layout, validate_layout_config};
use erp_db::factory::UserFactory;
use erp_db::repositories::DashboardLayoutRepo;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_layout_is_none(pool: PgPool) {
    let user = UserFactory::new("hash").create(&pool).await.unwrap();
    let stored = DashboardLayoutRepo::find_by_user(&pool, user.id).await.unwrap();
    assert!(stored.is_none());

    let effective = stored.map(|l| l.layout_config).unwrap_or_else(default_layout);
    assert_eq!(effective[0]["i"], "stats");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_upsert_round_trips(pool: PgPool) {
    let user = UserFactory::new("hash").create(&pool).await.unwrap();
    let config = json!([{ "i": "notes", "x": 0, "y": 0, "w": 6, "h": 3 }]);

    let saved = DashboardLayoutRepo::upsert(&pool, user.id, &config).await.unwrap();
    assert_eq!(saved.layout_config, config);

    let loaded = DashboardLayoutRepo::find_by_user(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(loaded.layout_config, config);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_save_wins_with_single_row(pool: PgPool) {
    let user = UserFactory::new("hash").create(&pool).await.unwrap();
    let first = json!([{ "i": "stats", "x": 0, "y": 0, "w": 12, "h": 4 }]);
    let second = json!([{ "i": "calendar", "x": 6, "y": 0, "w": 6, "h": 6 }]);

    let a = DashboardLayoutRepo::upsert(&pool, user.id, &first).await.unwrap();
    let b = DashboardLayoutRepo::upsert(&pool, user.id, &second).await.unwrap();
    assert_eq!(a.id, b.id);

    assert_eq!(DashboardLayoutRepo::count_for_user(&pool, user.id).await.unwrap(), 1);
    let loaded = DashboardLayoutRepo::find_by_user(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(loaded.layout_config, second);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_layouts_are_per_user(pool: PgPool) {
    let users = UserFactory::new("hash").create_many(&pool, 2).await.unwrap();
    let mine = json!([{ "i": "mine", "x": 0, "y": 0, "w": 1, "h": 1 }]);
    DashboardLayoutRepo::upsert(&pool, users[0].id, &mine).await.unwrap();

    assert!(DashboardLayoutRepo::find_by_user(&pool, users[1].id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_rejected_config_leaves_storage_untouched(pool: PgPool) {
    let user = UserFactory::new("hash").create(&pool).await.unwrap();
    let original = json!([{ "i": "stats", "x": 0, "y": 0, "w": 12, "h": 4 }]);
    DashboardLayoutRepo::upsert(&pool, user.id, &original).await.unwrap();

    assert!(validate_layout_config(Some(json!({ "i": "stats" }))).is_err());

    let loaded = DashboardLayoutRepo::find_by_user(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(loaded.layout_config, original);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_schema_rejects_non_array_config(pool: PgPool) {
    let user = UserFactory::new("hash").create(&pool).await.unwrap();
    let result = DashboardLayoutRepo::upsert(&pool, user.id, &json!({ "i": "stats" })).await;
    assert!(result.is_err());
    assert!(DashboardLayoutRepo::find_by_user(&pool, user.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_concurrent_saves_keep_one_row(pool: PgPool) {
    let user = UserFactory::new("hash").create(&pool).await.unwrap();
    let configs: Vec<_> = (0..8u32)
        .map(|n| json!([{ "i": format!("widget-{n}"), "x": 0, "y": n, "w": 4, "h": 2 }]))
        .collect();

    let mut saves = tokio::task::JoinSet::new();
    for config in configs.clone() {
        let pool = pool.clone();
        let user_id = user.id;
        saves.spawn(async move { DashboardLayoutRepo::upsert(&pool, user_id, &config).await });
    }
    let mut ids = Vec::new();
    while let Some(result) = saves.join_next().await {
        ids.push(result.unwrap().unwrap().id);
    }
    ids.dedup();
    assert_eq!(ids.len(), 1, "every save must hit the same row");

    assert_eq!(DashboardLayoutRepo::count_for_user(&pool, user.id).await.unwrap(), 1);
    let stored = DashboardLayoutRepo::find_by_user(&pool, user.id).await.unwrap().unwrap();
    assert!(configs.contains(&stored.layout_config));
}
