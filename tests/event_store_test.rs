//! PostgreSQL event store integration tests

#![cfg(feature = "postgres")]

use eventpipe::domain::{EventId, EventRepository};
use eventpipe::infrastructure::persistence::{create_pool, run_migrations, DatabaseConfig, PgEventStore};
use sqlx::PgPool;

async fn setup_database() -> PgPool {
    let db_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost/eventpipe_test".to_string());

    let config = DatabaseConfig {
        url: db_url,
        max_connections: 5,
        min_connections: 1,
        connect_timeout: std::time::Duration::from_secs(10),
        idle_timeout: std::time::Duration::from_secs(60),
        max_lifetime: std::time::Duration::from_secs(300),
    };

    let pool = create_pool(&config).await.expect("Failed to create pool");
    run_migrations(&pool).await.expect("Failed to run migrations");
    pool
}

async fn cleanup_database(pool: PgPool) {
    sqlx::query("DELETE FROM events WHERE type LIKE 'test-%'")
        .execute(&pool)
        .await
        .ok();
    pool.close().await;
}

#[tokio::test]
#[ignore] // Requires database
async fn test_insert_assigns_increasing_ids() {
    let pool = setup_database().await;
    let store = PgEventStore::new(pool.clone());

    let first = store.insert("test-click", "btn1").await.expect("insert failed");
    let second = store.insert("test-click", "btn2").await.expect("insert failed");
    assert!(second > first);

    cleanup_database(pool).await;
}

#[tokio::test]
#[ignore] // Requires database
async fn test_list_returns_insertion_order() {
    let pool = setup_database().await;
    let store = PgEventStore::new(pool.clone());

    let mut inserted: Vec<EventId> = Vec::new();
    for i in 0..3 {
        inserted.push(
            store
                .insert("test-view", &format!("page-{}", i))
                .await
                .expect("insert failed"),
        );
    }

    let all = store.list(None).await.expect("list failed");
    let ours: Vec<_> = all.iter().filter(|e| e.event_type == "test-view").collect();
    assert_eq!(ours.len(), 3);
    assert_eq!(ours.iter().map(|e| e.id).collect::<Vec<_>>(), inserted);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));

    cleanup_database(pool).await;
}

#[tokio::test]
#[ignore] // Requires database
async fn test_list_with_limit() {
    let pool = setup_database().await;
    let store = PgEventStore::new(pool.clone());

    for i in 0..3 {
        store
            .insert("test-limit", &format!("{}", i))
            .await
            .expect("insert failed");
    }

    let total = store.count().await.expect("count failed");
    let limited = store.list(Some(2)).await.expect("list failed");
    assert_eq!(limited.len(), 2.min(total as usize));

    let everything = store.list(Some(total + 10)).await.expect("list failed");
    assert_eq!(everything.len() as i64, total);

    cleanup_database(pool).await;
}

#[tokio::test]
#[ignore] // Requires database
async fn test_created_at_is_server_assigned() {
    let pool = setup_database().await;
    let store = PgEventStore::new(pool.clone());

    let before = chrono::Utc::now() - chrono::Duration::seconds(5);
    let id = store.insert("test-time", "x").await.expect("insert failed");

    let stored = store
        .list(None)
        .await
        .expect("list failed")
        .into_iter()
        .find(|e| e.id == id)
        .expect("inserted event missing");
    assert!(stored.created_at >= before);

    cleanup_database(pool).await;
}
