mod common;

use shortlink::domain::entities::{LinkPatch, NewShortLink};
use shortlink::domain::repositories::LinkRepository;
use shortlink::error::AppError;
use shortlink::infrastructure::persistence::SqliteLinkRepository;
use sqlx::SqlitePool;
use std::sync::Arc;

fn new_link(id: &str, owner: &str) -> NewShortLink {
    NewShortLink {
        id: id.to_string(),
        title: Some("Example".to_string()),
        target_url: "https://example.com".to_string(),
        owner: owner.to_string(),
    }
}

#[sqlx::test]
async fn test_create_link(pool: SqlitePool) {
    common::insert_user(&pool, "alice").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let link = repo.create(new_link("abc123", "alice")).await.unwrap();

    assert_eq!(link.id, "abc123");
    assert_eq!(link.title.as_deref(), Some("Example"));
    assert_eq!(link.target_url, "https://example.com");
    assert_eq!(link.view_count, 0);
    assert_eq!(link.owner, "alice");
}

#[sqlx::test]
async fn test_create_duplicate_id_conflicts(pool: SqlitePool) {
    common::insert_user(&pool, "alice").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    repo.create(new_link("dup", "alice")).await.unwrap();
    let result = repo.create(new_link("dup", "alice")).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_create_with_unknown_owner_fails(pool: SqlitePool) {
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let result = repo.create(new_link("orphan", "nobody")).await;

    assert!(result.is_err());
}

#[sqlx::test]
async fn test_find_by_id(pool: SqlitePool) {
    common::insert_user(&pool, "alice").await;
    common::create_test_link(&pool, "find01", "https://example.com/a", "alice").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let link = repo.find_by_id("find01").await.unwrap().unwrap();
    assert_eq!(link.target_url, "https://example.com/a");
    assert!(link.title.is_none());

    assert!(repo.find_by_id("missing").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_exists(pool: SqlitePool) {
    common::insert_user(&pool, "alice").await;
    common::create_test_link(&pool, "here", "https://example.com", "alice").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    assert!(repo.exists("here").await.unwrap());
    assert!(!repo.exists("gone").await.unwrap());
}

#[sqlx::test]
async fn test_list_by_owner_newest_first(pool: SqlitePool) {
    common::insert_user(&pool, "alice").await;
    common::insert_user(&pool, "bob").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    repo.create(new_link("first", "alice")).await.unwrap();
    repo.create(new_link("second", "alice")).await.unwrap();
    repo.create(new_link("third", "alice")).await.unwrap();
    repo.create(new_link("bobs", "bob")).await.unwrap();

    let links = repo.list_by_owner("alice").await.unwrap();
    let ids: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();

    assert_eq!(ids, vec!["third", "second", "first"]);
    assert!(repo.list_by_owner("carol").await.unwrap().is_empty());
}

#[sqlx::test]
async fn test_update_keeps_absent_fields(pool: SqlitePool) {
    common::insert_user(&pool, "alice").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));
    repo.create(new_link("upd01", "alice")).await.unwrap();

    let patch = LinkPatch {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    let link = repo.update("upd01", patch).await.unwrap();

    assert_eq!(link.id, "upd01");
    assert_eq!(link.title.as_deref(), Some("Renamed"));
    assert_eq!(link.target_url, "https://example.com");
}

#[sqlx::test]
async fn test_update_changes_identifier(pool: SqlitePool) {
    common::insert_user(&pool, "alice").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));
    repo.create(new_link("old_id", "alice")).await.unwrap();

    let patch = LinkPatch {
        id: Some("new_id".to_string()),
        target_url: Some("https://rust-lang.org".to_string()),
        ..Default::default()
    };
    let link = repo.update("old_id", patch).await.unwrap();

    assert_eq!(link.id, "new_id");
    assert_eq!(link.target_url, "https://rust-lang.org");
    assert!(!repo.exists("old_id").await.unwrap());
}

#[sqlx::test]
async fn test_update_to_taken_identifier_conflicts(pool: SqlitePool) {
    common::insert_user(&pool, "alice").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));
    repo.create(new_link("one", "alice")).await.unwrap();
    repo.create(new_link("two", "alice")).await.unwrap();

    let patch = LinkPatch {
        id: Some("two".to_string()),
        ..Default::default()
    };
    let result = repo.update("one", patch).await;

    assert!(matches!(result, Err(AppError::Conflict { .. })));
}

#[sqlx::test]
async fn test_update_missing_link(pool: SqlitePool) {
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    let result = repo.update("nothing", LinkPatch::default()).await;

    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[sqlx::test]
async fn test_delete(pool: SqlitePool) {
    common::insert_user(&pool, "alice").await;
    common::create_test_link(&pool, "del01", "https://example.com", "alice").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool));

    assert!(repo.delete("del01").await.unwrap());
    assert!(!repo.delete("del01").await.unwrap());
    assert!(repo.find_by_id("del01").await.unwrap().is_none());
}

#[sqlx::test]
async fn test_record_view_increments(pool: SqlitePool) {
    common::insert_user(&pool, "alice").await;
    common::create_test_link(&pool, "view01", "https://example.com/v", "alice").await;
    let repo = SqliteLinkRepository::new(Arc::new(pool.clone()));

    for _ in 0..3 {
        let target = repo.record_view("view01").await.unwrap();
        assert_eq!(target.as_deref(), Some("https://example.com/v"));
    }

    assert_eq!(common::view_count(&pool, "view01").await, 3);
}

#[sqlx::test]
async fn test_record_view_unknown_id(pool: SqlitePool) {
    let repo = SqliteLinkRepository::new(Arc::new(pool.clone()));

    assert!(repo.record_view("nope").await.unwrap().is_none());
    assert_eq!(common::link_count(&pool).await, 0);
}
