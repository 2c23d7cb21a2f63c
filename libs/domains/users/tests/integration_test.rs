//! Integration tests for the Users domain
//!
//! These run the service and repository against a real `FileStore` in a
//! temporary directory to check that:
//! - the collection round-trips through the file system
//! - blobs in the stored JSON shape are read back unchanged
//! - edits and deletes persist across store handles

use core_config::{SearchConfig, StorageConfig};
use domain_users::*;
use local_storage::{FileStore, KeyValueStore};
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestStorageDir, assertions::*};

fn input(builder: &TestDataBuilder, name: &str) -> UserInput {
    UserInput {
        name: name.to_string(),
        image_url: builder.image_url(name),
        company: Company::Reliance,
        role: Role::Developer,
        verified: false,
        status: Status::Active,
    }
}

fn file_service(dir: &TestStorageDir) -> UserService<StoredUserRepository<FileStore>> {
    let store = Arc::new(FileStore::new(dir.path()));
    UserService::new(StoredUserRepository::new(store))
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
async fn test_create_then_get_by_id() {
    let dir = TestStorageDir::new();
    let builder = TestDataBuilder::from_test_name("create_then_get");
    let repo = StoredUserRepository::new(Arc::new(FileStore::new(dir.path())));

    let user = User::with_id(builder.user_id(), input(&builder, "Ann"));
    repo.create(user.clone()).await.unwrap();

    let fetched = assert_some(
        repo.get_by_id(&builder.user_id()).await.unwrap(),
        "created user should exist",
    );
    assert_id_eq(&fetched.id, &user.id, "fetched user id");
    assert_eq!(fetched, user);
}

#[tokio::test]
async fn test_remove_then_get_by_id_is_absent() {
    let dir = TestStorageDir::new();
    let builder = TestDataBuilder::from_test_name("remove_then_get");
    let repo = StoredUserRepository::new(Arc::new(FileStore::new(dir.path())));

    let keep = User::with_id(builder.nth_user_id(1), input(&builder, "Keep"));
    let gone = User::with_id(builder.nth_user_id(2), input(&builder, "Gone"));
    repo.create(keep.clone()).await.unwrap();
    repo.create(gone.clone()).await.unwrap();

    assert!(repo.remove_by_id(&gone.id).await.unwrap());

    assert_none(repo.get_by_id(&gone.id).await.unwrap(), "removed user");
    assert_eq!(repo.list().await.unwrap(), vec![keep]);
}

#[tokio::test]
async fn test_list_on_empty_storage() {
    let dir = TestStorageDir::new();
    let repo = StoredUserRepository::new(Arc::new(FileStore::new(dir.path().join("empty"))));

    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reads_blob_written_in_stored_shape() {
    let dir = TestStorageDir::new();
    let store = Arc::new(FileStore::new(dir.path()));
    store
        .set_item(
            "USER",
            r#"[
                {"id":"b1","name":"Bob","imageUrl":"https://x.io/bob.png","company":"Hire you","role":"Hr Manager","verified":true,"status":"Idle"},
                {"id":"a1","name":"Ann","imageUrl":"data:image/png;base64,AAAA","company":"Opportunity","role":"UI Designer","verified":false,"status":"Banned"}
            ]"#,
        )
        .await
        .unwrap();

    let repo = StoredUserRepository::new(store);
    let users = repo.list().await.unwrap();

    assert_eq!(users.len(), 2);
    assert_eq!(users[0].company, Company::HireYou);
    assert_eq!(users[0].role, Role::HrManager);
    assert_eq!(users[1].role, Role::UiDesigner);
    assert_eq!(users[1].status, Status::Banned);
}

#[tokio::test]
async fn test_corrupt_file_lists_as_empty() {
    let dir = TestStorageDir::new();
    std::fs::write(dir.path().join("USER.json"), "[{\"id\": 1").unwrap();

    let service = file_service(&dir);
    assert!(service.list_users(&UserQuery::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_entry_does_not_cost_valid_users_on_write() {
    let dir = TestStorageDir::new();
    let builder = TestDataBuilder::from_test_name("unknown_entry");
    std::fs::write(
        dir.path().join("USER.json"),
        r#"[
            {"id":"a1","name":"Ann","imageUrl":"https://x.io/ann.png","company":"Reliance","role":"Leader","verified":true,"status":"Active"},
            {"id":"z9","name":"Zed","imageUrl":"https://x.io/zed.png","company":"Acme","role":"Leader","verified":false,"status":"Active"}
        ]"#,
    )
    .unwrap();

    let service = file_service(&dir);
    service.create_user(input(&builder, "Carl")).await.unwrap();

    let reopened = file_service(&dir);
    let users = reopened.list_users(&UserQuery::new()).await.unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Carl"]);

    let raw = std::fs::read_to_string(dir.path().join("USER.json")).unwrap();
    assert!(raw.contains("Acme"));
}

// ============================================================================
// Service Tests
// ============================================================================

#[tokio::test]
async fn test_edit_preserves_id_and_replaces_fields() {
    let dir = TestStorageDir::new();
    let builder = TestDataBuilder::from_test_name("edit_preserves_id");
    let service = file_service(&dir);

    let created = service.create_user(input(&builder, "Ann")).await.unwrap();

    let replacement = UserInput {
        name: "Annette".to_string(),
        image_url: "data:image/svg;base64,PHN2Zz4=".to_string(),
        company: Company::HireYou,
        role: Role::Leader,
        verified: true,
        status: Status::Idle,
    };
    service
        .update_user(&created.id, replacement.clone())
        .await
        .unwrap();

    // Fresh handle on the same directory
    let reopened = file_service(&dir);
    let stored = reopened.get_user(&created.id).await.unwrap();

    assert_id_eq(&stored.id, &created.id, "edited user id");
    assert_eq!(stored.to_input(), replacement);
    assert_eq!(reopened.list_users(&UserQuery::new()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_ascending_sort_by_name() {
    let dir = TestStorageDir::new();
    let builder = TestDataBuilder::from_test_name("ascending_sort");
    let service = file_service(&dir);

    service.create_user(input(&builder, "Bob")).await.unwrap();
    service.create_user(input(&builder, "Ann")).await.unwrap();

    let users = service
        .list_users(&UserQuery::new().order(SortOrder::Ascending))
        .await
        .unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Bob"]);
}

#[tokio::test]
async fn test_search_no_returns_unverified_users() {
    let dir = TestStorageDir::new();
    let builder = TestDataBuilder::from_test_name("search_unverified");
    let service = file_service(&dir);

    let mut verified = input(&builder, "Vera");
    verified.verified = true;
    service.create_user(verified).await.unwrap();
    service.create_user(input(&builder, "Uma")).await.unwrap();

    let users = service
        .list_users(&UserQuery::new().search("No"))
        .await
        .unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "Uma");
}

#[tokio::test]
async fn test_delete_missing_user_is_not_found() {
    let dir = TestStorageDir::new();
    let builder = TestDataBuilder::from_test_name("delete_missing");
    let service = file_service(&dir);

    let result = service.delete_user(&builder.user_id()).await;
    assert!(matches!(result, Err(UserError::NotFound(_))));
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn test_repository_from_file_config() {
    let dir = TestStorageDir::new();
    let builder = TestDataBuilder::from_test_name("from_config");

    let mut config = StorageConfig::file(dir.path());
    config.key = "PEOPLE".to_string();

    let service = UserService::new(StoredUserRepository::from_config(&config));
    service.create_user(input(&builder, "Ann")).await.unwrap();

    assert!(dir.path().join("PEOPLE.json").exists());
    assert!(!dir.path().join("USER.json").exists());
}

#[tokio::test(start_paused = true)]
async fn test_debounced_search_with_default_config() {
    let builder = TestDataBuilder::from_test_name("debounced_search");
    let service = UserService::new(StoredUserRepository::in_memory());
    for name in ["Ann", "Anders", "Bob"] {
        service.create_user(input(&builder, name)).await.unwrap();
    }

    let config = SearchConfig::default();
    let mut session = service.search(config.debounce, SortOrder::Ascending);
    for term in ["a", "an", "and"] {
        session.set_term(term);
    }

    let users = session.next_results().await.unwrap().unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Anders"]);
}
