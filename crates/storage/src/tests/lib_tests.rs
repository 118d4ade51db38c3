use super::*;
use atlas_core::favorites::FavoritesBook;
use shared::domain::EventId;

async fn on_disk() -> (tempfile::TempDir, Storage) {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("state/atlas.db").display());
    let storage = Storage::new(&url).await.expect("db");
    (dir, storage)
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_parent_directory_for_file_urls() {
    let (dir, _storage) = on_disk().await;
    assert!(dir.path().join("state/atlas.db").exists());
}

#[tokio::test]
async fn set_value_overwrites_existing_entry() {
    let (_dir, storage) = on_disk().await;
    assert_eq!(storage.get_value("theme").await.expect("get"), None);

    storage.set_value("theme", "dark").await.expect("set");
    storage.set_value("theme", "light").await.expect("overwrite");

    let entry = storage
        .get_entry("theme")
        .await
        .expect("entry")
        .expect("present");
    assert_eq!(entry.value, "light");
    assert!(entry.updated_at <= Utc::now());

    assert!(storage.delete_value("theme").await.expect("delete"));
    assert!(!storage.delete_value("theme").await.expect("delete again"));
}

#[tokio::test]
async fn favorites_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let url = format!("sqlite://{}", dir.path().join("atlas.db").display());

    {
        let storage = Storage::new(&url).await.expect("db");
        let mut book = FavoritesBook::load(storage).await;
        book.toggle(EventId(4)).await.expect("toggle");
        book.toggle(EventId(8)).await.expect("toggle");
    }

    let storage = Storage::new(&url).await.expect("reopen");
    assert_eq!(
        storage.get_value(FAVORITES_KEY).await.expect("get").as_deref(),
        Some("[4,8]")
    );
    let book = FavoritesBook::load(storage).await;
    assert_eq!(book.current().ids(), &[EventId(4), EventId(8)]);
}

#[tokio::test]
async fn corrupt_favorites_entry_loads_empty() {
    let (_dir, storage) = on_disk().await;
    storage
        .set_value(FAVORITES_KEY, "not json")
        .await
        .expect("set");
    let book = FavoritesBook::load(storage).await;
    assert!(book.current().is_empty());
}

#[test]
fn sqlite_path_ignores_memory_urls() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(
        sqlite_path("sqlite://data/atlas.db?mode=rwc"),
        Some(PathBuf::from("data/atlas.db"))
    );
}
