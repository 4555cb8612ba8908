use items_core::db::migrations::latest_version;
use items_core::db::open_db_in_memory;
use items_core::{
    ErrorKind, ItemDraft, ItemId, ItemRepository, ItemService, RepoError, SqliteItemRepository,
};
use rusqlite::Connection;

fn draft(name: &str, description: &str) -> ItemDraft {
    ItemDraft::new(name, description).unwrap()
}

#[test]
fn create_and_get_roundtrip_returns_trimmed_values() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let id = repo.create_item(&draft("  Alice ", " Engineer\t")).unwrap();

    let loaded = repo.get_item(id).unwrap();
    assert_eq!(loaded.item_id, id);
    assert_eq!(loaded.name, "Alice");
    assert_eq!(loaded.description, "Engineer");
}

#[test]
fn get_missing_item_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let err = repo.get_item(ItemId(42)).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(ItemId(42))));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn list_returns_items_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let ids: Vec<ItemId> = ["first", "second", "third"]
        .into_iter()
        .map(|name| repo.create_item(&draft(name, "desc")).unwrap())
        .collect();

    let items = repo.list_items().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(
        items.iter().map(|item| item.item_id).collect::<Vec<_>>(),
        ids
    );
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(items[0].name, "first");
    assert_eq!(items[2].name, "third");
}

#[test]
fn list_on_empty_store_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    assert!(repo.list_items().unwrap().is_empty());
}

#[test]
fn update_replaces_fields_and_keeps_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let id = repo.create_item(&draft("Desk", "Oak")).unwrap();
    repo.update_item(id, &draft("Standing desk", "Walnut")).unwrap();

    let loaded = repo.get_item(id).unwrap();
    assert_eq!(loaded.item_id, id);
    assert_eq!(loaded.name, "Standing desk");
    assert_eq!(loaded.description, "Walnut");
    assert_eq!(repo.count_items().unwrap(), 1);
}

#[test]
fn update_not_found_does_not_create_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let err = repo.update_item(ItemId(7), &draft("ghost", "row")).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(ItemId(7))));
    assert_eq!(repo.count_items().unwrap(), 0);
}

#[test]
fn second_delete_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let id = repo.create_item(&draft("Lamp", "Desk lamp")).unwrap();
    repo.delete_item(id).unwrap();

    let err = repo.delete_item(id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(found) if found == id));
    assert!(matches!(repo.get_item(id), Err(RepoError::NotFound(_))));
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let first = repo.create_item(&draft("a", "a")).unwrap();
    let second = repo.create_item(&draft("b", "b")).unwrap();
    repo.delete_item(second).unwrap();

    let third = repo.create_item(&draft("c", "c")).unwrap();
    assert!(third > second);
    assert!(second > first);
}

#[test]
fn read_rejects_rows_violating_item_invariant() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO items (name, description) VALUES ('   ', 'blank name');",
        [],
    )
    .unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();

    let err = repo.list_items().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert_eq!(err.kind(), ErrorKind::StoreFailure);
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteItemRepository::try_new(&conn).unwrap();
    let service = ItemService::new(repo);

    let id = service.create_item(&draft("from", "service")).unwrap();
    service.update_item(id, &draft("updated", "service")).unwrap();

    let fetched = service.get_item(id).unwrap();
    assert_eq!(fetched.name, "updated");
    assert_eq!(service.list_items().unwrap(), vec![fetched]);

    service.delete_item(id).unwrap();
    assert_eq!(service.count_items().unwrap(), 0);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteItemRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_items_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteItemRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("items"))
    ));
}

#[test]
fn repository_rejects_connection_missing_description_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE items (
            item_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteItemRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "items",
            column: "description"
        })
    ));
}
