use super::*;

async fn seeded(names: &[(&str, &str)]) -> Storage {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let drafts: Vec<ItemDraft> = names
        .iter()
        .map(|(name, quantity)| ItemDraft::new(*name, *quantity))
        .collect();
    storage.insert_items(&drafts).await.expect("seed");
    storage
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("temp dir");
    let db_path = temp_root.path().join("nested").join("inventory.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn insert_assigns_increasing_identifiers_and_timestamps() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let inserted = storage
        .insert_items(&[ItemDraft::new("Rice", "1kg"), ItemDraft::new("Beans", "2 cans")])
        .await
        .expect("insert");

    assert_eq!(inserted.len(), 2);
    assert!(inserted[0].id < inserted[1].id);
    assert_eq!(inserted[1].name, "Beans");
    assert!(inserted.iter().all(|item| item.created_at.is_some()));
}

#[tokio::test]
async fn lists_by_identifier_descending() {
    let storage = seeded(&[("Rice", "1kg"), ("Beans", "2"), ("Salt", "500g")]).await;
    let items = storage
        .list_items(ItemColumn::Id, SortDirection::Descending)
        .await
        .expect("list");
    let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["Salt", "Beans", "Rice"]);
}

#[tokio::test]
async fn lists_by_name_ascending() {
    let storage = seeded(&[("Salt", "1"), ("Beans", "2"), ("Rice", "3")]).await;
    let items = storage
        .list_items(ItemColumn::Name, SortDirection::Ascending)
        .await
        .expect("list");
    let names: Vec<&str> = items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(names, ["Beans", "Rice", "Salt"]);
}

#[tokio::test]
async fn update_rewrites_both_fields_in_place() {
    let storage = seeded(&[("Rice", "1kg")]).await;
    let id = storage
        .list_items(ItemColumn::Id, SortDirection::Ascending)
        .await
        .expect("list")[0]
        .id
        .clone();
    let raw_id = id.as_i64().expect("integer id");

    let updated = storage
        .update_item(raw_id, &ItemPatch::from(ItemDraft::new("Brown rice", "3kg")))
        .await
        .expect("update")
        .expect("row exists");
    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "Brown rice");
    assert_eq!(updated.quantity, "3kg");

    let missing = storage
        .update_item(raw_id + 100, &ItemPatch::from(ItemDraft::new("x", "y")))
        .await
        .expect("update");
    assert!(missing.is_none());
}

#[tokio::test]
async fn partial_update_keeps_columns_not_sent() {
    let storage = seeded(&[("Rice", "1kg")]).await;
    let id = storage
        .list_items(ItemColumn::Id, SortDirection::Ascending)
        .await
        .expect("list")[0]
        .id
        .as_i64()
        .expect("integer id");

    let patch = ItemPatch {
        name: None,
        quantity: Some("3kg".to_string()),
    };
    let updated = storage
        .update_item(id, &patch)
        .await
        .expect("update")
        .expect("row exists");
    assert_eq!(updated.name, "Rice");
    assert_eq!(updated.quantity, "3kg");
}

#[test]
fn id_ordering_has_no_duplicate_tie_break() {
    assert_eq!(order_clause(ItemColumn::Id, SortDirection::Descending), "id DESC");
    assert_eq!(
        order_clause(ItemColumn::Name, SortDirection::Ascending),
        "name ASC, id ASC"
    );
}

#[tokio::test]
async fn delete_removes_only_the_targeted_row() {
    let storage = seeded(&[("Rice", "1kg"), ("Beans", "2")]).await;
    let items = storage
        .list_items(ItemColumn::Id, SortDirection::Ascending)
        .await
        .expect("list");

    let first_id = items[0].id.as_i64().expect("integer id");
    let removed = storage
        .delete_item(first_id)
        .await
        .expect("delete")
        .expect("row existed");
    assert_eq!(removed.name, "Rice");

    let remaining = storage
        .list_items(ItemColumn::Id, SortDirection::Ascending)
        .await
        .expect("list");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Beans");

    assert!(storage.delete_item(first_id).await.expect("delete").is_none());
}

#[test]
fn wire_column_names_map_to_sortable_columns() {
    assert_eq!(ItemColumn::from_wire("id"), Some(ItemColumn::Id));
    assert_eq!(ItemColumn::from_wire("nombre"), Some(ItemColumn::Name));
    assert_eq!(ItemColumn::from_wire("cantidad"), Some(ItemColumn::Quantity));
    assert_eq!(ItemColumn::from_wire("name"), None);
}
