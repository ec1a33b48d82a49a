//! Tests for the explicit duplicate-resolution pass

mod helpers;

use helpers::{row, setup_inventory_db};
use serde_json::json;
use stk_import::db::assets::{find_asset_id_by_natural_key, load_asset_payload};
use stk_import::db::sites::find_site_id_by_code;
use stk_import::importers::asset::AssetImporter;
use stk_import::importers::site::SiteImporter;
use stk_import::{apply_duplicates, run_import, DuplicateRow};

#[tokio::test]
async fn confirmed_duplicates_overwrite_the_existing_asset() {
    let pool = setup_inventory_db().await;
    let importer = AssetImporter::load(pool.clone()).await.unwrap();

    let first = run_import(
        &importer,
        &[row(&[
            ("siteId", json!(1)),
            ("assetTag", json!("A1")),
            ("notes", json!("original import")),
        ])],
    )
    .await
    .unwrap();
    assert_eq!(first.created, 1);

    // Re-import with changed fields: withheld, nothing written yet
    let second = run_import(
        &importer,
        &[row(&[
            ("siteId", json!(1)),
            ("assetTag", json!("A1")),
            ("serialNumber", json!("SN-42")),
        ])],
    )
    .await
    .unwrap();
    assert_eq!(second.duplicates.len(), 1);

    let id = find_asset_id_by_natural_key(&pool, 1, "A1").await.unwrap().unwrap();
    let before = load_asset_payload(&pool, id).await.unwrap().unwrap();
    assert_eq!(before.notes.as_deref(), Some("original import"));
    assert_eq!(before.serial_number, None);

    // Operator confirms; the overwrite replaces every field
    let applied = apply_duplicates(&importer, &second.duplicates).await.unwrap();
    assert_eq!(applied.updated_count, 1);
    assert!(applied.errors.is_empty());

    let after = load_asset_payload(&pool, id).await.unwrap().unwrap();
    assert_eq!(after.serial_number.as_deref(), Some("SN-42"));
    // Full overwrite, not a merge: the old note is gone
    assert_eq!(after.notes, None);
}

#[tokio::test]
async fn applying_the_same_item_twice_is_idempotent() {
    let pool = setup_inventory_db().await;
    let importer = AssetImporter::load(pool.clone()).await.unwrap();

    run_import(&importer, &[row(&[("siteId", json!(1)), ("assetTag", json!("B1"))])])
        .await
        .unwrap();
    let second = run_import(
        &importer,
        &[row(&[
            ("siteId", json!(1)),
            ("assetTag", json!("B1")),
            ("notes", json!("confirmed overwrite")),
        ])],
    )
    .await
    .unwrap();
    assert_eq!(second.duplicates.len(), 1);

    let once = apply_duplicates(&importer, &second.duplicates).await.unwrap();
    let twice = apply_duplicates(&importer, &second.duplicates).await.unwrap();

    assert_eq!(once.updated_count, 1);
    assert_eq!(twice.updated_count, 1);
    assert!(twice.errors.is_empty(), "second apply must not conflict: {:?}", twice.errors);

    let id = find_asset_id_by_natural_key(&pool, 1, "B1").await.unwrap().unwrap();
    let payload = load_asset_payload(&pool, id).await.unwrap().unwrap();
    assert_eq!(payload.notes.as_deref(), Some("confirmed overwrite"));
}

#[tokio::test]
async fn one_bad_item_does_not_block_the_rest() {
    let pool = setup_inventory_db().await;
    let importer = AssetImporter::load(pool.clone()).await.unwrap();

    run_import(&importer, &[row(&[("siteId", json!(1)), ("assetTag", json!("C1"))])])
        .await
        .unwrap();
    let second = run_import(
        &importer,
        &[row(&[
            ("siteId", json!(1)),
            ("assetTag", json!("C1")),
            ("notes", json!("updated")),
        ])],
    )
    .await
    .unwrap();
    let good = second.duplicates[0].clone();

    let items = vec![
        DuplicateRow {
            row: 4,
            natural_key_summary: "site 1 / tag C9".to_string(),
            existing_id: 123,
            // Not an asset payload at all
            payload: json!({"unexpected": true}),
        },
        good,
    ];

    let applied = apply_duplicates(&importer, &items).await.unwrap();

    assert_eq!(applied.updated_count, 1);
    assert_eq!(applied.errors.len(), 1);
    // Failures stay keyed by the original row number
    assert_eq!(applied.errors[0].row, 4);
}

#[tokio::test]
async fn simplified_site_importer_follows_the_same_flow() {
    let pool = setup_inventory_db().await;
    let importer = SiteImporter::new(pool.clone());

    // 'MAD' is already seeded; 'BCN' is new
    let rows = vec![
        row(&[("Code", json!("BCN")), ("Name", json!("Barcelona"))]),
        row(&[("Code", json!("MAD")), ("Name", json!("Madrid HQ"))]),
        row(&[("Name", json!("no code"))]),
    ];

    let summary = run_import(&importer, &rows).await.unwrap();
    assert_eq!(summary.created, 1);
    assert_eq!(summary.duplicates.len(), 1);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].message, "missing mandatory field 'code'");

    assert!(find_site_id_by_code(&pool, "BCN").await.unwrap().is_some());

    // Confirm the duplicate: Madrid gets its new name
    let applied = apply_duplicates(&importer, &summary.duplicates).await.unwrap();
    assert_eq!(applied.updated_count, 1);

    let name: String = sqlx::query_scalar("SELECT name FROM sites WHERE code = 'MAD'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(name, "Madrid HQ");
}
