use json_catalog::{Catalog, Error, NewProduct, ProductPatch};
use std::path::PathBuf;
use tempfile::TempDir;

fn temp_catalog() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let path = dir.path().join("products.json");
    (dir, path)
}

fn product(code: &str) -> NewProduct {
    NewProduct::new("Wisky", "12 años", 5000.0, "img1-jpg", code, 50)
}

#[test]
fn open_missing_file_starts_empty() {
    let (_dir, path) = temp_catalog();
    let catalog = Catalog::open(&path);
    assert!(catalog.list_all().is_empty());
    assert!(!path.exists());
}

#[test]
fn open_empty_file_starts_empty() {
    let (_dir, path) = temp_catalog();
    std::fs::write(&path, "").unwrap();
    let catalog = Catalog::builder(&path).strict(true).build().unwrap();
    assert!(catalog.is_empty());
}

#[test]
fn reload_restores_records_and_continues_ids() {
    let (_dir, path) = temp_catalog();
    {
        let mut catalog = Catalog::open(&path);
        for i in 0..4 {
            catalog.create(product(&format!("w{i}"))).unwrap();
        }
        catalog.delete(2).unwrap();
        catalog
            .update(3, ProductPatch::new().title("Ron").set("origin", "CU".into()))
            .unwrap();
    }

    let mut catalog = Catalog::open(&path);
    let ids: Vec<u64> = catalog.list_all().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
    let third = catalog.get_by_id(3).unwrap();
    assert_eq!(third.title, "Ron");
    assert_eq!(third.extra.get("origin"), Some(&serde_json::json!("CU")));

    assert_eq!(catalog.create(product("w9")).unwrap(), 5);
}

#[test]
fn file_is_pretty_printed_array() {
    let (_dir, path) = temp_catalog();
    let mut catalog = Catalog::open(&path);
    catalog.create(product("w1")).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with('['));
    assert!(raw.contains("\n  {"));

    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &value[0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["title"], "Wisky");
    assert_eq!(first["code"], "w1");
    assert_eq!(first["stock"], 50);
    assert_eq!(first["price"], 5000.0);
}

#[test]
fn compact_output_when_configured() {
    let (_dir, path) = temp_catalog();
    let mut catalog = Catalog::builder(&path).pretty(false).build().unwrap();
    catalog.create(product("w1")).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains('\n'));
}

#[test]
fn loads_file_written_by_hand() {
    let (_dir, path) = temp_catalog();
    std::fs::write(
        &path,
        r#"[
  {"title":"Wisky","description":"12 años","price":5000,"thumbnail":"img1-jpg","code":"w1","stock":50,"id":1},
  {"title":"Cerveza","description":"SOLERA","price":4000,"thumbnail":"img2-jpg","code":"c1","stock":30,"id":7}
]"#,
    )
    .unwrap();

    let mut catalog = Catalog::builder(&path).strict(true).build().unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.get_by_id(7).unwrap().price, 4000.0);
    assert_eq!(catalog.create(product("w2")).unwrap(), 8);
}

#[test]
fn corrupt_file_falls_back_to_empty() {
    let (_dir, path) = temp_catalog();
    std::fs::write(&path, "{ not json").unwrap();
    let catalog = Catalog::open(&path);
    assert!(catalog.is_empty());
    // nothing written until the first mutation
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
}

#[test]
fn strict_mode_reports_corrupt_file() {
    let (_dir, path) = temp_catalog();
    std::fs::write(&path, "{ not json").unwrap();
    let err = Catalog::builder(&path).strict(true).build().unwrap_err();
    assert!(matches!(err, Error::Deserialize(_)));
}

#[test]
fn strict_mode_reports_wrong_shape() {
    let (_dir, path) = temp_catalog();
    std::fs::write(&path, r#"[{"id":1,"title":"x"}]"#).unwrap();
    let err = Catalog::builder(&path).strict(true).build().unwrap_err();
    assert!(matches!(err, Error::Deserialize(_)));
}

#[test]
fn empty_path_is_config_error() {
    let err = Catalog::builder("").build().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn write_failure_is_reported_and_memory_keeps_change() {
    let dir = tempfile::tempdir().expect("failed to create tempdir");
    let path = dir.path().join("no_such_dir").join("products.json");
    let mut catalog = Catalog::open(&path);

    let err = catalog.create(product("w1")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(catalog.len(), 1);
    assert!(catalog.contains(1));

    // once the directory exists a flush catches the file up
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    catalog.flush().unwrap();
    let reopened = Catalog::open(&path);
    assert_eq!(reopened.len(), 1);
}

#[test]
fn no_temp_file_left_behind() {
    let (dir, path) = temp_catalog();
    let mut catalog = Catalog::open(&path);
    catalog.create(product("w1")).unwrap();
    catalog.delete(1).unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["products.json".to_string()]);
    assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
}

#[test]
fn reserved_keys_in_patch_extras_keep_file_loadable() {
    let (_dir, path) = temp_catalog();
    let mut catalog = Catalog::open(&path);
    catalog.create(product("w1")).unwrap();
    catalog.create(product("w2")).unwrap();

    let err = catalog
        .update(1, ProductPatch::new().set("id", serde_json::json!(2)))
        .unwrap_err();
    assert_eq!(err, Error::ImmutableField("id"));

    let p = catalog
        .update(1, ProductPatch::new().set("title", serde_json::json!("Ron")))
        .unwrap();
    assert_eq!(p.title, "Ron");
    assert!(p.extra.is_empty());

    let reopened = Catalog::builder(&path).strict(true).build().unwrap();
    assert_eq!(reopened.len(), 2);
    assert_eq!(reopened.get_by_id(1).unwrap().title, "Ron");
    assert_eq!(reopened.get_by_id(2).unwrap().code, "w2");
}

#[test]
fn reserved_keys_in_new_product_extras_keep_file_loadable() {
    let (_dir, path) = temp_catalog();
    let mut catalog = Catalog::open(&path);
    let mut p = product("w1");
    p.extra.insert("id".into(), serde_json::json!(42));
    p.extra.insert("price".into(), serde_json::json!("free"));
    p.extra.insert("origin".into(), serde_json::json!("Escocia"));
    let id = catalog.create(p).unwrap();
    assert_eq!(id, 1);

    let reopened = Catalog::builder(&path).strict(true).build().unwrap();
    let stored = reopened.get_by_id(1).unwrap();
    assert_eq!(stored.price, 5000.0);
    assert_eq!(stored.extra.len(), 1);
    assert_eq!(stored.extra["origin"], "Escocia");
}

#[test]
fn non_finite_prices_never_reach_the_file() {
    let (_dir, path) = temp_catalog();
    let mut catalog = Catalog::open(&path);
    catalog.create(product("w1")).unwrap();

    let mut inf = product("w2");
    inf.price = f64::INFINITY;
    assert!(matches!(
        catalog.create(inf),
        Err(Error::Validation { field: "price", .. })
    ));
    assert!(matches!(
        catalog.update(1, ProductPatch::new().price(f64::NAN)),
        Err(Error::Validation { field: "price", .. })
    ));
    assert!(matches!(
        catalog.update(1, ProductPatch::new().price(f64::NEG_INFINITY).stock(1)),
        Err(Error::Validation { field: "price", .. })
    ));
    // a rejected patch changes nothing, stock included
    assert_eq!(catalog.get_by_id(1).unwrap().stock, 50);

    let reopened = Catalog::builder(&path).strict(true).build().unwrap();
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.get_by_id(1).unwrap().price, 5000.0);
}
