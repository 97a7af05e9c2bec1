use json_catalog::{Catalog, NewProduct, ProductPatch};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), json_catalog::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::temp_dir().join("json_catalog_demo_products.json");
    let _ = std::fs::remove_file(&path);
    let mut catalog = Catalog::open(&path);

    // create
    let wisky = catalog.create(NewProduct::new("Wisky", "12 años", 5000.0, "img1-jpg", "w1", 50))?;
    let cerveza = catalog.create(NewProduct::new("Cerveza", "SOLERA", 4000.0, "img2-jpg", "c1", 30))?;

    // rejected: stock is zero
    if let Err(e) = catalog.create(NewProduct::new("Vino", "Malbec", 3000.0, "img3-jpg", "v1", 0)) {
        println!("rejected: {e}");
    }

    println!("all products:");
    for p in catalog.list_all() {
        println!("  {p:?}");
    }
    println!("by id {wisky}: {:?}", catalog.get_by_id(wisky));

    // update / delete
    catalog.update(wisky, ProductPatch::new().price(5500.0).stock(60))?;
    catalog.delete(cerveza)?;
    if let Err(e) = catalog.delete(cerveza) {
        println!("second delete: {e}");
    }

    let contents = std::fs::read_to_string(catalog.path())?;
    println!("\nOn-disk JSON:\n{contents}");

    let _ = std::fs::remove_file(&path);
    Ok(())
}
