//! Small product catalog kept in memory and persisted as a JSON file.
//!
//! Every product gets a store-assigned id, one more than the highest id seen
//! so far. Each create, update and delete rewrites the whole backing file as
//! pretty-printed JSON.
//!
//! ```rust,no_run
//! use json_catalog::{Catalog, NewProduct, ProductPatch};
//!
//! let mut catalog = Catalog::open("products.json");
//! let id = catalog
//!     .create(NewProduct::new("Wisky", "12 años", 5000.0, "img1-jpg", "w1", 50))
//!     .unwrap();
//! catalog.update(id, ProductPatch::new().price(5500.0).stock(60)).unwrap();
//! assert_eq!(catalog.get_by_id(id).unwrap().stock, 60);
//! ```
//!
//! **Sharp edge:** [`Catalog::open`] treats an unreadable or corrupt file the
//! same as a missing one and starts empty, so the next write replaces it.
//! Use [`Catalog::builder`] with `strict(true)` if that matters.
//!
//! Diagnostics go through `tracing`; install a subscriber to see them.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod persist;
pub mod product;
pub mod serializer;
pub mod shared;
pub mod store;

pub use error::{Error, Result};
pub use product::{NewProduct, Product, ProductPatch};
pub use shared::SharedCatalog;
pub use store::{Catalog, CatalogBuilder, DEFAULT_PATH};
