//! Thread-safe handle around a [`Catalog`].

use crate::error::Result;
use crate::product::{NewProduct, Product, ProductPatch};
use crate::store::Catalog;
use parking_lot::{Mutex, MutexGuard};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Cloneable handle that serializes every operation on one [`Catalog`]
/// behind a mutex, file write included.
///
/// Reads hand back owned copies so no lock outlives the call. Use
/// [`lock`](Self::lock) to run several operations under one guard.
///
/// **Single-process only.** Two processes pointing at the same file will
/// overwrite each other's snapshots.
#[derive(Clone)]
pub struct SharedCatalog {
    inner: Arc<Mutex<Catalog>>,
}

impl SharedCatalog {
    /// Wrap an already opened catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(catalog)),
        }
    }

    /// Shorthand for `SharedCatalog::new(Catalog::open(path))`.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::new(Catalog::open(path))
    }

    /// Exclusive access to the underlying catalog.
    pub fn lock(&self) -> MutexGuard<'_, Catalog> {
        self.inner.lock()
    }

    /// See [`Catalog::create`].
    pub fn create(&self, product: NewProduct) -> Result<u64> {
        self.inner.lock().create(product)
    }

    /// Snapshot of all products in insertion order.
    #[must_use]
    pub fn list_all(&self) -> Vec<Product> {
        self.inner.lock().list_all().to_vec()
    }

    /// See [`Catalog::get_by_id`].
    #[must_use]
    pub fn get_by_id(&self, id: u64) -> Option<Product> {
        self.inner.lock().get_by_id(id).cloned()
    }

    /// See [`Catalog::update`]. Returns the product as it is after the merge.
    pub fn update(&self, id: u64, patch: ProductPatch) -> Result<Product> {
        self.inner.lock().update(id, patch).cloned()
    }

    /// See [`Catalog::delete`].
    pub fn delete(&self, id: u64) -> Result<Product> {
        self.inner.lock().delete(id)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// `true` when the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.inner.lock().path().to_path_buf()
    }
}

impl std::fmt::Debug for SharedCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.inner.try_lock() {
            Some(catalog) => std::fmt::Debug::fmt(&*catalog, f),
            None => f.write_str("SharedCatalog { <locked> }"),
        }
    }
}
