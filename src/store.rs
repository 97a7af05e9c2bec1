//! Core catalog type and its builder.

use crate::error::{Error, Result};
use crate::persist::{atomic_write, load, Loaded};
use crate::product::{NewProduct, Product, ProductPatch};
use crate::serializer::{JsonSerializer, Serializer};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Backing file used by [`Catalog::open_default`].
pub const DEFAULT_PATH: &str = "products.json";

/// In-memory product catalog persisted to a single JSON file.
///
/// Products are kept in insertion order. Every successful
/// [`create`](Self::create), [`update`](Self::update) and
/// [`delete`](Self::delete) rewrites the whole file.
///
/// If that write fails the call returns [`Error::Io`] but the in-memory
/// change is kept, so memory and disk disagree until the next successful
/// write (or an explicit [`flush`](Self::flush)).
///
/// Not thread-safe on its own; wrap it in a
/// [`SharedCatalog`](crate::SharedCatalog) when several callers need it.
pub struct Catalog {
    products: Vec<Product>,
    path: PathBuf,
    serializer: JsonSerializer,
    // Highest id ever handed out by this instance. Keeps deleted ids from
    // coming back when the newest product is removed.
    high_water: u64,
}

impl Catalog {
    /// Open the catalog at `path`, loading whatever is there.
    ///
    /// Never fails: a missing file starts an empty catalog, and so does an
    /// unreadable or corrupt one (with a `warn!` diagnostic). Be aware that
    /// in the corrupt case the next mutation overwrites the old file. Use
    /// [`builder`](Self::builder) with `.strict(true)` to get the error
    /// instead.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match Self::builder(&path).build() {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not open catalog, starting empty");
                Self::from_parts(Vec::new(), path, JsonSerializer::pretty())
            }
        }
    }

    /// Open the catalog at [`DEFAULT_PATH`] in the working directory.
    pub fn open_default() -> Self {
        Self::open(DEFAULT_PATH)
    }

    /// Start configuring a catalog. Call [`.build()`](CatalogBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> CatalogBuilder {
        CatalogBuilder::new(path)
    }

    fn from_parts(products: Vec<Product>, path: PathBuf, serializer: JsonSerializer) -> Self {
        let high_water = products.iter().map(|p| p.id).max().unwrap_or(0);
        Self {
            products,
            path,
            serializer,
            high_water,
        }
    }

    fn report_loaded(path: &Path, loaded: Loaded<Product>) -> Vec<Product> {
        match loaded {
            Loaded::Missing => {
                info!(path = %path.display(), "no catalog file yet, starting empty");
                Vec::new()
            }
            Loaded::Items(products) => {
                info!(path = %path.display(), count = products.len(), "catalog loaded");
                products
            }
        }
    }

    // ---- reads ----

    /// All products in insertion order.
    #[must_use]
    pub fn list_all(&self) -> &[Product] {
        &self.products
    }

    /// The product with `id`, or `None` (with a `warn!` diagnostic).
    #[must_use]
    pub fn get_by_id(&self, id: u64) -> Option<&Product> {
        let found = self.products.iter().find(|p| p.id == id);
        if found.is_none() {
            warn!(id, "get_by_id: product not found");
        }
        found
    }

    /// `true` if a product with `id` exists. Logs nothing.
    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.position(id).is_some()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// `true` when the catalog holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The id the next successful [`create`](Self::create) will assign.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        let max_present = self.products.iter().map(|p| p.id).max().unwrap_or(0);
        max_present.max(self.high_water) + 1
    }

    // ---- writes ----

    /// Validate `product`, assign it the next id, append it and persist.
    /// Returns the new id.
    ///
    /// A validation failure leaves the catalog and the file untouched.
    pub fn create(&mut self, product: NewProduct) -> Result<u64> {
        if let Err(e) = product.validate() {
            warn!(error = %e, "create: product rejected");
            return Err(e);
        }
        let id = self.next_id();
        let title = product.title.clone();
        self.products.push(product.into_product(id));
        self.high_water = id;
        info!(id, title = %title, "product created");
        self.persist()?;
        Ok(id)
    }

    /// Like [`create`](Self::create) but from an untyped JSON object, see
    /// [`NewProduct::from_fields`].
    pub fn create_from_fields(&mut self, fields: &Map<String, Value>) -> Result<u64> {
        let product = NewProduct::from_fields(fields).map_err(|e| {
            warn!(error = %e, "create: product rejected");
            e
        })?;
        self.create(product)
    }

    /// Merge `patch` into the product with `id` and persist. Fields the
    /// patch doesn't set are kept, including the id.
    ///
    /// A patch that tries to set `id` (even through
    /// [`ProductPatch::set`]) or a non-finite price is rejected before
    /// anything changes.
    pub fn update(&mut self, id: u64, patch: ProductPatch) -> Result<&Product> {
        let Some(idx) = self.position(id) else {
            warn!(id, "update: product not found");
            return Err(Error::NotFound { id });
        };
        if let Err(e) = patch.apply(&mut self.products[idx]) {
            warn!(id, error = %e, "update: patch rejected");
            return Err(e);
        }
        info!(id, "product updated");
        self.persist()?;
        Ok(&self.products[idx])
    }

    /// Like [`update`](Self::update) but from an untyped JSON object. An `id`
    /// key is rejected with [`Error::ImmutableField`] and nothing changes.
    pub fn update_from_fields(&mut self, id: u64, fields: &Map<String, Value>) -> Result<&Product> {
        let patch = ProductPatch::from_fields(fields).map_err(|e| {
            warn!(id, error = %e, "update: patch rejected");
            e
        })?;
        self.update(id, patch)
    }

    /// Remove the product with `id`, keeping the order of the rest, and
    /// persist. Returns the removed product.
    pub fn delete(&mut self, id: u64) -> Result<Product> {
        let Some(idx) = self.position(id) else {
            warn!(id, "delete: product not found");
            return Err(Error::NotFound { id });
        };
        let removed = self.products.remove(idx);
        info!(id, "product deleted");
        self.persist()?;
        Ok(removed)
    }

    // ---- persistence ----

    /// Write the current product list to disk (atomic temp-file + rename).
    /// Mutations already do this; call it to retry after a failed write.
    pub fn flush(&self) -> Result<()> {
        self.persist()
    }

    // ---- internal ----

    fn position(&self, id: u64) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }

    fn persist(&self) -> Result<()> {
        let bytes = self.serializer.serialize(&self.products)?;
        match atomic_write(&self.path, &bytes) {
            Ok(()) => {
                debug!(path = %self.path.display(), count = self.products.len(), "catalog saved");
                Ok(())
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "catalog save failed, memory and disk now differ");
                Err(e)
            }
        }
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("path", &self.path)
            .field("len", &self.products.len())
            .field("pretty", &self.serializer.is_pretty())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`Catalog`].
///
/// ```rust,no_run
/// use json_catalog::Catalog;
///
/// let catalog = Catalog::builder("products.json")
///     .strict(true)
///     .build()
///     .unwrap();
/// ```
pub struct CatalogBuilder {
    path: PathBuf,
    pretty: bool,
    strict: bool,
}

impl CatalogBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: true,
            strict: false,
        }
    }

    /// Write human-readable JSON with indentation (default: on).
    pub fn pretty(mut self, yes: bool) -> Self {
        self.pretty = yes;
        self
    }

    /// Fail [`build`](Self::build) on an unreadable or corrupt file instead
    /// of starting empty (default: off). A missing file is never an error.
    pub fn strict(mut self, yes: bool) -> Self {
        self.strict = yes;
        self
    }

    /// Load the catalog.
    pub fn build(self) -> Result<Catalog> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Config("catalog path is empty".into()));
        }

        let serializer = if self.pretty {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };

        let products = match load::<Product, _>(&self.path, &serializer) {
            Ok(loaded) => Catalog::report_loaded(&self.path, loaded),
            Err(e) if self.strict => {
                warn!(path = %self.path.display(), error = %e, "could not load catalog");
                return Err(e);
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not load catalog, starting empty");
                Vec::new()
            }
        };

        Ok(Catalog::from_parts(products, self.path, serializer))
    }
}

impl std::fmt::Debug for CatalogBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogBuilder")
            .field("path", &self.path)
            .field("pretty", &self.pretty)
            .field("strict", &self.strict)
            .finish()
    }
}
