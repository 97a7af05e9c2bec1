//! Catalog entries, creation input and partial updates.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Names of the fields every product must carry, in validation order.
pub const REQUIRED_FIELDS: [&str; 6] = ["title", "description", "price", "thumbnail", "code", "stock"];

/// One catalog entry as held by the store and written to the backing file.
///
/// Keys beyond the six required ones survive in [`extra`](Self::extra) so a
/// file written by another tool round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: u64,
    /// Display name.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Image reference.
    pub thumbnail: String,
    /// Caller-supplied SKU-like code.
    pub code: String,
    /// Units in stock.
    pub stock: i64,
    /// Any additional keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields supplied by the caller when creating a product. The id is not part
/// of it; the store assigns one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewProduct {
    /// Display name.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Unit price.
    pub price: f64,
    /// Image reference.
    pub thumbnail: String,
    /// Caller-supplied SKU-like code.
    pub code: String,
    /// Units in stock.
    pub stock: i64,
    /// Additional keys stored alongside the required ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewProduct {
    /// Shorthand for the common case with no extra keys.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        thumbnail: impl Into<String>,
        code: impl Into<String>,
        stock: i64,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            price,
            thumbnail: thumbnail.into(),
            code: code.into(),
            stock,
            extra: Map::new(),
        }
    }

    /// Build from an untyped JSON object.
    ///
    /// Missing or wrongly-typed required fields are a [`Error::Validation`].
    /// An `id` key is dropped since ids are store-assigned. Anything else ends
    /// up in `extra`. The result still has to pass [`validate`](Self::validate).
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self> {
        let mut extra = fields.clone();
        strip_reserved(&mut extra);
        Ok(Self {
            title: required_text(fields, "title")?,
            description: required_text(fields, "description")?,
            price: required_number(fields, "price")?,
            thumbnail: required_text(fields, "thumbnail")?,
            code: required_text(fields, "code")?,
            stock: required_integer(fields, "stock")?,
            extra,
        })
    }

    /// Reject empty text, a zero or non-finite price, and zero stock. Reports
    /// the first failing field in [`REQUIRED_FIELDS`] order.
    pub fn validate(&self) -> Result<()> {
        check_text("title", &self.title)?;
        check_text("description", &self.description)?;
        check_price(self.price)?;
        if self.price == 0.0 {
            return Err(Error::validation("price", "must be a non-zero number"));
        }
        check_text("thumbnail", &self.thumbnail)?;
        check_text("code", &self.code)?;
        if self.stock == 0 {
            return Err(Error::validation("stock", "must be a non-zero integer"));
        }
        Ok(())
    }

    /// Keys in `extra` that shadow `id` or a required field are dropped; the
    /// typed fields win.
    pub(crate) fn into_product(mut self, id: u64) -> Product {
        strip_reserved(&mut self.extra);
        Product {
            id,
            title: self.title,
            description: self.description,
            price: self.price,
            thumbnail: self.thumbnail,
            code: self.code,
            stock: self.stock,
            extra: self.extra,
        }
    }
}

/// Partial update merged into an existing product. Only the fields that are
/// set get overwritten; the id can never be touched.
///
/// ```
/// use json_catalog::ProductPatch;
///
/// let patch = ProductPatch::new().price(5500.0).stock(60);
/// assert!(!patch.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductPatch {
    /// New display name.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New unit price.
    pub price: Option<f64>,
    /// New image reference.
    pub thumbnail: Option<String>,
    /// New code.
    pub code: Option<String>,
    /// New stock level.
    pub stock: Option<i64>,
    /// Extra keys to overwrite or add.
    pub extra: Map<String, Value>,
}

impl ProductPatch {
    /// Empty patch; applying it changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the price.
    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the thumbnail.
    pub fn thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Set the code.
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the stock level.
    pub fn stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Overwrite or add an extra key.
    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// `true` when applying the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.thumbnail.is_none()
            && self.code.is_none()
            && self.stock.is_none()
            && self.extra.is_empty()
    }

    /// Build from an untyped JSON object. An `id` key is rejected with
    /// [`Error::ImmutableField`]; known keys must have the right type.
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self> {
        let mut patch = Self::new();
        for (key, value) in fields {
            match key.as_str() {
                "id" => return Err(Error::ImmutableField("id")),
                "title" => patch.title = Some(as_text("title", value)?),
                "description" => patch.description = Some(as_text("description", value)?),
                "price" => patch.price = Some(as_number("price", value)?),
                "thumbnail" => patch.thumbnail = Some(as_text("thumbnail", value)?),
                "code" => patch.code = Some(as_text("code", value)?),
                "stock" => patch.stock = Some(as_integer("stock", value)?),
                _ => {
                    patch.extra.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(patch)
    }

    /// Move required-field keys out of `extra` into their typed slots and
    /// check the result. An `id` anywhere is [`Error::ImmutableField`]; a
    /// non-finite price is a [`Error::Validation`]. When a key is given both
    /// through its setter and through [`set`](Self::set), the setter wins.
    pub fn normalize(mut self) -> Result<Self> {
        let routed = Self::from_fields(&std::mem::take(&mut self.extra))?;
        self.title = self.title.or(routed.title);
        self.description = self.description.or(routed.description);
        self.price = self.price.or(routed.price);
        self.thumbnail = self.thumbnail.or(routed.thumbnail);
        self.code = self.code.or(routed.code);
        self.stock = self.stock.or(routed.stock);
        self.extra = routed.extra;
        if let Some(price) = self.price {
            check_price(price)?;
        }
        Ok(self)
    }

    /// Shallow-merge into `product`. Fields the patch leaves unset are kept.
    /// The patch is [normalized](Self::normalize) first; on error `product`
    /// is left untouched.
    pub fn apply(self, product: &mut Product) -> Result<()> {
        let patch = self.normalize()?;
        patch.merge(product);
        Ok(())
    }

    fn merge(self, product: &mut Product) {
        if let Some(v) = self.title {
            product.title = v;
        }
        if let Some(v) = self.description {
            product.description = v;
        }
        if let Some(v) = self.price {
            product.price = v;
        }
        if let Some(v) = self.thumbnail {
            product.thumbnail = v;
        }
        if let Some(v) = self.code {
            product.code = v;
        }
        if let Some(v) = self.stock {
            product.stock = v;
        }
        product.extra.extend(self.extra);
    }
}

fn strip_reserved(extra: &mut Map<String, Value>) {
    extra.remove("id");
    for name in REQUIRED_FIELDS {
        extra.remove(name);
    }
}

// serde_json writes NaN and infinities as `null`, which would not load back.
fn check_price(price: f64) -> Result<()> {
    if !price.is_finite() {
        return Err(Error::validation("price", "must be a finite number"));
    }
    Ok(())
}

fn check_text(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    Ok(())
}

fn required<'a>(fields: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(Error::validation(field, "is missing")),
        Some(v) => Ok(v),
    }
}

fn required_text(fields: &Map<String, Value>, field: &'static str) -> Result<String> {
    as_text(field, required(fields, field)?)
}

fn required_number(fields: &Map<String, Value>, field: &'static str) -> Result<f64> {
    as_number(field, required(fields, field)?)
}

fn required_integer(fields: &Map<String, Value>, field: &'static str) -> Result<i64> {
    as_integer(field, required(fields, field)?)
}

fn as_text(field: &'static str, value: &Value) -> Result<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| Error::validation(field, "must be text"))
}

fn as_number(field: &'static str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| Error::validation(field, "must be a number"))
}

// Integral floats such as `50.0` count as integers.
fn as_integer(field: &'static str, value: &Value) -> Result<i64> {
    value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        })
        .ok_or_else(|| Error::validation(field, "must be an integer"))
}
