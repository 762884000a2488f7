//! Catalog decoding.
//!
//! The store serves its catalog as a JavaScript file:
//! - a generated-code comment
//! - a `var gemstoreCatalog =` assignment
//! - a JSON object keyed by item id
//!
//! Records stay as raw JSON so unknown fields survive persistence untouched.
//! `ItemRecord` is a read-only view over the handful of fields the diff and
//! report stages look at.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

const GENERATED_COMMENT: &str = "// automatically generated";
const ASSIGNMENT_PREFIX: &str = "var gemstoreCatalog =";

pub type ItemId = String;

/// Full storefront state at one point in time, keyed by item id in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogSnapshot {
    items: Map<String, Value>,
}

impl CatalogSnapshot {
    pub fn new(items: Map<String, Value>) -> Self {
        CatalogSnapshot { items }
    }

    /// Build a snapshot from an already decoded document, rejecting non-objects.
    pub fn from_value(value: Value) -> std::result::Result<Self, Value> {
        match value {
            Value::Object(items) => Ok(CatalogSnapshot { items }),
            other => Err(other),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<ItemRecord<'_>> {
        self.items.get(id).map(ItemRecord::new)
    }

    /// Items in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ItemRecord<'_>)> {
        self.items
            .iter()
            .map(|(id, raw)| (id.as_str(), ItemRecord::new(raw)))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}

/// Borrowed view of one catalog entry. Every field is optional; absent or
/// wrongly typed values read as `None`.
#[derive(Debug, Clone, Copy)]
pub struct ItemRecord<'a> {
    raw: &'a Value,
}

impl<'a> ItemRecord<'a> {
    pub fn new(raw: &'a Value) -> Self {
        ItemRecord { raw }
    }

    pub fn raw(&self) -> &'a Value {
        self.raw
    }

    pub fn name(&self) -> Option<&'a str> {
        self.raw.get("name").and_then(Value::as_str)
    }

    pub fn image_hash(&self) -> Option<&'a str> {
        self.raw.get("imageHash").and_then(Value::as_str)
    }

    /// `start` of the first lifespan interval under the first category key.
    ///
    /// Only the first category is consulted: when it has no intervals the
    /// result is `None` even if a later category has some.
    pub fn first_lifespan_start(&self) -> Option<&'a str> {
        let lifespans = self.raw.get("categoryLifespans")?.as_object()?;
        let (_, intervals) = lifespans.iter().next()?;
        intervals
            .as_array()?
            .first()?
            .get("start")
            .and_then(Value::as_str)
    }
}

/// Strip the JavaScript wrapper from a fetched catalog file and decode it.
pub fn parse(raw: &str) -> Result<CatalogSnapshot> {
    let stripped = raw
        .replace(GENERATED_COMMENT, "")
        .replace(ASSIGNMENT_PREFIX, "");

    let value: Value = serde_json::from_str(&stripped)
        .map_err(|e| Error::MalformedCatalog(e.to_string()))?;

    CatalogSnapshot::from_value(value).map_err(|other| {
        Error::MalformedCatalog(format!(
            "expected a JSON object at the top level, found {}",
            kind_of(&other)
        ))
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
