//! Record shapes of the `categories` and `products` collections.
//!
//! Field names on the wire are fixed by the data already stored in the
//! database and must not change: `_id`, `name`, `description`, `price`,
//! `stock`, `productCategory`.
//!
//! Every field other than `_id` may be missing from a stored record. Missing
//! fields read as empty or zero so one incomplete record never fails a listing.

use bson::{Bson, oid::ObjectId};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use northwind_core::document::Document;

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Category {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
        }
    }
}

impl Document for Category {
    fn id(&self) -> Option<&ObjectId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn collection_name() -> &'static str {
        "categories"
    }
}

/// A product as stored, with its category as a bare reference.
///
/// The reference is not checked against the `categories` collection on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default, deserialize_with = "whole_number")]
    pub stock: i64,
    #[serde(rename = "productCategory", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ObjectId>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: f64, stock: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
            stock,
            category: None,
        }
    }

    /// Sets the category reference.
    pub fn in_category(mut self, category: ObjectId) -> Self {
        self.category = Some(category);
        self
    }

    /// Replaces the category reference with the resolved category.
    pub fn populate(self, category: Option<Category>) -> PopulatedProduct {
        PopulatedProduct {
            id: self.id,
            name: self.name,
            price: self.price,
            stock: self.stock,
            category,
        }
    }
}

impl Document for Product {
    fn id(&self) -> Option<&ObjectId> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id);
    }

    fn collection_name() -> &'static str {
        "products"
    }
}

/// A product whose `productCategory` holds the full category record.
///
/// `category` is `None` both when the product has no reference and when the
/// reference names a category that no longer exists. Only ever built on read;
/// never written back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulatedProduct {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub price: f64,
    pub stock: i64,
    #[serde(rename = "productCategory")]
    pub category: Option<Category>,
}

/// Reads an integer that other clients may have written as a BSON double.
fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::Int32(value) => Ok(value.into()),
        Bson::Int64(value) => Ok(value),
        Bson::Double(value) if value.fract() == 0.0 => Ok(value as i64),
        other => Err(D::Error::custom(format!("expected a whole number, found {other}"))),
    }
}
