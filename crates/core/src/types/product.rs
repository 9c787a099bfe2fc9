//! Catalog product records.
//!
//! Products come from the external content API and are read-only here. Only
//! `_id` is required; every other field defaults when the document omits it,
//! so a half-filled catalog entry still renders.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::cart::CartLineItem;
use super::de;
use super::id::ProductId;

/// A product document as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub title: String,
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "de::price_or_zero"
    )]
    pub price: Decimal,
    /// Pre-discount price, shown struck through.
    #[serde(
        default,
        rename = "originalprice",
        with = "rust_decimal::serde::float_option"
    )]
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub colors: Vec<String>,
    /// Review count.
    #[serde(default)]
    pub reviews: Option<u32>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub code: Option<String>,
    /// Fields the catalog sends that are not modelled above.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Fields a cart line stores outside its `extra` map.
const LINE_FIELDS: [&str; 4] = ["_id", "title", "price", "quantity"];

impl Product {
    /// Snapshot this product into a cart line with quantity 1.
    ///
    /// Title and price are frozen at this moment. Every other field of the
    /// record is copied verbatim into the line's extra fields; unset fields
    /// are left out.
    #[must_use]
    pub fn snapshot(&self) -> CartLineItem {
        let mut extra = match serde_json::to_value(self) {
            Ok(Value::Object(record)) => record,
            _ => Map::new(),
        };
        extra.retain(|key, value| !value.is_null() && !LINE_FIELDS.contains(&key.as_str()));

        CartLineItem {
            id: self.id.clone(),
            title: self.title.clone(),
            price: self.price,
            quantity: 1,
            extra,
        }
    }

    /// Whether the product carries the given tag.
    #[must_use]
    pub fn has_tag(&self, tag: ProductTag) -> bool {
        self.tags.iter().any(|t| t == tag.as_str())
    }
}

/// Merchandising tags driving the "latest products" tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductTag {
    NewArrival,
    BestSeller,
    Trending,
    Featured,
}

impl ProductTag {
    /// All tabs in display order.
    pub const ALL: [Self; 4] = [
        Self::NewArrival,
        Self::BestSeller,
        Self::Trending,
        Self::Featured,
    ];

    /// The tag string stored on catalog documents.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewArrival => "new arrival",
            Self::BestSeller => "best seller",
            Self::Trending => "trending",
            Self::Featured => "featured",
        }
    }
}

impl std::str::FromStr for ProductTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "new arrival" | "newarrival" => Ok(Self::NewArrival),
            "best seller" | "bestseller" => Ok(Self::BestSeller),
            "trending" => Ok(Self::Trending),
            "featured" => Ok(Self::Featured),
            other => Err(format!("unknown product tag: {other}")),
        }
    }
}

/// Pick one representative product per category.
///
/// Categories appear in the order they are first seen; each maps to the first
/// product that lists it.
#[must_use]
pub fn top_categories(products: &[Product]) -> Vec<(String, Product)> {
    let mut picked: Vec<(String, Product)> = Vec::new();
    for product in products {
        for category in &product.categories {
            if !picked.iter().any(|(name, _)| name == category) {
                picked.push((category.clone(), product.clone()));
            }
        }
    }
    picked
}
