//! BigCommerce v3 catalog wire types and the gateway's projected DTOs.
//!
//! Every response body arrives wrapped in `{ "data": ..., "meta": ... }`;
//! [`Envelope`] captures that pattern generically. [`Product`] types only
//! the subset the gateway exposes and keeps the remaining fields in a
//! flattened map, so a read-merge-write cycle writes back the complete
//! record it fetched.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Generic `{ data, meta }` wrapper used by all catalog endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub per_page: i64,
    #[serde(default)]
    pub current_page: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default)]
    pub links: Option<Links>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub current: Option<String>,
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// A full upstream product record.
///
/// The typed fields are the ones the gateway reads or merges; everything
/// else BigCommerce returns (50+ fields) rides along in `rest` untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub weight: Decimal,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub brand_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub inventory_level: i32,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// The narrowed product view the gateway exposes on reads.
///
/// `brand_id` is deliberately not resolved to a brand name: the upstream
/// list response omits the name, and resolving it would cost one upstream
/// call per item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub sku: String,
    pub weight: Decimal,
    pub price: Decimal,
    pub brand_id: i64,
    pub inventory_level: i32,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            product_type: product.product_type.clone(),
            sku: product.sku.clone(),
            weight: product.weight,
            price: product.price,
            brand_id: product.brand_id,
            inventory_level: product.inventory_level,
        }
    }
}

/// Caller-supplied body for product creation. All fields are required;
/// the adapter rejects the request locally when any is missing or zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub product_type: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub weight: Decimal,
    #[serde(default)]
    pub inventory_level: i32,
    #[serde(default)]
    pub brand_name: String,
}

/// Sentinel meaning "inventory level not supplied" in a [`ProductPatch`].
///
/// Zero is a legal inventory level, so the integer field needs a value
/// outside the domain; strings use empty and decimals use zero.
pub const INVENTORY_UNCHANGED: i32 = -1;

fn inventory_unchanged() -> i32 {
    INVENTORY_UNCHANGED
}

/// Field-sparse product update. Empty strings, zero decimals, and the
/// `-1` inventory sentinel all mean "leave unchanged".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub product_type: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub weight: Decimal,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "inventory_unchanged")]
    pub inventory_level: i32,
}

impl Default for ProductPatch {
    fn default() -> Self {
        Self {
            name: String::new(),
            product_type: String::new(),
            sku: String::new(),
            weight: Decimal::ZERO,
            price: Decimal::ZERO,
            inventory_level: INVENTORY_UNCHANGED,
        }
    }
}

impl ProductPatch {
    /// Overlays the supplied fields onto `product`, field by field.
    ///
    /// Returns `false` when nothing was supplied, in which case `product`
    /// is untouched and no upstream write should be attempted. The
    /// product's identity is never part of the patch.
    pub fn apply_to(&self, product: &mut Product) -> bool {
        let mut changed = false;

        if !self.name.trim().is_empty() {
            product.name = self.name.clone();
            changed = true;
        }
        if !self.product_type.trim().is_empty() {
            product.product_type = self.product_type.clone();
            changed = true;
        }
        if !self.sku.trim().is_empty() {
            product.sku = self.sku.clone();
            changed = true;
        }
        if self.weight != Decimal::ZERO {
            product.weight = self.weight;
            changed = true;
        }
        if self.price != Decimal::ZERO {
            product.price = self.price;
            changed = true;
        }
        if self.inventory_level != INVENTORY_UNCHANGED {
            product.inventory_level = self.inventory_level;
            changed = true;
        }

        changed
    }
}

// ---------------------------------------------------------------------------
// Brands
// ---------------------------------------------------------------------------

/// A full upstream brand record; same flattening strategy as [`Product`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// Body for brand creation. Only `name` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewBrand {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The narrowed brand view returned by single-brand reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandSummary {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

/// A product image record as returned by the images endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: i64,
    #[serde(default)]
    pub product_id: i64,
    #[serde(default)]
    pub is_thumbnail: bool,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_file: Option<String>,
    #[serde(default)]
    pub url_zoom: Option<String>,
    #[serde(default)]
    pub url_standard: Option<String>,
    #[serde(default)]
    pub url_thumbnail: Option<String>,
    #[serde(default)]
    pub url_tiny: Option<String>,
    #[serde(default)]
    pub date_modified: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample_product() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": 77,
            "name": "Smith Journal 13",
            "type": "physical",
            "sku": "SM-13",
            "weight": "1.5",
            "price": "25.00",
            "brand_id": 38,
            "inventory_level": 5,
            "is_visible": true,
            "categories": [18, 19],
            "custom_url": { "url": "/smith-journal-13/", "is_customized": false }
        }))
        .expect("sample product deserializes")
    }

    #[test]
    fn product_keeps_untyped_fields_through_roundtrip() {
        let product = sample_product();
        assert_eq!(product.rest["is_visible"], serde_json::json!(true));

        let json = serde_json::to_value(&product).expect("serialize");
        assert_eq!(json["categories"], serde_json::json!([18, 19]));
        assert_eq!(json["sku"], "SM-13");
        assert_eq!(json["custom_url"]["url"], "/smith-journal-13/");
    }

    #[test]
    fn product_summary_projects_the_gateway_subset() {
        let product = sample_product();
        let summary = ProductSummary::from(&product);
        assert_eq!(summary.id, 77);
        assert_eq!(summary.brand_id, 38);
        assert_eq!(summary.price, Decimal::new(2500, 2));
        let json = serde_json::to_value(&summary).expect("serialize");
        assert!(json.get("categories").is_none(), "projection drops extras");
    }

    #[test]
    fn patch_defaults_mean_unchanged() {
        let patch = ProductPatch::default();
        let mut product = sample_product();
        let before = serde_json::to_value(&product).expect("serialize");
        assert!(!patch.apply_to(&mut product));
        let after = serde_json::to_value(&product).expect("serialize");
        assert_eq!(before, after, "no-op patch must not touch the record");
    }

    #[test]
    fn patch_missing_inventory_deserializes_to_sentinel() {
        let patch: ProductPatch = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(patch.inventory_level, INVENTORY_UNCHANGED);
    }

    #[test]
    fn patch_applies_only_supplied_fields() {
        let patch = ProductPatch {
            name: "Smith Journal 14".to_owned(),
            price: Decimal::new(2999, 2),
            ..ProductPatch::default()
        };
        let mut product = sample_product();
        assert!(patch.apply_to(&mut product));
        assert_eq!(product.name, "Smith Journal 14");
        assert_eq!(product.price, Decimal::new(2999, 2));
        assert_eq!(product.sku, "SM-13", "unsupplied fields keep their value");
        assert_eq!(product.inventory_level, 5);
    }

    #[test]
    fn patch_can_set_inventory_to_zero() {
        let patch = ProductPatch {
            inventory_level: 0,
            ..ProductPatch::default()
        };
        let mut product = sample_product();
        assert!(patch.apply_to(&mut product));
        assert_eq!(product.inventory_level, 0);
    }

    #[test]
    fn patch_never_changes_identity() {
        let patch = ProductPatch {
            name: "renamed".to_owned(),
            ..ProductPatch::default()
        };
        let mut product = sample_product();
        patch.apply_to(&mut product);
        assert_eq!(product.id, 77);
    }

    #[test]
    fn whitespace_only_strings_count_as_unsupplied() {
        let patch = ProductPatch {
            name: "   ".to_owned(),
            ..ProductPatch::default()
        };
        let mut product = sample_product();
        assert!(!patch.apply_to(&mut product));
    }

    #[test]
    fn new_product_serializes_type_field_name() {
        let product = NewProduct {
            name: "Towel".to_owned(),
            product_type: "physical".to_owned(),
            ..NewProduct::default()
        };
        let json = serde_json::to_value(&product).expect("serialize");
        assert_eq!(json["type"], "physical");
    }

    #[test]
    fn pagination_meta_deserializes() {
        let envelope: Envelope<Vec<Brand>> = serde_json::from_value(serde_json::json!({
            "data": [{ "id": 1, "name": "Acme" }],
            "meta": {
                "pagination": {
                    "total": 36, "count": 36, "per_page": 50,
                    "current_page": 1, "total_pages": 1,
                    "links": { "current": "?page=1&limit=50" }
                }
            }
        }))
        .expect("deserialize");
        let pagination = envelope
            .meta
            .and_then(|m| m.pagination)
            .expect("pagination present");
        assert_eq!(pagination.total, 36);
        assert_eq!(
            pagination.links.and_then(|l| l.current).as_deref(),
            Some("?page=1&limit=50")
        );
    }
}
