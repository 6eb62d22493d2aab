//! Search API data model
//!
//! A single canonical definition of the records decoded from a store's
//! search endpoint. Fields the API omits decode to their defaults and
//! unknown fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of search results, decoded from a single API response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchResultPage {
    /// Result-set metadata
    pub attributes: Attributes,

    /// Products on this page, in API order
    pub products: Vec<Product>,

    /// Category facets, kept opaque
    pub categories: Vec<Value>,
}

impl SearchResultPage {
    /// Whether this page carries no products (the end of the catalogue)
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Number of hits the whole search reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub total_hits: u64,
}

/// A single product item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    /// Store-assigned identifier, unique within a store
    pub id: u64,

    pub full_name: String,
    pub brand: String,
    pub brand_id: Option<u64>,
    pub name: String,
    pub name_extra: String,

    /// Canonical link relative to the store front
    pub front_url: String,
    pub absolute_url: String,

    /// Price as formatted by the store; never parsed to a float
    pub gross_price: String,
    pub currency: String,

    /// Raw discount payload, shape varies by campaign
    pub discount: Option<Value>,

    /// Raw promotion payload, shape varies by campaign
    pub promotion: Option<Value>,

    pub availability: Availability,
}

impl Product {
    /// Whether the product can currently be bought
    pub fn is_available(&self) -> bool {
        self.availability.is_available
    }
}

/// Answers whether an item is available to buy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Availability {
    pub is_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_page() {
        let body = r#"{
            "attributes": {"total_hits": 7377},
            "products": [{
                "id": 42,
                "full_name": "Tine Lettmelk 1 l",
                "brand": "Tine",
                "brand_id": 9,
                "name": "Lettmelk",
                "name_extra": "1 l",
                "front_url": "/no/products/42-tine-lettmelk/",
                "absolute_url": "https://oda.com/no/products/42-tine-lettmelk/",
                "gross_price": "21.90",
                "currency": "NOK",
                "discount": {"is_discounted": true, "undiscounted_gross_price": "24.90"},
                "promotion": null,
                "availability": {"is_available": true, "code": "available"},
                "images": []
            }],
            "categories": [{"title": "Meieri"}]
        }"#;

        let page: SearchResultPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.attributes.total_hits, 7377);
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.categories.len(), 1);

        let product = &page.products[0];
        assert_eq!(product.id, 42);
        assert_eq!(product.gross_price, "21.90");
        assert_eq!(product.brand_id, Some(9));
        assert!(product.is_available());
        assert!(product.discount.is_some());
        assert!(product.promotion.is_none());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let page: SearchResultPage =
            serde_json::from_str(r#"{"products": [{"id": 1}]}"#).unwrap();
        assert_eq!(page.attributes.total_hits, 0);
        assert!(page.categories.is_empty());

        let product = &page.products[0];
        assert_eq!(product.id, 1);
        assert_eq!(product.name, "");
        assert!(!product.is_available());
    }

    #[test]
    fn test_empty_object_is_empty_page() {
        let page: SearchResultPage = serde_json::from_str("{}").unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn test_wrong_schema_is_rejected() {
        let result = serde_json::from_str::<SearchResultPage>(r#"{"products": "nope"}"#);
        assert!(result.is_err());
    }
}
