//! Cached value envelopes.
//!
//! One explicit type per cached shape, each encoded as JSON bytes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::catalog::{Filters, Page, PaginationMetadata, Product};
use crate::error::Result;

// == Envelope Trait ==
/// A value that can be written to and read back from the store.
pub trait Envelope: Serialize + DeserializeOwned + Sized {
    fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

// == Cached Page ==
/// Snapshot of one listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedPage {
    pub items: Vec<Product>,
    pub metadata: PaginationMetadata,
}

impl Envelope for CachedPage {}

impl From<Page<Product>> for CachedPage {
    fn from(page: Page<Product>) -> Self {
        Self {
            items: page.items,
            metadata: page.metadata,
        }
    }
}

impl From<CachedPage> for Page<Product> {
    fn from(cached: CachedPage) -> Self {
        Page {
            items: cached.items,
            metadata: cached.metadata,
        }
    }
}

// == Cached Product ==
/// Snapshot of a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedProduct {
    pub product: Product,
}

impl Envelope for CachedProduct {}

// == Cached Filters ==
/// Snapshot of the brand/type facets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedFilters {
    pub brands: Vec<String>,
    pub types: Vec<String>,
}

impl Envelope for CachedFilters {}

impl From<Filters> for CachedFilters {
    fn from(filters: Filters) -> Self {
        Self {
            brands: filters.brands,
            types: filters.types,
        }
    }
}

impl From<CachedFilters> for Filters {
    fn from(cached: CachedFilters) -> Self {
        Filters {
            brands: cached.brands,
            types: cached.types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            description: "Sample".to_string(),
            price: 1000 + id,
            picture_url: format!("/images/products/{}.png", id),
            product_type: "Boots".to_string(),
            brand: "React".to_string(),
            quantity_in_stock: 5,
        }
    }

    #[test]
    fn test_page_roundtrip_empty() {
        let page = CachedPage {
            items: vec![],
            metadata: PaginationMetadata::new(0, 1, 10),
        };

        let decoded = CachedPage::decode(&page.encode().unwrap()).unwrap();
        assert_eq!(decoded, page);
    }

    #[test]
    fn test_page_roundtrip_single_item() {
        let page = CachedPage {
            items: vec![product(1)],
            metadata: PaginationMetadata::new(1, 1, 10),
        };

        let decoded = CachedPage::decode(&page.encode().unwrap()).unwrap();
        assert_eq!(decoded, page);
    }

    #[test]
    fn test_page_roundtrip_preserves_order() {
        let page = CachedPage {
            items: vec![product(3), product(1), product(2)],
            metadata: PaginationMetadata::new(13, 2, 3),
        };

        let decoded = CachedPage::decode(&page.encode().unwrap()).unwrap();
        let ids: Vec<i64> = decoded.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(decoded.metadata, page.metadata);
    }

    #[test]
    fn test_filters_roundtrip() {
        let filters = CachedFilters {
            brands: vec!["Angular".to_string(), "React".to_string()],
            types: vec!["Boots".to_string()],
        };

        let decoded = CachedFilters::decode(&filters.encode().unwrap()).unwrap();
        assert_eq!(decoded, filters);
    }

    #[test]
    fn test_decode_corrupt_bytes_fails() {
        assert!(CachedPage::decode(b"not json").is_err());
        assert!(CachedPage::decode(b"").is_err());
    }

    #[test]
    fn test_decode_wrong_shape_fails() {
        let filters = CachedFilters {
            brands: vec![],
            types: vec![],
        };
        let bytes = filters.encode().unwrap();

        assert!(CachedPage::decode(&bytes).is_err());
        assert!(CachedProduct::decode(&bytes).is_err());
    }
}
