//! Product Module
//!
//! Catalog records, query parameters and pagination metadata.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// == Public Constants ==
/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 8;

/// Upper bound on a requested page size
pub const MAX_PAGE_SIZE: u32 = 50;

// == Product ==
/// A catalog record. Prices are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub picture_url: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

/// A product that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub picture_url: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

impl NewProduct {
    /// Attaches an id.
    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            picture_url: self.picture_url,
            product_type: self.product_type,
            brand: self.brand,
            quantity_in_stock: self.quantity_in_stock,
        }
    }
}

// == Order By ==
/// Sort order of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderBy {
    #[default]
    Name,
    Price,
    PriceDesc,
}

impl OrderBy {
    /// Wire name, also used as the key segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Name => "name",
            OrderBy::Price => "price",
            OrderBy::PriceDesc => "priceDesc",
        }
    }

    /// Parses a wire name. Anything unrecognised sorts by name.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "price" => OrderBy::Price,
            "priceDesc" => OrderBy::PriceDesc,
            _ => OrderBy::Name,
        }
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Product Query Params ==
/// One catalog query, in canonical form.
///
/// The search term is trimmed and lower-cased, filters are lower-cased and
/// kept in sorted sets, and page values are clamped. Two params that select
/// the same products therefore compare equal and derive the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductQueryParams {
    search_term: Option<String>,
    order_by: OrderBy,
    brands: BTreeSet<String>,
    types: BTreeSet<String>,
    page_number: u32,
    page_size: u32,
}

impl Default for ProductQueryParams {
    fn default() -> Self {
        Self {
            search_term: None,
            order_by: OrderBy::Name,
            brands: BTreeSet::new(),
            types: BTreeSet::new(),
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search term. Blank terms clear it.
    pub fn with_search(mut self, term: impl AsRef<str>) -> Self {
        let term = term.as_ref().trim().to_lowercase();
        self.search_term = (!term.is_empty()).then_some(term);
        self
    }

    pub fn with_order(mut self, order_by: OrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn with_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.brands = canonical_set(brands);
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.types = canonical_set(types);
        self
    }

    /// Sets the page cursor. Zero is raised to one; size is capped at
    /// [`MAX_PAGE_SIZE`].
    pub fn with_page(mut self, page_number: u32, page_size: u32) -> Self {
        self.page_number = page_number.max(1);
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Builds params from the comma-separated query-string form.
    pub fn from_wire(
        search_term: Option<&str>,
        order_by: Option<&str>,
        brands: Option<&str>,
        types: Option<&str>,
        page_number: Option<u32>,
        page_size: Option<u32>,
    ) -> Self {
        Self::new()
            .with_search(search_term.unwrap_or_default())
            .with_order(order_by.map(OrderBy::parse).unwrap_or_default())
            .with_brands(split_csv(brands))
            .with_types(split_csv(types))
            .with_page(
                page_number.unwrap_or(1),
                page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            )
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn order_by(&self) -> OrderBy {
        self.order_by
    }

    pub fn brands(&self) -> &BTreeSet<String> {
        &self.brands
    }

    pub fn types(&self) -> &BTreeSet<String> {
        &self.types
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items to skip for this page.
    pub fn offset(&self) -> usize {
        (self.page_number as usize - 1) * self.page_size as usize
    }
}

fn canonical_set<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| value.as_ref().trim().to_lowercase())
        .filter(|value| !value.is_empty())
        .collect()
}

fn split_csv(raw: Option<&str>) -> Vec<&str> {
    raw.map(|value| value.split(',').collect())
        .unwrap_or_default()
}

// == Pagination Metadata ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMetadata {
    pub total_count: u64,
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl PaginationMetadata {
    /// Derives the page count from the total.
    pub fn new(total_count: u64, current_page: u32, page_size: u32) -> Self {
        let page_size = page_size.max(1);
        Self {
            total_count,
            current_page,
            page_size,
            total_pages: total_count.div_ceil(page_size as u64) as u32,
        }
    }
}

// == Page ==
/// One page of results plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub metadata: PaginationMetadata,
}

// == Filters ==
/// Distinct brands and types present in the catalog, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub brands: Vec<String>,
    pub types: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_by_parse() {
        assert_eq!(OrderBy::parse("price"), OrderBy::Price);
        assert_eq!(OrderBy::parse("priceDesc"), OrderBy::PriceDesc);
        assert_eq!(OrderBy::parse("name"), OrderBy::Name);
        assert_eq!(OrderBy::parse("rating"), OrderBy::Name);
        assert_eq!(OrderBy::parse(""), OrderBy::Name);
    }

    #[test]
    fn test_params_defaults() {
        let params = ProductQueryParams::new();
        assert_eq!(params.search_term(), None);
        assert_eq!(params.order_by(), OrderBy::Name);
        assert!(params.brands().is_empty());
        assert!(params.types().is_empty());
        assert_eq!(params.page_number(), 1);
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_params_canonicalize_filters() {
        let a = ProductQueryParams::new().with_brands(["React", "angular", " NetCore "]);
        let b = ProductQueryParams::new().with_brands(["netcore", "ANGULAR", "react", "react"]);

        assert_eq!(a, b);
        assert_eq!(
            a.brands().iter().collect::<Vec<_>>(),
            vec!["angular", "netcore", "react"]
        );
    }

    #[test]
    fn test_params_blank_search_is_absent() {
        let params = ProductQueryParams::new().with_search("   ");
        assert_eq!(params.search_term(), None);

        let params = ProductQueryParams::new().with_search("  Blue Hat ");
        assert_eq!(params.search_term(), Some("blue hat"));
    }

    #[test]
    fn test_params_page_clamping() {
        let params = ProductQueryParams::new().with_page(0, 0);
        assert_eq!(params.page_number(), 1);
        assert_eq!(params.page_size(), 1);

        let params = ProductQueryParams::new().with_page(3, 500);
        assert_eq!(params.page_size(), MAX_PAGE_SIZE);
        assert_eq!(params.offset(), 2 * MAX_PAGE_SIZE as usize);
    }

    #[test]
    fn test_params_from_wire() {
        let params = ProductQueryParams::from_wire(
            Some("boot"),
            Some("priceDesc"),
            Some("react,angular,"),
            None,
            Some(2),
            Some(10),
        );

        assert_eq!(params.search_term(), Some("boot"));
        assert_eq!(params.order_by(), OrderBy::PriceDesc);
        assert_eq!(params.brands().len(), 2);
        assert!(params.types().is_empty());
        assert_eq!(params.page_number(), 2);
        assert_eq!(params.page_size(), 10);
    }

    #[test]
    fn test_pagination_metadata_total_pages() {
        assert_eq!(PaginationMetadata::new(25, 1, 10).total_pages, 3);
        assert_eq!(PaginationMetadata::new(20, 1, 10).total_pages, 2);
        assert_eq!(PaginationMetadata::new(1, 1, 10).total_pages, 1);
        assert_eq!(PaginationMetadata::new(0, 1, 10).total_pages, 0);
    }

    #[test]
    fn test_product_serializes_type_field() {
        let product = NewProduct {
            name: "Blue Hat".to_string(),
            description: "A hat".to_string(),
            price: 1500,
            picture_url: "/images/hat.png".to_string(),
            product_type: "Hats".to_string(),
            brand: "NetCore".to_string(),
            quantity_in_stock: 3,
        }
        .with_id(9);

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["type"], "Hats");
        assert_eq!(json["pictureUrl"], "/images/hat.png");
        assert_eq!(json["quantityInStock"], 3);
    }
}
