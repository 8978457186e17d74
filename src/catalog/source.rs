//! Query Source Module
//!
//! The source-of-truth contract behind the cache, and an in-memory catalog
//! implementing it.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::catalog::{Filters, NewProduct, OrderBy, Page, PaginationMetadata, Product, ProductQueryParams};
use crate::error::Result;

// == Query Source ==
/// Read side of the catalog.
#[async_trait]
pub trait QuerySource: Send + Sync {
    /// Sorted, filtered, paginated listing.
    async fn query(&self, params: &ProductQueryParams) -> Result<Page<Product>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>>;

    /// Distinct brands and types, each sorted.
    async fn distinct_brands_and_types(&self) -> Result<Filters>;
}

// == Product Repository ==
/// Read and write side of the catalog.
#[async_trait]
pub trait ProductRepository: QuerySource {
    async fn create(&self, product: NewProduct) -> Result<Product>;

    /// Replaces the stored record. Returns `None` if the id is unknown.
    async fn update(&self, product: Product) -> Result<Option<Product>>;

    /// Returns whether a record was removed.
    async fn delete(&self, id: i64) -> Result<bool>;
}

// == In-Memory Catalog ==
#[derive(Debug, Default)]
struct CatalogState {
    products: BTreeMap<i64, Product>,
    next_id: i64,
}

/// Catalog held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog. Ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding `products`, ids assigned in order.
    pub fn with_products(products: impl IntoIterator<Item = NewProduct>) -> Self {
        let mut state = CatalogState::default();
        for product in products {
            state.next_id += 1;
            state
                .products
                .insert(state.next_id, product.with_id(state.next_id));
        }

        Self {
            state: RwLock::new(state),
        }
    }

    /// Creates a catalog holding the demo product set.
    pub fn seeded() -> Self {
        Self::with_products(sample_products())
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.products.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.products.is_empty()
    }
}

#[async_trait]
impl QuerySource for InMemoryCatalog {
    async fn query(&self, params: &ProductQueryParams) -> Result<Page<Product>> {
        let state = self.state.read().await;

        let mut matches: Vec<&Product> = state
            .products
            .values()
            .filter(|product| matches_search(product, params.search_term()))
            .filter(|product| matches_filter(&product.brand, params.brands()))
            .filter(|product| matches_filter(&product.product_type, params.types()))
            .collect();
        matches.sort_by(|a, b| compare(a, b, params.order_by()));

        let metadata = PaginationMetadata::new(
            matches.len() as u64,
            params.page_number(),
            params.page_size(),
        );
        let items = matches
            .into_iter()
            .skip(params.offset())
            .take(params.page_size() as usize)
            .cloned()
            .collect();

        Ok(Page { items, metadata })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn distinct_brands_and_types(&self) -> Result<Filters> {
        let state = self.state.read().await;
        let brands: BTreeSet<&str> = state.products.values().map(|p| p.brand.as_str()).collect();
        let types: BTreeSet<&str> = state
            .products
            .values()
            .map(|p| p.product_type.as_str())
            .collect();

        Ok(Filters {
            brands: brands.into_iter().map(str::to_string).collect(),
            types: types.into_iter().map(str::to_string).collect(),
        })
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalog {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let product = product.with_id(state.next_id);
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, product: Product) -> Result<Option<Product>> {
        let mut state = self.state.write().await;
        match state.products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(Some(product))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.state.write().await.products.remove(&id).is_some())
    }
}

// == Query Helpers ==
fn matches_search(product: &Product, term: Option<&str>) -> bool {
    match term {
        Some(term) => product.name.to_lowercase().contains(term),
        None => true,
    }
}

// Filter values are already lower-cased by the params.
fn matches_filter(value: &str, allowed: &BTreeSet<String>) -> bool {
    allowed.is_empty() || allowed.contains(&value.to_lowercase())
}

fn compare(a: &Product, b: &Product, order_by: OrderBy) -> Ordering {
    let primary = match order_by {
        OrderBy::Name => a.name.cmp(&b.name),
        OrderBy::Price => a.price.cmp(&b.price),
        OrderBy::PriceDesc => b.price.cmp(&a.price),
    };
    primary.then(a.id.cmp(&b.id))
}

// == Demo Data ==
/// The demo product set the server starts with.
pub fn sample_products() -> Vec<NewProduct> {
    let rows: [(&str, i64, &str, &str, i32); 18] = [
        ("Angular Speedster Board 2000", 20000, "Boards", "Angular", 100),
        ("Green Angular Board 3000", 15000, "Boards", "Angular", 100),
        ("Core Board Speed Rush 3", 18000, "Boards", "NetCore", 100),
        ("Net Core Super Board", 30000, "Boards", "NetCore", 100),
        ("React Board Super Whizzy Fast", 25000, "Boards", "React", 100),
        ("Typescript Entry Board", 12000, "Boards", "TypeScript", 100),
        ("Core Blue Hat", 1000, "Hats", "NetCore", 100),
        ("Green React Woolen Hat", 800, "Hats", "React", 100),
        ("Purple React Woolen Hat", 1500, "Hats", "React", 100),
        ("Blue Code Gloves", 1800, "Gloves", "VS Code", 100),
        ("Green Code Gloves", 1500, "Gloves", "VS Code", 100),
        ("Purple React Gloves", 1600, "Gloves", "React", 100),
        ("Green React Gloves", 1400, "Gloves", "React", 100),
        ("Redis Red Boots", 25000, "Boots", "Redis", 100),
        ("Core Red Boots", 18999, "Boots", "NetCore", 100),
        ("Core Purple Boots", 19999, "Boots", "NetCore", 100),
        ("Angular Purple Boots", 15000, "Boots", "Angular", 100),
        ("Angular Blue Boots", 18000, "Boots", "Angular", 100),
    ];

    rows.into_iter()
        .map(|(name, price, product_type, brand, quantity_in_stock)| NewProduct {
            name: name.to_string(),
            description: format!("{} from the {} range.", name, brand),
            price,
            picture_url: format!(
                "/images/products/{}.png",
                name.to_lowercase().replace(' ', "-")
            ),
            product_type: product_type.to_string(),
            brand: brand.to_string(),
            quantity_in_stock,
        })
        .collect()
}
