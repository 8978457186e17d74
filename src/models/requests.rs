//! Request DTOs for the catalog API
//!
//! Defines the structure of incoming query strings and request bodies.

use serde::Deserialize;

use crate::catalog::{NewProduct, Product, ProductQueryParams};

/// Query string of `GET /api/products`.
///
/// `brands` and `types` are comma-separated lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsQuery {
    pub search_term: Option<String>,
    pub order_by: Option<String>,
    pub brands: Option<String>,
    pub types: Option<String>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl ProductsQuery {
    /// Canonical query params for the cache.
    pub fn to_params(&self) -> ProductQueryParams {
        ProductQueryParams::from_wire(
            self.search_term.as_deref(),
            self.order_by.as_deref(),
            self.brands.as_deref(),
            self.types.as_deref(),
            self.page_number,
            self.page_size,
        )
    }
}

/// Request body for `POST /api/products`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub picture_url: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

impl CreateProductRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_fields(
            &self.name,
            self.price,
            &self.product_type,
            &self.brand,
            self.quantity_in_stock,
        )
    }

    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
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

/// Request body for `PUT /api/products`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub picture_url: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

impl UpdateProductRequest {
    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        if self.id < 1 {
            return Some("Id must be positive".to_string());
        }
        validate_fields(
            &self.name,
            self.price,
            &self.product_type,
            &self.brand,
            self.quantity_in_stock,
        )
    }

    pub fn into_product(self) -> Product {
        Product {
            id: self.id,
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

fn validate_fields(
    name: &str,
    price: i64,
    product_type: &str,
    brand: &str,
    quantity_in_stock: i32,
) -> Option<String> {
    if name.trim().is_empty() {
        return Some("Name cannot be empty".to_string());
    }
    if product_type.trim().is_empty() {
        return Some("Type cannot be empty".to_string());
    }
    if brand.trim().is_empty() {
        return Some("Brand cannot be empty".to_string());
    }
    if price < 0 {
        return Some("Price cannot be negative".to_string());
    }
    if quantity_in_stock < 0 {
        return Some("Quantity in stock cannot be negative".to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OrderBy;

    #[test]
    fn test_products_query_to_params() {
        let query = ProductsQuery {
            search_term: Some("Hat".to_string()),
            order_by: Some("priceDesc".to_string()),
            brands: Some("React,Angular".to_string()),
            types: None,
            page_number: Some(2),
            page_size: Some(4),
        };

        let params = query.to_params();
        assert_eq!(params.search_term(), Some("hat"));
        assert_eq!(params.order_by(), OrderBy::PriceDesc);
        assert_eq!(params.brands().len(), 2);
        assert_eq!(params.page_number(), 2);
        assert_eq!(params.page_size(), 4);
    }

    #[test]
    fn test_create_request_deserialize() {
        let json = r#"{"name":"Blue Hat","price":1500,"type":"Hats","brand":"NetCore","quantityInStock":4}"#;
        let req: CreateProductRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.product_type, "Hats");
        assert!(req.description.is_empty());
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let json = r#"{"name":" ","price":1500,"type":"Hats","brand":"NetCore","quantityInStock":4}"#;
        let req: CreateProductRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_some());

        let json = r#"{"id":3,"name":"Hat","price":-1,"type":"Hats","brand":"NetCore","quantityInStock":4}"#;
        let req: UpdateProductRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_some());

        let json = r#"{"id":0,"name":"Hat","price":1,"type":"Hats","brand":"NetCore","quantityInStock":4}"#;
        let req: UpdateProductRequest = serde_json::from_str(json).unwrap();
        assert!(req.validate().is_some());
    }
}
