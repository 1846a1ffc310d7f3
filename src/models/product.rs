// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Availability label stored next to `stock`. Always derived, never sent by clients.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
pub enum ProductStatus {
    #[serde(rename = "In Stock")]
    #[sqlx(rename = "In Stock")]
    InStock,
    #[serde(rename = "Out of Stock")]
    #[sqlx(rename = "Out of Stock")]
    OutOfStock,
}

impl ProductStatus {
    pub fn from_stock(stock: i64) -> Self {
        if stock > 0 {
            ProductStatus::InStock
        } else {
            ProductStatus::OutOfStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::InStock => "In Stock",
            ProductStatus::OutOfStock => "Out of Stock",
        }
    }
}

// Row shape matches the `products` table; the frontend reads these names directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Laptop")]
    pub name: String,
    #[schema(example = "pcs")]
    pub unit: String,
    #[schema(example = "Electronics")]
    pub category: String,
    #[schema(example = "Dell")]
    pub brand: String,
    #[schema(example = 25)]
    pub stock: i64,
    pub status: ProductStatus,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("This field is required.".into());
        return Err(err);
    }
    Ok(())
}

/// Body of `POST /api/products` and `PUT /api/products/{id}`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProductPayload {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Laptop")]
    pub name: String,

    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "pcs")]
    pub unit: String,

    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Electronics")]
    pub category: String,

    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Dell")]
    pub brand: String,

    #[validate(range(min = 0, message = "Stock cannot be negative."))]
    #[schema(example = 25)]
    pub stock: i64,
}

/// Column values for an insert or a full update, status already derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub unit: String,
    pub category: String,
    pub brand: String,
    pub stock: i64,
    pub status: ProductStatus,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        unit: impl Into<String>,
        category: impl Into<String>,
        brand: impl Into<String>,
        stock: i64,
    ) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            category: category.into(),
            brand: brand.into(),
            stock,
            status: ProductStatus::from_stock(stock),
        }
    }
}

impl From<ProductPayload> for NewProduct {
    fn from(payload: ProductPayload) -> Self {
        NewProduct::new(
            payload.name.trim(),
            payload.unit.trim(),
            payload.category.trim(),
            payload.brand.trim(),
            payload.stock,
        )
    }
}

// Query string of `GET /api/products`. Values stay strings so a malformed
// `page` or `limit` falls back to the default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Substring matched against the product name.
    pub search: Option<String>,
    /// Exact category; "All" disables the filter.
    pub category: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    /// Page size, clamped to 1..=100.
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total_count: i64) -> i64 {
        (total_count + self.limit - 1) / self.limit
    }
}

/// Integer prefix of `raw` ("12abc" -> 12), `None` when there is none.
pub(crate) fn parse_leading_int(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    let end = raw
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    raw[..end].parse().ok()
}

impl ProductQuery {
    pub fn filter(&self) -> ProductFilter {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != "All")
            .map(str::to_string);
        ProductFilter { search, category }
    }

    pub fn pagination(&self) -> Pagination {
        let page = parse_leading_int(self.page.as_deref()).unwrap_or(1).max(1);
        let limit = parse_leading_int(self.limit.as_deref())
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        Pagination { page, limit }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_count: i64,
    pub current_page: i64,
    pub total_pages: i64,
    pub items_per_page: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Product deleted successfully")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, limit: Option<&str>) -> ProductQuery {
        ProductQuery {
            page: page.map(str::to_string),
            limit: limit.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn status_follows_sign_of_stock() {
        assert_eq!(ProductStatus::from_stock(1), ProductStatus::InStock);
        assert_eq!(ProductStatus::from_stock(0), ProductStatus::OutOfStock);
        assert_eq!(ProductStatus::from_stock(-3), ProductStatus::OutOfStock);
    }

    #[test]
    fn status_serializes_as_label() {
        let json = serde_json::to_string(&ProductStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"Out of Stock\"");
    }

    #[test]
    fn pagination_defaults() {
        let p = query(None, None).pagination();
        assert_eq!(p, Pagination { page: 1, limit: 10 });
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn pagination_clamps_out_of_range_values() {
        assert_eq!(query(Some("0"), Some("500")).pagination(), Pagination { page: 1, limit: 100 });
        assert_eq!(query(Some("-4"), Some("0")).pagination(), Pagination { page: 1, limit: 1 });
    }

    #[test]
    fn pagination_ignores_garbage() {
        assert_eq!(query(Some("abc"), Some("")).pagination(), Pagination { page: 1, limit: 10 });
        // Leading digits are honored, like "3rd" -> 3.
        assert_eq!(query(Some("3rd"), Some("25 ")).pagination(), Pagination { page: 3, limit: 25 });
    }

    #[test]
    fn offset_and_total_pages() {
        let p = Pagination { page: 3, limit: 10 };
        assert_eq!(p.offset(), 20);
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(21), 3);
    }

    #[test]
    fn filter_drops_all_and_blank_values() {
        let q = ProductQuery {
            search: Some("  ".into()),
            category: Some("All".into()),
            ..Default::default()
        };
        assert_eq!(q.filter(), ProductFilter::default());

        let q = ProductQuery {
            search: Some(" lap ".into()),
            category: Some("Electronics".into()),
            ..Default::default()
        };
        assert_eq!(
            q.filter(),
            ProductFilter {
                search: Some("lap".into()),
                category: Some("Electronics".into())
            }
        );
    }

    #[test]
    fn payload_conversion_derives_status() {
        let payload = ProductPayload {
            name: " Mouse ".into(),
            unit: "pcs".into(),
            category: "Accessories".into(),
            brand: "Logitech".into(),
            stock: 0,
        };
        let new_product = NewProduct::from(payload);
        assert_eq!(new_product.name, "Mouse");
        assert_eq!(new_product.status, ProductStatus::OutOfStock);
    }

    #[test]
    fn payload_validation_rejects_negative_stock_and_blank_names() {
        let payload = ProductPayload {
            name: "   ".into(),
            unit: "pcs".into(),
            category: "Accessories".into(),
            brand: "Logitech".into(),
            stock: -1,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("stock"));
    }
}
