//! Product model.
//!
//! Products are validated once at construction and are immutable afterwards.
//!
//! # Validation Rules
//!
//! - `id` and `name` must not be blank
//! - `price` must be finite and strictly positive
//! - `stock` must not be negative

use std::fmt;

use crate::types::ProductId;

/// What kind of product this is, with the detail specific to that kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKind {
    /// A food item with a best-before date.
    Food {
        /// Best-before date as written on the label.
        best_before: String,
    },
    /// A handmade item.
    Craft {
        /// Main material.
        material: String,
    },
}

impl ProductKind {
    /// Human-readable detail line for this kind.
    #[must_use]
    pub fn details(&self) -> String {
        match self {
            Self::Food { best_before } => format!("Best before: {best_before}"),
            Self::Craft { material } => format!("Material: {material}"),
        }
    }
}

/// Unvalidated product fields, as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
    pub producer: String,
    pub kind: ProductKind,
}

/// A validated product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    price: f64,
    category: String,
    stock: u32,
    producer: String,
    kind: ProductKind,
}

impl Product {
    /// Validate `fields` and build a product.
    ///
    /// Nothing is constructed if any rule fails; the first failing rule is
    /// reported, checked in the order id, name, price, stock.
    pub fn new(fields: NewProduct) -> Result<Self, ProductError> {
        let id = ProductId::parse(&fields.id).ok_or(ProductError::EmptyId)?;

        if fields.name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }

        if !fields.price.is_finite() || fields.price <= 0.0 {
            return Err(ProductError::NonPositivePrice(fields.price));
        }

        if fields.stock < 0 {
            return Err(ProductError::NegativeStock(fields.stock));
        }
        let stock =
            u32::try_from(fields.stock).map_err(|_| ProductError::StockOutOfRange(fields.stock))?;

        Ok(Self {
            id,
            name: fields.name,
            price: fields.price,
            category: fields.category,
            stock,
            producer: fields.producer,
            kind: fields.kind,
        })
    }

    /// The product ID.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price, always finite and positive.
    #[must_use]
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// Category label.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Units in stock.
    #[must_use]
    pub const fn stock(&self) -> u32 {
        self.stock
    }

    /// Who made the product.
    #[must_use]
    pub fn producer(&self) -> &str {
        &self.producer
    }

    /// Kind with its kind-specific detail.
    #[must_use]
    pub const fn kind(&self) -> &ProductKind {
        &self.kind
    }

    /// Kind-specific detail line.
    #[must_use]
    pub fn details(&self) -> String {
        self.kind.details()
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ID: {}] {} | ${:.2} | Cat: {} | Stock: {} | Producer: {} | Details: {}",
            self.id,
            self.name,
            self.price,
            self.category,
            self.stock,
            self.producer,
            self.details()
        )
    }
}

/// A product failed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductError {
    /// The ID is blank.
    EmptyId,
    /// The name is blank.
    EmptyName,
    /// The price is zero, negative or not a finite number.
    NonPositivePrice(f64),
    /// The stock is negative.
    NegativeStock(i64),
    /// The stock does not fit the stored counter.
    StockOutOfRange(i64),
}

impl fmt::Display for ProductError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "product id must not be blank"),
            Self::EmptyName => write!(f, "product name must not be blank"),
            Self::NonPositivePrice(price) => {
                write!(f, "price must be positive, got {price}")
            }
            Self::NegativeStock(stock) => {
                write!(f, "stock must not be negative, got {stock}")
            }
            Self::StockOutOfRange(stock) => {
                write!(f, "stock {stock} exceeds the maximum of {}", u32::MAX)
            }
        }
    }
}

impl std::error::Error for ProductError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn honey() -> NewProduct {
        NewProduct {
            id: "A001".to_string(),
            name: "Organic Honey".to_string(),
            price: 25.5,
            category: "Food".to_string(),
            stock: 50,
            producer: "Pure Farm".to_string(),
            kind: ProductKind::Food {
                best_before: "2026-01-01".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_product() {
        let product = Product::new(honey()).expect("valid product");

        assert_eq!(product.id().as_str(), "A001");
        assert_eq!(product.name(), "Organic Honey");
        assert!((product.price() - 25.5).abs() < f64::EPSILON);
        assert_eq!(product.category(), "Food");
        assert_eq!(product.stock(), 50);
        assert_eq!(product.producer(), "Pure Farm");
        assert_eq!(product.details(), "Best before: 2026-01-01");
    }

    #[test]
    fn test_display() {
        let product = Product::new(honey()).expect("valid product");
        assert_eq!(
            product.to_string(),
            "[ID: A001] Organic Honey | $25.50 | Cat: Food | Stock: 50 | Producer: Pure Farm | Details: Best before: 2026-01-01"
        );
    }

    #[test]
    fn test_craft_details() {
        let kind = ProductKind::Craft {
            material: "Clay".to_string(),
        };
        assert_eq!(kind.details(), "Material: Clay");
    }

    #[test]
    fn test_rejects_blank_id() {
        let fields = NewProduct {
            id: "  ".to_string(),
            ..honey()
        };
        assert_eq!(Product::new(fields), Err(ProductError::EmptyId));
    }

    #[test]
    fn test_rejects_blank_name() {
        let fields = NewProduct {
            name: String::new(),
            ..honey()
        };
        assert_eq!(Product::new(fields), Err(ProductError::EmptyName));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        for price in [0.0, -5.0] {
            let fields = NewProduct { price, ..honey() };
            assert_eq!(
                Product::new(fields),
                Err(ProductError::NonPositivePrice(price))
            );
        }

        let fields = NewProduct {
            price: f64::NAN,
            ..honey()
        };
        assert!(matches!(
            Product::new(fields),
            Err(ProductError::NonPositivePrice(_))
        ));
    }

    #[test]
    fn test_rejects_negative_stock() {
        let fields = NewProduct {
            stock: -1,
            ..honey()
        };
        assert_eq!(Product::new(fields), Err(ProductError::NegativeStock(-1)));

        let fields = NewProduct {
            stock: i64::from(u32::MAX) + 1,
            ..honey()
        };
        assert!(matches!(
            Product::new(fields),
            Err(ProductError::StockOutOfRange(_))
        ));
    }

    #[test]
    fn test_zero_stock_is_valid() {
        let fields = NewProduct { stock: 0, ..honey() };
        assert_eq!(Product::new(fields).map(|p| p.stock()), Ok(0));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ProductError::NonPositivePrice(-5.0).to_string(),
            "price must be positive, got -5"
        );
        assert_eq!(
            ProductError::NegativeStock(-1).to_string(),
            "stock must not be negative, got -1"
        );
    }
}
