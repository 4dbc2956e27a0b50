//! Product orderings used when sorting catalog snapshots.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::types::Product;

/// Order products by name.
#[must_use]
pub fn by_name(a: &Product, b: &Product) -> Ordering {
    a.name().cmp(b.name())
}

/// Order products by price, ascending. Uses IEEE total ordering.
#[must_use]
pub fn by_price(a: &Product, b: &Product) -> Ordering {
    a.price().total_cmp(&b.price())
}

/// Order products by category name.
#[must_use]
pub fn by_category(a: &Product, b: &Product) -> Ordering {
    a.category().cmp(b.category())
}

/// A product field a snapshot can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Price,
    Category,
}

impl SortKey {
    /// Every sort key, in the order the demo runs them.
    pub const ALL: [Self; 3] = [Self::Name, Self::Price, Self::Category];

    /// The comparator for this key.
    #[must_use]
    pub fn comparator(self) -> fn(&Product, &Product) -> Ordering {
        match self {
            Self::Name => by_name,
            Self::Price => by_price,
            Self::Category => by_category,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::Category => "category",
        };
        f.write_str(name)
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "category" => Ok(Self::Category),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

/// A string did not name a sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortKey(pub String);

impl fmt::Display for UnknownSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown sort key '{}' (expected name, price or category)",
            self.0
        )
    }
}

impl std::error::Error for UnknownSortKey {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NewProduct, ProductKind};

    fn product(id: &str, name: &str, price: f64, category: &str) -> Product {
        Product::new(NewProduct {
            id: id.to_string(),
            name: name.to_string(),
            price,
            category: category.to_string(),
            stock: 1,
            producer: "Local".to_string(),
            kind: ProductKind::Craft {
                material: "Wood".to_string(),
            },
        })
        .expect("valid product")
    }

    #[test]
    fn test_comparators() {
        let vase = product("B005", "Vase", 60.0, "Decor");
        let soap = product("B002", "Soap", 12.0, "Hygiene");

        assert_eq!(by_name(&soap, &vase), Ordering::Less);
        assert_eq!(by_price(&vase, &soap), Ordering::Greater);
        assert_eq!(by_category(&vase, &soap), Ordering::Less);
        assert_eq!(by_price(&vase, &vase), Ordering::Equal);
    }

    #[test]
    fn test_sort_key_comparator() {
        let cheap = product("A", "Zucchini", 1.0, "Food");
        let pricey = product("B", "Apple", 9.0, "Food");

        assert_eq!(SortKey::Name.comparator()(&cheap, &pricey), Ordering::Greater);
        assert_eq!(SortKey::Price.comparator()(&cheap, &pricey), Ordering::Less);
        assert_eq!(
            SortKey::Category.comparator()(&cheap, &pricey),
            Ordering::Equal
        );
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("name".parse(), Ok(SortKey::Name));
        assert_eq!(" PRICE ".parse(), Ok(SortKey::Price));
        assert_eq!("Category".parse(), Ok(SortKey::Category));
        assert_eq!(
            "weight".parse::<SortKey>(),
            Err(UnknownSortKey("weight".to_string()))
        );
    }

    #[test]
    fn test_sort_key_display_round_trips() {
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse(), Ok(key));
        }
    }
}
