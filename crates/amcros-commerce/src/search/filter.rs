//! Search filter types.

use crate::catalog::Product;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A search filter applied to catalog products.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    /// Case-insensitive substring of the product name.
    Text(String),
    /// Style chip ("ankle", "sneaker"). The "All" chip is not a filter.
    Style(String),
    /// Broad category ("socks").
    Category(String),
    /// Products with at least one pack at or below this price.
    MaxPrice(Money),
}

impl Filter {
    /// Create a text filter.
    pub fn text(query: impl Into<String>) -> Self {
        Filter::Text(query.into())
    }

    /// Create a style filter, or `None` for the "All" chip and blanks.
    pub fn style(style: impl Into<String>) -> Option<Self> {
        let style = style.into();
        let trimmed = style.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(Filter::Style(trimmed.to_string()))
        }
    }

    /// Check whether a product passes this filter.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Filter::Text(query) => {
                let needle = query.trim().to_lowercase();
                needle.is_empty() || product.name.to_lowercase().contains(&needle)
            }
            Filter::Style(style) => product.has_style(style),
            Filter::Category(category) => product.category.eq_ignore_ascii_case(category),
            Filter::MaxPrice(max) => product.variants.iter().any(|v| v.price <= *max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Product {
        Product::new("p", "Half Terry Ankle Socks")
            .with_category("socks")
            .with_style("ankle")
            .with_variant(3, Money::from_rupees(250))
    }

    #[test]
    fn test_text_filter_is_case_insensitive() {
        assert!(Filter::text("terry").matches(&product()));
        assert!(Filter::text("  ").matches(&product()));
        assert!(!Filter::text("sneaker").matches(&product()));
    }

    #[test]
    fn test_all_chip_is_not_a_filter() {
        assert!(Filter::style("All").is_none());
        assert!(Filter::style("").is_none());
        assert!(Filter::style("Ankle").unwrap().matches(&product()));
    }

    #[test]
    fn test_price_filter() {
        assert!(Filter::MaxPrice(Money::from_rupees(250)).matches(&product()));
        assert!(!Filter::MaxPrice(Money::from_rupees(249)).matches(&product()));
    }
}
