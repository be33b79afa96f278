//! Search query builder.

use crate::catalog::Product;
use crate::search::Filter;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort options for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortOption {
    /// Catalog order.
    #[default]
    Featured,
    /// Sort by starting price, low to high.
    PriceAsc,
    /// Sort by starting price, high to low.
    PriceDesc,
    /// Sort by name A-Z.
    NameAsc,
}

impl SortOption {
    pub fn display_name(&self) -> &'static str {
        match self {
            SortOption::Featured => "Featured",
            SortOption::PriceAsc => "Price: Low to High",
            SortOption::PriceDesc => "Price: High to Low",
            SortOption::NameAsc => "Name: A-Z",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOption::Featured => Ordering::Equal,
            SortOption::PriceAsc => a.starting_price().cmp(&b.starting_price()),
            SortOption::PriceDesc => b.starting_price().cmp(&a.starting_price()),
            SortOption::NameAsc => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        }
    }
}

/// A catalog search: every filter must match.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchQuery {
    /// Filters to apply.
    pub filters: Vec<Filter>,
    /// Sort option.
    pub sort: SortOption,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a free-text filter; blank text is ignored.
    pub fn text(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        if !query.trim().is_empty() {
            self.filters.push(Filter::Text(query));
        }
        self
    }

    /// Add a style filter; "All" is ignored.
    pub fn style(mut self, style: impl Into<String>) -> Self {
        if let Some(filter) = Filter::style(style) {
            self.filters.push(filter);
        }
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.filters.iter().all(|f| f.matches(product))
    }

    /// Filter and sort a product list. Sorting is stable, so ties keep catalog order.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut hits: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        hits.sort_by(|a, b| self.sort.compare(a, b));
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::launch_catalog;
    use crate::money::Money;

    #[test]
    fn test_text_and_style_combine() {
        let catalog = launch_catalog();
        let hits = SearchQuery::new().text("socks").style("sneaker").apply(&catalog);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Women's Sneaker Socks");
    }

    #[test]
    fn test_empty_query_returns_catalog_order() {
        let catalog = launch_catalog();
        let hits = SearchQuery::new().style("All").apply(&catalog);
        assert_eq!(hits.len(), catalog.len());
        assert_eq!(hits[0].id, catalog[0].id);
    }

    #[test]
    fn test_price_sort() {
        let catalog = vec![
            Product::new("a", "A").with_variant(3, Money::from_rupees(300)),
            Product::new("b", "B").with_variant(3, Money::from_rupees(100)),
        ];
        let hits = SearchQuery::new().sort(SortOption::PriceAsc).apply(&catalog);
        assert_eq!(hits[0].name, "B");
        let hits = SearchQuery::new().sort(SortOption::PriceDesc).apply(&catalog);
        assert_eq!(hits[0].name, "A");
    }
}
