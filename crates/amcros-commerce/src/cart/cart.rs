//! Cart and line item types.
//!
//! Line items have no ids of their own: a cart row is addressed by its
//! position in the list, exactly as the user document stores it.

use crate::cart::{CartPricing, PricingRules};
use crate::catalog::{pack_label, Product};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: u32 = 9999;

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Catalog product, absent on rows written before products had ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    /// Product name (denormalized for display).
    pub name: String,
    /// Product image URL.
    #[serde(default)]
    pub image: String,
    /// Pairs per pack.
    #[serde(default = "default_pack_size")]
    pub pack_size: u32,
    /// Unit (per pack) price.
    #[serde(default)]
    pub price: Money,
    /// Number of packs, always at least 1 inside a [`Cart`].
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    /// When the row was first added.
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

fn default_pack_size() -> u32 {
    3
}

fn default_quantity() -> u32 {
    1
}

/// Quantities arrive from older clients as floats or strings; anything
/// unreadable or negative counts as zero, which [`Cart::from_items`] drops.
pub(crate) fn lenient_quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let quantity = match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.floor() as u64))
            .unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        serde_json::Value::Null => 1,
        _ => 0,
    };
    Ok(u32::try_from(quantity).unwrap_or(MAX_QUANTITY_PER_ITEM))
}

impl CartLineItem {
    /// Create a single-pack line item.
    pub fn new(name: impl Into<String>, pack_size: u32, price: Money) -> Self {
        Self {
            product_id: None,
            name: name.into(),
            image: String::new(),
            pack_size,
            price,
            quantity: 1,
            added_at: Utc::now(),
        }
    }

    /// Create a line item for a catalog product's pack size.
    pub fn for_product(product: &Product, pack_size: u32, quantity: u32) -> Result<Self, CommerceError> {
        let variant = product.require_variant(pack_size)?;
        Ok(Self {
            product_id: Some(product.id.clone()),
            name: product.name.clone(),
            image: product.image.clone(),
            pack_size,
            price: variant.price,
            quantity,
            added_at: Utc::now(),
        })
    }

    /// Variant label, e.g. "3 Pack".
    pub fn variant_label(&self) -> String {
        pack_label(self.pack_size)
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }

    /// Two rows describe the same purchase when they name the same product
    /// and pack size. Legacy rows without a product id fall back to the name.
    pub fn same_purchase(&self, other: &CartLineItem) -> bool {
        if self.pack_size != other.pack_size {
            return false;
        }
        match (&self.product_id, &other.product_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.name == other.name,
        }
    }
}

/// Outcome of [`Cart::adjust_quantity`].
#[derive(Debug, Clone, PartialEq)]
pub enum QuantityChange {
    /// The row now holds this many packs.
    Updated(u32),
    /// The quantity fell below one and the row was dropped.
    Removed(CartLineItem),
}

/// A user's cart: the ordered list of line items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored rows, dropping rows with no packs.
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        Self {
            items: items.into_iter().filter(|i| i.quantity >= 1).collect(),
        }
    }

    /// Add a row, merging into an existing row for the same product and pack size.
    ///
    /// Returns the position of the row that now holds the packs.
    pub fn add_item(&mut self, item: CartLineItem) -> Result<usize, CommerceError> {
        if item.quantity == 0 {
            return Err(CommerceError::InvalidQuantity(0));
        }

        if let Some(index) = self.items.iter().position(|i| i.same_purchase(&item)) {
            let existing = &mut self.items[index];
            let merged = existing.quantity.saturating_add(item.quantity);
            if merged > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    merged,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            existing.quantity = merged;
            // The newest catalog price wins for the merged row.
            existing.price = item.price;
            return Ok(index);
        }

        if item.quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                item.quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Add packs of a catalog product.
    pub fn add_product(
        &mut self,
        product: &Product,
        pack_size: u32,
        quantity: u32,
    ) -> Result<usize, CommerceError> {
        self.add_item(CartLineItem::for_product(product, pack_size, quantity)?)
    }

    /// Change a row's quantity by `delta`. A result below one removes the row.
    pub fn adjust_quantity(
        &mut self,
        index: usize,
        delta: i64,
    ) -> Result<QuantityChange, CommerceError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(CommerceError::LineItemOutOfRange { index, len })?;

        let new_quantity = i64::from(item.quantity).saturating_add(delta);
        if new_quantity < 1 {
            return Ok(QuantityChange::Removed(self.items.remove(index)));
        }
        if new_quantity > i64::from(MAX_QUANTITY_PER_ITEM) {
            return Err(CommerceError::QuantityExceedsLimit(
                u32::try_from(new_quantity).unwrap_or(u32::MAX),
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        item.quantity = new_quantity as u32;
        Ok(QuantityChange::Updated(item.quantity))
    }

    /// Remove the row at `index`.
    pub fn remove_item(&mut self, index: usize) -> Result<CartLineItem, CommerceError> {
        if index >= self.items.len() {
            return Err(CommerceError::LineItemOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&CartLineItem> {
        self.items.get(index)
    }

    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total packs across all rows.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Price the cart.
    pub fn pricing(&self, rules: &PricingRules) -> CartPricing {
        CartPricing::calculate(&self.items, rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn socks() -> Product {
        Product::new("ankle-socks", "Ankle Socks")
            .with_variant(3, Money::from_rupees(250))
            .with_variant(5, Money::from_rupees(300))
    }

    #[test]
    fn test_add_same_variant_merges() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_product(&socks(), 3, 1).unwrap(), 0);
        assert_eq!(cart.add_product(&socks(), 3, 2).unwrap(), 0);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_different_pack_sizes_stay_separate() {
        let mut cart = Cart::new();
        cart.add_product(&socks(), 3, 1).unwrap();
        assert_eq!(cart.add_product(&socks(), 5, 1).unwrap(), 1);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_unknown_pack_size_is_rejected() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_product(&socks(), 12, 1),
            Err(CommerceError::VariantNotFound { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_zero_quantity_add_is_rejected() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.add_product(&socks(), 3, 0),
            Err(CommerceError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_decrement_never_leaves_zero() {
        for start in 1..=5u32 {
            for delta in 0..=7i64 {
                let mut cart = Cart::new();
                cart.add_product(&socks(), 3, start).unwrap();
                let change = cart.adjust_quantity(0, -delta).unwrap();
                if i64::from(start) - delta < 1 {
                    assert!(matches!(change, QuantityChange::Removed(_)));
                    assert!(cart.is_empty());
                } else {
                    assert_eq!(change, QuantityChange::Updated(start - delta as u32));
                }
                assert!(cart.items().iter().all(|i| i.quantity >= 1));
            }
        }
    }

    #[test]
    fn test_adjust_out_of_range() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.adjust_quantity(2, 1),
            Err(CommerceError::LineItemOutOfRange { index: 2, len: 0 })
        );
    }

    #[test]
    fn test_quantity_limit() {
        let mut cart = Cart::new();
        cart.add_product(&socks(), 3, MAX_QUANTITY_PER_ITEM).unwrap();
        assert!(cart.adjust_quantity(0, 1).is_err());
        assert!(cart.add_product(&socks(), 3, 1).is_err());
        assert_eq!(cart.item_count(), u64::from(MAX_QUANTITY_PER_ITEM));
    }

    #[test]
    fn test_remove_by_position() {
        let mut cart = Cart::new();
        cart.add_product(&socks(), 3, 1).unwrap();
        cart.add_product(&socks(), 5, 2).unwrap();
        let removed = cart.remove_item(0).unwrap();
        assert_eq!(removed.pack_size, 3);
        assert_eq!(cart.get(0).unwrap().pack_size, 5);
        assert!(cart.remove_item(1).is_err());
    }

    #[test]
    fn test_stored_rows_round_through_json() {
        let stored = serde_json::json!([
            {"name": "Sports Socks", "image": "x.png", "packSize": 5, "price": 300, "quantity": 2},
            {"name": "Ankle Socks", "packSize": 3, "price": 250, "quantity": 0},
            {"name": "Crew Socks", "packSize": 3, "price": "250", "quantity": "3"}
        ]);
        let rows: Vec<CartLineItem> = serde_json::from_value(stored).unwrap();
        let cart = Cart::from_items(rows);
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(1).unwrap().quantity, 3);
        assert_eq!(cart.get(1).unwrap().price, Money::from_rupees(250));

        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["packSize"], 5);
        assert!(json[0].get("productId").is_none());
    }

    #[test]
    fn test_legacy_rows_merge_by_name() {
        let mut cart = Cart::from_items(vec![CartLineItem::new(
            "Ankle Socks",
            3,
            Money::from_rupees(250),
        )]);
        cart.add_product(&socks(), 3, 1).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 2);
    }
}
