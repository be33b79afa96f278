//! Cart pricing calculations.

use crate::cart::CartLineItem;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Fixed business rules applied to every cart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PricingRules {
    /// Tax rate in basis points (800 = 8%).
    pub tax_rate_bps: u32,
    /// Shipping is free when the subtotal is strictly above this amount.
    pub free_shipping_above: Money,
    /// Flat shipping fee charged otherwise.
    pub flat_shipping: Money,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            tax_rate_bps: 800,
            free_shipping_above: Money::from_rupees(50),
            flat_shipping: Money::from_paise(599),
        }
    }
}

impl PricingRules {
    pub fn tax_on(&self, subtotal: Money) -> Money {
        subtotal.basis_points(self.tax_rate_bps)
    }

    pub fn shipping_for(&self, subtotal: Money) -> Money {
        if subtotal > self.free_shipping_above {
            Money::ZERO
        } else {
            self.flat_shipping
        }
    }
}

/// Totals derived from a list of line items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CartPricing {
    /// Sum of price x quantity.
    pub subtotal: Money,
    /// Tax on the subtotal.
    pub tax: Money,
    /// Shipping fee.
    pub shipping: Money,
    /// subtotal + tax + shipping.
    pub total: Money,
}

impl CartPricing {
    /// Price a list of line items.
    pub fn calculate<'a>(
        items: impl IntoIterator<Item = &'a CartLineItem>,
        rules: &PricingRules,
    ) -> Self {
        let subtotal = items.into_iter().map(CartLineItem::line_total).sum();
        Self::from_subtotal(subtotal, rules)
    }

    /// Derive tax, shipping and total from a subtotal.
    pub fn from_subtotal(subtotal: Money, rules: &PricingRules) -> Self {
        let tax = rules.tax_on(subtotal);
        let shipping = rules.shipping_for(subtotal);
        Self {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }

    /// Check whether shipping was waived.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: Money, quantity: u32) -> CartLineItem {
        let mut item = CartLineItem::new("Ankle Socks", 3, price);
        item.quantity = quantity;
        item
    }

    #[test]
    fn test_empty_cart_pays_flat_shipping_only() {
        let items: [CartLineItem; 0] = [];
        let pricing = CartPricing::calculate(&items, &PricingRules::default());
        assert_eq!(pricing.subtotal, Money::ZERO);
        assert_eq!(pricing.tax, Money::ZERO);
        assert_eq!(pricing.shipping, Money::from_paise(599));
        assert_eq!(pricing.total, pricing.shipping);
    }

    #[test]
    fn test_two_at_one_hundred() {
        let items = [item(Money::from_rupees(100), 2)];
        let pricing = CartPricing::calculate(&items, &PricingRules::default());
        assert_eq!(pricing.subtotal, Money::from_rupees(200));
        assert_eq!(pricing.tax, Money::from_rupees(16));
        assert_eq!(pricing.shipping, Money::ZERO);
        assert_eq!(pricing.total, Money::from_rupees(216));
        assert!(pricing.has_free_shipping());
    }

    #[test]
    fn test_free_shipping_is_strictly_above_threshold() {
        let rules = PricingRules::default();
        let at = CartPricing::from_subtotal(Money::from_rupees(50), &rules);
        assert_eq!(at.shipping, Money::from_paise(599));

        let above = CartPricing::from_subtotal(Money::from_paise(5001), &rules);
        assert_eq!(above.shipping, Money::ZERO);
    }

    #[test]
    fn test_total_is_sum_of_parts() {
        let items = [
            item(Money::from_decimal(12.5), 1),
            item(Money::from_decimal(7.25), 3),
        ];
        let pricing = CartPricing::calculate(&items, &PricingRules::default());
        assert_eq!(pricing.subtotal, Money::from_paise(3425));
        assert_eq!(pricing.tax, Money::from_paise(274));
        assert_eq!(
            pricing.total,
            pricing.subtotal + pricing.tax + pricing.shipping
        );
    }

    #[test]
    fn test_non_numeric_price_counts_as_zero() {
        let broken: CartLineItem = serde_json::from_value(serde_json::json!({
            "name": "Sports Socks",
            "packSize": 3,
            "price": "call us",
            "quantity": 4
        }))
        .unwrap();
        let pricing = CartPricing::calculate(&[broken], &PricingRules::default());
        assert_eq!(pricing.subtotal, Money::ZERO);
    }
}
