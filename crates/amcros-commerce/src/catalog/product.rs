//! Product and pack-size variant types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Deserializer, Serialize};

/// A purchasable pack size of a product, carrying its own price.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackVariant {
    /// Number of pairs in the pack.
    pub pack: u32,
    /// Price of one pack.
    #[serde(default)]
    pub price: Money,
}

impl PackVariant {
    pub fn new(pack: u32, price: Money) -> Self {
        Self { pack, price }
    }

    /// Label shown on cart rows and orders, e.g. "3 Pack".
    pub fn label(&self) -> String {
        pack_label(self.pack)
    }
}

/// Format a pack size the way the storefront labels it.
pub fn pack_label(pack: u32) -> String {
    format!("{} Pack", pack)
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Document key in the `products` collection.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Broad category (every current product is "socks").
    #[serde(default)]
    pub category: String,
    /// Style tags used by the storefront filter chips ("ankle", "sneaker").
    ///
    /// Older documents store a single string here.
    #[serde(rename = "type", default, deserialize_with = "one_or_many")]
    pub styles: Vec<String>,
    /// Available pack sizes.
    #[serde(default)]
    pub variants: Vec<PackVariant>,
}

impl Product {
    /// Create a product with no variants.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: String::new(),
            category: String::new(),
            styles: Vec::new(),
            variants: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        let style = style.into();
        if !self.styles.contains(&style) {
            self.styles.push(style);
        }
        self
    }

    pub fn with_variant(mut self, pack: u32, price: Money) -> Self {
        self.variants.push(PackVariant::new(pack, price));
        self
    }

    /// Find the variant for a pack size.
    pub fn variant(&self, pack: u32) -> Option<&PackVariant> {
        self.variants.iter().find(|v| v.pack == pack)
    }

    /// Find the variant for a pack size or fail with [`CommerceError::VariantNotFound`].
    pub fn require_variant(&self, pack: u32) -> Result<&PackVariant, CommerceError> {
        self.variant(pack).ok_or_else(|| CommerceError::VariantNotFound {
            product: self.name.clone(),
            pack_size: pack,
        })
    }

    /// Lowest variant price, used for "from ₹250" listings.
    pub fn starting_price(&self) -> Option<Money> {
        self.variants.iter().map(|v| v.price).min()
    }

    /// Case-insensitive style membership.
    pub fn has_style(&self, style: &str) -> bool {
        self.styles.iter().any(|s| s.eq_ignore_ascii_case(style))
    }

    /// Apply an admin edit after validating it.
    pub fn apply_update(&mut self, update: ProductUpdate) -> Result<(), CommerceError> {
        update.validate()?;
        self.name = update.name.trim().to_string();
        self.image = update.image.trim().to_string();
        self.variants = update.variants;
        Ok(())
    }
}

/// Fields an admin may change on a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub image: String,
    pub variants: Vec<PackVariant>,
}

impl ProductUpdate {
    /// Start an edit from the product's current values.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            image: product.image.clone(),
            variants: product.variants.clone(),
        }
    }

    /// Set the price of a pack size, adding the variant if it is new.
    pub fn set_price(&mut self, pack: u32, price: Money) {
        match self.variants.iter_mut().find(|v| v.pack == pack) {
            Some(variant) => variant.price = price,
            None => self.variants.push(PackVariant::new(pack, price)),
        }
    }

    pub fn remove_variant(&mut self, pack: u32) {
        self.variants.retain(|v| v.pack != pack);
    }

    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::ValidationError(
                "product name cannot be empty".to_string(),
            ));
        }
        if self.variants.is_empty() {
            return Err(CommerceError::ValidationError(
                "product needs at least one pack size".to_string(),
            ));
        }
        for (i, variant) in self.variants.iter().enumerate() {
            if variant.pack == 0 {
                return Err(CommerceError::ValidationError(
                    "pack size must be at least 1".to_string(),
                ));
            }
            if variant.price.is_negative() {
                return Err(CommerceError::ValidationError(format!(
                    "price for {} cannot be negative",
                    variant.label()
                )));
            }
            if self.variants[..i].iter().any(|v| v.pack == variant.pack) {
                return Err(CommerceError::ValidationError(format!(
                    "duplicate {} variant",
                    variant.label()
                )));
            }
        }
        Ok(())
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Nothing(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Nothing(()) => Vec::new(),
    })
}
