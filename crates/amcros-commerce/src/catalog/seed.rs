//! The socks line the storefront launched with, used to seed an empty store.

use crate::catalog::Product;
use crate::money::Money;

const IMAGE_BASE: &str = "https://res.cloudinary.com/ds4z0fqxi/image/upload";

/// (id, name, style, image path)
const LAUNCH_LINE: &[(&str, &str, &str, &str)] = &[
    (
        "ribbed-ankle-socks",
        "Ribbed Ankle Socks",
        "ankle",
        "v1743922678/amcros-connect/Screenshot_2025-04-06_at_12.28.15_PM_agupnr.png",
    ),
    (
        "custom-ankle-socks",
        "Custom Ankle Socks",
        "ankle",
        "v1743922706/amcros-connect/Screenshot_2025-04-06_at_12.28.50_PM_srag3d.png",
    ),
    (
        "ankle-socks",
        "Ankle Socks",
        "ankle",
        "v1743922786/amcros-connect/Screenshot_2025-04-06_at_12.30.08_PM_xnrqw3.png",
    ),
    (
        "half-terry-ankle-socks",
        "Half Terry Ankle Socks",
        "ankle",
        "v1743922750/amcros-connect/Screenshot_2025-04-06_at_12.29.34_PM_oydnjb.png",
    ),
    (
        "designer-ankle-socks",
        "Designer Ankle Socks",
        "ankle",
        "v1743922810/amcros-connect/Screenshot_2025-04-06_at_12.30.33_PM_jagyb9.png",
    ),
    (
        "womens-sneaker-socks",
        "Women's Sneaker Socks",
        "sneaker",
        "v1743922855/amcros-connect/Screenshot_2025-04-06_at_12.31.15_PM_fp7oie.png",
    ),
    (
        "sports-socks",
        "Sports Socks",
        "sports",
        "v1743922847/amcros-connect/Screenshot_2025-04-06_at_12.30.58_PM_kdifru.png",
    ),
];

/// Every launch product ships in a 3-pack at ₹250 and a 5-pack at ₹300.
pub fn launch_catalog() -> Vec<Product> {
    LAUNCH_LINE
        .iter()
        .map(|(id, name, style, image)| {
            Product::new(*id, *name)
                .with_image(format!("{}/{}", IMAGE_BASE, image))
                .with_category("socks")
                .with_style(*style)
                .with_variant(3, Money::from_rupees(250))
                .with_variant(5, Money::from_rupees(300))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_catalog_is_valid() {
        let products = launch_catalog();
        assert_eq!(products.len(), 7);
        for product in &products {
            crate::catalog::ProductUpdate::from_product(product)
                .validate()
                .unwrap();
        }
        assert_eq!(products.iter().filter(|p| p.has_style("ankle")).count(), 5);
    }
}
