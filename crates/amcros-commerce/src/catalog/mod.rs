//! Product catalog module.
//!
//! Contains products, pack-size variants, admin edits and the launch catalog.

mod product;
mod seed;

pub use product::{pack_label, PackVariant, Product, ProductUpdate};
pub use seed::launch_catalog;
