//! Catalog browsing.

use amcros_commerce::catalog::Product;
use amcros_commerce::search::{SearchQuery, SortOption};
use anyhow::Result;

use super::{ProductsArgs, ProductsCommand, SortArg};
use crate::context::Context;
use crate::output::money;

pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(ProductsCommand::Show { ref id }) => show_product(id, ctx).await,
        Some(ProductsCommand::List) | None => list_products(&args, ctx).await,
    }
}

fn query_for(args: &ProductsArgs) -> SearchQuery {
    let mut query = SearchQuery::new().sort(match args.sort {
        SortArg::Featured => SortOption::Featured,
        SortArg::PriceAsc => SortOption::PriceAsc,
        SortArg::PriceDesc => SortOption::PriceDesc,
        SortArg::Name => SortOption::NameAsc,
    });
    if let Some(text) = &args.search {
        query = query.text(text.as_str());
    }
    if let Some(style) = &args.style {
        query = query.style(style.as_str());
    }
    query
}

async fn list_products(args: &ProductsArgs, ctx: &Context) -> Result<()> {
    let app = ctx.app().await?;
    let products = app.catalog().search(&query_for(args)).await?;

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    if products.is_empty() {
        if args.search.is_some() || args.style.is_some() {
            ctx.output.info("No products match.");
        } else {
            ctx.output.info("The catalog is empty.");
            ctx.output.info("An admin can load it with `amcros admin seed`.");
        }
        return Ok(());
    }

    ctx.output.header("Products");
    ctx.output.table_row(&["ID", "NAME", "STYLE", "PACKS"], &[26, 26, 10, 30]);
    for product in &products {
        let packs = pack_summary(product);
        ctx.output.table_row(
            &[
                product.id.as_str(),
                &product.name,
                &product.styles.join(", "),
                &packs,
            ],
            &[26, 26, 10, 30],
        );
    }
    ctx.output.info(&format!("{} product(s)", products.len()));
    Ok(())
}

async fn show_product(id: &str, ctx: &Context) -> Result<()> {
    let product = ctx.app().await?.catalog().get(id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("ID", product.id.as_str());
    if !product.styles.is_empty() {
        ctx.output.kv("Style", &product.styles.join(", "));
    }
    if !product.image.is_empty() {
        ctx.output.kv("Image", &product.image);
    }
    for variant in &product.variants {
        ctx.output
            .list_item(&format!("{}: {}", variant.label(), money(variant.price)));
    }
    ctx.output.info(&format!(
        "Add to cart with `amcros cart add {} --pack <size>`",
        product.id
    ));
    Ok(())
}

fn pack_summary(product: &Product) -> String {
    product
        .variants
        .iter()
        .map(|v| format!("{} {}", v.label(), v.price))
        .collect::<Vec<_>>()
        .join(", ")
}
