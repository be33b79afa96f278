//! Cart commands.
//!
//! Rows are numbered from 1 on screen and addressed by that number.

use amcros_app::{AppError, CartStore};
use amcros_commerce::cart::QuantityChange;
use anyhow::{bail, Result};
use dialoguer::Confirm;

use super::{CartArgs, CartCommand};
use crate::context::Context;
use crate::output::money;

pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let session = ctx.require_session().await?;
    let app = ctx.app().await?;
    let mut cart = app.cart(&session).await;

    let result = match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => {
            print_cart(&cart, ctx);
            return Ok(());
        }
        CartCommand::Add {
            product,
            pack,
            quantity,
        } => {
            let product = app.catalog().get(&product).await?;
            cart.add_item(&product, pack, quantity).await.map(|_| {
                format!("Added {} x {} ({}-pack)", quantity, product.name, pack)
            })
        }
        CartCommand::Inc { row, by } => {
            let index = row_index(row, &cart)?;
            cart.update_quantity(index, i64::from(by))
                .await
                .map(describe_change)
        }
        CartCommand::Dec { row, by } => {
            let index = row_index(row, &cart)?;
            cart.update_quantity(index, -i64::from(by))
                .await
                .map(describe_change)
        }
        CartCommand::Remove { row } => {
            let index = row_index(row, &cart)?;
            cart.remove_item(index)
                .await
                .map(|item| format!("Removed {} ({})", item.name, item.variant_label()))
        }
        CartCommand::Clear { yes } => {
            if cart.is_empty() {
                ctx.output.info("Cart is already empty");
                return Ok(());
            }
            if !yes
                && !Confirm::new()
                    .with_prompt("Remove everything from your cart?")
                    .default(false)
                    .interact()?
            {
                ctx.output.warn("Cancelled");
                return Ok(());
            }
            cart.clear().await.map(|_| "Cart cleared".to_string())
        }
    };

    match result {
        Ok(message) => ctx.output.success(&message),
        // The change stands locally; say so and keep going.
        Err(e @ AppError::CartNotSaved(_)) => {
            ctx.output.warn(&format!("{}. It will be saved with your next change.", e))
        }
        Err(e) => return Err(e.into()),
    }
    print_cart(&cart, ctx);
    Ok(())
}

fn row_index(row: usize, cart: &CartStore) -> Result<usize> {
    if row == 0 || row > cart.items().len() {
        bail!(
            "No row {} in your cart (it has {} row(s))",
            row,
            cart.items().len()
        );
    }
    Ok(row - 1)
}

fn describe_change(change: QuantityChange) -> String {
    match change {
        QuantityChange::Updated(quantity) => format!("Quantity is now {}", quantity),
        QuantityChange::Removed(item) => {
            format!("Removed {} ({})", item.name, item.variant_label())
        }
    }
}

pub fn print_cart(cart: &CartStore, ctx: &Context) {
    let pricing = cart.pricing();

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "items": cart.items(),
            "pricing": pricing,
        }));
        return;
    }

    ctx.output.header("Your cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty. Browse with `amcros products`.");
    } else {
        ctx.output
            .table_row(&["#", "ITEM", "PACK", "PRICE", "QTY", "TOTAL"], &[3, 28, 8, 12, 5, 12]);
        for (i, item) in cart.items().iter().enumerate() {
            ctx.output.table_row(
                &[
                    &(i + 1).to_string(),
                    &item.name,
                    &item.variant_label(),
                    &item.price.to_string(),
                    &item.quantity.to_string(),
                    &item.line_total().to_string(),
                ],
                &[3, 28, 8, 12, 5, 12],
            );
        }
    }

    ctx.output.info("");
    ctx.output.kv("Subtotal", &pricing.subtotal.to_string());
    ctx.output.kv("Tax", &pricing.tax.to_string());
    ctx.output.kv(
        "Shipping",
        &if pricing.has_free_shipping() {
            "Free".to_string()
        } else {
            pricing.shipping.to_string()
        },
    );
    ctx.output.kv("Total", &money(pricing.total));
}
