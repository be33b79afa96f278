//! Review the cart and place a Cash on Delivery order.

use amcros_app::AppError;
use anyhow::{bail, Result};
use dialoguer::Confirm;

use super::cart::print_cart;
use super::CheckoutArgs;
use crate::context::Context;
use crate::output::{format_date, money};

pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let session = ctx.require_session().await?;
    let app = ctx.app().await?;
    let mut cart = app.cart(&session).await;

    if cart.is_empty() {
        bail!("Your cart is empty. Add something with `amcros cart add <product>`.");
    }

    let mut checkout = app.checkout();
    let summary = checkout.review(&cart)?;
    if !ctx.output.is_json() {
        print_cart(&cart, ctx);
        ctx.output.kv("Payment", summary.payment_method);
    }

    if !args.yes {
        ctx.output.info("");
        let confirmed = Confirm::new()
            .with_prompt(format!("Place order for {}?", summary.pricing.total))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.warn("Order not placed");
            return Ok(());
        }
    }

    let mut attempts_left = args.retries;
    let order = loop {
        let spinner = ctx.output.spinner("Placing order...");
        let result = checkout.place(&session, &mut cart).await;
        spinner.finish_and_clear();

        match result {
            Ok(order) => break order,
            Err(e) if e.is_retryable() && attempts_left > 0 => {
                attempts_left -= 1;
                ctx.output
                    .warn(&format!("{}; retrying ({} left)", e, attempts_left));
            }
            Err(e @ AppError::OrderNotPlaced(_)) => {
                ctx.output
                    .warn("No order was created. Your cart is unchanged; run `amcros checkout` to try again.");
                return Err(e.into());
            }
            Err(e @ AppError::CheckoutTimedOut(_)) => {
                ctx.output.warn(
                    "The order may still have gone through. Check `amcros orders` before checking out again.",
                );
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    ctx.output.success("Order placed!");
    ctx.output.kv("Order number", &order.order_number);
    ctx.output.kv("Total", &money(order.total));
    ctx.output.kv("Payment", order.payment_method.display_name());
    ctx.output
        .kv("Estimated delivery", &format_date(&order.estimated_delivery));
    Ok(())
}
