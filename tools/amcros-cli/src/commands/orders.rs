//! Order history.

use amcros_commerce::checkout::Order;
use anyhow::Result;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::{format_date, format_timestamp, money, status_badge};

pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(OrdersCommand::Show { ref order }) => show_order(order, ctx).await,
        Some(OrdersCommand::List) | None => list_orders(args.limit, ctx).await,
    }
}

async fn list_orders(limit: Option<usize>, ctx: &Context) -> Result<()> {
    let session = ctx.require_session().await?;
    let mut orders = ctx.app().await?.orders().for_user(&session).await?;
    if let Some(limit) = limit {
        orders.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    if orders.is_empty() {
        ctx.output.info("No orders yet.");
        return Ok(());
    }

    ctx.output.header("Your orders");
    print_order_table(&orders, ctx);
    Ok(())
}

pub fn print_order_table(orders: &[Order], ctx: &Context) {
    ctx.output.table_row(
        &["ORDER", "PLACED", "PACKS", "TOTAL", "STATUS", "ID"],
        &[10, 12, 6, 12, 11, 32],
    );
    for order in orders {
        let id = order.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
        ctx.output.table_row(
            &[
                &order.order_number,
                &format_date(&order.order_date),
                &order.item_count().to_string(),
                &order.total.to_string(),
                &status_badge(order.status),
                id,
            ],
            &[10, 12, 6, 12, 11, 32],
        );
    }
}

async fn show_order(key: &str, ctx: &Context) -> Result<()> {
    let session = ctx.require_session().await?;
    let order = ctx.app().await?.orders().get(&session, key).await?;

    if ctx.output.is_json() {
        ctx.output.json(&order);
        return Ok(());
    }

    print_order(&order, ctx);
    Ok(())
}

pub fn print_order(order: &Order, ctx: &Context) {
    ctx.output.header(&format!("Order {}", order.order_number));
    ctx.output.kv("Status", &status_badge(order.status));
    ctx.output.kv("Placed", &format_timestamp(&order.order_date));
    ctx.output
        .kv("Estimated delivery", &format_date(&order.estimated_delivery));
    ctx.output.kv("Payment", order.payment_method.display_name());
    ctx.output.kv("Customer", order.email.as_str());

    ctx.output.info("");
    for item in &order.items {
        ctx.output.list_item(&format!(
            "{} ({}) x {} @ {} = {}",
            item.name,
            item.variant,
            item.quantity,
            item.price,
            item.line_total()
        ));
    }

    ctx.output.info("");
    ctx.output.kv("Subtotal", &order.subtotal.to_string());
    ctx.output.kv("Tax", &order.tax.to_string());
    ctx.output.kv("Shipping", &order.shipping.to_string());
    ctx.output.kv("Total", &money(order.total));
}
