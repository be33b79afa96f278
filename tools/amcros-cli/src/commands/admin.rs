//! Admin console.

use amcros_app::AdminService;
use amcros_commerce::catalog::ProductUpdate;
use amcros_commerce::checkout::Order;
use amcros_commerce::notification::NewNotification;
use amcros_commerce::Money;
use amcros_store::ChangeKind;
use anyhow::{anyhow, Context as _, Result};

use super::orders::print_order_table;
use super::{AdminArgs, AdminCommand};
use crate::context::Context;
use crate::output::{money, status_badge};

pub async fn run(args: AdminArgs, ctx: &Context) -> Result<()> {
    let session = ctx.require_session().await?;
    let app = ctx.app().await?;
    let admin = app.admin(&session)?;

    match args.command {
        AdminCommand::Orders { watch } => orders(&admin, watch, ctx).await,
        AdminCommand::Advance { order_id } => {
            let status = admin.advance_status(&order_id).await?;
            if ctx.output.is_json() {
                ctx.output
                    .json(&serde_json::json!({ "id": order_id, "status": status }));
            } else {
                ctx.output
                    .success(&format!("Order {} is now {}", order_id, status_badge(status)));
            }
            Ok(())
        }
        AdminCommand::EditProduct {
            id,
            name,
            image,
            prices,
            remove_packs,
        } => {
            let current = app.catalog().get(&id).await?;
            let mut update = ProductUpdate::from_product(&current);
            if let Some(name) = name {
                update.name = name;
            }
            if let Some(image) = image {
                update.image = image;
            }
            for pack in remove_packs {
                update.remove_variant(pack);
            }
            for spec in &prices {
                let (pack, price) = parse_price(spec)?;
                update.set_price(pack, price);
            }

            let product = admin.update_product(&id, update).await?;
            if ctx.output.is_json() {
                ctx.output.json(&product);
                return Ok(());
            }
            ctx.output.success(&format!("Updated {}", product.name));
            for variant in &product.variants {
                ctx.output
                    .list_item(&format!("{}: {}", variant.label(), money(variant.price)));
            }
            Ok(())
        }
        AdminCommand::Notify { title, description } => {
            let notification = admin
                .send_notification(NewNotification::new(title, description))
                .await?;
            if ctx.output.is_json() {
                ctx.output.json(&notification);
            } else {
                ctx.output
                    .success(&format!("Sent \"{}\" to all users", notification.title));
            }
            Ok(())
        }
        AdminCommand::Seed => {
            let spinner = ctx.output.spinner("Loading launch catalog...");
            let added = admin.seed_catalog().await;
            spinner.finish_and_clear();
            match added? {
                0 => ctx.output.info("Catalog already loaded"),
                n => ctx.output.success(&format!("Added {} product(s)", n)),
            }
            Ok(())
        }
    }
}

async fn orders(admin: &AdminService, watch: bool, ctx: &Context) -> Result<()> {
    // Subscribe first so writes between the listing and the watch are seen.
    let mut changes = watch.then(|| admin.watch_orders());

    let orders = admin.all_orders().await?;
    if ctx.output.is_json() {
        ctx.output.json(&orders);
    } else if orders.is_empty() {
        ctx.output.info("No orders yet.");
    } else {
        ctx.output.header("All orders");
        print_order_table(&orders, ctx);
    }

    let Some(changes) = changes.as_mut() else {
        return Ok(());
    };

    ctx.output.info("Watching for order changes (Ctrl-C to stop)...");
    while let Some(event) = changes.next().await {
        let order = event.document().and_then(|doc| doc.decode::<Order>().ok());
        match (event.kind, order) {
            (ChangeKind::Deleted, _) => ctx.output.warn(&format!("Order {} deleted", event.id)),
            (kind, Some(order)) => {
                let verb = if kind == ChangeKind::Created { "placed" } else { "updated" };
                ctx.output.line(&format!(
                    "{} {} {} {} ({})",
                    order.order_number,
                    verb,
                    status_badge(order.status),
                    money(order.total),
                    event.id
                ));
            }
            (_, None) => ctx.output.debug(&format!("Unreadable order document {}", event.id)),
        }
    }
    Ok(())
}

/// Parse a `PACK=RUPEES` price flag.
fn parse_price(spec: &str) -> Result<(u32, Money)> {
    let (pack, rupees) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected PACK=RUPEES, got '{}'", spec))?;
    let pack: u32 = pack
        .trim()
        .parse()
        .with_context(|| format!("Invalid pack size in '{}'", spec))?;
    let rupees: f64 = rupees
        .trim()
        .trim_start_matches('₹')
        .parse()
        .with_context(|| format!("Invalid price in '{}'", spec))?;
    Ok((pack, Money::from_decimal(rupees)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("5=300").unwrap(), (5, Money::from_rupees(300)));
        assert_eq!(
            parse_price(" 3 = ₹149.50 ").unwrap(),
            (3, Money::from_paise(14950))
        );
    }

    #[test]
    fn test_parse_price_rejects_garbage() {
        assert!(parse_price("5").is_err());
        assert!(parse_price("five=300").is_err());
        assert!(parse_price("5=lots").is_err());
    }
}
