//! Broadcast notifications.

use amcros_commerce::notification::Notification;
use anyhow::Result;

use super::NotificationsArgs;
use crate::context::Context;
use crate::output::format_timestamp;

pub async fn run(args: NotificationsArgs, ctx: &Context) -> Result<()> {
    let app = ctx.app().await?;
    let feed = app.notifications();

    // Subscribe before listing so nothing created in between is missed.
    let mut stream = args.follow.then(|| feed.subscribe());

    let notifications = feed.list().await?;
    if ctx.output.is_json() {
        ctx.output.json(&notifications);
    } else if notifications.is_empty() {
        ctx.output.info("No notifications yet.");
    } else {
        ctx.output.header("Notifications");
        for notification in &notifications {
            print_notification(notification, ctx);
        }
    }

    let Some(stream) = stream.as_mut() else {
        return Ok(());
    };

    ctx.output.info("Waiting for new notifications (Ctrl-C to stop)...");
    while let Some(notification) = stream.next().await {
        if ctx.output.is_json() {
            ctx.output.json(&notification);
        } else {
            print_notification(&notification, ctx);
        }
    }
    ctx.output.debug("Notification feed closed");
    Ok(())
}

fn print_notification(notification: &Notification, ctx: &Context) {
    ctx.output.line(&format!(
        "{}  {}",
        console::style(format_timestamp(&notification.created_at)).dim(),
        console::style(&notification.title).bold()
    ));
    ctx.output.line(&format!("    {}", notification.description));
}
