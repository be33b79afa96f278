//! Support assistant.

use anyhow::Result;
use dialoguer::Input;

use super::ChatArgs;
use crate::context::Context;

pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let session = ctx.session().await?;
    let email = session.as_ref().map(|s| &s.profile.email);
    let app = ctx.app().await?;
    let chat = app.chat();

    ctx.output.debug(&format!("Using {} responder", chat.responder_name()));

    if !args.message.is_empty() {
        let message = args.message.join(" ");
        let reply = chat.reply(&message, email).await;
        if ctx.output.is_json() {
            ctx.output.json(&serde_json::json!({ "reply": reply }));
        } else {
            ctx.output.line(&reply);
        }
        return Ok(());
    }

    if email.is_none() {
        ctx.output
            .info("Not signed in; answers about your orders need `amcros signin`.");
    }
    ctx.output.info("Ask about orders, delivery or returns. Empty line to quit.");

    loop {
        let message: String = Input::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;
        let message = message.trim();
        if message.is_empty() || message.eq_ignore_ascii_case("exit") {
            break;
        }

        let spinner = ctx.output.spinner("Thinking...");
        let reply = chat.reply(message, email).await;
        spinner.finish_and_clear();
        ctx.output
            .line(&format!("{} {}", console::style("Amcros:").cyan().bold(), reply));
    }
    Ok(())
}
