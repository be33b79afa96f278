//! Frequently asked questions.

use amcros_commerce::faq;
use anyhow::Result;

use super::FaqArgs;
use crate::context::Context;

pub async fn run(args: FaqArgs, ctx: &Context) -> Result<()> {
    let categories = match args.query.as_deref() {
        Some(query) => faq::search(query),
        None => faq::all(),
    };

    if ctx.output.is_json() {
        ctx.output.json(&categories);
        return Ok(());
    }

    if categories.is_empty() {
        ctx.output.info("No questions match. Try `amcros chat` instead.");
        return Ok(());
    }

    for category in &categories {
        ctx.output.header(category.category);
        for entry in &category.items {
            ctx.output.line(&console::style(entry.question).bold().to_string());
            ctx.output.line(&format!("  {}", entry.answer));
        }
    }
    Ok(())
}
