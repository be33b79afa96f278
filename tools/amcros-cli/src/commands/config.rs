//! Config file management.

use amcros_app::config::generate_default_config;
use anyhow::{bail, Context as _, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::CONFIG_NAMES;
use crate::context::Context;

pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show(ctx),
        ConfigCommand::Init { force } => init(force, ctx),
        ConfigCommand::Validate => validate(ctx).await,
    }
}

fn show(ctx: &Context) -> Result<()> {
    let loaded = &ctx.config;
    if ctx.output.is_json() {
        ctx.output.json(&loaded.config);
        return Ok(());
    }

    match &loaded.path {
        Some(path) => ctx.output.kv("File", &path.display().to_string()),
        None => ctx.output.kv("File", "(none, using defaults)"),
    }
    ctx.output.kv("Data dir", &loaded.data_dir().display().to_string());
    ctx.output.info("");
    ctx.output.line(&loaded.config.to_toml_string()?);
    Ok(())
}

fn init(force: bool, ctx: &Context) -> Result<()> {
    let path = ctx.cwd.join(CONFIG_NAMES[0]);
    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    std::fs::write(&path, generate_default_config())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    ctx.output.success(&format!("Created {}", path.display()));
    ctx.output.info("Next steps:");
    ctx.output.list_item("amcros admin seed      # load the launch catalog");
    ctx.output.list_item("amcros signup          # create an account");
    Ok(())
}

async fn validate(ctx: &Context) -> Result<()> {
    let app = ctx.app().await?;
    let products = app.catalog().list().await?;

    ctx.output.success("Configuration is valid");
    ctx.output.kv("Store", &format!("{:?}", app.config().store.backend));
    ctx.output.kv("Chat", app.chat().responder_name());
    ctx.output.kv("Products", &products.len().to_string());
    Ok(())
}
