//! Account commands: signup, signin, signout, whoami.

use amcros_app::Session;
use amcros_commerce::profile::SignUpDetails;
use anyhow::Result;
use dialoguer::{Input, Password};

use super::{SignInArgs, SignUpArgs};
use crate::context::Context;

pub async fn sign_up(args: SignUpArgs, ctx: &Context) -> Result<()> {
    let business_name = match args.business_name {
        Some(name) => name,
        None => Input::<String>::new()
            .with_prompt("Business name")
            .interact_text()?,
    };
    let gstin = match args.gstin {
        Some(gstin) => gstin,
        None => Input::<String>::new()
            .with_prompt("GSTIN (optional)")
            .allow_empty(true)
            .interact_text()?,
    };
    let password = match args.password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let app = ctx.app().await?;
    let spinner = ctx.output.spinner("Creating account...");
    let result = app
        .accounts()
        .sign_up(&args.email, &password, SignUpDetails::new(business_name, gstin))
        .await;
    spinner.finish_and_clear();

    let session = result?;
    ctx.save_session(&session)?;
    ctx.output
        .success(&format!("Welcome, {}!", session.profile.display_name()));
    print_session(&session, ctx);
    Ok(())
}

pub async fn sign_in(args: SignInArgs, ctx: &Context) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let app = ctx.app().await?;
    let spinner = ctx.output.spinner("Signing in...");
    let result = app.accounts().sign_in(&args.email, &password).await;
    spinner.finish_and_clear();

    let session = result?;
    ctx.save_session(&session)?;
    ctx.output
        .success(&format!("Signed in as {}", session.profile.display_name()));
    print_session(&session, ctx);
    Ok(())
}

pub async fn sign_out(ctx: &Context) -> Result<()> {
    if ctx.clear_session()? {
        ctx.app().await?.accounts().sign_out().await;
        ctx.output.success("Signed out");
    } else {
        ctx.output.info("Not signed in");
    }
    Ok(())
}

pub async fn whoami(ctx: &Context) -> Result<()> {
    match ctx.session().await? {
        Some(session) => print_session(&session, ctx),
        None if ctx.output.is_json() => ctx.output.json(&serde_json::Value::Null),
        None => ctx.output.info("Not signed in. Run `amcros signin <email>`."),
    }
    Ok(())
}

fn print_session(session: &Session, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&session.profile);
        return;
    }

    let profile = &session.profile;
    ctx.output.header(profile.display_name());
    ctx.output.kv("Email", profile.email.as_str());
    if !profile.gstin.is_empty() {
        ctx.output.kv("GSTIN", &profile.gstin);
    }
    if !profile.contact.is_empty() {
        ctx.output.kv("Contact", &profile.contact);
    }
    if !profile.address.is_empty() {
        ctx.output.kv("Address", &profile.address);
    }
    ctx.output.kv("Role", profile.role.as_str());
}
