//! Business details.

use amcros_commerce::profile::ProfileUpdate;
use anyhow::Result;
use dialoguer::Input;

use super::{ProfileArgs, ProfileCommand};
use crate::context::Context;

pub async fn run(args: ProfileArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.require_session().await?;

    let Some(ProfileCommand::Edit {
        business_name,
        gstin,
        contact,
        address,
        no_input,
    }) = args.command
    else {
        return super::account::whoami(ctx).await;
    };

    let current = ProfileUpdate::from_profile(&session.profile);
    let field = |given: Option<String>, prompt: &str, value: &str| -> Result<String> {
        match given {
            Some(value) => Ok(value),
            None if no_input => Ok(value.to_string()),
            None => Ok(Input::<String>::new()
                .with_prompt(prompt)
                .with_initial_text(value)
                .allow_empty(true)
                .interact_text()?),
        }
    };

    let update = ProfileUpdate {
        business_name: field(business_name, "Business name", &current.business_name)?,
        gstin: field(gstin, "GSTIN", &current.gstin)?,
        contact: field(contact, "Contact number", &current.contact)?,
        address: field(address, "Address", &current.address)?,
    };

    if update == current {
        ctx.output.info("Nothing changed");
        return Ok(());
    }

    let app = ctx.app().await?;
    app.profiles().update(&mut session, update).await?;

    if ctx.output.is_json() {
        ctx.output.json(&session.profile);
    } else {
        ctx.output.success("Details updated");
    }
    Ok(())
}
