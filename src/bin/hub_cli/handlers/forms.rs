#![deny(clippy::all, clippy::pedantic)]

use std::collections::BTreeMap;

use hub_wp_types::ContactRequest;

use crate::args::{ContactCmd, NewsletterCmd};
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn newsletter(ctx: &Ctx, cmd: NewsletterCmd) -> Result<(), CliError> {
    match cmd {
        NewsletterCmd::Subscribe { email } => {
            let response = ctx.client.subscribe_newsletter(&email).await?;
            print_json(&response)
        }
    }
}

pub async fn contact(ctx: &Ctx, cmd: ContactCmd) -> Result<(), CliError> {
    match cmd {
        ContactCmd::Submit {
            name,
            email,
            subject,
            message,
        } => {
            let form = ContactRequest {
                name,
                email,
                subject,
                message,
                extra: BTreeMap::new(),
            };
            let response = ctx.client.submit_contact_form(&form).await?;
            print_json(&response)
        }
    }
}
