#![deny(clippy::all, clippy::pedantic)]

use crate::args::PagesCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PagesCmd) -> Result<(), CliError> {
    match cmd {
        PagesCmd::Get { slug } => {
            let page = ctx.client.get_page_by_slug(&slug, ctx.policy).await?;
            print_json(&page)
        }
    }
}
