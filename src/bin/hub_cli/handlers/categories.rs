#![deny(clippy::all, clippy::pedantic)]

use serde_json::json;

use crate::args::CategoriesCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: CategoriesCmd) -> Result<(), CliError> {
    match cmd {
        CategoriesCmd::List { with_posts } => {
            let categories = if with_posts {
                ctx.client.get_categories_with_posts(ctx.policy).await?
            } else {
                ctx.client.get_categories(ctx.policy).await?
            };
            print_json(&categories)
        }
        CategoriesCmd::Resolve { slug } => {
            let id = ctx
                .client
                .get_category_id_by_slug(&slug, ctx.policy)
                .await?;
            print_json(&json!({ "slug": slug, "id": id }))
        }
    }
}
