#![deny(clippy::all, clippy::pedantic)]

use dataengineer_hub::wordpress::PostQuery;

use crate::args::PostsCmd;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List {
            page,
            per_page,
            category,
            search,
        } => list(ctx, page, per_page, category, search).await,
        PostsCmd::Get { slug } => get(ctx, &slug).await,
        PostsCmd::Featured { limit } => {
            let posts = ctx.client.get_featured_posts(limit, ctx.policy).await?;
            print_json(&posts)
        }
        PostsCmd::Trending { limit } => {
            let posts = ctx.client.get_trending_posts(limit, ctx.policy).await?;
            print_json(&posts)
        }
    }
}

async fn list(
    ctx: &Ctx,
    page: u32,
    per_page: Option<u32>,
    category: Option<String>,
    search: Option<String>,
) -> Result<(), CliError> {
    let mut query = PostQuery::default().page(page);
    query.per_page = per_page;
    query.search = search;

    let result = match category {
        Some(slug) => {
            ctx.client
                .get_posts_by_category(&slug, &query, ctx.policy)
                .await?
        }
        None => ctx.client.get_posts(&query, ctx.policy).await?,
    };
    print_json(&result)
}

async fn get(ctx: &Ctx, slug: &str) -> Result<(), CliError> {
    let post = ctx.client.get_post_by_slug(slug, ctx.policy).await?;
    print_json(&post)
}
