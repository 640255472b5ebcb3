//! Command-line surface for `hub-cli`.

#![deny(clippy::all, clippy::pedantic)]

use clap::{Parser, Subcommand};
use dataengineer_hub::config::GlobalOverrides;

#[derive(Parser, Debug)]
#[command(
    name = "hub-cli",
    version,
    about = "DataEngineer Hub WordPress data-layer CLI",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: GlobalOverrides,

    /// Skip cached responses for this invocation
    #[arg(long, global = true, default_value_t = false)]
    pub refresh: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Published posts
    Posts(PostsArgs),
    /// Post categories
    Categories(CategoriesArgs),
    /// Static pages (privacy policy, terms, ...)
    Pages(PagesArgs),
    /// Newsletter subscription
    Newsletter(NewsletterArgs),
    /// Contact form submission
    Contact(ContactArgs),
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List posts with optional filters
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        per_page: Option<u32>,
        /// Category slug; resolved to an id first
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
    },
    /// Get a post by slug
    Get { slug: String },
    /// Posts flagged as featured
    Featured {
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },
    /// Posts flagged as trending
    Trending {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
}

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub action: CategoriesCmd,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCmd {
    /// List categories
    List {
        /// Only categories with at least one post
        #[arg(long, default_value_t = false)]
        with_posts: bool,
    },
    /// Resolve a category slug or name to its id
    Resolve { slug: String },
}

#[derive(Parser, Debug)]
pub struct PagesArgs {
    #[command(subcommand)]
    pub action: PagesCmd,
}

#[derive(Subcommand, Debug)]
pub enum PagesCmd {
    /// Get a page by slug
    Get { slug: String },
}

#[derive(Parser, Debug)]
pub struct NewsletterArgs {
    #[command(subcommand)]
    pub action: NewsletterCmd,
}

#[derive(Subcommand, Debug)]
pub enum NewsletterCmd {
    /// Subscribe an email address
    Subscribe { email: String },
}

#[derive(Parser, Debug)]
pub struct ContactArgs {
    #[command(subcommand)]
    pub action: ContactCmd,
}

#[derive(Subcommand, Debug)]
pub enum ContactCmd {
    /// Send a contact form message
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        message: String,
    },
}
