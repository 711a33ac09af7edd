//! Catalog Admin CLI - drive the admin console from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in; the session marker is kept for later commands
//! catalog-admin login -e admin@example.com
//!
//! # Browse and moderate the catalog
//! catalog-admin products list --pages 2
//! catalog-admin products toggle p-17
//! catalog-admin reviews list --search "great"
//! catalog-admin taxonomy create category "Computer Vision"
//!
//! # Sign out
//! catalog-admin logout
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `whoami` / `confirm-email` - Session management
//! - `products` - List, inspect, create, edit and moderate products
//! - `users` - List users, toggle or remove them, see their products and reviews
//! - `reviews` - List, search and delete reviews
//! - `taxonomy` - Manage categories, technologies and use cases

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog_admin::ConsoleConfig;
use catalog_admin_core::{ProductId, ReviewId, TaxonomyId, TaxonomyKind, UserId};

mod commands;
mod output;

use commands::CliError;

#[derive(Parser)]
#[command(name = "catalog-admin")]
#[command(author, version, about = "Catalog admin console")]
struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and keep the session marker
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Password; read from stdin when omitted
        #[arg(short, long, env = "CONSOLE_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Sign in through the user endpoint instead of the admin one
        #[arg(long)]
        user: bool,
    },
    /// Clear the session marker
    Logout,
    /// Show the signed-in admin id
    Whoami,
    /// Mark an admin's email address as confirmed
    ConfirmEmail {
        /// Admin id from the confirmation link
        admin_id: String,
    },
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Manage categories, technologies and use cases
    Taxonomy {
        #[command(subcommand)]
        action: TaxonomyAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products with their review counts
    List {
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,

        /// Only show products matching this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show one product in full
    Show { productid: String },
    /// Activate or deactivate a product
    Toggle {
        productid: String,
        /// Pages to load while looking for the product
        #[arg(long, default_value_t = 5)]
        pages: u32,
    },
    /// Delete a product
    Delete {
        productid: String,
        #[arg(long, default_value_t = 5)]
        pages: u32,
    },
    /// Give a product to another user
    Assign {
        productid: String,
        /// Email or name of the new owner
        #[arg(short, long)]
        to: String,
        #[arg(long, default_value_t = 5)]
        pages: u32,
    },
    /// List the reviews of a product
    Reviews {
        productid: String,
        /// Review pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
        #[arg(long, default_value_t = 5)]
        product_pages: u32,
    },
    /// Create a product from a YAML file
    Create {
        /// Product form as YAML
        #[arg(short, long)]
        file: PathBuf,
        /// Product image
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Replace a product's details from a YAML file
    Update {
        productid: String,
        /// Owner of the product
        #[arg(short, long)]
        owner: String,
        /// Product form as YAML; omitted fields are cleared
        #[arg(short, long)]
        file: PathBuf,
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Print a product's current details as YAML, ready for `update`
    Export { productid: String },
}

#[derive(Subcommand)]
enum UserAction {
    /// List users
    List {
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Enable or disable a user
    Toggle { userid: String },
    /// Remove a user
    Remove { userid: String },
    /// List a user's products
    Products { userid: String },
    /// List a user's reviews
    Reviews {
        userid: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// List reviews
    List {
        #[arg(short, long)]
        search: Option<String>,
        /// Show every match instead of the first screenful
        #[arg(long)]
        all: bool,
    },
    /// Delete a review
    Delete { reviewid: String },
    /// Show a reviewer's profile
    User { userid: String },
}

#[derive(Subcommand)]
enum TaxonomyAction {
    /// List entries
    List {
        /// `category`, `technology` or `usecase`
        kind: TaxonomyKind,
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Create an entry
    Create { kind: TaxonomyKind, name: String },
    /// Rename an entry
    Rename {
        kind: TaxonomyKind,
        id: String,
        name: String,
    },
    /// Delete an entry
    Delete { kind: TaxonomyKind, id: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ConsoleConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(config: &ConsoleConfig) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catalog_admin=info,catalog_admin_cli=info".into());

    let json_layer = config
        .log_json
        .then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!config.log_json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .without_time()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConsoleConfig::from_env() {
        Ok(config) => commands::with_default_session_file(config),
        Err(e) => {
            output::failure(&e.to_string());
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(&config);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        output::failure(&e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ConsoleConfig) -> Result<(), CliError> {
    let ctx = commands::Context::new(config, cli.yes)?;

    match cli.command {
        Commands::Login {
            email,
            password,
            user,
        } => commands::auth::login(&ctx, &email, password, user).await?,
        Commands::Logout => commands::auth::logout(&ctx)?,
        Commands::Whoami => commands::auth::whoami(&ctx)?,
        Commands::ConfirmEmail { admin_id } => {
            commands::auth::confirm_email(&ctx, &admin_id).await?;
        }
        Commands::Products { action } => match action {
            ProductAction::List { pages, search } => {
                commands::products::list(&ctx, pages, search.as_deref()).await?;
            }
            ProductAction::Show { productid } => {
                commands::products::show(&ctx, &ProductId::new(productid)).await?;
            }
            ProductAction::Toggle { productid, pages } => {
                commands::products::toggle(&ctx, &ProductId::new(productid), pages).await?;
            }
            ProductAction::Delete { productid, pages } => {
                commands::products::delete(&ctx, &ProductId::new(productid), pages).await?;
            }
            ProductAction::Assign {
                productid,
                to,
                pages,
            } => commands::products::assign(&ctx, &ProductId::new(productid), &to, pages).await?,
            ProductAction::Reviews {
                productid,
                pages,
                product_pages,
            } => {
                commands::products::reviews(&ctx, &ProductId::new(productid), pages, product_pages)
                    .await?;
            }
            ProductAction::Create { file, image } => {
                commands::products::create(&ctx, &file, image.as_deref()).await?;
            }
            ProductAction::Update {
                productid,
                owner,
                file,
                image,
            } => {
                commands::products::update(
                    &ctx,
                    &ProductId::new(productid),
                    &UserId::new(owner),
                    &file,
                    image.as_deref(),
                )
                .await?;
            }
            ProductAction::Export { productid } => {
                commands::products::export(&ctx, &ProductId::new(productid)).await?;
            }
        },
        Commands::Users { action } => match action {
            UserAction::List { search } => commands::users::list(&ctx, search.as_deref()).await?,
            UserAction::Toggle { userid } => {
                commands::users::toggle(&ctx, &UserId::new(userid)).await?;
            }
            UserAction::Remove { userid } => {
                commands::users::remove(&ctx, &UserId::new(userid)).await?;
            }
            UserAction::Products { userid } => {
                commands::users::products(&ctx, &UserId::new(userid)).await?;
            }
            UserAction::Reviews { userid, pages } => {
                commands::users::reviews(&ctx, &UserId::new(userid), pages).await?;
            }
        },
        Commands::Reviews { action } => match action {
            ReviewAction::List { search, all } => {
                commands::reviews::list(&ctx, search.as_deref(), all).await?;
            }
            ReviewAction::Delete { reviewid } => {
                commands::reviews::delete(&ctx, &ReviewId::new(reviewid)).await?;
            }
            ReviewAction::User { userid } => {
                commands::reviews::user(&ctx, &UserId::new(userid)).await?;
            }
        },
        Commands::Taxonomy { action } => match action {
            TaxonomyAction::List { kind, search } => {
                commands::taxonomy::list(&ctx, kind, search.as_deref()).await?;
            }
            TaxonomyAction::Create { kind, name } => {
                commands::taxonomy::create(&ctx, kind, &name).await?;
            }
            TaxonomyAction::Rename { kind, id, name } => {
                commands::taxonomy::rename(&ctx, kind, &TaxonomyId::new(id), &name).await?;
            }
            TaxonomyAction::Delete { kind, id } => {
                commands::taxonomy::delete(&ctx, kind, &TaxonomyId::new(id)).await?;
            }
        },
    }
    Ok(())
}
