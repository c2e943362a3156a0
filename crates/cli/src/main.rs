//! Wishlist CLI - metafield provisioning and wishlist management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the customer metafield definition the wishlist lives in
//! wishlist-cli provision
//!
//! # Inspect a customer's wishlist
//! wishlist-cli show --customer 7012 --token "$TOKEN"
//!
//! # Add or remove a product
//! wishlist-cli add 8123456789 --customer 7012
//! wishlist-cli remove 8123456789 --customer 7012
//! ```
//!
//! # Commands
//!
//! - `provision` - Create the wishlist metafield definition (Admin API)
//! - `show` - Print the hydrated wishlist
//! - `add` / `remove` - Mutate the wishlist and print the reconciled list

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;
use wishlist_core::{CustomerRef, DEFAULT_METAFIELD_KEY, DEFAULT_METAFIELD_NAMESPACE};
use wishlist_sync::shopify::{MetafieldDefinition, PROVISIONED_KEY, PROVISIONED_NAMESPACE};

mod commands;

use commands::wishlist::{Action, Target};

#[derive(Parser)]
#[command(name = "wishlist-cli")]
#[command(author, version, about = "Wishlist CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the wishlist customer metafield definition
    Provision {
        /// Metafield namespace
        #[arg(long, default_value = PROVISIONED_NAMESPACE)]
        namespace: String,

        /// Metafield key
        #[arg(long, default_value = PROVISIONED_KEY)]
        key: String,

        /// Definition display name
        #[arg(long, default_value = "Wishlist items")]
        name: String,
    },
    /// Print a customer's wishlist
    Show(TargetArgs),
    /// Add a product to the front of a customer's wishlist
    Add {
        /// Product ID (numeric or GID)
        product_id: String,

        #[command(flatten)]
        target: TargetArgs,
    },
    /// Remove a product from a customer's wishlist
    Remove {
        /// Product ID (numeric or GID)
        product_id: String,

        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Customer ID (numeric or GID)
    #[arg(short, long)]
    customer: String,

    /// Customer Account API access token
    #[arg(long, env = "WISHLIST_CUSTOMER_TOKEN", hide_env_values = true)]
    token: String,

    /// Metafield namespace
    #[arg(long, default_value = DEFAULT_METAFIELD_NAMESPACE)]
    namespace: String,

    /// Metafield key
    #[arg(long, default_value = DEFAULT_METAFIELD_KEY)]
    key: String,
}

impl From<TargetArgs> for Target {
    fn from(args: TargetArgs) -> Self {
        Self {
            customer: CustomerRef::new(args.customer),
            access_token: SecretString::from(args.token),
            namespace: args.namespace,
            key: args.key,
        }
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wishlist_cli=info,wishlist_sync=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load .env before parsing so env-backed flags like --token resolve
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Provision {
            namespace,
            key,
            name,
        } => {
            let definition = MetafieldDefinition {
                name,
                namespace,
                key,
                ..MetafieldDefinition::default()
            };
            commands::provision::run(definition).await?;
        }
        Commands::Show(target) => {
            commands::wishlist::run(target.into(), Action::Show).await?;
        }
        Commands::Add { product_id, target } => {
            commands::wishlist::run(target.into(), Action::Add(product_id)).await?;
        }
        Commands::Remove { product_id, target } => {
            commands::wishlist::run(target.into(), Action::Remove(product_id)).await?;
        }
    }
    Ok(())
}
