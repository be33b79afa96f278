//! CLI command implementations.

pub mod account;
pub mod admin;
pub mod cart;
pub mod chat;
pub mod checkout;
pub mod config;
pub mod faq;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod profile;

use clap::{Args, Subcommand};

/// Arguments for the signup command.
#[derive(Args)]
pub struct SignUpArgs {
    /// Account email.
    pub email: String,

    /// Registered business name (prompted if omitted).
    #[arg(short, long)]
    pub business_name: Option<String>,

    /// GSTIN, 15 characters (prompted if omitted; may be left blank).
    #[arg(short, long)]
    pub gstin: Option<String>,

    /// Password (prompted if omitted).
    #[arg(long, env = "AMCROS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for the signin command.
#[derive(Args)]
pub struct SignInArgs {
    /// Account email.
    pub email: String,

    /// Password (prompted if omitted).
    #[arg(long, env = "AMCROS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: Option<ProductsCommand>,

    /// Match product names containing this text.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only this style ("ankle", "sneaker", "sports"; "all" for every style).
    #[arg(long)]
    pub style: Option<String>,

    /// Sort order.
    #[arg(long, value_enum, default_value = "featured")]
    pub sort: SortArg,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List products (default).
    List,
    /// Show one product with its pack sizes.
    Show {
        /// Product id.
        id: String,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum SortArg {
    Featured,
    PriceAsc,
    PriceDesc,
    Name,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Show the cart with totals (default).
    Show,
    /// Add packs of a product.
    Add {
        /// Product id.
        product: String,
        /// Pack size.
        #[arg(short, long, default_value = "3")]
        pack: u32,
        /// Number of packs.
        #[arg(short, long, default_value = "1")]
        quantity: u32,
    },
    /// Increase a row's quantity.
    Inc {
        /// Row number as shown by `cart show`.
        row: usize,
        #[arg(short, long, default_value = "1")]
        by: u32,
    },
    /// Decrease a row's quantity; the row is removed below one.
    Dec {
        /// Row number as shown by `cart show`.
        row: usize,
        #[arg(short, long, default_value = "1")]
        by: u32,
    },
    /// Remove a row.
    Remove {
        /// Row number as shown by `cart show`.
        row: usize,
    },
    /// Empty the cart.
    Clear {
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Place the order without confirmation.
    #[arg(short, long)]
    pub yes: bool,

    /// How many times to retry a failed placement before giving up.
    #[arg(long, default_value = "0")]
    pub retries: u32,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: Option<OrdersCommand>,

    /// Show only the last N orders.
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders, newest first (default).
    List,
    /// Show one order.
    Show {
        /// Order number (AMC...) or document id.
        order: String,
    },
}

/// Arguments for the profile command.
#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: Option<ProfileCommand>,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show your details (default).
    Show,
    /// Edit your details. Fields not given on the command line are prompted for.
    Edit {
        #[arg(long)]
        business_name: Option<String>,
        #[arg(long)]
        gstin: Option<String>,
        #[arg(long)]
        contact: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Do not prompt; keep current values for fields not given.
        #[arg(long)]
        no_input: bool,
    },
}

/// Arguments for the notifications command.
#[derive(Args)]
pub struct NotificationsArgs {
    /// Keep running and print new notifications as they arrive.
    #[arg(short, long)]
    pub follow: bool,
}

/// Arguments for the faq command.
#[derive(Args)]
pub struct FaqArgs {
    /// Only entries mentioning this text.
    pub query: Option<String>,
}

/// Arguments for the chat command.
#[derive(Args)]
pub struct ChatArgs {
    /// Question for the assistant. Starts an interactive chat when omitted.
    pub message: Vec<String>,
}

/// Arguments for the admin command.
#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Every customer's orders, newest first.
    Orders {
        /// Keep running and print order changes as they happen.
        #[arg(short, long)]
        watch: bool,
    },
    /// Move an order to its next status.
    Advance {
        /// Order document id.
        order_id: String,
    },
    /// Edit a product's name, image or pack prices.
    EditProduct {
        /// Product id.
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        image: Option<String>,
        /// Set a pack price, e.g. `--price 5=300`. Repeatable.
        #[arg(long = "price", value_name = "PACK=RUPEES")]
        prices: Vec<String>,
        /// Drop a pack size. Repeatable.
        #[arg(long = "remove-pack", value_name = "PACK")]
        remove_packs: Vec<u32>,
    },
    /// Broadcast a notification to every user.
    Notify {
        /// Title.
        title: String,
        /// Message body.
        description: String,
    },
    /// Load the launch catalog into an empty store.
    Seed,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Write a starter amcros.toml in the current directory.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Check the config file parses and the store opens.
    Validate,
}
