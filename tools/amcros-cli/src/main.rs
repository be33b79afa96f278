//! Amcros CLI - storefront and admin console for Amcros Connect.
//!
//! Commands:
//! - `amcros signup` / `signin` / `signout` / `whoami` - Account and session
//! - `amcros products` - Browse and search the catalog
//! - `amcros cart` - View and change the cart
//! - `amcros checkout` - Review and place an order
//! - `amcros orders` - Order history
//! - `amcros profile` - Business details
//! - `amcros notifications` - Broadcast notifications
//! - `amcros faq` - Frequently asked questions
//! - `amcros chat` - Ask the support assistant
//! - `amcros admin` - Admin console
//! - `amcros config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    AdminArgs, CartArgs, ChatArgs, CheckoutArgs, ConfigArgs, FaqArgs, NotificationsArgs,
    OrdersArgs, ProductsArgs, ProfileArgs, SignInArgs, SignUpArgs,
};

/// Amcros Connect - order socks for your business from the terminal
#[derive(Parser)]
#[command(name = "amcros")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup(SignUpArgs),

    /// Sign in to an existing account
    Signin(SignInArgs),

    /// Sign out and forget the saved session
    Signout,

    /// Show the signed-in account
    Whoami,

    /// Browse and search products
    Products(ProductsArgs),

    /// View and change your cart
    Cart(CartArgs),

    /// Review your cart and place an order
    Checkout(CheckoutArgs),

    /// Your order history
    Orders(OrdersArgs),

    /// View or edit your business details
    Profile(ProfileArgs),

    /// Show notifications
    Notifications(NotificationsArgs),

    /// Frequently asked questions
    Faq(FaqArgs),

    /// Ask the support assistant
    Chat(ChatArgs),

    /// Admin console
    Admin(AdminArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "amcros=debug" } else { "amcros=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("AMCROS_LOG")
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    // Execute command
    let result = match cli.command {
        Commands::Signup(args) => commands::account::sign_up(args, &ctx).await,
        Commands::Signin(args) => commands::account::sign_in(args, &ctx).await,
        Commands::Signout => commands::account::sign_out(&ctx).await,
        Commands::Whoami => commands::account::whoami(&ctx).await,
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Profile(args) => commands::profile::run(args, &ctx).await,
        Commands::Notifications(args) => commands::notifications::run(args, &ctx).await,
        Commands::Faq(args) => commands::faq::run(args, &ctx).await,
        Commands::Chat(args) => commands::chat::run(args, &ctx).await,
        Commands::Admin(args) => commands::admin::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
