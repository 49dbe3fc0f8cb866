//! MyMenu CLI - operator tools for a user's kitchen.
//!
//! # Usage
//!
//! ```bash
//! # Run the expiry scan for a user (notifications go to the log)
//! mymenu --user <uuid> scan
//!
//! # List the refrigerator, add something to the pantry
//! mymenu pantry list nevera
//! mymenu pantry add "Arroz" --quantity "1 kg" --expiry 31122026 --bucket despensa
//!
//! # Recipe suggestions and what is missing for one recipe
//! mymenu recipes suggest
//! mymenu recipes show 12
//!
//! # Shopping list
//! mymenu shopping import 12
//! mymenu shopping move 40 --quantity 12 --expiry 05112026 --bucket nevera
//!
//! # Format typed date digits (no backend needed)
//! mymenu format-date 25122025
//! ```
//!
//! # Commands
//!
//! - `scan` - Raise expiry alerts once per item
//! - `pantry` - List, add, edit and delete food items
//! - `recipes` - Browse the catalogue and suggestions
//! - `shopping` - Manage the shopping list
//! - `format-date` - Format `DDMMYYYY` digits as `DD/MM/YYYY`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mymenu_core::{Difficulty, FoodItemId, RecipeId, ShoppingItemId, StorageBucket, UserId};
use mymenu_kitchen::{AppError, KitchenConfig};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "mymenu")]
#[command(author, version, about = "MyMenu kitchen tools")]
struct Cli {
    /// User to act for (defaults to `MYMENU_USER_ID`)
    #[arg(long, global = true)]
    user: Option<UserId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Raise expiry alerts for items about to expire
    Scan {
        /// Treat this date as today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Manage food items
    Pantry {
        #[command(subcommand)]
        action: PantryAction,
    },
    /// Browse recipes
    Recipes {
        #[command(subcommand)]
        action: RecipeAction,
    },
    /// Manage the shopping list
    Shopping {
        #[command(subcommand)]
        action: ShoppingAction,
    },
    /// Format typed date digits as DD/MM/YYYY
    FormatDate {
        /// Raw input, e.g. 25122025
        raw: String,
    },
}

#[derive(Subcommand)]
enum PantryAction {
    /// List one bucket, soonest expiry first
    List {
        /// `nevera`, `arcon` or `despensa`
        #[arg(default_value = "nevera")]
        bucket: StorageBucket,
    },
    /// Add a food item
    Add {
        name: String,
        #[arg(short, long)]
        quantity: Option<String>,
        /// Expiry as DDMMYYYY or DD/MM/YYYY
        #[arg(short, long)]
        expiry: Option<String>,
        #[arg(short, long, default_value = "nevera")]
        bucket: StorageBucket,
    },
    /// Edit a food item
    Edit {
        id: FoodItemId,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        quantity: Option<String>,
        /// Expiry as DDMMYYYY or DD/MM/YYYY
        #[arg(short, long)]
        expiry: Option<String>,
        #[arg(short, long)]
        bucket: Option<StorageBucket>,
    },
    /// Delete a food item
    Delete { id: FoodItemId },
}

#[derive(Subcommand)]
enum RecipeAction {
    /// List the catalogue
    List {
        /// Case-insensitive name search
        #[arg(short, long, default_value = "")]
        query: String,
        /// `facil`, `medio` or `dificil`
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
    /// Recipes ranked by owned ingredients
    Suggest,
    /// One recipe with owned and missing ingredients
    Show { id: RecipeId },
}

#[derive(Subcommand)]
enum ShoppingAction {
    /// Show the list
    List,
    /// Add one or more entries
    Add {
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Add a recipe's missing ingredients
    Import { recipe_id: RecipeId },
    /// Remove one entry
    Remove { id: ShoppingItemId },
    /// Empty the list
    Clear,
    /// Move a bought entry into storage
    Move {
        id: ShoppingItemId,
        #[arg(short, long)]
        quantity: String,
        /// Expiry as DDMMYYYY or DD/MM/YYYY
        #[arg(short, long)]
        expiry: String,
        #[arg(short, long, default_value = "nevera")]
        bucket: StorageBucket,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &KitchenConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

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

/// Initialize tracing with `EnvFilter` and the Sentry layer.
fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mymenu=info,mymenu_kitchen=info".into());

    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::FormatDate { raw } = &cli.command {
        init_tracing(false);
        commands::format_date(raw);
        return ExitCode::SUCCESS;
    }

    let config = match KitchenConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Sentry first so the tracing layer has a client to report to
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_json);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&*e);
            ExitCode::FAILURE
        }
    }
}

fn report(error: &(dyn std::error::Error + 'static)) {
    if let Some(app_error) = error.downcast_ref::<AppError>() {
        if app_error.is_reportable() {
            sentry::capture_error(app_error);
        }
        tracing::error!(error = %app_error, "{}", app_error.user_message());
    } else {
        tracing::error!("Command failed: {error}");
    }
}

async fn run(cli: Cli, config: KitchenConfig) -> Result<(), Box<dyn std::error::Error>> {
    let user_id = cli
        .user
        .or(config.user_id)
        .ok_or("No user given: pass --user or set MYMENU_USER_ID")?;
    let kitchen = commands::Kitchen::connect(config, user_id)?;

    match cli.command {
        Commands::Scan { today } => commands::scan::run(&kitchen, today).await?,
        Commands::Pantry { action } => match action {
            PantryAction::List { bucket } => commands::pantry::list(&kitchen, bucket).await?,
            PantryAction::Add {
                name,
                quantity,
                expiry,
                bucket,
            } => {
                commands::pantry::add(
                    &kitchen,
                    &name,
                    quantity.as_deref(),
                    expiry.as_deref(),
                    bucket,
                )
                .await?;
            }
            PantryAction::Edit {
                id,
                name,
                quantity,
                expiry,
                bucket,
            } => {
                let edit = commands::pantry::Edit {
                    name,
                    quantity,
                    expiry,
                    bucket,
                };
                commands::pantry::edit(&kitchen, id, edit).await?;
            }
            PantryAction::Delete { id } => commands::pantry::delete(&kitchen, id).await?,
        },
        Commands::Recipes { action } => match action {
            RecipeAction::List { query, difficulty } => {
                commands::recipes::list(&kitchen, query, difficulty).await?;
            }
            RecipeAction::Suggest => commands::recipes::suggest(&kitchen).await?,
            RecipeAction::Show { id } => commands::recipes::show(&kitchen, id).await?,
        },
        Commands::Shopping { action } => match action {
            ShoppingAction::List => commands::shopping::list(&kitchen).await?,
            ShoppingAction::Add { names } => commands::shopping::add(&kitchen, &names).await?,
            ShoppingAction::Import { recipe_id } => {
                commands::shopping::import(&kitchen, recipe_id).await?;
            }
            ShoppingAction::Remove { id } => commands::shopping::remove(&kitchen, id).await?,
            ShoppingAction::Clear => commands::shopping::clear(&kitchen).await?,
            ShoppingAction::Move {
                id,
                quantity,
                expiry,
                bucket,
            } => {
                commands::shopping::move_to_storage(&kitchen, id, quantity, &expiry, bucket)
                    .await?;
            }
        },
        Commands::FormatDate { raw } => commands::format_date(&raw),
    }
    Ok(())
}
