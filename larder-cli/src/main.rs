use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use larder_client::sync::{add_grocery_item, add_missing_ingredients, finalize_purchase};
use larder_client::{
    export, load_catalog, load_snapshot, spawn_expiry_watch, store_search_url, ApiClient,
    BlockingSearch, GroceryDraft, LocalCache, Session, Snapshot, Store,
};
use larder_core::aggregate::removal_suggestions;
use larder_core::format::{copy_text, share_text};
use larder_core::history::{DEFAULT_MONTH_COUNT, DEFAULT_TREND_WINDOW};
use larder_core::recipes::find_recipe;
use larder_core::validate::{parse_budget, parse_quantity, require_name};
use larder_core::{
    budget_projection, filter_history, filter_products, match_recipes, monthly_series,
    recent_trend, sort_history, total_cost, Category, DietFilter, GroceryItemPatch, HistoryFilter,
    NewPantryItem, ProductQuery, ProductSort, SmartFill, SortMode, RECIPE_CATALOG,
};

mod auth;
mod config;
mod state;
mod views;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "larder",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("LARDER_BUILD_SHA"), ")"),
    about = "Grocery list, pantry and budget tracker"
)]
struct Cli {
    /// Print machine-readable JSON where supported
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage ~/.larder/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Store credentials and start a session
    Login {
        #[arg(long)]
        user_id: String,

        /// Access token (prompted on stdin when omitted)
        #[arg(long)]
        token: Option<String>,
    },

    /// Drop the stored session
    Logout,

    /// Show the grocery list grouped by category
    List,

    /// Add an item to the grocery list
    Add {
        name: String,

        /// Category (guessed from the name when omitted)
        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,

        #[arg(long, default_value = "")]
        qty: String,

        #[arg(long, default_value = "")]
        price: String,

        /// Fill category, price and name from history/catalog first
        #[arg(long)]
        smart: bool,

        /// Add even if the pantry already stocks it
        #[arg(long)]
        allow_duplicate: bool,
    },

    /// Change fields of a grocery item
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,

        #[arg(long)]
        qty: Option<String>,

        #[arg(long)]
        price: Option<String>,
    },

    /// Remove a grocery item
    Remove { id: String },

    /// Record the current list as a purchase and clear it
    Finalize {
        /// Confirm without prompting
        #[arg(long)]
        yes: bool,
    },

    /// Pantry stock
    Pantry {
        #[command(subcommand)]
        command: PantryCommand,
    },

    /// Recipes ranked by what the pantry already has
    Recipes {
        /// all, vegetarian, high-protein, low-carb, gluten-free
        #[arg(long, default_value = "all")]
        diet: DietFilter,

        #[arg(long, default_value = "")]
        query: String,

        /// Add a recipe's missing ingredients to the grocery list
        #[arg(long)]
        add_missing: Option<String>,
    },

    /// Monthly budget
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },

    /// Purchase history
    History {
        #[arg(long)]
        query: Option<String>,

        /// Exact purchase date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Minimum total
        #[arg(long)]
        min: Option<f64>,

        /// newest, oldest, highest, lowest
        #[arg(long, default_value = "newest")]
        sort: SortMode,

        /// Write the matching purchases to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Monthly and per-purchase spending trends
    Trends {
        #[arg(long, default_value_t = DEFAULT_MONTH_COUNT)]
        months: usize,

        #[arg(long, default_value_t = DEFAULT_TREND_WINDOW)]
        window: usize,
    },

    /// Suggest category and price for an item name
    SmartFill { name: String },

    /// Browse the product catalog
    Products {
        #[arg(long, default_value = "")]
        search: String,

        #[arg(long, value_parser = parse_category)]
        category: Option<Category>,

        #[arg(long)]
        store: Option<String>,

        /// name, price_asc, price_desc
        #[arg(long, default_value = "name")]
        sort: ProductSort,
    },

    /// Weekly meal plan
    MealPlan {
        #[command(subcommand)]
        command: MealPlanCommand,
    },

    /// Print the list as shareable text
    Share {
        /// Names and quantities only
        #[arg(long)]
        plain: bool,
    },

    /// Search link for an item on a grocery store
    StoreLink {
        /// BigBasket, JioMart, Blinkit, Instamart
        store: Store,
        name: String,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Subcommand, Debug)]
enum PantryCommand {
    List,
    Add {
        name: String,

        #[arg(long, default_value = "")]
        qty: String,

        /// YYYY-MM-DD
        #[arg(long)]
        expiry: Option<NaiveDate>,
    },
    Edit {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        qty: Option<String>,

        #[arg(long, conflicts_with = "clear_expiry")]
        expiry: Option<NaiveDate>,

        #[arg(long)]
        clear_expiry: bool,
    },
    Remove { id: String },
    /// Low-stock and soon-to-expire items
    Alerts,
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Projection for this month, with removal suggestions when over
    Show,
    /// Set the monthly limit
    Set { limit: String },
}

#[derive(Subcommand, Debug)]
enum MealPlanCommand {
    Show,
    /// Plan a recipe (id or name) for a day; an empty recipe clears it
    Set { day: String, recipe: String },
}

fn parse_category(raw: &str) -> Result<Category, String> {
    let category = Category::normalize(raw);
    if category.label().eq_ignore_ascii_case(raw.trim()) {
        Ok(category)
    } else {
        let labels: Vec<_> = Category::ALL.iter().map(Category::label).collect();
        Err(format!("unknown category '{raw}' (expected one of {})", labels.join(", ")))
    }
}

fn parse_weekday(raw: &str) -> Result<Weekday> {
    raw.trim()
        .parse::<Weekday>()
        .map_err(|_| anyhow::anyhow!("unknown day '{raw}' (expected Monday..Sunday)"))
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "larder=info,larder_client=info,larder_core=warn".to_string());
    let json_logs = std::env::var("LARDER_LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Expiry dates are compared at UTC day granularity, whatever the display zone.
fn expiry_reference_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Per-command state for an authenticated user.
struct Ctx {
    cfg: Config,
    tz: Tz,
    session: Session,
    api: ApiClient,
    cache: LocalCache,
    json: bool,
}

impl Ctx {
    fn new(cfg: Config, session: Session, json: bool) -> Result<Self> {
        let tz = cfg.timezone()?;
        let api = ApiClient::new(&cfg.api.base_url, session.access_token.clone())?;
        let cache = LocalCache::new(state::cache_dir()?);
        Ok(Self { cfg, tz, session, api, cache, json })
    }

    fn user_id(&self) -> &str {
        &self.session.user_id
    }

    fn today(&self) -> NaiveDate {
        expiry_reference_date(Utc::now())
    }

    async fn snapshot(&self) -> Snapshot {
        let snap = load_snapshot(&self.api, &self.cache, self.user_id()).await;
        if let Some(notice) = &snap.notice {
            eprintln!("{notice}");
        }
        snap
    }

    fn budget_limit(&self) -> f64 {
        self.cache
            .read_budget_limit(self.user_id())
            .unwrap_or(self.cfg.budget.default_limit)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    let policy = cfg.session_policy();

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?),
        },

        Command::Login { user_id, token } => {
            auth::login(&user_id, token, policy)?;
        }

        Command::Logout => auth::logout()?,

        command => {
            let session = auth::require_session(policy)?;
            let mut expired = spawn_expiry_watch(&session, policy);
            let ctx = Ctx::new(cfg, session, cli.json)?;

            tokio::select! {
                res = run(&ctx, command) => res?,
                Ok(_) = expired.wait_for(|e| *e) => {
                    auth::clear_session()?;
                    bail!(
                        "Session expired. Please log in again: larder login --user-id {}",
                        ctx.user_id()
                    );
                }
            }
        }
    }

    Ok(())
}

async fn run(ctx: &Ctx, command: Command) -> Result<()> {
    match command {
        Command::Config { .. } | Command::Login { .. } | Command::Logout => {}

        Command::List => {
            let snap = ctx.snapshot().await;
            if ctx.json {
                print_json(&snap.grocery)?;
            } else {
                views::print_grocery(&snap.grocery);
            }
        }

        Command::Add { name, category, qty, price, smart, allow_duplicate } => {
            let snap = ctx.snapshot().await;
            let mut draft = GroceryDraft { name, category, quantity: qty, price };
            if smart {
                apply_smart_fill(ctx, &snap, &mut draft).await?;
            }
            let item = add_grocery_item(&ctx.api, &draft, &snap.pantry, allow_duplicate).await?;
            println!("✓ Added {} ({}) to your grocery list", item.name, item.category);
        }

        Command::Edit { id, name, category, qty, price } => {
            let patch = GroceryItemPatch {
                name: name.as_deref().map(require_name).transpose()?,
                category,
                quantity: qty.as_deref().map(parse_quantity).transpose()?,
                price: price.as_deref().map(larder_core::validate::parse_price).transpose()?,
            };
            if patch == GroceryItemPatch::default() {
                bail!("nothing to change (pass --name, --category, --qty or --price)");
            }
            ctx.api.update_grocery(&id, &patch).await?;
            println!("✓ Item updated");
        }

        Command::Remove { id } => {
            ctx.api.delete_grocery(&id).await?;
            println!("✓ Item removed");
        }

        Command::Finalize { yes } => {
            let snap = ctx.snapshot().await;
            if !yes {
                if snap.grocery.is_empty() {
                    bail!("Add items to your grocery list before finalizing.");
                }
                println!(
                    "This will record {} item(s) totalling {} and clear the list.",
                    snap.grocery.len(),
                    larder_core::format_inr(total_cost(&snap.grocery))
                );
                println!("Re-run with --yes to confirm.");
                return Ok(());
            }
            let total = finalize_purchase(&ctx.api, &snap.grocery).await?;
            println!("✓ Purchase finalized! Total: {}", larder_core::format_inr(total));
        }

        Command::Pantry { command } => run_pantry(ctx, command).await?,

        Command::Recipes { diet, query, add_missing } => {
            let snap = ctx.snapshot().await;
            if let Some(wanted) = add_missing {
                let recipe = find_recipe(RECIPE_CATALOG, &wanted)
                    .with_context(|| format!("no recipe '{wanted}'"))?;
                let added = add_missing_ingredients(&ctx.api, recipe, &snap.grocery).await?;
                if added.is_empty() {
                    println!("All ingredients are already in your grocery list.");
                } else {
                    println!("Added {} missing ingredient(s) from {}.", added.len(), recipe.name);
                }
                return Ok(());
            }

            let matches = match_recipes(RECIPE_CATALOG, &snap.pantry, diet, &query);
            if ctx.json {
                print_json(&matches.all)?;
            } else {
                views::print_recipes(&matches);
            }
        }

        Command::Budget { command } => match command {
            BudgetCommand::Show => {
                let snap = ctx.snapshot().await;
                let limit = ctx.budget_limit();
                let pending = total_cost(&snap.grocery);
                let current = snap.summary.as_ref().map(|s| s.current()).unwrap_or(0.0);
                let projection = budget_projection(current, pending, limit);
                let suggestions = if projection.over_budget {
                    removal_suggestions(&snap.grocery, &snap.pantry, -projection.remaining)
                } else {
                    Vec::new()
                };
                views::print_budget(&views::BudgetView {
                    limit,
                    pending,
                    projection,
                    summary: snap.summary.as_ref(),
                    suggestions: &suggestions,
                });
            }
            BudgetCommand::Set { limit } => {
                let limit = parse_budget(&limit)?;
                ctx.cache.write_budget_limit(ctx.user_id(), limit);
                println!("✓ Budget limit set to {}", larder_core::format_inr(limit));
            }
        },

        Command::History { query, date, min, sort, export: export_path } => {
            let snap = ctx.snapshot().await;
            let filter = HistoryFilter { text_query: query, exact_date: date, min_amount: min };
            let rows = sort_history(&filter_history(&snap.history, &filter, ctx.tz), sort);

            if let Some(path) = export_path {
                export::export_history_csv(&path, &rows, ctx.tz)?;
                println!("Wrote {} purchase(s) to {}", rows.len(), path.display());
            } else if ctx.json {
                print_json(&rows)?;
            } else {
                views::print_history(&rows, ctx.tz);
            }
        }

        Command::Trends { months, window } => {
            let snap = ctx.snapshot().await;
            let series = monthly_series(&snap.history, months, Utc::now());
            let recent = recent_trend(&snap.history, window, ctx.tz);
            if ctx.json {
                print_json(&serde_json::json!({ "monthly": series, "recent": recent }))?;
            } else {
                views::print_trends(&series, &recent);
            }
        }

        Command::SmartFill { name } => {
            let snap = ctx.snapshot().await;
            let catalog = load_catalog(&ctx.api, ctx.cfg.catalog.limit).await;
            let remote = BlockingSearch::new(&ctx.api);
            let suggestion = SmartFill::new(&snap.history, &catalog)
                .with_remote(&remote)
                .with_remote_limit(ctx.cfg.smart_fill.remote_limit)
                .resolve(&name)?;
            if ctx.json {
                print_json(&suggestion)?;
            } else {
                views::print_suggestion(&name, &suggestion);
            }
        }

        Command::Products { search, category, store, sort } => {
            let catalog = if search.trim().is_empty() {
                load_catalog(&ctx.api, ctx.cfg.catalog.limit).await
            } else {
                ctx.api.search_products(&search, ctx.cfg.catalog.limit).await?
            };
            let query = ProductQuery { search, category, store, sort };
            let rows = filter_products(&catalog, &query);
            if ctx.json {
                print_json(&rows)?;
            } else {
                views::print_products(&rows);
            }
        }

        Command::MealPlan { command } => match command {
            MealPlanCommand::Show => {
                let plan = ctx.cache.read_meal_plan(ctx.user_id());
                if ctx.json {
                    print_json(&plan)?;
                } else {
                    views::print_meal_plan(&plan);
                }
            }
            MealPlanCommand::Set { day, recipe } => {
                let day = parse_weekday(&day)?;
                let name = if recipe.trim().is_empty() {
                    String::new()
                } else {
                    find_recipe(RECIPE_CATALOG, &recipe)
                        .with_context(|| format!("no recipe '{recipe}'"))?
                        .name
                        .to_string()
                };
                let mut plan = ctx.cache.read_meal_plan(ctx.user_id());
                plan.set(day, &name);
                ctx.cache.write_meal_plan(ctx.user_id(), &plan);
                views::print_meal_plan(&plan);
            }
        },

        Command::Share { plain } => {
            let snap = ctx.snapshot().await;
            if snap.grocery.is_empty() {
                bail!("Your grocery list is empty.");
            }
            if plain {
                println!("{}", copy_text(&snap.grocery));
            } else {
                println!("{}", share_text(&snap.grocery));
            }
        }

        Command::StoreLink { store, name } => {
            let name = require_name(&name)?;
            println!("{}", store_search_url(store, &name)?);
        }
    }

    Ok(())
}

async fn apply_smart_fill(ctx: &Ctx, snap: &Snapshot, draft: &mut GroceryDraft) -> Result<()> {
    let catalog = load_catalog(&ctx.api, ctx.cfg.catalog.limit).await;
    let remote = BlockingSearch::new(&ctx.api);
    let suggestion = SmartFill::new(&snap.history, &catalog)
        .with_remote(&remote)
        .with_remote_limit(ctx.cfg.smart_fill.remote_limit)
        .resolve(&draft.name)?;

    if draft.category.is_none() {
        draft.category = Some(suggestion.category);
    }
    if draft.price.trim().is_empty() {
        if let Some(price) = suggestion.price {
            draft.price = price.to_string();
        }
    }
    if let Some(canonical) = suggestion.canonical_name {
        draft.name = canonical;
    }
    Ok(())
}

async fn run_pantry(ctx: &Ctx, command: PantryCommand) -> Result<()> {
    match command {
        PantryCommand::List => {
            let snap = ctx.snapshot().await;
            if ctx.json {
                print_json(&snap.pantry)?;
            } else {
                views::print_pantry(&snap.pantry, ctx.today());
            }
        }

        PantryCommand::Add { name, qty, expiry } => {
            let item = NewPantryItem {
                item_name: require_name(&name)?,
                quantity: parse_quantity(&qty)?,
                expiry_date: expiry,
            };
            let resp = ctx.api.create_pantry(&item).await?;
            if resp.merged_duplicate {
                println!("✓ Merged {} with existing pantry item", item.item_name);
            } else {
                println!("✓ Added {} to pantry", item.item_name);
            }
        }

        PantryCommand::Edit { id, name, qty, expiry, clear_expiry } => {
            let pantry = ctx.api.list_pantry().await?;
            let Some(current) = pantry.iter().find(|p| p.id == id) else {
                bail!("no pantry item with id '{id}'");
            };
            let item = NewPantryItem {
                item_name: match name {
                    Some(n) => require_name(&n)?,
                    None => current.item_name.clone(),
                },
                quantity: match qty {
                    Some(q) => parse_quantity(&q)?,
                    None => current.qty(),
                },
                expiry_date: if clear_expiry { None } else { expiry.or(current.expiry_date) },
            };
            ctx.api.update_pantry(&id, &item).await?;
            println!("✓ Pantry item updated");
        }

        PantryCommand::Remove { id } => {
            ctx.api.delete_pantry(&id).await?;
            println!("✓ Item removed from pantry");
        }

        PantryCommand::Alerts => {
            let snap = ctx.snapshot().await;
            views::print_alerts(&snap.pantry, ctx.today());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_category() {
        assert_eq!(parse_category("dairy"), Ok(Category::Dairy));
        assert_eq!(parse_category(" Other "), Ok(Category::Other));
        assert!(parse_category("Household").is_err());
    }

    #[test]
    fn test_parse_history_args() {
        let cli = Cli::parse_from(["larder", "history", "--min", "400", "--sort", "highest"]);
        match cli.command {
            Command::History { min, sort, .. } => {
                assert_eq!(min, Some(400.0));
                assert_eq!(sort, SortMode::Highest);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_expiry_reference_date_is_utc() {
        use chrono::TimeZone;
        use larder_core::aggregate::expiring_soon;
        use larder_core::{PantryItem, EXPIRY_WINDOW_DAYS};

        // Already 10 March in Asia/Kolkata.
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 20, 0, 0).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let today = expiry_reference_date(now);
        assert_eq!(today, expiry);

        let pantry = vec![PantryItem::new("p1", "Milk", 1.0).with_expiry(expiry)];
        assert_eq!(expiring_soon(&pantry, today, EXPIRY_WINDOW_DAYS).len(), 1);
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("wednesday").unwrap(), Weekday::Wed);
        assert!(parse_weekday("someday").is_err());
    }
}
