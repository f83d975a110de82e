//! storepulse - a command-line consumer for the storepulse analytics backend.
//!
//! Drives the session lifecycle (login/register/logout), ingestion sync
//! triggers, and insights snapshots through `storepulse-core`.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storepulse_core::models::{
    DateRangeQuery, LoginRequest, ProductPerformanceQuery, ProfileUpdate, RegisterRequest,
    ShopifyCredentialsUpdate, SyncEntity, TopCustomersQuery,
};
use storepulse_core::utils::{format, validate};
use storepulse_core::{Config, FileSessionStore, Navigator, Notifier, SessionController};

/// Default window for the dashboard command, matching the web dashboard's
/// initial date-range selection.
const DEFAULT_DASHBOARD_DAYS: i64 = 30;

/// Number of top customers shown on the dashboard
const TOP_CUSTOMERS_LIMIT: u32 = 5;

/// Notifier printing the notices the web surface would show as toasts.
struct TermNotifier;

impl Notifier for TermNotifier {
    fn success(&self, message: &str) {
        eprintln!("✓ {}", message);
    }

    fn error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }
}

/// The CLI's "login surface" is a hint, not a redirect.
struct TermNavigator;

impl Navigator for TermNavigator {
    fn to_login(&self) {
        eprintln!("  Run `storepulse login` to start a session.");
    }
}

/// Initialize the tracing subscriber for logging.
/// Use RUST_LOG to control the log level (e.g. RUST_LOG=debug).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("storepulse - Shopify analytics client");
    eprintln!();
    eprintln!("Usage: storepulse <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login                      Authenticate with email + store URL");
    eprintln!("  register                   Create a tenant account");
    eprintln!("  logout                     End the current session");
    eprintln!("  status                     Session and ingestion status");
    eprintln!("  stats                      Store totals (customers/products/orders/revenue)");
    eprintln!("  sync <entity> [--full]     Trigger ingestion (customers|products|orders|all)");
    eprintln!("  dashboard [days]           Insights snapshot over the trailing window");
    eprintln!("  products [limit]           Top products by revenue");
    eprintln!("  profile [set]              Show or update the tenant profile");
    eprintln!("  credentials                Update the stored Shopify access token");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1).map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    let mut config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };

    let store = Arc::new(FileSessionStore::new(Config::session_dir()?)?);
    let notifier = Arc::new(TermNotifier);
    let navigator = Arc::new(TermNavigator);
    let controller = SessionController::new(&config, store, notifier, navigator)
        .context("Failed to create API client")?;
    info!(base_url = controller.api().base_url(), "storepulse starting");

    match command {
        "login" => login(&controller, &mut config).await,
        "register" => register(&controller, &mut config).await,
        "logout" => {
            controller.logout();
            Ok(())
        }
        "status" => status(&controller).await,
        "stats" => stats(&controller).await,
        "sync" => sync(&controller, &args[2..]).await,
        "dashboard" => dashboard(&controller, &args[2..]).await,
        "products" => products(&controller, &args[2..]).await,
        "profile" => profile(&controller, &args[2..]).await,
        "credentials" => credentials_update(&controller).await,
        other => {
            print_usage();
            bail!("Unknown command: {}", other);
        }
    }
}

/// Resolve the stored session and require it to be live.
async fn require_session(controller: &SessionController) -> Result<()> {
    controller.initialize().await;
    if !controller.is_authenticated() {
        bail!("Not logged in");
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Prompt with a remembered default shown in brackets.
fn prompt_with_default(label: &str, default: Option<&str>) -> Result<String> {
    match default {
        Some(value) => {
            print!("{} [{}]: ", label, value);
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            let input = input.trim();
            Ok(if input.is_empty() {
                value.to_string()
            } else {
                input.to_string()
            })
        }
        None => prompt(label),
    }
}

async fn login(controller: &SessionController, config: &mut Config) -> Result<()> {
    let email = match std::env::var("STOREPULSE_EMAIL") {
        Ok(v) if !v.is_empty() => v,
        _ => prompt_with_default("Email", config.last_email.as_deref())?,
    };
    let store_url = match std::env::var("STOREPULSE_STORE_URL") {
        Ok(v) if !v.is_empty() => v,
        _ => prompt("Shopify store URL")?,
    };

    if !validate::is_valid_email(&email) {
        bail!("Please enter a valid email address");
    }
    if !validate::is_valid_shopify_url(&store_url) {
        bail!("Please enter a valid Shopify store URL");
    }

    let credentials = LoginRequest {
        email: email.clone(),
        shopify_store_url: store_url,
    };

    if controller.login(&credentials).await.is_err() {
        // The failure notice has already been shown
        std::process::exit(1);
    }

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        tracing::warn!(error = %e, "Failed to save config");
    }
    Ok(())
}

async fn register(controller: &SessionController, config: &mut Config) -> Result<()> {
    let name = prompt("Store name")?;
    let email = prompt("Email")?;
    let store_url = prompt("Shopify store URL")?;
    let access_token = rpassword::prompt_password("Shopify access token: ")?;

    if name.trim().is_empty() {
        bail!("Name is required");
    }
    if !validate::is_valid_email(&email) {
        bail!("Please enter a valid email address");
    }
    if !validate::is_valid_shopify_url(&store_url) {
        bail!("Please enter a valid Shopify store URL");
    }
    if !validate::is_plausible_access_token(&access_token) {
        bail!("Access token appears to be too short");
    }

    let details = RegisterRequest {
        name,
        email: email.clone(),
        shopify_store_url: store_url,
        shopify_access_token: access_token,
    };

    if controller.register(&details).await.is_err() {
        std::process::exit(1);
    }

    config.last_email = Some(email);
    if let Err(e) = config.save() {
        tracing::warn!(error = %e, "Failed to save config");
    }
    Ok(())
}

async fn status(controller: &SessionController) -> Result<()> {
    require_session(controller).await?;
    let tenant = controller
        .current_tenant()
        .context("Session has no tenant")?;

    println!("Tenant:  {} <{}>", tenant.name, tenant.email);
    if let Some(url) = &tenant.shopify_store_url {
        println!("Store:   {}", url);
    }

    let status = controller.api().ingestion_status().await?;
    println!();
    println!("Data:");
    for entity in [
        SyncEntity::Customers,
        SyncEntity::Products,
        SyncEntity::Orders,
    ] {
        let entry = status.entity(entity);
        let last_sync = entry
            .last_sync
            .map(|t| format::format_date(&t.to_rfc3339()))
            .unwrap_or_else(|| "never".to_string());
        println!(
            "  {:<10} {:>10}   last sync: {}",
            entity.display_name(),
            format::format_number(entry.count),
            last_sync
        );
    }
    Ok(())
}

async fn stats(controller: &SessionController) -> Result<()> {
    require_session(controller).await?;
    let stats = controller.api().tenant_stats().await?;

    println!("Customers:  {}", format::format_number(stats.customers));
    println!("Products:   {}", format::format_number(stats.products));
    println!("Orders:     {}", format::format_number(stats.orders));
    println!("Revenue:    {}", format::format_currency(stats.total_revenue));
    Ok(())
}

async fn sync(controller: &SessionController, args: &[String]) -> Result<()> {
    require_session(controller).await?;

    let entity = args.first().map(String::as_str).unwrap_or("all");
    let full_sync = args.iter().any(|a| a == "--full");

    let api = controller.api();
    let response = match entity {
        "customers" => api.sync_customers(full_sync).await,
        "products" => api.sync_products(full_sync).await,
        "orders" => api.sync_orders(full_sync, Default::default()).await,
        "all" => api.full_sync().await,
        other => bail!("Unknown sync entity: {} (customers|products|orders|all)", other),
    }?;

    println!(
        "Sync complete: {} created, {} updated",
        format::format_number(response.results.created),
        format::format_number(response.results.updated)
    );
    Ok(())
}

async fn dashboard(controller: &SessionController, args: &[String]) -> Result<()> {
    require_session(controller).await?;

    let days: i64 = match args.first() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid day count: {}", raw))?,
        None => DEFAULT_DASHBOARD_DAYS,
    };

    let today = chrono::Utc::now().date_naive();
    let range = DateRangeQuery::last_days(days, today);
    let customers = TopCustomersQuery {
        limit: Some(TOP_CUSTOMERS_LIMIT),
        period: Some(format!("{}_days", days)),
    };

    let snapshot = controller.api().dashboard(&range, &customers).await?;
    let summary = &snapshot.summary;

    println!("Summary (last {} days):", days);
    println!(
        "  Customers:  {:>12}  ({})",
        format::format_number(summary.total_customers),
        format::format_percentage(summary.growth.customers)
    );
    println!(
        "  Orders:     {:>12}  ({})",
        format::format_number(summary.total_orders),
        format::format_percentage(summary.growth.orders)
    );
    println!(
        "  Revenue:    {:>12}  ({})",
        format::format_currency(summary.total_revenue),
        format::format_percentage(summary.growth.revenue)
    );
    println!(
        "  Avg order:  {:>12}  ({})",
        format::format_currency(summary.average_order_value),
        format::format_percentage(summary.growth.avg_order_value)
    );

    if !snapshot.orders_by_date.is_empty() {
        println!();
        println!("Orders by day:");
        for point in &snapshot.orders_by_date {
            println!(
                "  {}  {:>6} orders  {:>12}",
                point.date,
                format::format_number(point.orders),
                format::format_currency(point.revenue)
            );
        }
    }

    if !snapshot.top_customers.is_empty() {
        println!();
        println!("Top customers:");
        for customer in &snapshot.top_customers {
            println!(
                "  {:<24} {:>12}  {:>4} orders",
                customer.full_name(),
                format::format_currency(customer.period_spend),
                format::format_number(customer.period_order_count)
            );
        }
    }
    Ok(())
}

async fn products(controller: &SessionController, args: &[String]) -> Result<()> {
    require_session(controller).await?;

    let limit: u32 = match args.first() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid limit: {}", raw))?,
        None => 10,
    };

    let query = ProductPerformanceQuery {
        limit: Some(limit),
        sort_by: Some("revenue".to_string()),
        period: None,
    };
    let rows = controller.api().product_performance(&query).await?;

    if rows.is_empty() {
        println!("No product data yet. Run `storepulse sync products` first.");
        return Ok(());
    }

    for product in &rows {
        println!(
            "  {:<36} {:>10}  {:>6} sold  {:>12}",
            product.title,
            format::format_currency(product.price),
            format::format_number(product.sold_quantity),
            format::format_currency(product.revenue)
        );
    }
    Ok(())
}

async fn profile(controller: &SessionController, args: &[String]) -> Result<()> {
    require_session(controller).await?;

    if args.first().map(String::as_str) == Some("set") {
        let current = controller
            .current_tenant()
            .context("Session has no tenant")?;
        let name = prompt_with_default("Store name", Some(&current.name))?;
        let email = prompt_with_default("Email", Some(&current.email))?;

        if name.trim().is_empty() {
            bail!("Name is required");
        }
        if !validate::is_valid_email(&email) {
            bail!("Please enter a valid email address");
        }

        let updated = controller
            .api()
            .update_profile(&ProfileUpdate { name, email })
            .await?;
        controller.update_tenant(updated);
        println!("Profile updated");
        return Ok(());
    }

    let tenant = controller.api().tenant_profile().await?;
    println!("Name:    {}", tenant.name);
    println!("Email:   {}", tenant.email);
    if let Some(url) = &tenant.shopify_store_url {
        println!("Store:   {}", url);
    }
    println!("Active:  {}", if tenant.is_active { "yes" } else { "no" });
    if let Some(created) = tenant.created_at {
        println!("Since:   {}", format::format_date(&created.to_rfc3339()));
    }
    Ok(())
}

async fn credentials_update(controller: &SessionController) -> Result<()> {
    require_session(controller).await?;

    let access_token = rpassword::prompt_password("New Shopify access token: ")?;
    if !validate::is_plausible_access_token(&access_token) {
        bail!("Access token appears to be too short");
    }
    let api_key = prompt("Shopify API key (optional)")?;

    controller
        .api()
        .update_shopify_credentials(&ShopifyCredentialsUpdate {
            shopify_access_token: access_token,
            shopify_api_key: if api_key.is_empty() { None } else { Some(api_key) },
        })
        .await?;
    println!("Shopify credentials updated");
    Ok(())
}
