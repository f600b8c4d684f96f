//! Data seeder for Kardex development and testing.
//!
//! Seeds a demo account and a handful of stock cards with a realistic
//! movement history, then prints per-item summary totals.
//!
//! Usage: cargo run --bin seeder

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kardex_core::reports::ReportService;
use kardex_core::stockcard::Movement;
use kardex_store::{CredentialStore, ItemStore, OpeningBalance, StoreConfig, StoreError};

/// Demo account seeded for local logins.
const DEMO_ACCOUNT: &str = "demo@kardex.dev";

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kardex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StoreConfig::load()?;

    println!("Seeding demo account...");
    let credentials = CredentialStore::open(&config.credentials_file)?;
    if credentials.contains(DEMO_ACCOUNT) {
        println!("  Demo account already exists, skipping...");
    } else {
        credentials.register(DEMO_ACCOUNT, "demo-password")?;
    }

    let store = ItemStore::open(&config.data_dir)?;

    println!("Seeding stock cards...");
    seed_item(
        &store,
        "Arabica Beans 1kg",
        Some(dec!(85000)),
        &[
            Movement::Purchase { date: day(5), qty: 40, unit_cost: dec!(90000) },
            Movement::Sale { date: day(9), qty: 25 },
            Movement::Sale { date: day(14), qty: 10 },
            Movement::SalesReturn { date: day(16), qty: 3 },
            Movement::Purchase { date: day(20), qty: 30, unit_cost: dec!(95000) },
            Movement::PurchaseReturn { date: day(22), qty: 5 },
        ],
    )?;
    seed_item(
        &store,
        "Paper Cup 8oz (50pcs)",
        None,
        &[
            Movement::Purchase { date: day(3), qty: 100, unit_cost: dec!(27500) },
            Movement::Purchase { date: day(10), qty: 80, unit_cost: dec!(29000) },
            Movement::Sale { date: day(18), qty: 120 },
        ],
    )?;

    println!("Inventory report:");
    for item in store.items() {
        let card = store.get(&item)?;
        let summary = ReportService::summarize(&card);
        println!(
            "  {item}: in {} / out {} / on hand {} worth {}",
            summary.total_incoming_qty,
            summary.total_outgoing_qty,
            summary.closing_qty,
            summary.closing_value,
        );
    }

    println!("Seeding complete!");
    Ok(())
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, d).expect("valid seed date")
}

/// Seeds one item and its movement history, skipping items already present.
fn seed_item(
    store: &ItemStore,
    name: &str,
    opening_unit_cost: Option<Decimal>,
    movements: &[Movement],
) -> Result<()> {
    let opening = opening_unit_cost.map(|unit_cost| OpeningBalance {
        date: day(1),
        qty: 20,
        unit_cost,
    });
    match store.create_item(name, opening) {
        Ok(_) => {}
        Err(StoreError::ItemExists(_)) => {
            println!("  {name} already exists, skipping...");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }
    for movement in movements {
        store.record(name, *movement)?;
    }
    info!(item = %name, movements = movements.len(), "seeded stock card");
    Ok(())
}
